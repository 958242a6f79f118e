//! CLI argument parsing tests

use clap::Parser;
use multiqueue::app::cli::args::*;
use multiqueue::app::driver::DriverSettings;
use multiqueue::queue::{MultiQueueConfig, RouterKind};
use std::path::PathBuf;

#[test]
fn test_parse_full_command_line() {
    let args = Args::try_parse_from([
        "multiqueue",
        "--config-file",
        "pipeline.toml",
        "--name",
        "ingest",
        "-p",
        "8",
        "-L",
        "4",
        "-C",
        "4096",
        "-b",
        "16",
        "--producers",
        "12",
        "--items",
        "500",
        "--batch-size",
        "32",
        "--flows",
        "99",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--log-file",
        "run.log",
    ])
    .unwrap();

    assert_eq!(args.config_file, Some(PathBuf::from("pipeline.toml")));
    assert_eq!(args.name.as_deref(), Some("ingest"));
    assert_eq!(args.partitions, Some(8));
    assert_eq!(args.lanes, Some(4));
    assert_eq!(args.capacity, Some(4096));
    assert_eq!(args.burst, Some(16));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.log_file, Some(PathBuf::from("run.log")));

    let settings = DriverSettings::from(&args);
    assert_eq!(settings.producers, 12);
    assert_eq!(settings.items_per_producer, 500);
    assert_eq!(settings.batch_size, 32);
    assert_eq!(settings.flows, 99);
    assert_eq!(settings.expected_records(), 6000);
}

#[test]
fn test_equals_format_and_overrides() {
    let args = Args::try_parse_from(["multiqueue", "--partitions=3", "--router=mix"]).unwrap();
    let config = args.apply_overrides(MultiQueueConfig::default());
    assert_eq!(config.partition_count, 3);
    assert_eq!(config.router, RouterKind::Mix);
}

#[test]
fn test_invalid_values_are_rejected() {
    for bad in [
        vec!["multiqueue", "--lanes", "0"],
        vec!["multiqueue", "--capacity", "lots"],
        vec!["multiqueue", "--log-level", "verbose"],
        vec!["multiqueue", "--log-format", "xml"],
        vec!["multiqueue", "--output", "yaml"],
        vec!["multiqueue", "--name", "  "],
    ] {
        assert!(Args::try_parse_from(bad.clone()).is_err(), "accepted {:?}", bad);
    }
}
