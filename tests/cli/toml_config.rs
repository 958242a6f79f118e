//! TOML configuration tests

use clap::Parser;
use multiqueue::app::cli::args::Args;
use multiqueue::queue::{LanePolicyKind, MultiQueueConfig, QueueError, RouterKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_bare_table_config() {
    let file = write_config(
        r#"
name = "decoder"
total_capacity = 1024
partition_count = 4
lane_count = 2
burst_size = 8
router = "modulo"
lane_policy = "round-robin"
"#,
    );

    let config = MultiQueueConfig::from_file(file.path()).unwrap();
    assert_eq!(config.name, "decoder");
    assert_eq!(config.total_capacity, 1024);
    assert_eq!(config.partition_count, 4);
    assert_eq!(config.partition_capacity(), 256);
    assert_eq!(config.router, RouterKind::Modulo);
    assert_eq!(config.lane_policy, LanePolicyKind::RoundRobin);
}

#[test]
fn test_unknown_key_is_rejected() {
    let file = write_config("[queue]\npartitions = 4\n");
    assert!(matches!(
        MultiQueueConfig::from_file(file.path()),
        Err(QueueError::Config { .. })
    ));
}

#[test]
fn test_cli_wins_over_file() {
    let file = write_config("[queue]\npartition_count = 6\nburst_size = 2\n");
    let path = file.path().to_string_lossy().to_string();
    let args = Args::try_parse_from(["multiqueue", "-c", path.as_str(), "-b", "10"]).unwrap();

    let config = args.queue_config().unwrap();
    assert_eq!(config.partition_count, 6);
    assert_eq!(config.burst_size, 10);
}
