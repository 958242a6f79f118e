//! Runs the built binary end to end

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn multiqueue() -> Command {
    Command::new(env!("CARGO_BIN_EXE_multiqueue"))
}

#[test]
fn test_json_summary_accounts_for_every_record() {
    let output = multiqueue()
        .args([
            "--partitions",
            "3",
            "--lanes",
            "2",
            "--capacity",
            "64",
            "--producers",
            "4",
            "--items",
            "250",
            "--batch-size",
            "10",
            "--output",
            "json",
            "--no-color",
            "--log-level",
            "warn",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["produced"], 1000);
    assert_eq!(summary["expected"], 1000);
    assert_eq!(summary["interrupted"], false);
    assert_eq!(summary["queue"]["partition_count"], 3);

    let partitions = summary["partitions"].as_array().unwrap();
    let consumed: u64 = partitions
        .iter()
        .map(|p| p["consumed"].as_u64().unwrap())
        .sum();
    assert_eq!(consumed, 1000);
    assert!(partitions.iter().all(|p| p["out_of_order"] == 0));
}

#[test]
fn test_text_summary_with_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[queue]\nname = \"from-file\"\npartition_count = 2\n")
        .unwrap();

    let output = multiqueue()
        .arg("-c")
        .arg(file.path())
        .args(["--items", "20", "--producers", "2", "--no-color", "-l", "off"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Queue 'from-file'"), "{}", stdout);
    assert!(stdout.contains("produced 40 of 40"));
}

#[test]
fn test_bad_config_exits_with_user_error_code() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[queue]\nlane_count = 0\n").unwrap();

    let output = multiqueue()
        .arg("--config-file")
        .arg(file.path())
        .args(["--no-color", "-l", "error"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("lane_count"));
}

#[test]
fn test_version_includes_build_metadata() {
    let output = multiqueue().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(stdout.contains("built"));
}
