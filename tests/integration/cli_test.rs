use std::process::{Command, Output};

fn diffset(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diffset"))
        .args(args)
        .env_remove("DIFFSET_LOG_FORMAT")
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute diffset")
}

#[test]
fn test_help_lists_options() {
    let output = diffset(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for option in ["--prefix", "--continue", "--workers", "--quiet"] {
        assert!(stdout.contains(option), "help should mention {option}");
    }
}

#[test]
fn test_non_canonical_prefix_fails() {
    let output = diffset(&["5", "--prefix", "0,2,5"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not begin with 0, 1"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_prefix_out_of_range_fails() {
    let output = diffset(&["4", "--prefix", "0,1,13"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("v = 13"), "unexpected stderr: {stderr}");
}

#[test]
fn test_size_out_of_range_fails() {
    let output = diffset(&["2", "104"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("outside the supported range"));
}

#[test]
fn test_reversed_range_fails() {
    let output = diffset(&["9", "5"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_zero_workers_fails() {
    let output = diffset(&["3", "-j", "0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least one worker"));
}

#[test]
fn test_diagnostics_go_to_stderr() {
    let output = diffset(&["3", "4", "-j", "1"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("searching for perfect difference sets"));
    assert!(stderr.contains("Total trials"));
}

#[test]
fn test_json_logging() {
    let output = Command::new(env!("CARGO_BIN_EXE_diffset"))
        .args(["3", "-j", "1", "--prefix", "0,1"])
        .env("DIFFSET_LOG_FORMAT", "json")
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute diffset");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.lines().all(|line| line.starts_with('{')), "{stderr}");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "(3, 7) @1: 0, 1, 3");
}

#[test]
fn test_unknown_log_format_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_diffset"))
        .args(["3"])
        .env("DIFFSET_LOG_FORMAT", "xml")
        .output()
        .expect("Failed to execute diffset");
    assert_eq!(output.status.code(), Some(1));
}
