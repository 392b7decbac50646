use assert_cmd::Command;
use predicates::prelude::*;

fn dts() -> Command {
    Command::cargo_bin("dts").unwrap()
}

fn stdout_json(args: &[&str]) -> serde_json::Value {
    let output = dts().args(args).output().unwrap();
    assert!(output.status.success(), "dts {args:?} failed");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_apply_one_day() {
    let json = stdout_json(&["apply", "1d", "--base", "2024-01-01T00:00:00Z"]);
    assert_eq!(json["utcTimestamp"], 1_704_153_600_000i64);
    assert_eq!(json["durationMs"], 86_400_000);
    assert_eq!(json["utc"], "2024-01-02T00:00:00.000Z");
}

#[test]
fn test_apply_accepts_epoch_millis_base() {
    let json = stdout_json(&["apply", "3.5h", "--base", "1704067200000"]);
    assert_eq!(json["utc"], "2024-01-01T03:30:00.000Z");
}

#[test]
fn test_apply_negative_duration() {
    let json = stdout_json(&["apply", "-1h30m", "--base", "2024-01-01T12:00:00Z"]);
    assert_eq!(json["durationMs"], -5_400_000);
}

#[test]
fn test_apply_rollover_clamp() {
    let overflow = stdout_json(&["apply", "1mo", "--base", "2024-01-31T00:00:00Z"]);
    assert_eq!(overflow["utc"], "2024-03-02T00:00:00.000Z");

    let clamp = stdout_json(&[
        "apply",
        "1mo",
        "--base",
        "2024-01-31T00:00:00Z",
        "--rollover",
        "clamp",
    ]);
    assert_eq!(clamp["utc"], "2024-02-29T00:00:00.000Z");
}

#[test]
fn test_describe_negative_year() {
    dts()
        .args(["describe", "2023-01-01T00:00:00Z", "--base", "2024-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout("-1y\n");
}

#[test]
fn test_describe_same_instant() {
    dts()
        .args(["describe", "1704067200000", "--base", "2024-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout("0ms\n");
}

#[test]
fn test_describe_json_breakdown() {
    let json = stdout_json(&[
        "describe",
        "2025-03-26T05:06:07.250Z",
        "--base",
        "2024-01-01T00:00:00Z",
        "--json",
    ]);
    assert_eq!(json["negative"], false);
    assert_eq!(json["years"], 1);
    assert_eq!(json["months"], 2);
    assert_eq!(json["weeks"], 3);
    assert_eq!(json["milliseconds"], 250);
}

#[test]
fn test_numbers_week() {
    let json = stdout_json(&["numbers", "1w"]);
    assert_eq!(json["totalSeconds"], 604_800.0);
    assert_eq!(json["totalMilliseconds"], 604_800_000.0);
}

#[test]
fn test_invalid_base_fails() {
    dts()
        .args(["apply", "1d", "--base", "yesterday-ish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid instant"));
}

#[test]
fn test_debug_logging_goes_to_stderr() {
    dts()
        .args([
            "--log-level",
            "debug",
            "describe",
            "1704067201000",
            "--base",
            "1704067200000",
        ])
        .assert()
        .success()
        .stdout("1s\n")
        .stderr(predicate::str::contains("converted timestamp to duration"));
}
