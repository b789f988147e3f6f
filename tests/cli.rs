mod common;

use common::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_cli(table_path: &Path, result_path: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tpch-q5"))
        .args(["--r_name", "ASIA", "--start_date", "1994-01-01", "--end_date", "1995-01-01"])
        .args(["--threads", "4"])
        .arg("--table_path")
        .arg(table_path)
        .arg("--result_path")
        .arg(result_path)
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_cli_success() {
    let result_path = scratch_dir("cli").join("result.txt");
    let output = run_cli(&resource("tpch-mini"), &result_path, &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(&result_path).unwrap(),
        expected_output("q5-asia-1994.txt")
    );
}

#[test]
fn test_cli_headerless_flag() {
    let result_path = scratch_dir("cli").join("result.txt");
    let output = run_cli(
        &resource("tpch-mini-dbgen"),
        &result_path,
        &["--headerless", "--partitioning", "striped"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(&result_path).unwrap(),
        expected_output("q5-asia-1994.txt")
    );
}

#[test]
fn test_cli_rejects_bad_flags() {
    let result_path = scratch_dir("cli").join("result.txt");
    let output = run_cli(&resource("tpch-mini"), &result_path, &["--numeric_policy", "ignore"]);
    assert!(!output.status.success());
    assert!(!result_path.exists());

    let output = Command::new(env!("CARGO_BIN_EXE_tpch-q5"))
        .args(["--r_name", "ASIA"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_inverted_dates() {
    let result_path = scratch_dir("cli").join("result.txt");
    let output = Command::new(env!("CARGO_BIN_EXE_tpch-q5"))
        .args(["--r_name", "ASIA", "--start_date", "1995-01-01", "--end_date", "1994-01-01"])
        .args(["--threads", "1"])
        .arg("--table_path")
        .arg(resource("tpch-mini"))
        .arg("--result_path")
        .arg(&result_path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(!result_path.exists());
}

#[test]
fn test_cli_reports_failing_stage() {
    let tables = copy_fixture("tpch-mini");
    append_line(&tables.join("customer.tbl"), "1|Customer#000000001|dup|8|18-0|0.00|BUILDING|dup");
    let result_path = scratch_dir("cli").join("result.txt");
    let output = run_cli(&tables, &result_path, &[]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("index failed"), "{}", stderr);
    assert!(!result_path.exists());
}
