use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_file(prefix: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push("hello-uart-tests");
    let _ = std::fs::create_dir_all(&dir);

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = dir.join(format!("{}-{}.yaml", prefix, nonce));
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}

#[test]
fn test_cli_test_mode_outputs() {
    let mut dir = std::env::temp_dir();
    dir.push("hello-uart-tests-outputs");
    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::create_dir_all(&dir);

    let script_path = dir.join("script.yaml");
    let script_content = r#"
schema_version: "1.0"
run:
  uart: uart2
  delay_iterations: 0
limits:
  max_lines: 3
assertions:
  - output_contains: "0002Hello world!"
  - line_count: 3
  - last_line: "0002Hello world!"
"#;
    std::fs::write(&script_path, script_content).expect("Failed to write script");

    let output_dir = dir.join("artifacts");

    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args([
            "test",
            "--script",
            script_path.to_str().unwrap(),
            "--no-uart-stdout",
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let log = std::fs::read(output_dir.join("uart.log")).unwrap();
    assert_eq!(
        log,
        b"0000Hello world!\r\n0001Hello world!\r\n0002Hello world!\r\n"
    );

    let result_path = output_dir.join("result.json");
    let result_content = std::fs::read_to_string(&result_path).unwrap();
    let result: serde_json::Value = serde_json::from_str(&result_content).unwrap();

    assert_eq!(result["status"], "pass");
    assert_eq!(result["uart"], "uart2");
    assert_eq!(result["base_address"], "0x1c0b0000");
    assert_eq!(result["lines"], 3);
    assert_eq!(result["bytes"], 54);
    assert_eq!(result["assertions"].as_array().unwrap().len(), 3);
    assert_eq!(
        result["transcript_sha256"].as_str().map(|s| s.len()),
        Some(64)
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_echoes_uart() {
    let script = write_temp_file(
        "script-echo",
        r#"
schema_version: "1.0"
run:
  delay_iterations: 0
limits:
  max_lines: 2
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args(["test", "--script", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"0000Hello world!\r\n0001Hello world!\r\n");
}

#[test]
fn test_cli_test_mode_wraparound() {
    let script = write_temp_file(
        "script-wrap",
        r#"
schema_version: "1.0"
run:
  delay_iterations: 0
limits:
  max_lines: 10001
assertions:
  - output_contains: "9999Hello world!\r\n0000Hello world!\r\n"
  - last_line: "0000Hello world!"
  - line_count: 10001
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args([
            "test",
            "--script",
            script.to_str().unwrap(),
            "--no-uart-stdout",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
}

#[test]
fn test_cli_test_mode_assertion_fail() {
    let script = write_temp_file(
        "script-fail",
        r#"
schema_version: "1.0"
run:
  delay_iterations: 0
limits:
  max_lines: 5
assertions:
  - output_contains: "ThisTextWillNeverBeFound"
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args([
            "test",
            "--script",
            script.to_str().unwrap(),
            "--no-uart-stdout",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1)); // EXIT_ASSERT_FAIL
}

#[test]
fn test_cli_test_mode_max_lines_guard() {
    let script = write_temp_file(
        "script-huge",
        r#"
schema_version: "1.0"
limits:
  max_lines: 60000000
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args(["test", "--script", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2)); // EXIT_CONFIG_ERROR
}

#[test]
fn test_cli_test_mode_missing_script() {
    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args(["test", "--script", "non_existent_script.yaml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_test_mode_unwritable_output_dir() {
    let script = write_temp_file(
        "script-artifacts",
        r#"
schema_version: "1.0"
run:
  delay_iterations: 0
limits:
  max_lines: 1
"#,
    );

    // A directory cannot be created underneath a regular file.
    let blocker = write_temp_file("not-a-dir", "");
    let output_dir = blocker.join("sub");

    let output = Command::new(env!("CARGO_BIN_EXE_hello-uart"))
        .args([
            "test",
            "--script",
            script.to_str().unwrap(),
            "--no-uart-stdout",
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(3)); // EXIT_RUNTIME_ERROR
}
