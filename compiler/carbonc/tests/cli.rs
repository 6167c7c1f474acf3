//! The `carbon` binary as a user runs it.

use std::io::Write;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn carbon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_carbon"))
        .args(args)
        .env_remove("CARBON_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn script(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn runs_a_file() {
    let file = script("x = 6 * 7;\nprint(\"answer:\", x);\n");
    let output = carbon(&[file.path().to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "answer: 42\n");
}

#[test]
fn eval_runs_before_files_and_shares_globals() {
    let file = script("print(greeting + \" world\");");
    let output = carbon(&["-e", "greeting = \"hello\";", file.path().to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "hello world\n");
}

#[test]
fn script_arguments() {
    let output = carbon(&["-e", "print(arguments, length(arguments));", "--", "a", "b"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "[a, b] 2\n");
}

#[test]
fn syntax_error_fails_with_a_report() {
    let output = carbon(&["-e", "print(1);", "-e", "x = );"]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "1\n");
    let report = stderr(&output);
    assert!(report.contains("syntax error"), "{report}");
    assert!(report.contains("<eval #2>"), "{report}");
}

#[test]
fn runtime_error_stops_only_its_file() {
    let failing = script("print(1); 1 / 0; print(2);");
    let passing = script("print(3);");
    let output = carbon(&[
        failing.path().to_str().unwrap(),
        passing.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "1\n3\n");
    assert!(stderr(&output).starts_with("error: "), "{}", stderr(&output));
}

#[test]
fn missing_file_is_reported() {
    let output = carbon(&["/nonexistent/carbon/script.cb"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot read"), "{}", stderr(&output));
}

#[test]
fn exit_sets_the_status() {
    let output = carbon(&["-e", "exit(7); print(1);"]);
    assert_eq!(output.status.code(), Some(7));
    assert_eq!(stdout(&output), "");
}
