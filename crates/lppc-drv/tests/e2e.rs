//! End-to-end driver tests: real binary, real files, real exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn lppc() -> Command {
    Command::cargo_bin("lppc").expect("binary builds")
}

#[test]
fn compiles_a_clean_program_to_cpp() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.l");
    fs::write(
        &input,
        "#pragma paradigm hybrid\nfn main() -> int { let x = 2 + 3 * 4; return x; }",
    )
    .unwrap();

    lppc().arg(&input).arg("-c").assert().success();

    let cpp = fs::read_to_string(dir.path().join("main.l.cpp")).unwrap();
    assert!(cpp.contains("int x = (2 + (3 * 4));"));
    assert!(cpp.contains("#include <iostream>"));
}

#[test]
fn output_path_override() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.l");
    let output = dir.path().join("generated.cpp");
    fs::write(&input, "#pragma paradigm hybrid\nfn main() -> int { return 0; }").unwrap();

    lppc()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn error_diagnostics_fail_with_exit_code_one() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.l");
    fs::write(
        &input,
        "#pragma paradigm hybrid\nfn g(n: int) -> int { return n / 0; }",
    )
    .unwrap();

    lppc()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[DIV-BY-ZERO]"))
        .stderr(predicate::str::contains("error:"));

    // No output file on failure.
    assert!(!dir.path().join("bad.l.cpp").exists());
}

#[test]
fn missing_pragma_reports_and_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("nopragma.l");
    fs::write(&input, "fn main() -> int { return 0; }").unwrap();

    lppc()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[PRAGMA]"))
        .stderr(predicate::str::contains("paradigm"));
}

#[test]
fn warnings_still_succeed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("warn.l");
    fs::write(
        &input,
        "#pragma paradigm hybrid\nfn f() -> int { let p = alloc(8); return 0; }",
    )
    .unwrap();

    lppc()
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("[MEM-LEAK]"))
        .stderr(predicate::str::contains("warning:"));
}

#[test]
fn missing_input_file_fails() {
    lppc()
        .arg("/nonexistent/path.l")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn help_prints_usage() {
    lppc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: lppc"));
}

#[test]
fn emit_tokens_dumps_the_stream() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("t.l");
    fs::write(&input, "#pragma paradigm hybrid\nfn main() -> int { return 0; }").unwrap();

    lppc()
        .arg(&input)
        .arg("--emit")
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("EndOfFile"));
}

#[test]
fn diagnostics_use_the_stable_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("fmt.l");
    fs::write(
        &input,
        "#pragma paradigm hybrid\nfn f() -> int { let x: int; return x; }",
    )
    .unwrap();

    let file = input.to_string_lossy().into_owned();
    lppc()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(format!("{file}:2:")))
        .stderr(predicate::str::contains("[UNINIT-READ]"))
        .stderr(predicate::str::contains("in function 'f'"))
        .stderr(predicate::str::contains("note: Variable declared but never assigned a value"));
}
