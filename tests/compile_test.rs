//! End-to-end tests that drive the `kc` binary over real files: successful
//! compiles are checked against the emitted IR, failing ones against the
//! rendered diagnostics and the exit code.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::PathBuf;

/// Fresh scratch directory per test so default outputs don't collide.
fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kc-test-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

fn write_source(dir: &PathBuf, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).expect("failed to write source file");
    path
}

#[test]
fn test_compiles_to_default_output() {
    let dir = scratch_dir("default-output");
    write_source(&dir, "input.k", "x = 5; y = x * 2; print y;");

    let output = cargo_bin_cmd!("kc")
        .arg("input.k")
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert!(
        output.status.success(),
        "kc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("a.ll"), "stdout was: {stdout}");

    let ir = fs::read_to_string(dir.join("a.ll")).expect("a.ll was not written");
    assert!(ir.contains("define i32 @main()"));
    assert!(ir.contains("ret i32 0"));
    assert!(ir.contains("declare i32 @printf(ptr, ...)"));
    assert!(ir.contains("source_filename = \"input.k\""));
    // Bare numeric print uses the fixed-precision newline format.
    assert!(ir.contains("%.15f\\0A\\00"));
}

#[test]
fn test_output_flag_before_input() {
    let dir = scratch_dir("o-before");
    write_source(&dir, "input.k", "print 1;");

    let output = cargo_bin_cmd!("kc")
        .args(["-o", "out.ll", "input.k"])
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert!(output.status.success());
    assert!(dir.join("out.ll").exists());
}

#[test]
fn test_output_flag_after_input() {
    let dir = scratch_dir("o-after");
    write_source(&dir, "input.k", "print 1;");

    let output = cargo_bin_cmd!("kc")
        .args(["input.k", "-o", "out.ll"])
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert!(output.status.success());
    assert!(dir.join("out.ll").exists());
}

#[test]
fn test_factorial_program() {
    let dir = scratch_dir("factorial");
    write_source(
        &dir,
        "fact.k",
        "mut n = 5; result = 1; while (n > 0) { result = result * n; n = n - 1; } print result;",
    );

    let output = cargo_bin_cmd!("kc")
        .args(["fact.k", "-o", "fact.ll"])
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert!(
        output.status.success(),
        "kc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let ir = fs::read_to_string(dir.join("fact.ll")).expect("fact.ll was not written");
    assert!(ir.contains("loopcond"));
    assert!(ir.contains("afterloop"));
    assert!(ir.contains("fmul double"));
}

#[test]
fn test_formatted_print_program() {
    let dir = scratch_dir("format");
    write_source(&dir, "pi.k", "print \"pi = %.2f\\n\", 3.14159;");

    let output = cargo_bin_cmd!("kc")
        .args(["pi.k", "-o", "pi.ll"])
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert!(
        output.status.success(),
        "kc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let ir = fs::read_to_string(dir.join("pi.ll")).expect("pi.ll was not written");
    assert!(ir.contains("pi = %.2f\\0A\\00"));
}

#[test]
fn test_immutable_reassignment_diagnostic() {
    let dir = scratch_dir("immutable");
    write_source(&dir, "input.k", "x = 1;\nx = 2;\n");

    let output = cargo_bin_cmd!("kc")
        .arg("input.k")
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input.k:2:1: error: Cannot reassign to immutable variable 'x'"));
    assert!(stderr.contains("note: first assignment here: input.k:1:1"));
    assert!(stderr.contains("help: consider making this binding mutable: 'mut x'"));
    // Caret under column 1 of the offending line.
    assert!(stderr.contains("x = 2;\n^\n"));
    assert!(!dir.join("a.ll").exists());
}

#[test]
fn test_string_operand_diagnostic() {
    let dir = scratch_dir("string-operand");
    write_source(&dir, "input.k", "x = \"hello\" + 1;\n");

    let output = cargo_bin_cmd!("kc")
        .arg("input.k")
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("String literal cannot be used in binary operation"));
}

#[test]
fn test_missing_semicolon_diagnostic_location() {
    let dir = scratch_dir("semicolon");
    write_source(&dir, "input.k", "print 42");

    let output = cargo_bin_cmd!("kc")
        .arg("input.k")
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    // Reported just past the last token, with the snippet and caret.
    assert!(stderr.contains("input.k:1:9: error: Expected ';' after print statement"));
    assert!(stderr.contains("print 42\n        ^\n"));
}

#[test]
fn test_rejects_wrong_extension() {
    let dir = scratch_dir("extension");
    write_source(&dir, "input.txt", "print 1;");

    let output = cargo_bin_cmd!("kc")
        .arg("input.txt")
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must have a .k extension"));
}

#[test]
fn test_missing_input_file() {
    let dir = scratch_dir("missing-input");

    let output = cargo_bin_cmd!("kc")
        .arg("nonexistent.k")
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read"));
}

#[test]
fn test_empty_program_compiles() {
    let dir = scratch_dir("empty");
    write_source(&dir, "empty.k", "");

    let output = cargo_bin_cmd!("kc")
        .args(["empty.k", "-o", "empty.ll"])
        .current_dir(&dir)
        .output()
        .expect("failed to run kc");

    assert!(output.status.success());
    let ir = fs::read_to_string(dir.join("empty.ll")).expect("empty.ll was not written");
    assert!(ir.contains("define i32 @main()"));
    assert!(ir.contains("ret i32 0"));
}
