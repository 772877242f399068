//! End-to-end CLI tests driving the compiled `bracet` binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn evaluate_prints_arithmetic_result() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["evaluate", "1+2*3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

#[test]
fn evaluate_with_var_reads_supplied_value() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["evaluate", "q1+1", "--var", "q1=4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));
}

#[test]
fn evaluate_undefined_variable_is_an_error_but_exits_cleanly() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["--verbose", "evaluate", "missing_var"])
        .assert()
        .success()
        .stderr(predicate::str::contains("undefined variable"));
}

#[test]
fn process_substitutes_embedded_expression() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["process", "sum is {1+2}"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sum is 3"));
}

#[test]
fn tokenize_prints_token_kinds() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["tokenize", "1+2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Number"));
}

#[test]
fn emit_wraps_variable_reference_in_any_na_guard() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["emit", "q1+1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANY_NA"));
}

#[test]
fn emit_unknown_function_fails() {
    Command::cargo_bin("bracet")
        .unwrap()
        .args(["emit", "not_a_real_function(1)"])
        .assert()
        .failure();
}
