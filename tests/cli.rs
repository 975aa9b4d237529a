use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn eval_of_unregistered_import_prints_unit() {
    let mut cmd = Command::cargo_bin("amaryllis").expect("binary exists");
    cmd.arg("eval").arg("import not_registered_export_test");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("unit"));
}

#[test]
fn run_executes_script_against_one_registry() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("session.amy");
    fs::write(
        &script,
        "# rendezvous demo\nexport answer 42\nimport answer\nexports\n",
    )
    .expect("write script");

    let mut cmd = Command::cargo_bin("amaryllis").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("{answer: 42}"));
}

#[test]
fn no_polyglot_flag_closes_the_gate() {
    let mut cmd = Command::cargo_bin("amaryllis").expect("binary exists");
    cmd.arg("--no-polyglot").arg("eval").arg("export x 1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("polyglot access"));
}

#[test]
fn malformed_command_reports_a_diagnostic() {
    let mut cmd = Command::cargo_bin("amaryllis").expect("binary exists");
    cmd.arg("eval").arg("delete x");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown command"));
}
