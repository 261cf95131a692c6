//! Binary smoke tests for the `todo` CLI.
//!
//! These run the compiled binary with a pinned date and check stdout, so the
//! argument wiring and the stdin/stdout contract are covered end to end.

use assert_cmd::Command;
use predicates::prelude::*;

const TODAY: &str = "2024-06-10";

const SAMPLE: &str = "\
(B) Water plants +garden due:2024-06-09 rec:3d
Buy milk @shop
(A) 2024-06-01 Renew passport +admin due:2024-06-20
x 2024-06-05 Old errand
";

#[allow(deprecated)] // cargo_bin works fine for our use case
fn todo() -> Command {
    let mut cmd = Command::cargo_bin("todo").unwrap();
    cmd.env_remove("TODO_LOG").env("TODO_TODAY", TODAY);
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = todo().arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in &["add", "list", "show", "normalize", "done", "postpone", "edit", "completions"] {
        assert!(stdout.contains(cmd), "help output missing '{cmd}'");
    }
}

#[test]
fn add_prints_canonical_line() {
    todo()
        .args(["add", "Pay rent @bank", "--project", "home", "--priority", "A"])
        .args(["--due", "2024-07-01", "--rec", "1m"])
        .assert()
        .success()
        .stdout("(A) 2024-06-10 Pay rent +home @bank due:2024-07-01 rec:1m\n");
}

#[test]
fn add_rejects_bad_recurrence() {
    todo()
        .args(["add", "Stretch", "--rec", "9d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid recurrence '9d'"));
}

#[test]
fn normalize_rewrites_lines() {
    todo()
        .arg("normalize")
        .write_stdin("  due:2024-01-02 Call   mum @phone\n\n(C) Tidy +home\n")
        .assert()
        .success()
        .stdout("Call mum @phone due:2024-01-02\n(C) Tidy +home\n");
}

#[test]
fn list_overdue_only() {
    todo()
        .args(["list", "--due", "overdue"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Water plants"))
        .stdout(predicate::str::contains("1d late"))
        .stdout(predicate::str::contains("every 3 day"))
        .stdout(predicate::str::contains("Renew passport").not());
}

#[test]
fn list_hides_completed_unless_all() {
    todo()
        .arg("list")
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Old errand").not());

    todo()
        .args(["list", "--all"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Old errand"));
}

#[test]
fn list_json_uses_task_data_fields() {
    let output = todo()
        .args(["--json", "list", "--project", "admin"])
        .write_stdin(SAMPLE)
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 3);
    assert_eq!(records[0]["priority"], "A");
    assert_eq!(records[0]["dueDate"], "2024-06-20");
    assert_eq!(records[0]["overdue"], false);
}

#[test]
fn done_appends_next_occurrence() {
    todo()
        .args(["done", "1"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(
            "x 2024-06-10 (B) Water plants +garden due:2024-06-09 rec:3d\n\
             Buy milk @shop\n\
             (A) 2024-06-01 Renew passport +admin due:2024-06-20\n\
             x 2024-06-05 Old errand\n\
             (B) Water plants +garden due:2024-06-12 rec:3d\n",
        );
}

#[test]
fn postpone_moves_due_date() {
    todo()
        .args(["postpone", "3"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Renew passport +admin due:2024-06-21"));
}

#[test]
fn postpone_without_due_fails() {
    todo()
        .args(["postpone", "2"])
        .write_stdin(SAMPLE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no due date"));
}

#[test]
fn edit_clears_and_sets_fields() {
    todo()
        .args(["edit", "1", "--priority", "", "--rec", "1w"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Water plants +garden due:2024-06-09 rec:1w\n"));
}

#[test]
fn show_unknown_id_fails() {
    todo()
        .args(["show", "42"])
        .write_stdin(SAMPLE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("task 42 not found"));
}

#[test]
fn edit_rejects_text_that_reads_as_completion() {
    todo()
        .args(["edit", "2", "--text", "x 2024-01-01 foo"])
        .write_stdin(SAMPLE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot update task 2"))
        .stderr(predicate::str::contains("invalid text"));
}

#[test]
fn add_json_has_no_id() {
    let output = todo().args(["--json", "add", "Stretch"]).output().unwrap();
    assert!(output.status.success());
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(record.get("id").is_none());
    assert_eq!(record["line"], "2024-06-10 Stretch");
}
