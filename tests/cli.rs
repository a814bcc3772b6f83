// CLI integration tests.
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tabclean").expect("binary")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write input");
    path.to_str().expect("utf8 path").to_string()
}

#[test]
fn converts_csv_with_cleaning() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write(temp.path(), "scores.csv", "a,b\n1,\n1,4\n2,6\n2,6\n");
    let out_dir = temp.path().join("out");

    cmd()
        .args([
            input.as_str(),
            "--dedupe",
            "--fill-missing",
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("scores.csv - Preview"))
        .stdout(predicate::str::contains("Duplicates removed (1 rows)"))
        .stdout(predicate::str::contains("Processing complete for scores.csv"));

    let exported = fs::read_to_string(out_dir.join("scores.csv")).expect("exported csv");
    assert_eq!(exported, "a,b\n1,5\n1,4\n2,6\n");
}

#[test]
fn selects_columns_and_exports_excel() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write(temp.path(), "people.csv", "id,name,score\n1,ada,3\n2,bob,4\n");
    let out_dir = temp.path().join("out");

    cmd()
        .args([
            input.as_str(),
            "--columns",
            "score,id",
            "--to",
            "excel",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("people.csv - Selected Columns"));

    let bytes = fs::read(out_dir.join("people.xlsx")).expect("exported xlsx");
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn json_report_and_partial_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let good = write(temp.path(), "good.csv", "x,y\n1,2\n3,4\n");
    let bad = write(temp.path(), "bad.csv", "");
    let out_dir = temp.path().join("out");

    let output = cmd()
        .env_remove("RUST_LOG")
        .args([
            bad.as_str(),
            good.as_str(),
            "--chart",
            "--report",
            "json",
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    // The failure is in the report, not in the log
    assert!(output.stderr.is_empty());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["stats"]["files_failed"], 1);
    assert_eq!(report["stats"]["files_processed"], 1);
    assert_eq!(report["files"][0]["status"], "failed");
    assert_eq!(report["files"][1]["status"], "ok");
    assert_eq!(report["files"][1]["mime"], "text/csv");
    assert_eq!(report["files"][1]["chart"]["series"][1]["name"], "y");
    assert!(out_dir.join("good.csv").exists());
}

#[test]
fn chart_renders_in_terminal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write(temp.path(), "c.csv", "label,v\na,2\nb,4\n");

    cmd()
        .args([input.as_str(), "--chart", "--no-export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("c.csv - Chart"))
        .stdout(predicate::str::contains("█ v"));
}

#[test]
fn unknown_column_fails_that_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write(temp.path(), "d.csv", "a\n1\n");

    cmd()
        .args([input.as_str(), "--columns", "zzz", "--no-export"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unknown column: zzz"));
}

#[test]
fn refuses_to_overwrite_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write(temp.path(), "same.csv", "a\n1\n");

    cmd()
        .args([input.as_str(), "-o", temp.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Refusing to overwrite"));

    assert_eq!(fs::read_to_string(temp.path().join("same.csv")).unwrap(), "a\n1\n");
}

#[test]
fn shared_stem_does_not_overwrite_earlier_export() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(temp.path().join("jan")).expect("mkdir");
    fs::create_dir(temp.path().join("feb")).expect("mkdir");
    let first = write(&temp.path().join("jan"), "data.csv", "a\n1\n");
    let second = write(&temp.path().join("feb"), "data.csv", "b\n2\n");
    let out_dir = temp.path().join("out");

    cmd()
        .args([first.as_str(), second.as_str(), "-o", out_dir.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("already written for an earlier input"));

    assert_eq!(fs::read_to_string(out_dir.join("data.csv")).unwrap(), "a\n1\n");
}

#[test]
fn column_flag_keeps_commas_in_names() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write(temp.path(), "q.csv", "\"a,b\",c\n1,2\n");
    let out_dir = temp.path().join("out");

    cmd()
        .args([input.as_str(), "--column", "a,b", "-o", out_dir.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out_dir.join("q.csv")).unwrap(),
        "\"a,b\"\n1\n"
    );
}

#[test]
fn column_and_columns_conflict() {
    cmd()
        .args(["x.csv", "--column", "a", "--columns", "b"])
        .assert()
        .code(2);
}

#[test]
fn requires_input_files() {
    cmd().assert().failure();
}
