use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn kassa(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kassa").unwrap();
    cmd.env("HOME", home);
    cmd.env("KASSA_DATA_DIR", home.join("data"));
    cmd
}

fn init(home: &Path) {
    kassa(home)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized kassa"));
}

fn add_profile(home: &Path, name: &str) {
    kassa(home)
        .args([
            "profile",
            "add",
            name,
            "--date-col",
            "Datum",
            "--description-col",
            "Text",
            "--amount-col",
            "Belopp",
        ])
        .assert()
        .success();
}

fn write_export(home: &Path) -> std::path::PathBuf {
    let path = home.join("export.csv");
    std::fs::write(
        &path,
        "Datum,Text,Belopp\n2024-01-05,ICA MAXI,-250\n2024-01-25,LÖN,28000\n",
    )
    .unwrap();
    path
}

#[test]
fn test_init_creates_database() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    assert!(home.path().join("data").join("kassa.db").exists());
}

#[test]
fn test_profile_add_list_and_conflict() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    add_profile(home.path(), "Nordea");

    kassa(home.path())
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nordea"));

    kassa(home.path())
        .args([
            "profile", "add", "NORDEA", "--date-col", "a", "--description-col", "b",
            "--amount-col", "c",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    add_profile(home.path(), "Nordea");
    let export = write_export(home.path());

    kassa(home.path())
        .args(["import", export.to_str().unwrap(), "--profile", "Nordea", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ICA MAXI"))
        .stdout(predicate::str::contains("Dry run, nothing written."));

    kassa(home.path())
        .args(["records", "transactions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ICA MAXI").not());
}

#[test]
fn test_import_writes_and_rerun_finds_duplicates() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    add_profile(home.path(), "Nordea");
    let export = write_export(home.path());

    kassa(home.path())
        .args(["import", export.to_str().unwrap(), "--profile", "Nordea", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2"));

    kassa(home.path())
        .args(["records", "transactions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ICA MAXI"))
        .stdout(predicate::str::contains("250,00 kr"))
        .stdout(predicate::str::contains("Imported from Nordea"));

    kassa(home.path())
        .args(["records", "incomes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LÖN"));

    // The same file again: every row is a known duplicate.
    kassa(home.path())
        .args(["import", export.to_str().unwrap(), "--profile", "Nordea", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate"))
        .stdout(predicate::str::contains("Nothing to import."));
}

#[test]
fn test_import_as_fixed_reassigns_selection() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    add_profile(home.path(), "Nordea");
    let export = home.path().join("bills.csv");
    std::fs::write(&export, "Datum,Text,Belopp\n2024-01-27,HYRA,-9500\n").unwrap();

    kassa(home.path())
        .args([
            "import", export.to_str().unwrap(), "--profile", "Nordea", "--as", "fixed", "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 fixed expenses"));

    kassa(home.path())
        .args(["records", "fixed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HYRA"))
        .stdout(predicate::str::contains("9 500,00 kr"));
}

#[test]
fn test_import_ad_hoc_mapping() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    let export = write_export(home.path());

    kassa(home.path())
        .args([
            "import",
            export.to_str().unwrap(),
            "--date-col",
            "Datum",
            "--description-col",
            "Text",
            "--amount-col",
            "Belopp",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2"));
}

#[test]
fn test_import_unknown_profile_fails() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    let export = write_export(home.path());

    kassa(home.path())
        .args(["import", export.to_str().unwrap(), "--profile", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No import profile named 'Nope'"));
}

#[test]
fn test_import_missing_column_fails() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    add_profile(home.path(), "Nordea");
    let export = home.path().join("odd.csv");
    std::fs::write(&export, "Datum,Beskrivning,Summa\n2024-01-05,ICA,-250\n").unwrap();

    kassa(home.path())
        .args(["import", export.to_str().unwrap(), "--profile", "Nordea"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'Text' not found"));
}

#[test]
fn test_status_reports_counts() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    add_profile(home.path(), "Nordea");
    let export = write_export(home.path());
    kassa(home.path())
        .args(["import", export.to_str().unwrap(), "--profile", "Nordea", "--yes"])
        .assert()
        .success();

    kassa(home.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:    1"))
        .stdout(predicate::str::contains("Incomes:         1"))
        .stdout(predicate::str::contains("Profiles:        1"));
}
