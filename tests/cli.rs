//! Command-line behaviour against a temporary data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hrm_audit(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hrm-audit").unwrap();
    cmd.env("HRM_AUDIT_DATA_DIR", data_dir.path())
        .env_remove("HRM_AUDIT_LOG")
        .env_remove("HRM_AUDIT_SENSITIVE_COLLECTIONS")
        .env_remove("HRM_AUDIT_MAX_CHANGE_ENTRIES");
    cmd
}

#[test]
fn test_init_writes_settings() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
}

#[test]
fn test_config_shows_env_overrides() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .env("HRM_AUDIT_SENSITIVE_COLLECTIONS", "PayrollDraft, EmployeeDraft")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sensitive collections: EmployeeDraft, PayrollDraft"))
        .stdout(predicate::str::contains("Max payload bytes:     8192"));
}

#[test]
fn test_record_then_list_and_show() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .args([
            "record",
            "--collection",
            "Employee",
            "--action",
            "update",
            "--document-id",
            "emp-1",
            "--actor",
            "hr-1",
            "--before",
            r#"{"email": "ann@x.com", "salary": 50000}"#,
            "--after",
            r#"{"email": "ann@x.com", "salary": 55000}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded aud-"))
        .stdout(predicate::str::contains("salary: 50000 -> 55000"))
        .stdout(predicate::str::contains("a***@x.com"))
        .stdout(predicate::str::contains("ann@x.com").not());

    hrm_audit(&dir)
        .args(["list", "--collection", "Employee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Employee (emp-1)"))
        .stdout(predicate::str::contains("1 matching records"));

    let output = hrm_audit(&dir)
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 1);
    let id = page["items"][0]["id"].as_str().unwrap().to_string();

    hrm_audit(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()))
        .stdout(predicate::str::contains("Actor:          hr-1"));

    hrm_audit(&dir)
        .args(["show", &format!("aud-{}", &id[..8])])
        .assert()
        .success();
}

#[test]
fn test_record_rejects_bad_input() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .args(["record", "--collection", "Employee", "--action", "archive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid action"));

    hrm_audit(&dir)
        .args([
            "record",
            "--collection",
            "Employee",
            "--action",
            "create",
            "--after",
            "{not json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--after is not valid JSON"));
}

#[test]
fn test_show_missing_record_fails() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .args(["show", "00000000-0000-4000-8000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_list_rejects_page_zero() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .args(["list", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page must be 1 or greater"));
}

#[test]
fn test_export_csv_to_file() {
    let dir = TempDir::new().unwrap();

    for (collection, doc) in [("Employee", "emp-1"), ("Department", "dep-1"), ("Employee", "emp-2")] {
        hrm_audit(&dir)
            .args([
                "record",
                "--collection",
                collection,
                "--action",
                "create",
                "--document-id",
                doc,
                "--after",
                r#"{"name": "x"}"#,
            ])
            .assert()
            .success();
    }

    let out = dir.path().join("employees.csv");
    hrm_audit(&dir)
        .args(["export", "--format", "csv", "--collection", "Employee", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 audit records as csv"));

    let csv = std::fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("id,createdAt,collectionName"));
    assert!(!csv.contains("Department"));
}

#[test]
fn test_export_json_to_stdout() {
    let dir = TempDir::new().unwrap();

    hrm_audit(&dir)
        .args(["record", "-c", "Payroll", "-a", "access", "-d", "pay-1"])
        .assert()
        .success();

    let output = hrm_audit(&dir).args(["export"]).output().unwrap();
    assert!(output.status.success());

    let export: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(export["metadata"]["record_count"], 1);
    assert_eq!(export["records"][0]["message"], "access on Payroll (pay-1)");
}
