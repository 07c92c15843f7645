use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn pharmanet(state: &Path, org: &str) -> Command {
    let mut cmd = Command::cargo_bin("pharmanet").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("PHARMANET_CONFIG")
        .arg("--state")
        .arg(state)
        .arg("--org")
        .arg(org);
    cmd
}

fn json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn drug_is_recorded_and_persisted_across_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("ledger.json");

    pharmanet(&state, "manufacturer")
        .args(["register", "MAN001", "Sun Pharma", "Chennai", "Manufacturer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hierarchyRank\": 1"));

    pharmanet(&state, "Manufacturer")
        .args(["add-drug", "Paracetamol", "S1", "2024-01-01", "2026-01-01", "MAN001"])
        .assert()
        .success();

    let output = pharmanet(&state, "retailer")
        .args(["view-state", "Paracetamol", "S1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let unit = json(&output.stdout);
    assert_eq!(unit["serial"], "S1");
    assert_eq!(unit["owner"]["kind"], "organization");

    let output = pharmanet(&state, "retailer")
        .args(["view-history", "Paracetamol", "S1"])
        .output()
        .unwrap();
    assert_eq!(json(&output.stdout).as_array().map(Vec::len), Some(1));

    let output = pharmanet(&state, "retailer").arg("verify-ledger").output().unwrap();
    let summary = json(&output.stdout);
    assert_eq!(summary["transactions"], 2);
    assert_eq!(summary["verified"], true);
}

#[test]
fn rejected_operation_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("ledger.json");

    pharmanet(&state, "manufacturer")
        .args(["register", "MAN001", "Sun Pharma", "Chennai", "Manufacturer"])
        .assert()
        .success();

    pharmanet(&state, "distributor")
        .args(["add-drug", "Paracetamol", "S1", "2024-01-01", "2026-01-01", "MAN001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not authorized"));

    pharmanet(&state, "distributor")
        .args(["view-state", "Paracetamol", "S1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unknown_role_is_rejected_by_argument_parsing() {
    let dir = tempfile::tempdir().unwrap();
    pharmanet(&dir.path().join("ledger.json"), "regulator")
        .arg("verify-ledger")
        .assert()
        .failure()
        .stderr(predicate::str::contains("regulator"));
}
