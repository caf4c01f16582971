use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

use pipeline_core::{snapshot, LeadStage, OrderStage};

fn pipeline_cmd(store: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pipeline"));
    cmd.arg("--store")
        .arg(store)
        .env_remove("PIPELINE_STORE")
        .env("NO_COLOR", "1");
    cmd
}

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("store.yaml")
}

fn add_jane(store: &Path) {
    pipeline_cmd(store)
        .args([
            "lead", "add", "--name", "Jane Doe", "--contact", "jane@x.com", "--company", "Acme",
        ])
        .assert()
        .success()
        .stdout(contains("lead-1"));
}

#[test]
fn lead_add_persists_with_default_stage() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    add_jane(&store);

    let loaded = snapshot::load_at(&store).expect("load");
    assert_eq!(loaded.leads().len(), 1);
    assert_eq!(loaded.leads()[0].stage, LeadStage::New);
}

#[test]
fn lead_add_reports_each_missing_field() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    pipeline_cmd(&store)
        .args(["lead", "add", "--name", "Jane"])
        .assert()
        .failure()
        .stderr(contains("contact: Contact information is required"))
        .stderr(contains("company: Company name is required"));
    assert!(!store.exists(), "failed command must not write the store");
}

#[test]
fn lead_move_accepts_labels_and_rejects_unknown_stage() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    add_jane(&store);

    pipeline_cmd(&store)
        .args(["lead", "move", "lead-1", "proposal sent"])
        .assert()
        .success()
        .stdout(contains("Proposal Sent"));

    pipeline_cmd(&store)
        .args(["lead", "move", "lead-1", "Shipped"])
        .assert()
        .failure()
        .stderr(contains("invalid lead stage 'Shipped'"));

    pipeline_cmd(&store)
        .args(["lead", "move", "lead-9", "Won"])
        .assert()
        .failure()
        .stderr(contains("lead not found: lead-9"));
}

#[test]
fn lead_list_filters_and_searches() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    add_jane(&store);
    pipeline_cmd(&store)
        .args([
            "lead", "add", "--name", "Bob", "--contact", "bob@globex.com", "--company", "Globex",
            "--stage", "won",
        ])
        .assert()
        .success();

    let output = pipeline_cmd(&store)
        .args(["lead", "list", "--search", "ACME", "--json"])
        .output()
        .expect("run list");
    assert!(output.status.success());
    let leads: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let names: Vec<_> = leads
        .as_array()
        .expect("array")
        .iter()
        .map(|l| l["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Jane Doe"]);

    pipeline_cmd(&store)
        .args(["lead", "list", "--stage", "Won"])
        .assert()
        .success()
        .stdout(contains("Bob"))
        .stdout(contains("Jane Doe").not());
}

#[test]
fn order_flow_from_won_lead_to_dispatch() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    add_jane(&store);

    pipeline_cmd(&store)
        .args(["order", "add", "--lead", "lead-1"])
        .assert()
        .failure()
        .stderr(contains("lead_id"));

    pipeline_cmd(&store)
        .args(["lead", "move", "lead-1", "Won"])
        .assert()
        .success();
    pipeline_cmd(&store)
        .args(["order", "add", "--lead", "lead-1"])
        .assert()
        .success()
        .stdout(contains("order-1"))
        .stdout(contains("Jane Doe"));

    pipeline_cmd(&store)
        .args(["order", "move", "order-1", "Dispatched"])
        .assert()
        .failure()
        .stderr(contains("courier"))
        .stderr(contains("tracking_number"));

    pipeline_cmd(&store)
        .args(["order", "edit", "order-1", "--courier", "DHL", "--tracking", "123"])
        .assert()
        .success();
    pipeline_cmd(&store)
        .args(["order", "move", "order-1", "Dispatched"])
        .assert()
        .success();

    let loaded = snapshot::load_at(&store).expect("load");
    let order = &loaded.orders()[0];
    assert_eq!(order.stage, OrderStage::Dispatched);
    assert_eq!(order.lead_name, "Jane Doe");
}

#[test]
fn deleting_lead_keeps_orders() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    add_jane(&store);
    pipeline_cmd(&store)
        .args(["lead", "move", "lead-1", "won"])
        .assert()
        .success();
    pipeline_cmd(&store)
        .args(["order", "add", "--lead", "lead-1", "--details", "10 widgets"])
        .assert()
        .success();
    pipeline_cmd(&store)
        .args(["lead", "rm", "lead-1"])
        .assert()
        .success();

    pipeline_cmd(&store)
        .args(["order", "list", "--search", "widgets"])
        .assert()
        .success()
        .stdout(contains("order-1"));
}

#[test]
fn board_shows_every_stage_column() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    add_jane(&store);

    let mut assert = pipeline_cmd(&store).args(["board", "leads"]).assert().success();
    for stage in LeadStage::ALL {
        assert = assert.stdout(contains(stage.label()));
    }
    assert.stdout(contains("New (1)")).stdout(contains("Won (0)"));

    pipeline_cmd(&store)
        .args(["board", "orders"])
        .assert()
        .success()
        .stdout(contains("Ready to Dispatch (0)"));
}

#[test]
fn store_env_var_is_honoured() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_path(&dir);
    Command::new(assert_cmd::cargo::cargo_bin!("pipeline"))
        .env("PIPELINE_STORE", &store)
        .env("NO_COLOR", "1")
        .args([
            "lead", "add", "--name", "Ann", "--contact", "ann@x.com", "--company", "Initech",
        ])
        .assert()
        .success();
    assert!(store.exists());
}
