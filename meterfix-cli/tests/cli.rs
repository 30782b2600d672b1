//! End-to-end tests for the meterfix binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn meterfix() -> Command {
    Command::cargo_bin("meterfix").expect("meterfix binary")
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf8 stdout")
}

#[test]
fn test_no_args_prints_script_and_summary() {
    let temp = TempDir::new().expect("tempdir");
    let out = stdout_of(meterfix().current_dir(temp.path()));

    assert!(out.starts_with("-- ====="));
    assert!(out.contains("SET parent_meter = 'ZONE 8 (Bulk Zone 8)'"));
    assert!(out.contains("ORDER BY zone, label;\n\nZONE_08 EXPECTED DATA SUMMARY:"));
    assert!(out.contains("Total Meters: 23"));
    assert_eq!(out.matches("UPDATE water_meters").count(), 6);
    assert_eq!(out.matches("SELECT ").count(), 1);

    // Nothing is written next to the invocation.
    assert_eq!(fs::read_dir(temp.path()).expect("read dir").count(), 0);
}

#[test]
fn test_generate_is_the_default_command() {
    let bare = stdout_of(&mut meterfix());
    let explicit = stdout_of(meterfix().arg("generate"));
    assert_eq!(bare, explicit);
}

#[test]
fn test_output_is_deterministic() {
    let first = stdout_of(&mut meterfix());
    let second = stdout_of(&mut meterfix());
    assert_eq!(first, second);
}

#[test]
fn test_no_summary_omits_report() {
    meterfix()
        .args(["generate", "--no-summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verify the fixes"))
        .stdout(predicate::str::contains("EXPECTED DATA SUMMARY").not());
}

#[test]
fn test_custom_table() {
    meterfix()
        .args(["generate", "--table", "public.water_meters"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE public.water_meters\n"))
        .stdout(predicate::str::contains("FROM public.water_meters\n"));
}

#[test]
fn test_invalid_table_fails() {
    meterfix()
        .args(["generate", "--table", "water_meters; DROP TABLE x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid table name"));
}

#[test]
fn test_deny_flags_accumulate() {
    let out = stdout_of(meterfix().args([
        "generate",
        "--deny",
        "type.irr_services",
        "--deny",
        "type.main_bulk",
    ]));
    assert!(!out.contains("Fix type spelling errors"));
    assert!(out.contains("Fix residential type variations"));
    assert_eq!(out.matches("UPDATE water_meters").count(), 5);
}

#[test]
fn test_json_format() {
    let out = stdout_of(meterfix().args(["generate", "--format", "json"]));
    let doc: serde_json::Value = serde_json::from_str(&out).expect("json output");

    assert_eq!(doc["plan"]["schema"], "meterfix.plan.v1");
    assert_eq!(doc["plan"]["summary"]["rules_total"], 7);
    assert_eq!(doc["plan"]["sections"].as_array().map(Vec::len), Some(6));
    assert_eq!(doc["summary"]["total_meters"], 23);
    assert_eq!(doc["script_sha256"].as_str().map(str::len), Some(64));
}

#[test]
fn test_markdown_format() {
    meterfix()
        .args(["generate", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# meterfix plan"));
}

#[test]
fn test_out_dir_writes_artifacts() {
    let temp = TempDir::new().expect("tempdir");
    let out_dir = temp.path().join("artifacts");

    let printed = stdout_of(
        meterfix()
            .args(["generate", "--no-summary", "--out-dir"])
            .arg(&out_dir),
    );

    for name in [
        "fix_water_meters.sql",
        "zone_summary.txt",
        "plan.json",
        "plan.md",
    ] {
        assert!(out_dir.join(name).exists(), "{name}");
    }
    let script = fs::read_to_string(out_dir.join("fix_water_meters.sql")).expect("read script");
    assert_eq!(script, printed);
}

#[test]
fn test_config_file_is_applied() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("meterfix.toml");
    fs::write(
        &config,
        r#"
[output]
table = "meters"
include_summary = false

[policy]
allow = ["parent_meter.*"]
"#,
    )
    .expect("write config");

    let out = stdout_of(meterfix().arg("generate").arg("--config").arg(&config));
    assert_eq!(out.matches("UPDATE meters\n").count(), 4);
    assert!(!out.contains("SET type"));
    assert!(!out.contains("EXPECTED DATA SUMMARY"));
}

#[test]
fn test_config_is_not_read_implicitly() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(
        temp.path().join("meterfix.toml"),
        "[output]\ntable = \"meters\"\n",
    )
    .expect("write config");

    meterfix()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE water_meters\n"));
}

#[test]
fn test_missing_config_fails() {
    meterfix()
        .args(["generate", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load meterfix config"));
}

#[test]
fn test_simulate_ignores_configured_table() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("meterfix.toml");
    fs::write(&config, "[output]\ntable = \"water meters; --\"\n").expect("write config");
    let rows = temp.path().join("rows.json");
    fs::write(&rows, r#"[{"type": "Main BULK"}]"#).expect("write rows");

    meterfix()
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid table name"));

    let out = stdout_of(
        meterfix()
            .args(["simulate", "--format", "json", "--config"])
            .arg(&config)
            .arg("--rows")
            .arg(&rows),
    );
    let doc: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(doc["first_pass"]["sections"][4]["rows_affected"], 1);
}

#[test]
fn test_list_fixes_text() {
    meterfix()
        .arg("list-fixes")
        .assert()
        .success()
        .stdout(predicate::str::contains("parent_meter.zone_08"))
        .stdout(predicate::str::contains("IRR_Servies -> IRR_Services"));
}

#[test]
fn test_list_fixes_json() {
    let out = stdout_of(meterfix().args(["list-fixes", "--format", "json"]));
    let fixes: Vec<serde_json::Value> = serde_json::from_str(&out).expect("json");
    assert_eq!(fixes.len(), 7);
    assert_eq!(fixes[4]["field"], "type");
    assert_eq!(fixes[1]["labels"], serde_json::json!(["L3", "L4"]));
}

#[test]
fn test_explain_known_rule() {
    meterfix()
        .args(["explain", "type.main_bulk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIX: type.main_bulk"))
        .stdout(predicate::str::contains("WHERE type IN ('IRR_Servies', 'Main BULK');"));
}

#[test]
fn test_explain_unknown_rule() {
    meterfix()
        .args(["explain", "type.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rule id"))
        .stderr(predicate::str::contains("parent_meter.zone_sc"));
}

#[test]
fn test_simulate_reports_idempotent_second_pass() {
    let temp = TempDir::new().expect("tempdir");
    let rows = temp.path().join("rows.json");
    fs::write(
        &rows,
        r#"[
  {"meter_name": "Z8-1", "zone": "Zone_08", "label": "L3", "parent_meter": "BULK ZONE 8", "type": "Residential (Villa)"},
  {"meter_name": "Z8-2", "zone": "Zone_08", "label": "L3", "parent_meter": "BULK ZONE 8", "type": "Residential (Villa)"},
  {"meter_name": "Tank", "zone": "Zone_05", "label": "L3", "parent_meter": null, "type": "IRR_Servies"}
]"#,
    )
    .expect("write rows");

    let out = stdout_of(
        meterfix()
            .args(["simulate", "--format", "json", "--rows"])
            .arg(&rows),
    );
    let doc: serde_json::Value = serde_json::from_str(&out).expect("json");

    assert_eq!(doc["rows"], 3);
    assert_eq!(doc["first_pass"]["sections"][0]["rows_affected"], 2);
    assert_eq!(doc["first_pass"]["sections"][4]["rows_affected"], 1);
    let second_total: u64 = doc["second_pass"]["sections"]
        .as_array()
        .expect("sections")
        .iter()
        .map(|s| s["rows_affected"].as_u64().unwrap_or(0))
        .sum();
    assert_eq!(second_total, 0);
    assert_eq!(
        doc["verification"][1]["parent_meter"],
        "ZONE 8 (Bulk Zone 8)"
    );
    assert_eq!(doc["verification"][1]["count"], 2);
}

#[test]
fn test_simulate_text_output() {
    let temp = TempDir::new().expect("tempdir");
    let rows = temp.path().join("rows.json");
    fs::write(
        &rows,
        r#"[{"zone": "Zone_SC", "label": "L3", "parent_meter": "Sale Centre (Zone Bulk)"}]"#,
    )
    .expect("write rows");

    meterfix()
        .args(["simulate", "--rows"])
        .arg(&rows)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows loaded: 1"))
        .stdout(predicate::str::contains("Fix Zone_SC parent meter references"))
        .stdout(predicate::str::contains("Pass 2"));
}

#[test]
fn test_simulate_rejects_malformed_rows() {
    let temp = TempDir::new().expect("tempdir");
    let rows = temp.path().join("rows.json");
    fs::write(&rows, "{ not json").expect("write rows");

    meterfix()
        .args(["simulate", "--rows"])
        .arg(&rows)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse rows"));
}
