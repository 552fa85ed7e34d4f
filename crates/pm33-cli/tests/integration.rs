#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pm33(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pm33").unwrap();
    cmd.current_dir(dir.path()).env("PM33_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    pm33(dir).arg("init").assert().success();
}

fn json_output(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let out = pm33(dir).args(args).arg("--json").output().unwrap();
    assert!(out.status.success(), "pm33 {args:?} failed");
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// pm33 init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    pm33(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .pm33/config.yaml"));

    assert!(dir.path().join(".pm33").is_dir());
    assert!(dir.path().join(".pm33/storage").is_dir());
    assert!(dir.path().join(".pm33/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    pm33(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().unwrap();
    pm33(&dir)
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pm33 init"));
}

// ---------------------------------------------------------------------------
// Persistence across invocations
// ---------------------------------------------------------------------------

#[test]
fn persona_survives_across_invocations() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .args(["persona", "founder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Persona set: founder"));

    assert!(dir
        .path()
        .join(".pm33/storage/pm33-workflow-state.json")
        .exists());

    let state = json_output(&dir, &["state"]);
    assert_eq!(state["persona"], "founder");
    assert_eq!(state["onboardingStage"], "strategic_setup");
}

#[test]
fn session_only_fields_reset_on_reload() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .arg("session")
        .write_stdin("mode firefighting\nalert\nsidebar\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: firefighting"));

    let state = json_output(&dir, &["state"]);
    assert_eq!(state["currentMode"], "planning");
    assert_eq!(state["criticalAlertsCount"], 0);
    assert_eq!(state["sidebarCollapsed"], true);
}

#[test]
fn palette_is_closed_after_reload_but_recent_commands_stay() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir).args(["palette", "toggle"]).assert().success();
    pm33(&dir)
        .args(["palette", "recent", "strategic-analysis"])
        .assert()
        .success();

    let state = json_output(&dir, &["state"]);
    assert_eq!(state["commandPalette"]["isOpen"], false);
    assert_eq!(state["commandPalette"]["recentCommands"][0], "strategic-analysis");
}

#[test]
fn recording_an_analysis_counts_it() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir).args(["record", "analysis"]).assert().success();
    pm33(&dir).args(["record", "analysis"]).assert().success();

    let state = json_output(&dir, &["state"]);
    assert_eq!(state["engagementMetrics"]["totalAnalyses"], 2);
    assert_eq!(state["engagementMetrics"]["currentStreak"], 2);
}

#[test]
fn reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    pm33(&dir).args(["persona", "founder"]).assert().success();
    pm33(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("reset to defaults"));

    let state = json_output(&dir, &["state"]);
    assert!(state["persona"].is_null());
    assert_eq!(state["onboardingStage"], "persona_selection");
}

// ---------------------------------------------------------------------------
// Derived queries
// ---------------------------------------------------------------------------

#[test]
fn founder_planning_suggestions() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let suggestions = json_output(&dir, &["suggest", "--persona", "founder"]);
    let labels: Vec<&str> = suggestions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        ["Strategic Analysis", "Roadmap Review", "Investor Metrics"]
    );
}

#[test]
fn what_if_flags_do_not_persist() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .args(["suggest", "--persona", "founder", "--mode", "reviewing"])
        .assert()
        .success();

    let state = json_output(&dir, &["state"]);
    assert!(state["persona"].is_null());
}

#[test]
fn actions_include_sync_for_active_integration() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .args(["actions", "--integration", "jira"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync Jira"));
}

#[test]
fn actions_include_crisis_response_in_firefighting() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .args(["actions", "--mode", "firefighting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open Crisis Response"));
}

#[test]
fn firefighting_gate() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .arg("firefighting")
        .assert()
        .success()
        .stdout(predicate::str::contains("Firefighting mode: no"));

    pm33(&dir)
        .args(["firefighting", "--alerts", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Firefighting mode: yes"));

    let out = json_output(&dir, &["firefighting", "--pulse", "59"]);
    assert_eq!(out["firefighting"], true);
}

#[test]
fn firefighting_alert_count_is_bounded() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .args(["firefighting", "--alerts", "4294967295"])
        .assert()
        .failure();

    pm33(&dir)
        .args(["firefighting", "--alerts", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Firefighting mode: yes"));
}

#[test]
fn session_help_lists_shortcuts() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .arg("session")
        .write_stdin("help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmd/ctrl+k  Toggle command palette"))
        .stdout(predicate::str::contains("cmd/ctrl+w  Open workflow view"));
}

#[test]
fn session_extra_modifiers_are_ignored() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .arg("session")
        .write_stdin("key ctrl+shift+k\npalette\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ctrl+shift+k: ignored"))
        .stdout(predicate::str::contains("palette: open"));
}

#[test]
fn invalid_persona_is_rejected() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    pm33(&dir)
        .args(["persona", "intern"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("intern"));
}

// ---------------------------------------------------------------------------
// pm33 session
// ---------------------------------------------------------------------------

#[test]
fn session_keyboard_shortcuts() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .arg("session")
        .write_stdin("key ctrl+k\nkey cmd+h\nkey k\ndetach\nkey ctrl+j\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ctrl+k: handled"))
        .stdout(predicate::str::contains(
            "navigate: http://localhost:3000/command-center",
        ))
        .stdout(predicate::str::contains("k: ignored"))
        .stdout(predicate::str::contains("ctrl+j: ignored"));
}

#[test]
fn session_reports_bad_lines_and_continues() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    pm33(&dir)
        .arg("session")
        .write_stdin("fly\nmode reviewing\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("error: unknown command 'fly'"))
        .stdout(predicate::str::contains("mode: reviewing"));
}

// ---------------------------------------------------------------------------
// pm33 config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_default_is_clean() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    pm33(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_fails_on_bad_storage_key() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".pm33/config.yaml"),
        "project:\n  name: demo\nstorage:\n  key: ../escape\n",
    )
    .unwrap();
    pm33(&dir).args(["config", "validate"]).assert().failure();
}
