//! E2E tests for the workline binary
//!
//! Each test writes a project JSON into a temp directory and runs the
//! built binary against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const DEPOT: &str = r#"{
  "id": "p-17",
  "name": "Bus Depot Extension",
  "startDate": "2024-01-01",
  "expectedEndDate": "2024-03-31",
  "workPlan": [
    { "id": "t0", "departmentId": "design", "departmentName": "Design", "status": "completed" },
    { "id": "t1", "departmentId": "civil", "departmentName": "Civil", "status": "in-progress" },
    { "id": "t2", "departmentId": "testing", "departmentName": "Testing", "status": "pending", "targetDate": "garbage" }
  ]
}"#;

fn workline_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_workline"))
}

fn write_project(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("project.json");
    fs::write(&path, body).expect("failed to write project");
    path
}

/// Run workline in `cwd` and return (exit_code, stdout, stderr)
fn run(cwd: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(workline_binary())
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to execute workline");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

// =============================================================================
// schedule
// =============================================================================

#[test]
fn schedule_json_matches_chain_scenario() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(
        dir.path(),
        &["schedule", file.to_str().unwrap(), "--format", "json", "--as-of", "2024-01-20"],
    );
    assert_eq!(code, 0);

    let tasks: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["startDate"], "2024-01-01");
    assert_eq!(tasks[1]["startDate"], "2024-01-16");
    assert_eq!(tasks[2]["startDate"], "2024-01-31");
    assert_eq!(tasks[2]["duration"], 14);
    assert_eq!(tasks[2]["dependencies"], serde_json::json!(["t1"]));
    assert_eq!(tasks[0]["progress"], 100);
    assert_eq!(tasks[1]["progress"], 50);
    assert!(tasks.iter().all(|t| t["criticalPath"] == true));
}

#[test]
fn schedule_start_override() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(
        dir.path(),
        &["schedule", file.to_str().unwrap(), "--start", "2024-02-01", "--format", "json"],
    );
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[0]["startDate"], "2024-02-01");
}

#[test]
fn schedule_text_table() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(dir.path(), &["schedule", file.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Project: Bus Depot Extension"));
    assert!(stdout.contains("Finish:   2024-02-14"));
}

#[test]
fn schedule_write_persists_tasks() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, _, _) = run(dir.path(), &["schedule", file.to_str().unwrap(), "--write"]);
    assert_eq!(code, 0);

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(saved["tasks"].as_array().map(Vec::len), Some(3));
    assert_eq!(saved["workPlan"].as_array().map(Vec::len), Some(3));
}

#[test]
fn stats_follow_plan_edits_after_write() {
    let dir = TempDir::new().unwrap();
    let file = write_project(
        &dir,
        r#"{ "name": "Kiosk", "startDate": "2024-01-01",
             "workPlan": [ { "id": "a", "departmentName": "Design" } ] }"#,
    );
    let (code, _, _) = run(dir.path(), &["schedule", file.to_str().unwrap(), "--write"]);
    assert_eq!(code, 0);

    let mut saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(saved["tasks"].as_array().map(Vec::len), Some(1));
    saved["workPlan"][0]["status"] = serde_json::json!("completed");
    saved["workPlan"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({ "id": "b", "departmentName": "Civil" }));
    fs::write(&file, serde_json::to_string_pretty(&saved).unwrap()).unwrap();

    let (code, stdout, _) = run(
        dir.path(),
        &["stats", file.to_str().unwrap(), "--format", "json", "--as-of", "2024-01-02"],
    );
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["totalTasks"], 2);
    assert_eq!(stats["completedTasks"], 1);
}

#[test]
fn moved_start_is_reflected_after_write() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    run(dir.path(), &["schedule", file.to_str().unwrap(), "--write"]);

    let mut saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    saved["startDate"] = serde_json::json!("2024-02-01");
    fs::write(&file, serde_json::to_string(&saved).unwrap()).unwrap();

    let (code, stdout, _) = run(
        dir.path(),
        &["gantt", file.to_str().unwrap(), "--view", "days", "--as-of", "2024-02-01"],
    );
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Bus Depot Extension (2024-02-01 .. 2024-03-31)"));
}

#[test]
fn missing_file_fails_with_context() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run(dir.path(), &["schedule", "does-not-exist.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read"), "stderr: {}", stderr);
}

#[test]
fn malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, "{ not json");
    let (code, _, stderr) = run(dir.path(), &["schedule", file.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to parse project"));
}

// =============================================================================
// stats
// =============================================================================

#[test]
fn stats_json_fields() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(
        dir.path(),
        &["stats", file.to_str().unwrap(), "--as-of", "2024-02-01", "--format", "json"],
    );
    assert_eq!(code, 0);

    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["projectName"], "Bus Depot Extension");
    assert_eq!(stats["totalTasks"], 3);
    assert_eq!(stats["completedTasks"], 1);
    assert_eq!(stats["inProgressTasks"], 1);
    // civil ended 2024-01-30 while still in progress
    assert_eq!(stats["overdueTasks"], 1);
    assert_eq!(stats["criticalPathTasks"], 3);
    assert_eq!(stats["status"], "Behind");
    let rate = stats["completionRate"].as_f64().unwrap();
    assert!((rate - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn stats_text_output() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(dir.path(), &["stats", file.to_str().unwrap(), "--as-of", "2024-01-02"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Status:  ON TRACK"));
    assert!(stdout.contains("Progress:"));
    assert!(stdout.contains("Critical Path: 3"));
    assert!(stdout.contains("Departments:"));
}

#[test]
fn stats_on_empty_plan() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, r#"{ "name": "Empty", "startDate": "2024-01-01", "workPlan": [] }"#);
    let (code, stdout, _) = run(dir.path(), &["stats", file.to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["totalTasks"], 0);
    assert_eq!(stats["completionRate"], 0.0);
}

// =============================================================================
// grid / gantt
// =============================================================================

#[test]
fn grid_weeks() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(dir.path(), &["grid", file.to_str().unwrap(), "--view", "weeks"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("2024-01-01  Jan 01"));
    assert!(stdout.contains("13 columns"));
}

#[test]
fn gantt_svg_to_file() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let out = dir.path().join("depot.svg");
    let (code, _, stderr) = run(
        dir.path(),
        &[
            "gantt",
            file.to_str().unwrap(),
            "--format",
            "svg",
            "--as-of",
            "2024-01-20",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Bus Depot Extension"));
}

#[test]
fn gantt_text_filtered_by_department() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, _) = run(
        dir.path(),
        &["gantt", file.to_str().unwrap(), "--department", "civil", "--as-of", "2024-01-20"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Civil"));
    assert!(!stdout.contains("Design"));
}

#[test]
fn gantt_with_backwards_window_degrades() {
    let dir = TempDir::new().unwrap();
    let file = write_project(
        &dir,
        r#"{ "name": "Backwards", "startDate": "2024-03-01", "expectedEndDate": "2024-01-01",
             "workPlan": [ { "id": "a", "departmentName": "Design" } ] }"#,
    );

    let (code, stdout, stderr) = run(dir.path(), &["gantt", file.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("(no visible tasks)"));

    let out = dir.path().join("backwards.svg");
    let (code, _, stderr) = run(
        dir.path(),
        &["gantt", file.to_str().unwrap(), "--format", "svg", "-o", out.to_str().unwrap()],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(fs::read_to_string(&out).unwrap().contains("(no visible tasks)"));
}

#[test]
fn gantt_svg_with_no_matching_department() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, stdout, stderr) = run(
        dir.path(),
        &["gantt", file.to_str().unwrap(), "--format", "svg", "--department", "hvac"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("(no visible tasks)"));
}

#[test]
fn gantt_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let (code, _, stderr) = run(dir.path(), &["gantt", file.to_str().unwrap(), "--status", "paused"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown task status"));
}

// =============================================================================
// configuration
// =============================================================================

#[test]
fn workline_toml_in_cwd_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    fs::write(dir.path().join("workline.toml"), "default_duration_days = 7\n").unwrap();

    let (code, stdout, _) = run(dir.path(), &["schedule", file.to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[1]["startDate"], "2024-01-09");
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = write_project(&dir, DEPOT);
    let config = dir.path().join("bad.toml");
    fs::write(&config, "hours_per_day = 0.0\n").unwrap();

    let (code, _, stderr) = run(
        dir.path(),
        &["--config", config.to_str().unwrap(), "stats", file.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to load config"));
}
