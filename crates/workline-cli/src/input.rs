//! Project and configuration files

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use workline_core::{GanttTask, Project, ScheduleConfig};
use workline_solver::TimelineSolver;

/// Picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "workline.toml";

/// Load the engine configuration.
///
/// An explicit path must exist; the implicit `workline.toml` is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<ScheduleConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if !implicit.is_file() {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(ScheduleConfig::default());
            }
            implicit
        }
    };

    let config = ScheduleConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

pub fn load_project(path: &Path) -> Result<Project> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let project: Project = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse project {}", path.display()))?;
    tracing::debug!(
        project = %project.name,
        steps = project.work_plan.len(),
        stored_tasks = project.tasks.len(),
        "loaded project"
    );
    Ok(project)
}

pub fn save_project(path: &Path, project: &Project) -> Result<()> {
    let json = serde_json::to_string_pretty(project).context("Failed to serialize project")?;
    std::fs::write(path, json + "\n").with_context(|| format!("Failed to write {}", path.display()))
}

/// Tasks to report on, always regenerated from the current work plan.
///
/// Stored tasks from an earlier `schedule --write` only contribute fields
/// the plan cannot express (see [`TimelineSolver::refresh`]).
pub fn project_tasks(solver: &TimelineSolver, project: &Project, as_of: NaiveDate) -> Vec<GanttTask> {
    solver.refresh(project, as_of)
}
