//! # workline-core
//!
//! Core domain model for the workline timeline scheduling engine.
//!
//! This crate provides:
//! - Input types: `Project`, `WorkPlanStep`
//! - Schedule types: `GanttTask`, `Resources`, `TaskStatus`, `RiskLevel`
//! - Date helpers (`date`), working-time `Calendar`, `ProjectWindow`
//! - Engine configuration (`config`) and statistics rollup (`status`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use workline_core::{GanttTask, TaskStatus};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let mut task = GanttTask::new("design", start, end).name("Design");
//! task.set_progress(100);
//!
//! assert_eq!(task.duration, 14);
//! assert_eq!(task.status, TaskStatus::Completed);
//! ```

pub mod config;
pub mod date;
pub mod status;

pub use config::{ConfigError, RiskPolicy, ScheduleConfig};
pub use date::{parse_date, today, DateExt};
pub use status::{compute_stats, DepartmentProgress, ProjectScheduleStats, StatusIndicator};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task (mirrors the originating work-plan step)
pub type TaskId = String;

/// Unique identifier for a department
pub type DepartmentId = String;

// ============================================================================
// Project & Work Plan
// ============================================================================

/// A project record as stored by the host application
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Project start date (today when absent)
    #[serde(default, deserialize_with = "date::lenient_date")]
    pub start_date: Option<NaiveDate>,
    /// Expected end date (start + grid default span when absent)
    #[serde(default, deserialize_with = "date::lenient_date")]
    pub expected_end_date: Option<NaiveDate>,
    /// Ordered department commitments
    #[serde(default)]
    pub work_plan: Vec<WorkPlanStep>,
    /// Previously synthesized tasks, if the caller persisted them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<GanttTask>,
}

impl Project {
    /// Create a new project with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the start date (builder pattern)
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Append a work-plan step (builder pattern)
    pub fn step(mut self, step: WorkPlanStep) -> Self {
        self.work_plan.push(step);
        self
    }

    /// The date window the timeline is drawn against.
    ///
    /// Missing start falls back to `today`, missing end to
    /// `start + default_span_days`.
    pub fn window(&self, today: NaiveDate, default_span_days: i64) -> ProjectWindow {
        let start = self.start_date.unwrap_or(today);
        let end = self
            .expected_end_date
            .unwrap_or_else(|| start.add_days(default_span_days));
        ProjectWindow::new(start, end)
    }
}

/// One department's commitment within a project
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPlanStep {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub department_id: DepartmentId,
    #[serde(default)]
    pub department_name: String,
    /// Raw target date as stored; parsed leniently during synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_step_status")]
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Explicit duration in days; overrides target date and the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
    /// Explicit progress (0-100); overrides the status mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

impl WorkPlanStep {
    /// Create a step for a department
    pub fn new(id: impl Into<String>, department_name: impl Into<String>) -> Self {
        let department_name = department_name.into();
        Self {
            id: id.into(),
            department_id: department_name.to_lowercase().replace(' ', "-"),
            department_name,
            ..Self::default()
        }
    }

    /// Set the department id
    pub fn department_id(mut self, id: impl Into<String>) -> Self {
        self.department_id = id.into();
        self
    }

    /// Set the step status
    pub fn status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the raw target date
    pub fn target_date(mut self, date: impl Into<String>) -> Self {
        self.target_date = Some(date.into());
        self
    }

    /// Set an explicit duration in days
    pub fn estimated_days(mut self, days: u32) -> Self {
        self.estimated_days = Some(days);
        self
    }

    /// Set an explicit completion percentage
    pub fn progress(mut self, pct: f32) -> Self {
        self.progress = Some(pct);
        self
    }
}

/// Work-plan step status as recorded by the department
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl StepStatus {
    /// Progress implied by the status alone
    pub fn implied_progress(self) -> u8 {
        match self {
            StepStatus::Completed => 100,
            StepStatus::InProgress => 50,
            StepStatus::Pending => 0,
        }
    }
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pending" | "" => Ok(StepStatus::Pending),
            "in-progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" | "complete" | "done" => Ok(StepStatus::Completed),
            other => Err(format!("unknown step status '{}'", other)),
        }
    }
}

fn lenient_step_status<'de, D>(deserializer: D) -> Result<StepStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => StepStatus::Pending,
        Some(s) => s.parse().unwrap_or_else(|err: String| {
            tracing::warn!(%err, "treating step as pending");
            StepStatus::Pending
        }),
    })
}

// ============================================================================
// Gantt Task
// ============================================================================

/// Task priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Task status for progress tracking
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Delayed,
    Cancelled,
    OnHold,
}

impl TaskStatus {
    /// All statuses, in display order
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Delayed,
        TaskStatus::Cancelled,
        TaskStatus::OnHold,
    ];

    /// Stable kebab-case key, as used in stored JSON and filters
    pub fn as_key(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Delayed => "delayed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::OnHold => "on-hold",
        }
    }
}

impl From<StepStatus> for TaskStatus {
    fn from(status: StepStatus) -> Self {
        match status {
            StepStatus::Pending => TaskStatus::NotStarted,
            StepStatus::InProgress => TaskStatus::InProgress,
            StepStatus::Completed => TaskStatus::Completed,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_key() == key)
            .ok_or_else(|| format!("unknown task status '{}'", s))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::NotStarted => write!(f, "Not Started"),
            TaskStatus::InProgress => write!(f, "In Progress"),
            TaskStatus::Completed => write!(f, "Completed"),
            TaskStatus::Delayed => write!(f, "Delayed"),
            TaskStatus::Cancelled => write!(f, "Cancelled"),
            TaskStatus::OnHold => write!(f, "On Hold"),
        }
    }
}

/// Schedule risk classification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    #[default]
    OnTrack,
    /// Slippage exceeds the remaining buffer
    AtRisk,
    /// Past its end date and not completed
    Overdue,
}

impl RiskLevel {
    pub fn is_at_risk(&self) -> bool {
        !matches!(self, RiskLevel::OnTrack)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::OnTrack => write!(f, "On Track"),
            RiskLevel::AtRisk => write!(f, "At Risk"),
            RiskLevel::Overdue => write!(f, "Overdue"),
        }
    }
}

/// Resource estimate attached to a task
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    /// Labor units
    #[serde(default)]
    pub labor: u32,
    /// Materials cost
    #[serde(default)]
    pub materials: Decimal,
    /// Equipment units
    #[serde(default)]
    pub equipment: u32,
}

impl Resources {
    pub fn new(labor: u32, materials: impl Into<Decimal>, equipment: u32) -> Self {
        Self {
            labor,
            materials: materials.into(),
            equipment,
        }
    }

    /// Per-task estimate used when neither step nor configuration supplies one
    pub fn nominal() -> Self {
        Self::new(2, Decimal::new(100_000, 2), 1)
    }
}

/// The unit the scheduling engine produces: one bar on the timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttTask {
    /// Mirrors the originating work-plan step id
    pub id: TaskId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days from start to end (`end_date - start_date`)
    pub duration: i64,
    /// Completion percentage (0-100)
    pub progress: u8,
    /// Predecessor task ids
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub department_id: DepartmentId,
    #[serde(default)]
    pub department_name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub critical_path: bool,
    /// Days this task can slip without moving the project end
    #[serde(default)]
    pub total_float: i64,
    #[serde(default)]
    pub risk: RiskLevel,
}

impl GanttTask {
    /// Create a task spanning `[start, end]`.
    ///
    /// An `end` before `start` is clamped to `start`.
    pub fn new(id: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        let id = id.into();
        let end = end.max(start);
        Self {
            name: id.clone(),
            id,
            start_date: start,
            end_date: end,
            duration: start.days_until(end),
            progress: 0,
            dependencies: Vec::new(),
            department_id: String::new(),
            department_name: String::new(),
            priority: Priority::default(),
            assigned_to: String::new(),
            estimated_hours: 0.0,
            actual_hours: 0.0,
            resources: Resources::default(),
            status: TaskStatus::NotStarted,
            critical_path: false,
            total_float: 0,
            risk: RiskLevel::OnTrack,
        }
    }

    /// Set the task name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the department
    pub fn department(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.department_id = id.into();
        self.department_name = name.into();
        self
    }

    /// Add a predecessor
    pub fn depends_on(mut self, predecessor: impl Into<String>) -> Self {
        self.dependencies.push(predecessor.into());
        self
    }

    /// Set the status (builder pattern)
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.set_status(status);
        self
    }

    /// Set the priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Number of calendar days the bar covers, both ends included
    pub fn span_days(&self) -> i64 {
        self.start_date.inclusive_days_until(self.end_date)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Past its end date and not completed
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.end_date < as_of && !self.is_completed()
    }

    /// Move the task window, keeping `duration` consistent
    pub fn reschedule(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = start;
        self.end_date = end.max(start);
        self.duration = start.days_until(self.end_date);
    }

    /// Update progress and derive the matching status.
    ///
    /// 100 completes the task, anything above 0 marks it in progress, and 0
    /// returns an in-progress or completed task to not-started. Delayed,
    /// cancelled and on-hold tasks keep their status below 100.
    pub fn set_progress(&mut self, pct: u8) {
        self.progress = pct.min(100);
        self.status = match (self.progress, self.status) {
            (100, _) => TaskStatus::Completed,
            (_, s @ (TaskStatus::Delayed | TaskStatus::Cancelled | TaskStatus::OnHold)) => s,
            (0, _) => TaskStatus::NotStarted,
            _ => TaskStatus::InProgress,
        };
    }

    /// Update the status; completing a task forces its progress to 100
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        if status == TaskStatus::Completed {
            self.progress = 100;
        } else if self.progress == 100 {
            self.progress = 99;
        }
    }
}

// ============================================================================
// Window & Calendar
// ============================================================================

/// The date window a project timeline is drawn against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProjectWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Days between start and end (`end - start`)
    pub fn total_days(&self) -> i64 {
        self.start.days_until(self.end)
    }

    /// End not after start: nothing can be laid out
    pub fn is_degenerate(&self) -> bool {
        self.total_days() <= 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Non-working time definitions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    /// Non-working weekdays (0 = Sunday, 6 = Saturday)
    #[serde(default = "default_weekend_days")]
    pub weekend_days: Vec<u8>,
    /// Holiday ranges
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

fn default_weekend_days() -> Vec<u8> {
    vec![0, 6]
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            weekend_days: default_weekend_days(),
            holidays: Vec::new(),
        }
    }
}

impl Calendar {
    /// Add a holiday range (builder pattern)
    pub fn holiday(mut self, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        self.holidays.push(Holiday {
            name: name.into(),
            start,
            end,
        });
        self
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        self.weekend_days.contains(&weekday)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.contains(date))
    }

    /// Check if a date is a working day
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Working days in `[start, end]`
    pub fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_working_day(*d))
            .count() as i64
    }
}

/// Holiday definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Holiday {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Dependency-graph error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CircularDependency(Vec<TaskId>),

    #[error("Task '{task}' depends on '{missing}' which doesn't exist")]
    MissingDependency { task: TaskId, missing: TaskId },

    #[error("Duplicate task id: {0}")]
    DuplicateTask(TaskId),

    #[error("Cannot schedule empty task set")]
    EmptyGraph,
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
