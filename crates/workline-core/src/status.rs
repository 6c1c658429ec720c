//! Project schedule statistics
//!
//! Rolls a task set up into the figures a dashboard shows: how many tasks
//! exist, how many are done, in flight, overdue or on the critical path,
//! and the overall completion rate.
//!
//! Statistics are a pure projection of the task list. They hold no state
//! of their own and must be recomputed after any task mutation.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use workline_core::status::{ProjectScheduleStats, StatusIndicator};
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let stats = ProjectScheduleStats::from_tasks(&[], as_of);
//!
//! assert_eq!(stats.total_tasks, 0);
//! assert_eq!(stats.completion_rate, 0.0);
//! assert_eq!(stats.status_indicator(), StatusIndicator::OnTrack);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{date, DepartmentId, GanttTask, TaskStatus};

// ============================================================================
// Core Types
// ============================================================================

/// Overall health classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusIndicator {
    /// Nothing overdue or at risk
    OnTrack,
    /// Some tasks at risk, none overdue
    AtRisk,
    /// At least one task overdue
    Behind,
}

impl StatusIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusIndicator::OnTrack => "On Track",
            StatusIndicator::AtRisk => "At Risk",
            StatusIndicator::Behind => "Behind",
        }
    }
}

impl std::fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-department rollup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentProgress {
    pub department_id: DepartmentId,
    pub department_name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Mean progress of the department's tasks (0-100)
    pub average_progress: f64,
}

/// Aggregated schedule metrics for one project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScheduleStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    /// End date before the as-of date and not completed
    pub overdue_tasks: usize,
    pub critical_path_tasks: usize,
    /// Tasks whose risk level is at-risk or overdue
    pub at_risk_tasks: usize,
    /// `completed / total * 100`, 0 when there are no tasks
    pub completion_rate: f64,
    /// Mean task progress (0-100), 0 when there are no tasks
    pub average_progress: f64,
    /// Departments in order of first appearance
    pub departments: Vec<DepartmentProgress>,
}

impl ProjectScheduleStats {
    /// Compute statistics for `tasks` as seen on `as_of`
    pub fn from_tasks(tasks: &[GanttTask], as_of: NaiveDate) -> Self {
        let mut completed_tasks = 0usize;
        let mut in_progress_tasks = 0usize;
        let mut overdue_tasks = 0usize;
        let mut critical_path_tasks = 0usize;
        let mut at_risk_tasks = 0usize;
        let mut progress_sum = 0u64;

        // department id -> (first-seen index, rollup)
        let mut departments: BTreeMap<&str, (usize, DepartmentProgress)> = BTreeMap::new();

        for (index, task) in tasks.iter().enumerate() {
            match task.status {
                TaskStatus::Completed => completed_tasks += 1,
                TaskStatus::InProgress => in_progress_tasks += 1,
                _ => {}
            }
            if task.is_overdue(as_of) {
                overdue_tasks += 1;
            }
            if task.critical_path {
                critical_path_tasks += 1;
            }
            if task.risk.is_at_risk() || task.is_overdue(as_of) {
                at_risk_tasks += 1;
            }
            progress_sum += u64::from(task.progress);

            let (_, dept) = departments
                .entry(task.department_id.as_str())
                .or_insert_with(|| {
                    (
                        index,
                        DepartmentProgress {
                            department_id: task.department_id.clone(),
                            department_name: task.department_name.clone(),
                            total_tasks: 0,
                            completed_tasks: 0,
                            average_progress: 0.0,
                        },
                    )
                });
            dept.total_tasks += 1;
            if task.is_completed() {
                dept.completed_tasks += 1;
            }
            // running sum; divided below
            dept.average_progress += f64::from(task.progress);
        }

        let total_tasks = tasks.len();
        let mut departments: Vec<(usize, DepartmentProgress)> = departments.into_values().collect();
        departments.sort_by_key(|(first_seen, _)| *first_seen);

        Self {
            total_tasks,
            completed_tasks,
            in_progress_tasks,
            overdue_tasks,
            critical_path_tasks,
            at_risk_tasks,
            completion_rate: percentage(completed_tasks as f64, total_tasks),
            average_progress: ratio(progress_sum as f64, total_tasks),
            departments: departments
                .into_iter()
                .map(|(_, mut dept)| {
                    dept.average_progress = ratio(dept.average_progress, dept.total_tasks);
                    dept
                })
                .collect(),
        }
    }

    /// Overall health.
    ///
    /// - On Track: nothing overdue or at risk
    /// - At Risk: at-risk tasks but none overdue
    /// - Behind: one or more overdue tasks
    pub fn status_indicator(&self) -> StatusIndicator {
        if self.overdue_tasks > 0 {
            StatusIndicator::Behind
        } else if self.at_risk_tasks > 0 {
            StatusIndicator::AtRisk
        } else {
            StatusIndicator::OnTrack
        }
    }

    pub fn remaining_tasks(&self) -> usize {
        self.total_tasks - self.completed_tasks
    }
}

/// Compute statistics as of today
pub fn compute_stats(tasks: &[GanttTask]) -> ProjectScheduleStats {
    ProjectScheduleStats::from_tasks(tasks, date::today())
}

fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percentage(part: f64, count: usize) -> f64 {
    ratio(part * 100.0, count)
}

// ============================================================================
// Tests
// ============================================================================
