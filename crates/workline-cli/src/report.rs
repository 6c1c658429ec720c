//! Human-readable and JSON report formatting

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use workline_core::{GanttTask, ProjectScheduleStats};
use workline_render::TimelineColumn;

const BAR_WIDTH: usize = 30;

/// Task table for `workline schedule`
pub fn task_table(project_name: &str, tasks: &[GanttTask]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", project_name);
    if tasks.is_empty() {
        let _ = writeln!(out, "No work-plan steps to schedule.");
        return out;
    }

    let id_width = tasks.iter().map(|t| t.id.chars().count()).max().unwrap_or(2).max(2);
    let name_width = tasks.iter().map(|t| t.name.chars().count()).max().unwrap_or(4).max(4);

    let _ = writeln!(
        out,
        "  {:id_width$}  {:name_width$}  {:10}  {:10}  {:>4}  {:>4}  {:12}  {:8}  {}",
        "ID", "Name", "Start", "End", "Days", "Pct", "Status", "Risk", "Depends on"
    );
    for task in tasks {
        let _ = writeln!(
            out,
            "{} {:id_width$}  {:name_width$}  {}  {}  {:>4}  {:>3}%  {:12}  {:8}  {}",
            if task.critical_path { '*' } else { ' ' },
            task.id,
            task.name,
            task.start_date,
            task.end_date,
            task.duration,
            task.progress,
            task.status.to_string(),
            task.risk.to_string(),
            if task.dependencies.is_empty() {
                "-".to_string()
            } else {
                task.dependencies.join(", ")
            }
        );
    }

    if let (Some(first), Some(last)) = (tasks.first(), tasks.iter().map(|t| t.end_date).max()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Start:    {}", first.start_date);
        let _ = writeln!(out, "Finish:   {}", last);
        let _ = writeln!(out, "* = critical path");
    }
    out
}

fn progress_bar(pct: f64) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Summary for `workline stats`
pub fn stats_text(project_name: &str, as_of: NaiveDate, stats: &ProjectScheduleStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", project_name);
    let _ = writeln!(out, "As of:   {}", as_of);
    let _ = writeln!(out, "Status:  {}", stats.status_indicator().as_str().to_uppercase());
    let _ = writeln!(
        out,
        "Progress: {} {:.0}% complete",
        progress_bar(stats.completion_rate),
        stats.completion_rate
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Tasks:          {}", stats.total_tasks);
    let _ = writeln!(out, "  Complete:     {}", stats.completed_tasks);
    let _ = writeln!(out, "  In Progress:  {}", stats.in_progress_tasks);
    let _ = writeln!(out, "  Remaining:    {}", stats.remaining_tasks());
    let _ = writeln!(out, "  Overdue:      {}", stats.overdue_tasks);
    let _ = writeln!(out, "  At Risk:      {}", stats.at_risk_tasks);
    let _ = writeln!(out, "  Critical Path: {}", stats.critical_path_tasks);
    let _ = writeln!(out, "Average progress: {:.1}%", stats.average_progress);

    if !stats.departments.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Departments:");
        for dept in &stats.departments {
            let label = if dept.department_name.is_empty() {
                dept.department_id.as_str()
            } else {
                dept.department_name.as_str()
            };
            let _ = writeln!(
                out,
                "  {:20} {}/{} complete, {:.0}% average",
                label, dept.completed_tasks, dept.total_tasks, dept.average_progress
            );
        }
    }
    out
}

/// JSON body for `workline stats --format json`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport<'a> {
    pub project_name: &'a str,
    pub as_of: NaiveDate,
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: &'a ProjectScheduleStats,
}

impl<'a> StatsReport<'a> {
    pub fn new(project_name: &'a str, as_of: NaiveDate, stats: &'a ProjectScheduleStats) -> Self {
        Self {
            project_name,
            as_of,
            status: stats.status_indicator().as_str(),
            stats,
        }
    }
}

/// Column listing for `workline grid`
pub fn grid_text(columns: &[TimelineColumn]) -> String {
    let mut out = String::new();
    for column in columns {
        let mut flags = Vec::new();
        if column.is_weekend {
            flags.push("weekend");
        }
        if column.is_holiday {
            flags.push("holiday");
        }
        let _ = writeln!(
            out,
            "{}  {:8}  {}",
            column.date,
            column.label,
            flags.join(",")
        );
    }
    let _ = writeln!(out, "{} columns", columns.len());
    out
}
