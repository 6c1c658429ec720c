//! Work plan -> task chain synthesis
//!
//! Each work-plan step becomes one task. Tasks run strictly one after the
//! other: a task starts the day after its predecessor ends and depends on
//! exactly that predecessor.
//!
//! Synthesis is a pure function of (work plan, start date, configuration),
//! so re-running it after an edit is always safe.

use chrono::NaiveDate;
use std::collections::HashSet;
use workline_core::{
    parse_date, DateExt, GanttTask, ScheduleConfig, TaskStatus, WorkPlanStep,
};

/// Builds the sequential task chain for a work plan
#[derive(Clone, Debug, Default)]
pub struct Synthesizer {
    config: ScheduleConfig,
}

impl Synthesizer {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Synthesize one task per step, chained in step order.
    ///
    /// Malformed steps are repaired rather than skipped: a blank id becomes
    /// `step-<n>`, a repeated id gets a `-<n>` suffix, and an unparsable
    /// target date falls back to the default duration.
    pub fn synthesize(&self, work_plan: &[WorkPlanStep], start: NaiveDate) -> Vec<GanttTask> {
        let mut tasks: Vec<GanttTask> = Vec::with_capacity(work_plan.len());
        let mut seen_ids: HashSet<String> = HashSet::with_capacity(work_plan.len());
        let mut cursor = start;

        for (index, step) in work_plan.iter().enumerate() {
            let id = unique_id(step, index, &mut seen_ids);
            let duration = self.step_duration(step, cursor);
            let end = cursor.add_days(duration);

            let name = task_name(step, &id);
            let mut task = GanttTask::new(id, cursor, end)
                .name(name)
                .department(step.department_id.trim(), step.department_name.trim());

            if let Some(prev) = tasks.last() {
                task = task.depends_on(prev.id.clone());
            }

            task.status = TaskStatus::from(step.status);
            task.progress = step
                .progress
                .map(clamp_progress)
                .unwrap_or_else(|| step.status.implied_progress());
            task.priority = step.priority.unwrap_or_default();
            task.assigned_to = step.assigned_to.clone().unwrap_or_default();
            task.estimated_hours = step
                .estimated_hours
                .filter(|h| h.is_finite() && *h >= 0.0)
                .unwrap_or(duration as f64 * self.config.hours_per_day);
            task.resources = step
                .resources
                .clone()
                .unwrap_or_else(|| self.config.default_resources.clone());

            cursor = end.add_days(1);
            tasks.push(task);
        }

        tracing::debug!(steps = work_plan.len(), %start, "synthesized task chain");
        tasks
    }

    /// Days from start to end for one step.
    ///
    /// An explicit estimate wins, then a target date after `start`, then the
    /// configured default. Never less than one day.
    fn step_duration(&self, step: &WorkPlanStep, start: NaiveDate) -> i64 {
        if let Some(days) = step.estimated_days {
            return i64::from(days.max(1));
        }

        if let Some(raw) = step.target_date.as_deref() {
            match parse_date(raw) {
                Some(target) if target > start => return start.days_until(target),
                Some(target) => {
                    tracing::debug!(step = %step.id, %target, %start, "target date not after chain cursor, using default duration");
                }
                None if !raw.trim().is_empty() => {
                    tracing::warn!(step = %step.id, value = raw, "unparsable target date, using default duration");
                }
                None => {}
            }
        }

        i64::from(self.config.default_duration_days.max(1))
    }
}

fn unique_id(step: &WorkPlanStep, index: usize, seen: &mut HashSet<String>) -> String {
    let base = step.id.trim();
    let base = if base.is_empty() {
        tracing::warn!(index, "work-plan step without id");
        format!("step-{}", index + 1)
    } else {
        base.to_string()
    };

    if seen.insert(base.clone()) {
        return base;
    }

    tracing::warn!(id = %base, "duplicate work-plan step id");
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn task_name(step: &WorkPlanStep, id: &str) -> String {
    [step.department_name.as_str(), step.department_id.as_str()]
        .into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(id)
        .to_string()
}

fn clamp_progress(pct: f32) -> u8 {
    if pct.is_nan() {
        0
    } else {
        pct.clamp(0.0, 100.0).round() as u8
    }
}
