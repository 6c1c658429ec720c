//! Schedule risk classification
//!
//! The baseline rule is simple: a task whose end date has passed without it
//! being completed is overdue. With a buffer-aware policy, a task still in
//! its window is also flagged when the slippage observed so far is larger
//! than the buffer left to absorb it.

use chrono::NaiveDate;
use workline_core::{DateExt, GanttTask, RiskLevel, RiskPolicy, TaskStatus};

/// Classifies tasks against a risk policy
#[derive(Clone, Debug)]
pub struct RiskClassifier {
    policy: RiskPolicy,
    /// Project expected end date; slack before it counts as buffer
    deadline: Option<NaiveDate>,
}

impl RiskClassifier {
    pub fn new(policy: RiskPolicy) -> Self {
        Self {
            policy,
            deadline: None,
        }
    }

    /// Set the project deadline (builder pattern)
    pub fn deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set `risk` on every task as of `as_of`
    pub fn classify(&self, tasks: &mut [GanttTask], as_of: NaiveDate) {
        let chain_end = tasks.iter().map(|t| t.end_date).max();
        for task in tasks.iter_mut() {
            task.risk = self.classify_task(task, as_of, chain_end);
        }
    }

    /// Risk level of one task.
    ///
    /// `chain_end` is the last end date of the whole task set.
    pub fn classify_task(
        &self,
        task: &GanttTask,
        as_of: NaiveDate,
        chain_end: Option<NaiveDate>,
    ) -> RiskLevel {
        if task.is_overdue(as_of) {
            return RiskLevel::Overdue;
        }

        let RiskPolicy::BufferAware {
            buffer_days,
            working_days_per_week,
        } = &self.policy
        else {
            return RiskLevel::OnTrack;
        };

        if matches!(task.status, TaskStatus::Completed | TaskStatus::Cancelled)
            || as_of < task.start_date
        {
            return RiskLevel::OnTrack;
        }

        let week_ratio = f64::from(*working_days_per_week) / 7.0;
        let slippage = slippage_days(task, as_of) * week_ratio;

        let deadline_slack = match (self.deadline, chain_end) {
            (Some(deadline), Some(end)) => end.days_until(deadline).max(0),
            _ => 0,
        };
        let buffer = *buffer_days as f64 + (deadline_slack + task.total_float) as f64 * week_ratio;

        if slippage > buffer {
            RiskLevel::AtRisk
        } else {
            RiskLevel::OnTrack
        }
    }
}

/// Calendar days the task is behind a linear burn-down.
///
/// Expected progress is the share of the window elapsed through `as_of`;
/// the shortfall against actual progress is converted back into days.
pub fn slippage_days(task: &GanttTask, as_of: NaiveDate) -> f64 {
    let span = task.span_days().max(1) as f64;
    let elapsed = task.start_date.inclusive_days_until(as_of).min(task.span_days()) as f64;
    let expected = elapsed / span;
    let actual = f64::from(task.progress) / 100.0;
    ((expected - actual) * span).max(0.0)
}
