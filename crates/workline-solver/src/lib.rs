//! # workline-solver
//!
//! Turns a project's work plan into a dated, annotated task schedule.
//!
//! This crate provides:
//! - Work plan synthesis into a sequential task chain
//! - Dependency graph validation and topological ordering
//! - Critical path identification (chain shortcut, CPM for branching sets)
//! - Overdue / at-risk classification
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use workline_core::WorkPlanStep;
//!
//! let plan = vec![WorkPlanStep::new("s1", "Design"), WorkPlanStep::new("s2", "Civil")];
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let tasks = workline_solver::synthesize(&plan, Some(start));
//!
//! assert_eq!(tasks[1].dependencies, vec!["s1".to_string()]);
//! assert!(tasks.iter().all(|t| t.critical_path));
//! ```

pub mod cpm;
pub mod critical;
pub mod dag;
pub mod risk;
pub mod synth;

pub use cpm::{CpmResult, CpmSchedule, CpmScheduler, Criticality};
pub use critical::{CriticalPathResolver, PathAnalysis, PathKind};
pub use dag::{DependencyEdge, DependencyGraph};
pub use risk::RiskClassifier;
pub use synth::Synthesizer;

use chrono::NaiveDate;
use std::collections::HashMap;
use workline_core::{today, GanttTask, Project, RiskPolicy, ScheduleConfig, WorkPlanStep};

/// Synthesize a work plan with the default configuration, mark the
/// critical path and flag overdue tasks as of today.
///
/// `start` defaults to today.
pub fn synthesize(work_plan: &[WorkPlanStep], start: Option<NaiveDate>) -> Vec<GanttTask> {
    let as_of = today();
    let mut tasks = Synthesizer::default().synthesize(work_plan, start.unwrap_or(as_of));
    CriticalPathResolver::new().resolve(&mut tasks);
    RiskClassifier::new(RiskPolicy::Minimal).classify(&mut tasks, as_of);
    tasks
}

/// Full pipeline: synthesis, critical path, risk
#[derive(Clone, Debug, Default)]
pub struct TimelineSolver {
    synthesizer: Synthesizer,
}

impl TimelineSolver {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            synthesizer: Synthesizer::new(config),
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        self.synthesizer.config()
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Generate the annotated task set for a project as of `as_of`.
    ///
    /// The chain starts at the project start date, or `as_of` when the
    /// project has none.
    pub fn schedule(&self, project: &Project, as_of: NaiveDate) -> Vec<GanttTask> {
        let start = project.start_date.unwrap_or(as_of);
        let mut tasks = self.synthesizer.synthesize(&project.work_plan, start);
        self.reanalyze(&mut tasks, project.expected_end_date, as_of);
        tasks
    }

    /// Re-synthesize a project and carry over what the work plan cannot
    /// express from previously stored tasks.
    ///
    /// The work plan always wins: dates, status and progress come from a
    /// fresh synthesis. Only `actual_hours`, and `assigned_to` where the
    /// step names nobody, are taken from a stored task with the same id.
    pub fn refresh(&self, project: &Project, as_of: NaiveDate) -> Vec<GanttTask> {
        let mut tasks = self.schedule(project, as_of);
        if project.tasks.is_empty() {
            return tasks;
        }

        let stored: HashMap<&str, &GanttTask> =
            project.tasks.iter().map(|t| (t.id.as_str(), t)).collect();
        let mut carried = 0usize;
        for task in &mut tasks {
            let Some(previous) = stored.get(task.id.as_str()) else {
                continue;
            };
            task.actual_hours = previous.actual_hours;
            if task.assigned_to.is_empty() {
                task.assigned_to = previous.assigned_to.clone();
            }
            carried += 1;
        }

        if carried != project.tasks.len() || carried != tasks.len() {
            tracing::debug!(
                stored = project.tasks.len(),
                synthesized = tasks.len(),
                carried,
                "stored tasks differ from the work plan"
            );
        }
        tasks
    }

    /// Recompute critical path and risk after tasks were edited
    pub fn reanalyze(
        &self,
        tasks: &mut [GanttTask],
        deadline: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> PathAnalysis {
        let analysis = CriticalPathResolver::new().resolve(tasks);
        RiskClassifier::new(self.config().risk.clone())
            .deadline(deadline)
            .classify(tasks, as_of);
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use workline_core::{DateExt, RiskLevel, StepStatus, TaskStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn synthesize_marks_chain_critical() {
        let plan = vec![WorkPlanStep::new("a", "A"), WorkPlanStep::new("b", "B")];
        let tasks = synthesize(&plan, Some(date(2024, 1, 1)));
        assert!(tasks.iter().all(|t| t.critical_path));
    }

    #[test]
    fn synthesize_flags_overdue_work() {
        let plan = vec![WorkPlanStep::new("s1", "Design").status(StepStatus::InProgress)];
        let tasks = synthesize(&plan, Some(date(2020, 1, 1)));
        assert_eq!(tasks[0].end_date, date(2020, 1, 15));
        assert_eq!(tasks[0].risk, RiskLevel::Overdue);
    }

    #[test]
    fn synthesize_leaves_completed_work_on_track() {
        let plan = vec![WorkPlanStep::new("s1", "Design").status(StepStatus::Completed)];
        let tasks = synthesize(&plan, Some(date(2020, 1, 1)));
        assert_eq!(tasks[0].risk, RiskLevel::OnTrack);
    }

    #[test]
    fn refresh_follows_edited_work_plan() {
        let solver = TimelineSolver::default();
        let start = date(2024, 1, 1);
        let mut project = Project::new("Depot")
            .starting(start)
            .step(WorkPlanStep::new("a", "Design"));
        project.tasks = solver.schedule(&project, start);
        project.tasks[0].actual_hours = 12.5;
        project.tasks[0].assigned_to = "rosa".into();

        project.work_plan[0].status = StepStatus::Completed;
        project.work_plan.push(WorkPlanStep::new("b", "Civil"));
        let tasks = solver.refresh(&project, date(2024, 1, 2));

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[0].progress, 100);
        assert_eq!(tasks[0].actual_hours, 12.5);
        assert_eq!(tasks[0].assigned_to, "rosa");
        assert_eq!(tasks[1].dependencies, vec!["a".to_string()]);
    }

    #[test]
    fn refresh_follows_moved_start() {
        let solver = TimelineSolver::default();
        let mut project = Project::new("Depot")
            .starting(date(2024, 1, 1))
            .step(WorkPlanStep::new("a", "Design"));
        project.tasks = solver.schedule(&project, date(2024, 1, 1));

        project.start_date = Some(date(2024, 3, 1));
        let tasks = solver.refresh(&project, date(2024, 1, 1));
        assert_eq!(tasks[0].start_date, date(2024, 3, 1));
    }

    #[test]
    fn synthesize_empty_plan() {
        assert!(synthesize(&[], None).is_empty());
    }

    #[test]
    fn schedule_classifies_overdue() {
        let project = Project::new("Depot")
            .starting(date(2023, 1, 1))
            .step(WorkPlanStep::new("s1", "Design").status(StepStatus::InProgress));
        let tasks = TimelineSolver::default().schedule(&project, date(2024, 1, 1));
        assert_eq!(tasks[0].risk, RiskLevel::Overdue);
    }

    #[test]
    fn schedule_without_start_uses_as_of() {
        let project = Project::new("Depot").step(WorkPlanStep::new("s1", "Design"));
        let tasks = TimelineSolver::default().schedule(&project, date(2024, 6, 3));
        assert_eq!(tasks[0].start_date, date(2024, 6, 3));
        assert_eq!(tasks[0].risk, RiskLevel::OnTrack);
    }

    #[test]
    fn reanalyze_after_branching_edit() {
        let config = ScheduleConfig::default().with_risk(RiskPolicy::Minimal);
        let solver = TimelineSolver::new(config);
        let plan = vec![
            WorkPlanStep::new("a", "A").estimated_days(10),
            WorkPlanStep::new("b", "B").estimated_days(2),
            WorkPlanStep::new("c", "C").estimated_days(2),
        ];
        let mut tasks = solver.synthesizer().synthesize(&plan, date(2024, 1, 1));

        // c now follows a directly, in parallel with b
        tasks[2].dependencies = vec!["a".into()];
        let b_start = tasks[1].start_date;
        let b_end = tasks[1].end_date;
        tasks[2].reschedule(b_start, b_end.add_days(5));

        let analysis = solver.reanalyze(&mut tasks, None, date(2024, 1, 1));
        assert_eq!(analysis.kind, PathKind::Network);
        assert!(tasks[0].critical_path);
        assert!(!tasks[1].critical_path);
        assert!(tasks[2].critical_path);
        assert_eq!(tasks[1].total_float, 5);
    }
}
