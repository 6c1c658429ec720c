//! Critical path and risk over edited task sets
//!
//! Invariants:
//! 1. Float is never negative
//! 2. Critical tasks have zero float
//! 3. A chain is entirely critical, a branch with slack is not
//! 4. Graph errors never panic and never mark anything critical
//! 5. Overdue incomplete tasks are always flagged

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use workline_core::{
    compute_stats, DateExt, GanttTask, Project, RiskLevel, RiskPolicy, ScheduleConfig,
    ScheduleError, StepStatus, TaskStatus, WorkPlanStep,
};
use workline_solver::{CriticalPathResolver, PathKind, TimelineSolver};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(id: &str, start: NaiveDate, days: i64, deps: &[&str]) -> GanttTask {
    let mut t = GanttTask::new(id, start, start.add_days(days - 1));
    for dep in deps {
        t = t.depends_on(*dep);
    }
    t
}

/// Foundations and structure run in parallel after design
fn branched_site() -> Vec<GanttTask> {
    let d = date(2024, 3, 4);
    vec![
        task("design", d, 10, &[]),
        task("foundations", d.add_days(10), 15, &["design"]),
        task("procurement", d.add_days(10), 5, &["design"]),
        task("structure", d.add_days(25), 20, &["foundations", "procurement"]),
        task("signage", d.add_days(25), 3, &["procurement"]),
    ]
}

// ============================================================================
// INVARIANTS 1-3
// ============================================================================

#[test]
fn branched_network_float() {
    let mut tasks = branched_site();
    let analysis = CriticalPathResolver::new().resolve(&mut tasks);

    assert_eq!(analysis.kind, PathKind::Network);
    assert_eq!(analysis.critical_path, vec!["design", "foundations", "structure"]);
    assert_eq!(analysis.finish, Some(date(2024, 4, 17)));

    for t in &tasks {
        assert!(t.total_float >= 0, "{} has negative float", t.id);
        assert_eq!(t.critical_path, t.total_float == 0, "{}", t.id);
    }

    let float = |id: &str| tasks.iter().find(|t| t.id == id).unwrap().total_float;
    assert_eq!(float("procurement"), 10);
    assert_eq!(float("signage"), 17);
}

#[test]
fn chain_is_entirely_critical_regardless_of_gaps() {
    let d = date(2024, 3, 4);
    let mut tasks = vec![
        task("a", d, 5, &[]),
        task("b", d.add_days(9), 5, &["a"]),
        task("c", d.add_days(14), 2, &["b"]),
    ];
    let analysis = CriticalPathResolver::new().resolve(&mut tasks);
    assert_eq!(analysis.kind, PathKind::Chain);
    assert!(tasks.iter().all(|t| t.critical_path));
}

#[test]
fn critical_count_reaches_stats() {
    let mut tasks = branched_site();
    CriticalPathResolver::new().resolve(&mut tasks);
    assert_eq!(compute_stats(&tasks).critical_path_tasks, 3);
}

// ============================================================================
// INVARIANT 4: fail-soft
// ============================================================================

#[test]
fn cycle_is_fail_soft() {
    let mut tasks = branched_site();
    tasks[0].dependencies.push("structure".into());
    let analysis = CriticalPathResolver::new().resolve(&mut tasks);

    match &analysis.kind {
        PathKind::Unresolved(ScheduleError::CircularDependency(cycle)) => {
            assert_eq!(cycle.first(), cycle.last());
        }
        other => panic!("expected unresolved cycle, got {:?}", other),
    }
    assert!(tasks.iter().all(|t| !t.critical_path));
}

#[test]
fn duplicate_ids_are_fail_soft() {
    let d = date(2024, 3, 4);
    let mut tasks = vec![task("a", d, 5, &[]), task("a", d, 5, &[])];
    let analysis = CriticalPathResolver::new().resolve(&mut tasks);
    assert_eq!(
        analysis.kind,
        PathKind::Unresolved(ScheduleError::DuplicateTask("a".into()))
    );
}

#[test]
fn dangling_predecessor_is_dropped() {
    let mut tasks = branched_site();
    tasks[4].dependencies.push("demolished".into());
    let analysis = CriticalPathResolver::new().resolve(&mut tasks);
    assert_eq!(analysis.kind, PathKind::Network);
    assert!(tasks[0].critical_path);
}

// ============================================================================
// INVARIANT 5: risk
// ============================================================================

#[test]
fn overdue_in_progress_task_scenario() {
    let mut tasks = vec![GanttTask::new("late", date(2022, 12, 1), date(2023, 1, 1))
        .with_status(TaskStatus::InProgress)];
    TimelineSolver::default().reanalyze(&mut tasks, None, date(2024, 1, 1));

    assert_eq!(tasks[0].risk, RiskLevel::Overdue);
    let stats = workline_core::ProjectScheduleStats::from_tasks(&tasks, date(2024, 1, 1));
    assert_eq!(stats.overdue_tasks, 1);
}

#[test]
fn completed_late_task_is_not_overdue() {
    let mut tasks = vec![GanttTask::new("done", date(2022, 12, 1), date(2023, 1, 1))
        .with_status(TaskStatus::Completed)];
    TimelineSolver::default().reanalyze(&mut tasks, None, date(2024, 1, 1));
    assert_eq!(tasks[0].risk, RiskLevel::OnTrack);
}

#[test]
fn buffer_aware_schedule_flags_slipping_task() {
    let config = ScheduleConfig::default().with_risk(RiskPolicy::BufferAware {
        buffer_days: 1,
        working_days_per_week: 5,
    });
    let mut step = WorkPlanStep::new("civil", "Civil").estimated_days(20);
    step.status = StepStatus::InProgress;
    step.progress = Some(10.0);
    let project = Project::new("Depot")
        .starting(date(2024, 1, 1))
        .step(WorkPlanStep::new("design", "Design").status(StepStatus::Completed).estimated_days(4))
        .step(step);

    // civil runs 01-06..01-26; by 01-20 it should be ~70% done
    let tasks = TimelineSolver::new(config).schedule(&project, date(2024, 1, 20));
    assert_eq!(tasks[0].risk, RiskLevel::OnTrack);
    assert_eq!(tasks[1].risk, RiskLevel::AtRisk);
}

#[test]
fn deadline_slack_absorbs_slippage() {
    let config = ScheduleConfig::default().with_risk(RiskPolicy::BufferAware {
        buffer_days: 1,
        working_days_per_week: 5,
    });
    let mut step = WorkPlanStep::new("civil", "Civil").estimated_days(20);
    step.status = StepStatus::InProgress;
    step.progress = Some(10.0);
    let mut project = Project::new("Depot").starting(date(2024, 1, 6)).step(step);
    project.expected_end_date = Some(date(2024, 3, 1));

    let tasks = TimelineSolver::new(config).schedule(&project, date(2024, 1, 20));
    assert_eq!(tasks[0].risk, RiskLevel::OnTrack);
}
