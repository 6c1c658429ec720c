//! Critical-path annotation
//!
//! A synthesized work plan is a single chain with no float anywhere, so every
//! task in it is critical. Once tasks have been edited into a branching
//! network the chain shortcut no longer holds and the full CPM pass decides.

use crate::cpm::CpmScheduler;
use crate::dag::DependencyGraph;
use chrono::NaiveDate;
use workline_core::{GanttTask, ScheduleError, TaskId};

/// How the critical path was determined
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathKind {
    /// Pure sequential chain: every task is critical
    Chain,
    /// Branching network: zero-float tasks from CPM
    Network,
    /// Nothing to analyse
    Empty,
    /// Graph invalid; all tasks left non-critical
    Unresolved(ScheduleError),
}

/// Outcome of annotating a task set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathAnalysis {
    pub kind: PathKind,
    /// Critical tasks in dependency order
    pub critical_path: Vec<TaskId>,
    /// Last day of the schedule, when known
    pub finish: Option<NaiveDate>,
}

impl PathAnalysis {
    pub fn is_resolved(&self) -> bool {
        !matches!(self.kind, PathKind::Unresolved(_))
    }
}

/// Sets `critical_path` and `total_float` on every task
#[derive(Clone, Copy, Debug, Default)]
pub struct CriticalPathResolver;

impl CriticalPathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Annotate `tasks` in place.
    ///
    /// Never fails: an invalid graph is logged and reported through
    /// [`PathKind::Unresolved`] with every task marked non-critical.
    pub fn resolve(&self, tasks: &mut [GanttTask]) -> PathAnalysis {
        if tasks.is_empty() {
            return PathAnalysis {
                kind: PathKind::Empty,
                critical_path: Vec::new(),
                finish: None,
            };
        }

        let graph = match DependencyGraph::from_tasks_lenient(tasks) {
            Ok(graph) => graph,
            Err(err) => return unresolved(tasks, err),
        };

        if graph.is_chain() {
            for task in tasks.iter_mut() {
                task.critical_path = true;
                task.total_float = 0;
            }
            let critical_path: Vec<TaskId> = graph
                .topo_order
                .iter()
                .map(|&i| tasks[i].id.clone())
                .collect();
            let finish = tasks.iter().map(|t| t.end_date).max();
            tracing::debug!(tasks = tasks.len(), "chain: all tasks critical");
            return PathAnalysis {
                kind: PathKind::Chain,
                critical_path,
                finish,
            };
        }

        let schedule = match CpmScheduler::new().schedule(&graph, tasks) {
            Ok(schedule) => schedule,
            Err(err) => return unresolved(tasks, err),
        };

        for (task, result) in tasks.iter_mut().zip(&schedule.results) {
            task.critical_path = result.criticality.is_critical();
            task.total_float = result.criticality.total_float();
        }
        tracing::debug!(
            tasks = tasks.len(),
            critical = schedule.critical_path.len(),
            "network: critical path from CPM"
        );

        PathAnalysis {
            kind: PathKind::Network,
            finish: Some(schedule.finish_date()),
            critical_path: schedule.critical_path,
        }
    }
}

fn unresolved(tasks: &mut [GanttTask], err: ScheduleError) -> PathAnalysis {
    tracing::warn!(error = %err, "cannot resolve critical path");
    for task in tasks.iter_mut() {
        task.critical_path = false;
        task.total_float = 0;
    }
    PathAnalysis {
        kind: PathKind::Unresolved(err),
        critical_path: Vec::new(),
        finish: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use workline_core::DateExt;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, offset: i64, span: i64, deps: &[&str]) -> GanttTask {
        let start = date(2024, 1, 1).add_days(offset);
        deps.iter().fold(
            GanttTask::new(id, start, start.add_days(span - 1)),
            |t, d| t.depends_on(*d),
        )
    }

    #[test]
    fn empty_set() {
        let analysis = CriticalPathResolver::new().resolve(&mut []);
        assert_eq!(analysis.kind, PathKind::Empty);
    }

    #[test]
    fn chain_marks_everything_even_with_gaps() {
        // hand-edited gap between a and b: still a chain
        let mut tasks = vec![task("a", 0, 5, &[]), task("b", 10, 5, &["a"])];
        let analysis = CriticalPathResolver::new().resolve(&mut tasks);

        assert_eq!(analysis.kind, PathKind::Chain);
        assert!(tasks.iter().all(|t| t.critical_path && t.total_float == 0));
        assert_eq!(analysis.critical_path, vec!["a", "b"]);
        assert_eq!(analysis.finish, Some(date(2024, 1, 15)));
    }

    #[test]
    fn branching_uses_cpm() {
        let mut tasks = vec![
            task("a", 0, 5, &[]),
            task("b", 0, 3, &[]),
            task("c", 5, 2, &["a", "b"]),
        ];
        let analysis = CriticalPathResolver::new().resolve(&mut tasks);

        assert_eq!(analysis.kind, PathKind::Network);
        assert!(tasks[0].critical_path);
        assert!(!tasks[1].critical_path);
        assert_eq!(tasks[1].total_float, 2);
        assert!(tasks[2].critical_path);
        assert_eq!(analysis.finish, Some(date(2024, 1, 7)));
    }

    #[test]
    fn cycle_leaves_tasks_non_critical() {
        let mut tasks = vec![task("a", 0, 5, &["b"]), task("b", 5, 5, &["a"])];
        tasks[0].critical_path = true;
        let analysis = CriticalPathResolver::new().resolve(&mut tasks);

        assert!(!analysis.is_resolved());
        assert!(tasks.iter().all(|t| !t.critical_path));
    }

    #[test]
    fn dangling_reference_is_ignored() {
        let mut tasks = vec![task("a", 0, 5, &["removed-step"]), task("b", 5, 5, &["a"])];
        let analysis = CriticalPathResolver::new().resolve(&mut tasks);
        assert_eq!(analysis.kind, PathKind::Chain);
    }
}
