//! Critical Path Method Implementation
//!
//! Textbook CPM over a [`DependencyGraph`], used when an edited task set is
//! no longer a simple chain.
//!
//! References:
//!   - Kelley & Walker (1959) "Critical-Path Planning and Scheduling"
//!   - PMI PMBOK Guide, Chapter 6
//!
//! # Algorithm
//!
//! Times are day offsets from the earliest task start. A task occupies
//! `span_days` whole days, so `EF = ES + span` is the first day after it.
//!
//! 1. Topological sort (done in dag.rs)
//! 2. Forward pass: ES = max(own start offset, EF of predecessors)
//! 3. Backward pass: LF = min(LS of successors), or project end
//! 4. Float: LS - ES (never negative)
//! 5. Critical: zero float

use crate::dag::DependencyGraph;
use chrono::NaiveDate;
use workline_core::{DateExt, GanttTask, ScheduleError, TaskId};

/// Per-task result of the critical-path pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criticality {
    /// Zero float: any delay moves the project end
    Critical,
    /// Can slip without moving the project end
    Float {
        /// Slip allowed before the project end moves
        total: i64,
        /// Slip allowed before any successor moves
        free: i64,
    },
}

impl Criticality {
    pub fn is_critical(&self) -> bool {
        matches!(self, Criticality::Critical)
    }

    pub fn total_float(&self) -> i64 {
        match self {
            Criticality::Critical => 0,
            Criticality::Float { total, .. } => *total,
        }
    }
}

/// Result of CPM scheduling for a single task
#[derive(Debug, Clone)]
pub struct CpmResult {
    pub task_id: TaskId,
    /// Early Start (days from origin)
    pub es: i64,
    /// Early Finish (exclusive, days from origin)
    pub ef: i64,
    /// Late Start (days from origin)
    pub ls: i64,
    /// Late Finish (exclusive, days from origin)
    pub lf: i64,
    /// Span in days
    pub duration: i64,
    pub criticality: Criticality,
}

/// Complete CPM schedule
#[derive(Debug)]
pub struct CpmSchedule {
    /// Results indexed like the input task list
    pub results: Vec<CpmResult>,
    /// Zero-float tasks, in topological order
    pub critical_path: Vec<TaskId>,
    /// Date of day offset 0
    pub origin: NaiveDate,
    /// Max EF (exclusive)
    pub project_end: i64,
}

impl CpmSchedule {
    /// Last day of the early schedule
    pub fn finish_date(&self) -> NaiveDate {
        self.origin.add_days(self.project_end - 1)
    }
}

/// CPM scheduler over a dependency graph
pub struct CpmScheduler;

impl CpmScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Schedule using Critical Path Method.
    ///
    /// `tasks` must be the list `graph` was built from.
    pub fn schedule(
        &self,
        graph: &DependencyGraph,
        tasks: &[GanttTask],
    ) -> Result<CpmSchedule, ScheduleError> {
        if graph.is_empty() {
            return Err(ScheduleError::EmptyGraph);
        }

        let Some(origin) = tasks.iter().map(|t| t.start_date).min() else {
            return Err(ScheduleError::EmptyGraph);
        };
        let n = tasks.len();
        let duration: Vec<i64> = tasks.iter().map(|t| t.span_days().max(1)).collect();
        let release: Vec<i64> = tasks.iter().map(|t| origin.days_until(t.start_date)).collect();

        let mut es = vec![0i64; n];
        let mut ef = vec![0i64; n];
        let mut ls = vec![0i64; n];
        let mut lf = vec![0i64; n];

        // ════════════════════════════════════════════════════════════════════
        // FORWARD PASS
        // ════════════════════════════════════════════════════════════════════
        //
        // A task never starts before its own planned start, nor before every
        // predecessor has finished.

        for &i in &graph.topo_order {
            let after_preds = graph.predecessors[i].iter().map(|&p| ef[p]).max().unwrap_or(0);
            es[i] = release[i].max(after_preds);
            ef[i] = es[i] + duration[i];
        }

        let project_end = ef.iter().copied().max().unwrap_or(0);

        // ════════════════════════════════════════════════════════════════════
        // BACKWARD PASS
        // ════════════════════════════════════════════════════════════════════

        for &i in graph.topo_order.iter().rev() {
            lf[i] = graph.successors[i]
                .iter()
                .map(|&s| ls[s])
                .min()
                .unwrap_or(project_end);
            ls[i] = lf[i] - duration[i];
        }

        // ════════════════════════════════════════════════════════════════════
        // FLOAT
        // ════════════════════════════════════════════════════════════════════
        //
        // Total float = LS - ES
        // Free float  = min(ES of successors) - EF, or total float for sinks

        let mut results: Vec<Option<CpmResult>> = vec![None; n];
        let mut critical_path = Vec::new();

        for &i in &graph.topo_order {
            let total = ls[i] - es[i];
            debug_assert!(total >= 0, "negative float on {}", tasks[i].id);

            let free = graph.successors[i]
                .iter()
                .map(|&s| es[s])
                .min()
                .map(|min_succ_es| (min_succ_es - ef[i]).max(0))
                .unwrap_or(total);

            let criticality = if total == 0 {
                critical_path.push(tasks[i].id.clone());
                Criticality::Critical
            } else {
                Criticality::Float { total, free }
            };

            results[i] = Some(CpmResult {
                task_id: tasks[i].id.clone(),
                es: es[i],
                ef: ef[i],
                ls: ls[i],
                lf: lf[i],
                duration: duration[i],
                criticality,
            });
        }

        Ok(CpmSchedule {
            results: results.into_iter().flatten().collect(),
            critical_path,
            origin,
            project_end,
        })
    }
}

impl Default for CpmScheduler {
    fn default() -> Self {
        Self::new()
    }
}
