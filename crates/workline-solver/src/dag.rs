//! Dependency graph construction and validation
//!
//! Turns a flat task list into an index-based DAG suitable for the CPM
//! passes. Edges run predecessor -> successor. Synthesized work plans always
//! yield a simple path; edited task sets may branch.

use std::collections::{HashMap, HashSet, VecDeque};
use workline_core::{GanttTask, ScheduleError, TaskId};

/// An edge in the dependency graph (finish-to-start)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Predecessor task ID
    pub from: TaskId,
    /// Successor task ID
    pub to: TaskId,
}

/// Index-based dependency graph over a task list
#[derive(Debug)]
pub struct DependencyGraph {
    /// Task ids in input order
    pub task_ids: Vec<TaskId>,
    /// Task lookup by ID
    pub index: HashMap<TaskId, usize>,
    /// Adjacency list: task index -> successor indices
    pub successors: Vec<Vec<usize>>,
    /// Reverse adjacency: task index -> predecessor indices
    pub predecessors: Vec<Vec<usize>>,
    /// Topological order (computed once, reused)
    pub topo_order: Vec<usize>,
    /// References to unknown tasks skipped while building a lenient graph
    pub dropped: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Build a graph, rejecting any reference to an unknown task
    pub fn from_tasks(tasks: &[GanttTask]) -> Result<Self, ScheduleError> {
        Self::build(tasks, false)
    }

    /// Build a graph, skipping references to unknown tasks.
    ///
    /// Skipped references are logged and recorded in `dropped`. Cycles and
    /// duplicate ids are still errors.
    pub fn from_tasks_lenient(tasks: &[GanttTask]) -> Result<Self, ScheduleError> {
        Self::build(tasks, true)
    }

    fn build(tasks: &[GanttTask], lenient: bool) -> Result<Self, ScheduleError> {
        let mut index: HashMap<TaskId, usize> = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id.clone(), i).is_some() {
                return Err(ScheduleError::DuplicateTask(task.id.clone()));
            }
        }

        let mut successors = vec![Vec::new(); tasks.len()];
        let mut predecessors = vec![Vec::new(); tasks.len()];
        let mut dropped = Vec::new();

        for (to, task) in tasks.iter().enumerate() {
            let mut seen: HashSet<usize> = HashSet::new();
            for pred_id in &task.dependencies {
                let Some(&from) = index.get(pred_id) else {
                    if !lenient {
                        return Err(ScheduleError::MissingDependency {
                            task: task.id.clone(),
                            missing: pred_id.clone(),
                        });
                    }
                    tracing::warn!(task = %task.id, missing = %pred_id, "dropping dependency on unknown task");
                    dropped.push(DependencyEdge {
                        from: pred_id.clone(),
                        to: task.id.clone(),
                    });
                    continue;
                };
                // listing the same predecessor twice is one edge
                if seen.insert(from) {
                    successors[from].push(to);
                    predecessors[to].push(from);
                }
            }
        }

        let topo_order = topological_sort(&successors, &predecessors).map_err(|cycle| {
            ScheduleError::CircularDependency(cycle.into_iter().map(|i| tasks[i].id.clone()).collect())
        })?;

        Ok(Self {
            task_ids: tasks.iter().map(|t| t.id.clone()).collect(),
            index,
            successors,
            predecessors,
            topo_order,
            dropped,
        })
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// True when the graph is a single path: no branching, no merge points,
    /// no disconnected pieces.
    pub fn is_chain(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let single_links = self
            .successors
            .iter()
            .zip(&self.predecessors)
            .all(|(succ, pred)| succ.len() <= 1 && pred.len() <= 1);
        // acyclic + at most one link each way + n-1 edges => one path
        single_links && self.edge_count() == self.len() - 1
    }

    /// All edges in topological order of their successor
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.topo_order
            .iter()
            .flat_map(|&to| {
                self.predecessors[to].iter().map(move |&from| DependencyEdge {
                    from: self.task_ids[from].clone(),
                    to: self.task_ids[to].clone(),
                })
            })
            .collect()
    }
}

/// Kahn's algorithm, seeded in input order so the result is deterministic.
///
/// On failure returns one cycle as a list of indices, first node repeated at
/// the end.
fn topological_sort(
    successors: &[Vec<usize>],
    predecessors: &[Vec<usize>],
) -> Result<Vec<usize>, Vec<usize>> {
    let n = successors.len();
    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &succ in &successors[node] {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    // Every node left over still has a leftover predecessor, so walking
    // predecessors from any of them must revisit a node.
    let Some(start) = (0..n).find(|&i| in_degree[i] > 0) else {
        return Err(Vec::new());
    };
    let mut path = vec![start];
    let mut position: HashMap<usize, usize> = HashMap::from([(start, 0)]);
    let mut current = start;
    loop {
        let Some(&next) = predecessors[current].iter().find(|&&p| in_degree[p] > 0) else {
            return Err(path);
        };
        if let Some(&at) = position.get(&next) {
            let mut cycle: Vec<usize> = path[at..].to_vec();
            cycle.reverse();
            cycle.push(cycle[0]);
            return Err(cycle);
        }
        position.insert(next, path.len());
        path.push(next);
        current = next;
    }
}
