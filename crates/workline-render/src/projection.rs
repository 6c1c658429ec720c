//! Filtering and normalized placement of tasks in a project window
//!
//! Positions are fractions of the window: `offset` is where the bar starts,
//! `width` how much of the window it covers. Both stay within `0.0..=1.0`
//! so a renderer only multiplies by its chart width.

use std::collections::HashSet;
use workline_core::{DateExt, DepartmentId, GanttTask, ProjectWindow, TaskId, TaskStatus};

/// Which tasks to show. `None` means no restriction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub department: Option<DepartmentId>,
    pub status: Option<TaskStatus>,
    pub critical_only: bool,
}

impl TaskFilter {
    /// Show every task
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one department; `"all"` clears the restriction
    pub fn department(mut self, department: impl Into<String>) -> Self {
        let department = department.into();
        self.department = (!department.eq_ignore_ascii_case("all")).then_some(department);
        self
    }

    pub fn status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn critical_only(mut self, critical_only: bool) -> Self {
        self.critical_only = critical_only;
        self
    }

    /// All conditions must hold
    pub fn matches(&self, task: &GanttTask) -> bool {
        self.department
            .as_ref()
            .map_or(true, |dept| &task.department_id == dept)
            && self.status.map_or(true, |status| task.status == status)
            && (!self.critical_only || task.critical_path)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.department.is_none() && self.status.is_none() && !self.critical_only
    }
}

/// A visible task and where its bar goes
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedTask<'a> {
    pub task: &'a GanttTask,
    /// Start of the bar as a fraction of the window
    pub offset: f64,
    /// Length of the bar as a fraction of the window
    pub width: f64,
}

/// Dependency arrow between two visible tasks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connector {
    pub from: TaskId,
    pub to: TaskId,
}

/// Tasks placed against a window
#[derive(Clone, Debug, PartialEq)]
pub struct Projection<'a> {
    pub window: ProjectWindow,
    pub tasks: Vec<ProjectedTask<'a>>,
    pub connectors: Vec<Connector>,
}

impl<'a> Projection<'a> {
    fn empty(window: ProjectWindow) -> Self {
        Self {
            window,
            tasks: Vec::new(),
            connectors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn visible_tasks(&self) -> impl Iterator<Item = &'a GanttTask> + '_ {
        self.tasks.iter().map(|p| p.task)
    }

    /// Row index of a visible task
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|p| p.task.id == id)
    }
}

/// Filter `tasks` and place the survivors in `window`.
///
/// A window whose end is not after its start has no room for anything and
/// yields an empty projection.
pub fn project<'a>(
    tasks: &'a [GanttTask],
    filter: &TaskFilter,
    window: ProjectWindow,
) -> Projection<'a> {
    if window.is_degenerate() {
        tracing::debug!(start = %window.start, end = %window.end, "degenerate window, nothing to project");
        return Projection::empty(window);
    }

    let total = window.total_days() as f64;
    let placed: Vec<ProjectedTask<'a>> = tasks
        .iter()
        .filter(|t| filter.matches(t))
        .map(|task| {
            let left = window.start.days_until(task.start_date) as f64 / total;
            let right = left + task.duration as f64 / total;
            let offset = left.clamp(0.0, 1.0);
            ProjectedTask {
                task,
                offset,
                width: right.clamp(0.0, 1.0) - offset,
            }
        })
        .collect();

    let visible: HashSet<&str> = placed.iter().map(|p| p.task.id.as_str()).collect();
    let connectors = placed
        .iter()
        .flat_map(|p| {
            p.task
                .dependencies
                .iter()
                .filter(|dep| visible.contains(dep.as_str()))
                .map(|dep| Connector {
                    from: dep.clone(),
                    to: p.task.id.clone(),
                })
        })
        .collect();

    Projection {
        window,
        tasks: placed,
        connectors,
    }
}
