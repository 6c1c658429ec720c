//! ASCII timeline for terminals
//!
//! One character cell per grid column. A row looks like
//!
//! ```text
//! * Civil Works          |....####====....| 40%
//! ```
//!
//! `*` marks a critical task, `!` an at-risk or overdue one. `#` is the
//! completed share of the bar, `=` the remainder.

use crate::{truncate, TimelineRenderer, TimelineView};
use chrono::NaiveDate;
use std::fmt::Write as _;
use workline_core::{DateExt, GanttTask, RenderError};

/// Plain text timeline renderer
#[derive(Clone, Debug)]
pub struct TextTimelineRenderer {
    /// Characters reserved for task names
    pub label_width: usize,
    /// Append progress percentage to each row
    pub show_progress: bool,
}

impl Default for TextTimelineRenderer {
    fn default() -> Self {
        Self {
            label_width: 24,
            show_progress: true,
        }
    }
}

impl TextTimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width.max(4);
        self
    }

    pub fn hide_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Column header: labels placed where they fit without overlap
    fn header(&self, view: &TimelineView<'_>) -> String {
        let mut ruler = vec![' '; view.columns.len()];
        let mut next_free = 0;
        for (i, column) in view.columns.iter().enumerate() {
            if i < next_free || i + column.label.chars().count() > ruler.len() {
                continue;
            }
            for (j, ch) in column.label.chars().enumerate() {
                ruler[i + j] = ch;
            }
            next_free = i + column.label.chars().count() + 1;
        }
        format!(
            "{:width$} {}",
            "",
            ruler.into_iter().collect::<String>().trim_end(),
            width = self.label_width + 3
        )
    }

    fn bar(&self, view: &TimelineView<'_>, task: &GanttTask) -> String {
        let step = view.view.step_days();
        // days of the task that count as done
        let done_days = (task.span_days() * i64::from(task.progress)) / 100;
        let done_until = task.start_date.add_days(done_days - 1);

        view.columns
            .iter()
            .map(|column| {
                let cell_end = column.date.add_days(step - 1);
                if !overlaps(column.date, cell_end, task.start_date, task.end_date) {
                    if column.is_holiday {
                        ':'
                    } else {
                        '.'
                    }
                } else if done_days > 0 && column.date <= done_until {
                    '#'
                } else {
                    '='
                }
            })
            .collect()
    }
}

fn overlaps(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start <= b_end && b_start <= a_end
}

fn marker(task: &GanttTask) -> char {
    if task.risk.is_at_risk() {
        '!'
    } else if task.critical_path {
        '*'
    } else {
        ' '
    }
}

impl TimelineRenderer for TextTimelineRenderer {
    type Output = String;

    fn render(&self, view: &TimelineView<'_>) -> Result<String, RenderError> {
        let window = view.projection.window;
        let mut out = String::new();
        let _ = writeln!(out, "{} ({} .. {})", view.title, window.start, window.end);
        let _ = writeln!(out, "{}", self.header(view));

        if view.projection.is_empty() || view.columns.is_empty() {
            let _ = writeln!(out, "  (no visible tasks)");
            return Ok(out);
        }

        for task in view.projection.visible_tasks() {
            let name = truncate(&task.name, self.label_width);
            let _ = write!(
                out,
                "{} {:width$} |{}|",
                marker(task),
                name,
                self.bar(view, task),
                width = self.label_width
            );
            if self.show_progress {
                let _ = write!(out, " {:>3}%", task.progress);
            }
            out.push('\n');
        }

        if let Some(as_of) = view.as_of.filter(|d| window.contains(*d)) {
            let _ = writeln!(out, "as of {}", as_of);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{project, TaskFilter, ViewMode};
    use pretty_assertions::assert_eq;
    use workline_core::{ProjectWindow, RiskLevel};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tasks() -> Vec<GanttTask> {
        let mut design = GanttTask::new("design", date(2024, 1, 1), date(2024, 1, 4)).name("Design");
        design.critical_path = true;
        design.set_progress(50);
        let mut civil = GanttTask::new("civil", date(2024, 1, 5), date(2024, 1, 8))
            .name("Civil")
            .depends_on("design");
        civil.risk = RiskLevel::AtRisk;
        vec![design, civil]
    }

    #[test]
    fn rows_show_bars_and_markers() {
        let tasks = tasks();
        let window = ProjectWindow::new(date(2024, 1, 1), date(2024, 1, 10));
        let view = TimelineView::new("Depot", project(&tasks, &TaskFilter::all(), window), ViewMode::Days);
        let out = TextTimelineRenderer::new().label_width(8).render(&view).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Depot (2024-01-01 .. 2024-01-10)");
        assert_eq!(lines[1], "            Jan 01");
        assert_eq!(lines[2], "* Design   |##==......|  50%");
        assert_eq!(lines[3], "! Civil    |....====..|   0%");
    }

    #[test]
    fn empty_projection_renders_placeholder() {
        let tasks = tasks();
        let window = ProjectWindow::new(date(2024, 1, 1), date(2024, 1, 10));
        let filter = TaskFilter::all().department("hvac");
        let view = TimelineView::new("Depot", project(&tasks, &filter, window), ViewMode::Days);
        let out = TextTimelineRenderer::new().render(&view).unwrap();
        assert!(out.contains("(no visible tasks)"));
    }

    #[test]
    fn degenerate_window_renders_placeholder() {
        let tasks = tasks();
        let window = ProjectWindow::new(date(2024, 1, 10), date(2024, 1, 1));
        let view = TimelineView::new("Depot", project(&tasks, &TaskFilter::all(), window), ViewMode::Days);
        let out = TextTimelineRenderer::new().render(&view).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Depot (2024-01-10 .. 2024-01-01)");
        assert_eq!(lines[2], "  (no visible tasks)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn weekly_cells_cover_partial_overlap() {
        let tasks = tasks();
        let window = ProjectWindow::new(date(2024, 1, 1), date(2024, 1, 15));
        let view = TimelineView::new("Depot", project(&tasks, &TaskFilter::all(), window), ViewMode::Weeks)
            .as_of(date(2024, 1, 3));
        let out = TextTimelineRenderer::new().label_width(8).hide_progress().render(&view).unwrap();
        assert!(out.contains("! Civil    |==.|"));
        assert!(out.ends_with("as of 2024-01-03\n"));
    }
}
