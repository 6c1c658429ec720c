//! SVG timeline chart
//!
//! Bars are laid out from the projection fractions, so the chart always
//! spans exactly the project window.

use crate::{truncate, TimelineRenderer, TimelineView};
use svg::node::element::{Definitions, Group, Line, Marker, Path, Rectangle, Text};
use svg::Document;
use workline_core::{DateExt, GanttTask, RenderError, RiskLevel};

/// SVG timeline renderer configuration
#[derive(Clone, Debug)]
pub struct SvgTimelineRenderer {
    /// Width of the chart area (excluding labels) in pixels
    pub chart_width: u32,
    /// Height per task row in pixels
    pub row_height: u32,
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    pub critical_color: String,
    pub normal_color: String,
    pub at_risk_color: String,
    pub overdue_color: String,
    /// Fill for the completed share of a bar
    pub progress_color: String,
    pub background_color: String,
    pub grid_color: String,
    /// Shading behind weekend and holiday columns
    pub non_working_color: String,
    pub text_color: String,
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Draw dependency connectors
    pub show_connectors: bool,
}

impl Default for SvgTimelineRenderer {
    fn default() -> Self {
        Self {
            chart_width: 800,
            row_height: 28,
            label_width: 180,
            header_height: 50,
            padding: 20,
            critical_color: "#e74c3c".into(),
            normal_color: "#3498db".into(),
            at_risk_color: "#f39c12".into(),
            overdue_color: "#8e44ad".into(),
            progress_color: "rgba(0,0,0,0.25)".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            non_working_color: "#f7f7f7".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
            show_connectors: true,
        }
    }
}

impl SvgTimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    pub fn hide_connectors(mut self) -> Self {
        self.show_connectors = false;
        self
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    fn total_height(&self, task_count: usize) -> u32 {
        self.padding * 2 + self.header_height + (task_count as u32 * self.row_height)
    }

    fn chart_left(&self) -> f64 {
        f64::from(self.padding + self.label_width)
    }

    fn chart_top(&self) -> u32 {
        self.padding + self.header_height
    }

    /// x for a fraction of the window
    fn fraction_to_x(&self, fraction: f64) -> f64 {
        self.chart_left() + fraction * f64::from(self.chart_width)
    }

    fn date_to_x(&self, view: &TimelineView<'_>, date: chrono::NaiveDate) -> f64 {
        let window = view.projection.window;
        let total = window.total_days().max(1) as f64;
        self.fraction_to_x(window.start.days_until(date) as f64 / total)
    }

    fn row_y(&self, row: usize) -> u32 {
        self.chart_top() + row as u32 * self.row_height
    }

    fn bar_color(&self, task: &GanttTask) -> &str {
        match task.risk {
            RiskLevel::Overdue => self.overdue_color.as_str(),
            RiskLevel::AtRisk => self.at_risk_color.as_str(),
            RiskLevel::OnTrack if task.critical_path => self.critical_color.as_str(),
            RiskLevel::OnTrack => self.normal_color.as_str(),
        }
    }

    /// Column labels, thinned out so they don't collide
    fn render_header(&self, view: &TimelineView<'_>) -> Group {
        let mut group = Group::new().set("class", "header");

        let header_bg = Rectangle::new()
            .set("x", self.padding)
            .set("y", self.padding)
            .set("width", self.label_width + self.chart_width)
            .set("height", self.header_height)
            .set("fill", "#f8f9fa");
        group = group.add(header_bg);

        let title = Text::new(view.title.as_str())
            .set("x", self.padding + 8)
            .set("y", self.padding + 18)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 2)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str());
        group = group.add(title);

        let column_px = f64::from(self.chart_width) / view.columns.len().max(1) as f64;
        let every = ((60.0 / column_px).ceil() as usize).max(1);

        for column in view.columns.iter().step_by(every) {
            let x = self.date_to_x(view, column.date);
            let tick = Line::new()
                .set("x1", x)
                .set("y1", self.chart_top().saturating_sub(10))
                .set("x2", x)
                .set("y2", self.chart_top())
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            let label = Text::new(column.label.as_str())
                .set("x", x + 2.0)
                .set("y", self.chart_top().saturating_sub(14))
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size.saturating_sub(1).max(1))
                .set("fill", self.text_color.as_str());
            group = group.add(label);
        }

        group
    }

    /// Row lines, column lines and non-working shading
    fn render_grid(&self, view: &TimelineView<'_>, task_count: usize) -> Group {
        let mut group = Group::new().set("class", "grid");
        let chart_top = self.chart_top();
        let chart_bottom = self.row_y(task_count);
        let step = view.view.step_days();

        for column in &view.columns {
            let x = self.date_to_x(view, column.date);
            // only single-day columns can be shaded meaningfully
            if step == 1 && (column.is_weekend || column.is_holiday) {
                let width = self.date_to_x(view, column.date.add_days(1)) - x;
                let shade = Rectangle::new()
                    .set("x", x)
                    .set("y", chart_top)
                    .set("width", width)
                    .set("height", chart_bottom - chart_top)
                    .set("fill", self.non_working_color.as_str());
                group = group.add(shade);
            }
            let line = Line::new()
                .set("x1", x)
                .set("y1", chart_top)
                .set("x2", x)
                .set("y2", chart_bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        for i in 0..=task_count {
            let y = self.row_y(i);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", self.padding + self.label_width + self.chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        group
    }

    fn render_task(&self, task: &GanttTask, offset: f64, width: f64, row: usize) -> Group {
        let mut group = Group::new()
            .set("class", "task")
            .set("data-id", task.id.as_str());

        let y = self.row_y(row);
        let bar_height = (f64::from(self.row_height) * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;

        let label = Text::new(truncate(&task.name, 22))
            .set("x", self.padding + 8)
            .set("y", y + self.row_height / 2 + 4)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str());
        group = group.add(label);

        let x = self.fraction_to_x(offset);
        // keep zero-length bars visible
        let bar_width = (width * f64::from(self.chart_width)).max(4.0);

        let bar = Rectangle::new()
            .set("x", x)
            .set("y", bar_y)
            .set("width", bar_width)
            .set("height", bar_height)
            .set("rx", 3)
            .set("ry", 3)
            .set("fill", self.bar_color(task))
            .set(
                "aria-label",
                format!(
                    "{}: {} .. {} ({}%, {}, {})",
                    task.name, task.start_date, task.end_date, task.progress, task.status, task.risk
                ),
            );
        group = group.add(bar);

        if task.progress > 0 {
            let done = Rectangle::new()
                .set("x", x)
                .set("y", bar_y)
                .set("width", bar_width * f64::from(task.progress) / 100.0)
                .set("height", bar_height)
                .set("rx", 3)
                .set("ry", 3)
                .set("fill", self.progress_color.as_str());
            group = group.add(done);
        }

        group
    }

    /// Elbow arrows from the end of a predecessor to the start of its successor
    fn render_connectors(&self, view: &TimelineView<'_>) -> Group {
        let mut group = Group::new().set("class", "dependencies");
        let projection = &view.projection;

        for connector in &projection.connectors {
            let (Some(from_row), Some(to_row)) =
                (projection.row_of(&connector.from), projection.row_of(&connector.to))
            else {
                continue;
            };
            let from = &projection.tasks[from_row];
            let to = &projection.tasks[to_row];

            let x1 = self.fraction_to_x(from.offset + from.width);
            let y1 = f64::from(self.row_y(from_row) + self.row_height / 2);
            let x2 = self.fraction_to_x(to.offset);
            let y2 = f64::from(self.row_y(to_row) + self.row_height / 2);
            let elbow = x1.max(x2 - 8.0) + 4.0;

            let path = Path::new()
                .set("d", format!("M {x1} {y1} H {elbow} V {y2} H {x2}"))
                .set("fill", "none")
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1)
                .set("marker-end", "url(#arrow)");
            group = group.add(path);
        }

        group
    }

    fn render_today(&self, view: &TimelineView<'_>, task_count: usize) -> Option<Line> {
        let as_of = view.as_of.filter(|d| view.projection.window.contains(*d))?;
        let x = self.date_to_x(view, as_of);
        Some(
            Line::new()
                .set("class", "today")
                .set("x1", x)
                .set("y1", self.chart_top())
                .set("x2", x)
                .set("y2", self.row_y(task_count))
                .set("stroke", self.critical_color.as_str())
                .set("stroke-width", 2)
                .set("stroke-dasharray", "4,3"),
        )
    }

    fn render_legend(&self, y_offset: u32) -> Group {
        let mut group = Group::new().set("class", "legend");
        let y = f64::from(y_offset) + 15.0;
        let box_size = 12.0;
        let spacing = 120.0;

        let entries = [
            ("Critical Path", self.critical_color.as_str()),
            ("Normal Task", self.normal_color.as_str()),
            ("At Risk", self.at_risk_color.as_str()),
            ("Overdue", self.overdue_color.as_str()),
        ];

        for (i, (label, color)) in entries.into_iter().enumerate() {
            let x = f64::from(self.padding) + spacing * i as f64;
            let swatch = Rectangle::new()
                .set("x", x)
                .set("y", y - box_size + 2.0)
                .set("width", box_size)
                .set("height", box_size)
                .set("rx", 2)
                .set("fill", color);
            group = group.add(swatch);

            let text = Text::new(label)
                .set("x", x + box_size + 5.0)
                .set("y", y)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size.saturating_sub(1).max(1))
                .set("fill", self.text_color.as_str());
            group = group.add(text);
        }

        group
    }
}

impl TimelineRenderer for SvgTimelineRenderer {
    type Output = String;

    fn render(&self, view: &TimelineView<'_>) -> Result<String, RenderError> {
        let task_count = view.projection.tasks.len();
        // an empty chart keeps one blank row for the placeholder
        let rows = task_count.max(1);
        let width = self.total_width();
        let height = self.total_height(rows) + 30;

        let arrow = Marker::new()
            .set("id", "arrow")
            .set("viewBox", (0, 0, 10, 10))
            .set("refX", 10)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(Path::new().set("d", "M 0 0 L 10 5 L 0 10 z").set("fill", self.text_color.as_str()));

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg")
            .add(Definitions::new().add(arrow));

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        document = document.add(self.render_grid(view, rows));
        document = document.add(self.render_header(view));

        if view.projection.is_empty() {
            let placeholder = Text::new("(no visible tasks)")
                .set("class", "empty")
                .set("x", self.padding + 8)
                .set("y", self.row_y(0) + self.row_height / 2 + 4)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size)
                .set("fill", self.text_color.as_str());
            document = document.add(placeholder);
        }

        for (row, placed) in view.projection.tasks.iter().enumerate() {
            document = document.add(self.render_task(placed.task, placed.offset, placed.width, row));
        }

        if self.show_connectors {
            document = document.add(self.render_connectors(view));
        }
        if let Some(today) = self.render_today(view, rows) {
            document = document.add(today);
        }

        document = document.add(self.render_legend(self.row_y(rows) + 10));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}
