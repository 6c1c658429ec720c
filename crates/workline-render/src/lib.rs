//! # workline-render
//!
//! Presentation-side processing for workline schedules.
//!
//! This crate provides:
//! - Timeline grid columns for day / week / month views
//! - Task filtering and normalized bar placement within a project window
//! - Plain text timeline output
//! - SVG timeline charts
//! - A renderer trait for custom backends
//!
//! ## Example
//!
//! ```rust,ignore
//! use workline_render::{
//!     project, SvgTimelineRenderer, TaskFilter, TextTimelineRenderer, TimelineRenderer, TimelineView,
//!     ViewMode,
//! };
//!
//! let projection = project(&tasks, &TaskFilter::all().critical_only(true), window);
//! let view = TimelineView::new("Depot", projection, ViewMode::Weeks);
//!
//! // ASCII bars for the terminal
//! let text = TextTimelineRenderer::new().render(&view)?;
//!
//! // Standalone SVG document
//! let svg = SvgTimelineRenderer::default().render(&view)?;
//! ```

pub mod chart;
pub mod grid;
pub mod projection;
pub mod text;

pub use chart::SvgTimelineRenderer;
pub use grid::{build_timeline_grid, GridBuilder, TimelineColumn, ViewMode};
pub use projection::{project, Connector, ProjectedTask, Projection, TaskFilter};
pub use text::TextTimelineRenderer;

use chrono::NaiveDate;
use workline_core::{Calendar, RenderError};

/// Everything a renderer needs to draw one timeline
#[derive(Clone, Debug)]
pub struct TimelineView<'a> {
    pub title: String,
    pub view: ViewMode,
    pub projection: Projection<'a>,
    pub columns: Vec<TimelineColumn>,
    /// Draws a "today" marker when inside the window
    pub as_of: Option<NaiveDate>,
}

impl<'a> TimelineView<'a> {
    /// Build a view whose grid spans the projection window
    pub fn new(title: impl Into<String>, projection: Projection<'a>, view: ViewMode) -> Self {
        let window = projection.window;
        Self {
            title: title.into(),
            view,
            columns: build_timeline_grid(window.start, Some(window.end), view),
            projection,
            as_of: None,
        }
    }

    /// Rebuild the grid against a calendar so holidays are flagged
    pub fn with_calendar(mut self, calendar: &Calendar) -> Self {
        let window = self.projection.window;
        self.columns = GridBuilder::new(self.view)
            .calendar(calendar)
            .build(window.start, Some(window.end));
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

/// A timeline output backend
pub trait TimelineRenderer {
    type Output;

    /// Render a projected timeline to the output format
    fn render(&self, view: &TimelineView<'_>) -> Result<Self::Output, RenderError>;
}

/// Truncate a string to a maximum number of characters with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
