//! workline CLI - Project Timeline Engine
//!
//! Command-line interface for scheduling, summarizing and charting
//! project work plans stored as JSON.

mod input;
mod report;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workline_core::{today, ProjectScheduleStats, TaskStatus};
use workline_render::{
    GridBuilder, SvgTimelineRenderer, TaskFilter, TextTimelineRenderer, TimelineRenderer,
    TimelineView, ViewMode,
};
use workline_solver::TimelineSolver;

#[derive(Parser)]
#[command(name = "workline")]
#[command(author, version, about = "Project timeline and critical-path scheduling", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration (TOML); defaults to ./workline.toml when present
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the task schedule from a project's work plan
    Schedule {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chain start date (defaults to the project start, then today)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,

        /// Date risk is evaluated against (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Store the generated tasks back into the project file
        #[arg(long)]
        write: bool,
    },

    /// Show progress and status statistics
    Stats {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Date overdue tasks are counted against (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the timeline grid columns for the project window
    Grid {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = ViewArg::Days)]
        view: ViewArg,
    },

    /// Draw the timeline chart
    Gantt {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = ViewArg::Weeks)]
        view: ViewArg,

        /// Department id, or "all"
        #[arg(long, default_value = "all")]
        department: String,

        /// Task status (e.g. in-progress), or "all"
        #[arg(long, default_value = "all", value_parser = parse_status_arg)]
        status: StatusArg,

        /// Only show critical-path tasks
        #[arg(long)]
        critical_only: bool,

        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = ChartFormat::Text)]
        format: ChartFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChartFormat {
    Text,
    Svg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Days,
    Weeks,
    Months,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Days => ViewMode::Days,
            ViewArg::Weeks => ViewMode::Weeks,
            ViewArg::Months => ViewMode::Months,
        }
    }
}

/// `None` is "all"
#[derive(Clone, Copy, Debug)]
struct StatusArg(Option<TaskStatus>);

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    workline_core::parse_date(raw).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn parse_status_arg(raw: &str) -> Result<StatusArg, String> {
    if raw.trim().eq_ignore_ascii_case("all") {
        Ok(StatusArg(None))
    } else {
        raw.parse::<TaskStatus>().map(|s| StatusArg(Some(s)))
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = input::load_config(cli.config.as_deref())?;
    let solver = TimelineSolver::new(config);

    match cli.command {
        Commands::Schedule {
            file,
            start,
            as_of,
            format,
            write,
        } => cmd_schedule(&solver, &file, start, as_of.unwrap_or_else(today), format, write),
        Commands::Stats { file, as_of, format } => {
            cmd_stats(&solver, &file, as_of.unwrap_or_else(today), format)
        }
        Commands::Grid { file, view } => cmd_grid(&solver, &file, view.into()),
        Commands::Gantt {
            file,
            view,
            department,
            status,
            critical_only,
            as_of,
            format,
            output,
        } => {
            let filter = TaskFilter::all()
                .department(department)
                .status(status.0)
                .critical_only(critical_only);
            cmd_gantt(
                &solver,
                &file,
                view.into(),
                &filter,
                as_of.unwrap_or_else(today),
                format,
                output.as_deref(),
            )
        }
    }
}

fn cmd_schedule(
    solver: &TimelineSolver,
    file: &Path,
    start: Option<NaiveDate>,
    as_of: NaiveDate,
    format: OutputFormat,
    write: bool,
) -> Result<()> {
    let mut project = input::load_project(file)?;
    if let Some(start) = start {
        project.start_date = Some(start);
    }

    let tasks = solver.refresh(&project, as_of);
    tracing::info!(project = %project.name, tasks = tasks.len(), "schedule generated");

    match format {
        OutputFormat::Text => print!("{}", report::task_table(&project.name, &tasks)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&tasks).context("Failed to serialize tasks")?
        ),
    }

    if write {
        project.tasks = tasks;
        input::save_project(file, &project)?;
        tracing::info!(path = %file.display(), "tasks written back");
    }

    Ok(())
}

fn cmd_stats(
    solver: &TimelineSolver,
    file: &Path,
    as_of: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let project = input::load_project(file)?;
    let tasks = input::project_tasks(solver, &project, as_of);
    let stats = ProjectScheduleStats::from_tasks(&tasks, as_of);

    match format {
        OutputFormat::Text => print!("{}", report::stats_text(&project.name, as_of, &stats)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report::StatsReport::new(&project.name, as_of, &stats))
                .context("Failed to serialize statistics")?
        ),
    }

    Ok(())
}

fn cmd_grid(solver: &TimelineSolver, file: &Path, view: ViewMode) -> Result<()> {
    let project = input::load_project(file)?;
    let config = solver.config();
    let window = project.window(today(), config.grid_default_span_days);

    let columns = GridBuilder::new(view)
        .calendar(&config.calendar)
        .build(window.start, Some(window.end));
    print!("{}", report::grid_text(&columns));

    Ok(())
}

fn cmd_gantt(
    solver: &TimelineSolver,
    file: &Path,
    view: ViewMode,
    filter: &TaskFilter,
    as_of: NaiveDate,
    format: ChartFormat,
    output: Option<&Path>,
) -> Result<()> {
    let project = input::load_project(file)?;
    let tasks = input::project_tasks(solver, &project, as_of);
    let window = project.window(as_of, solver.config().grid_default_span_days);

    let projection = workline_render::project(&tasks, filter, window);
    tracing::debug!(
        visible = projection.tasks.len(),
        total = tasks.len(),
        "tasks projected"
    );
    let timeline = TimelineView::new(project.name.as_str(), projection, view)
        .with_calendar(&solver.config().calendar)
        .as_of(as_of);

    let rendered = match format {
        ChartFormat::Text => TextTimelineRenderer::new().render(&timeline),
        ChartFormat::Svg => SvgTimelineRenderer::new().render(&timeline),
    }
    .context("Failed to render timeline")?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
