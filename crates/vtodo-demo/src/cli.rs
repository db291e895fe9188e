#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vtodo::{ListConfig, TodoApp};

use crate::error::{DemoError, Result};
use crate::render::{write_frame, write_stats};
use crate::script::{parse_script, run_script};

#[derive(Debug, Parser)]
#[command(
    name = "vtodo-demo",
    about = "Drive a windowed todo list from the command line",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render one frame of a bulk-seeded list.
    Render(RenderArgs),

    /// Replay a session script (file or stdin).
    Script(ScriptArgs),

    /// Scroll from top to bottom and report cache statistics.
    Sweep(SweepArgs),

    /// Print the resolved configuration as JSON.
    #[command(name = "print-config")]
    PrintConfig(ListArgs),
}

/// List geometry. Flags override values from `--config`.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// TOML (`.toml`) or JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of generated items.
    #[arg(long)]
    pub bulk: Option<usize>,

    #[arg(long)]
    pub item_extent: Option<f64>,

    #[arg(long)]
    pub viewport: Option<f64>,

    /// Extra rows materialized above and below the viewport.
    #[arg(long)]
    pub overscan: Option<usize>,

    #[arg(long)]
    pub cache_slack: Option<usize>,
}

impl ListArgs {
    /// Load the config file (if any), apply flag overrides, validate.
    pub fn resolve(&self) -> Result<ListConfig> {
        let mut config = match &self.config {
            Some(path) if path.extension().is_some_and(|ext| ext == "toml") => {
                ListConfig::from_toml_file(path)?
            }
            Some(path) => ListConfig::from_json_file(path)?,
            None => ListConfig::default(),
        };
        if let Some(bulk) = self.bulk {
            config.bulk_count = bulk;
        }
        if let Some(extent) = self.item_extent {
            config.item_extent = extent;
        }
        if let Some(extent) = self.viewport {
            config.viewport_extent = extent;
        }
        if let Some(overscan) = self.overscan {
            config.overscan = overscan;
        }
        if let Some(slack) = self.cache_slack {
            config.cache_slack = slack;
        }
        Ok(config.validated()?)
    }
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Scroll offset of the viewport's leading edge.
    #[arg(long, default_value_t = 0.0)]
    pub scroll: f64,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ScriptArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Script file; stdin when omitted or `-`.
    pub path: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Rows scrolled between frames.
    #[arg(long, default_value_t = 1)]
    pub step_rows: usize,

    #[arg(long)]
    pub json: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json, &cli.log_level);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &mut out)
}

/// Run one command, writing its output to `out`.
pub fn execute(command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Render(args) => run_render(args, out),
        Commands::Script(args) => run_script_command(args, out),
        Commands::Sweep(args) => run_sweep(args, out),
        Commands::PrintConfig(args) => {
            let config = args.resolve()?;
            serde_json::to_writer_pretty(&mut *out, &config)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn init_logging(json: bool, default_filter: &str) {
    if json {
        vtodo::core::logging::init_json_logging(default_filter);
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_render(args: RenderArgs, out: &mut impl Write) -> Result<()> {
    if !args.scroll.is_finite() {
        return Err(DemoError::invalid("--scroll must be finite"));
    }
    let mut app = TodoApp::new(args.list.resolve()?)?;
    let len = app.snapshot().len();
    app.list_state_mut().scroll_to_offset(args.scroll, len);
    let frame = app.frame();
    write_frame(out, &frame, app.store().revision(), args.json)
}

fn run_script_command(args: ScriptArgs, out: &mut impl Write) -> Result<()> {
    let text = match &args.path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let commands = parse_script(&text)?;
    let mut app = TodoApp::new(args.list.resolve()?)?;
    run_script(&mut app, &commands, out, args.json)
}

fn run_sweep(args: SweepArgs, out: &mut impl Write) -> Result<()> {
    if args.step_rows == 0 {
        return Err(DemoError::invalid("--step-rows must be at least 1"));
    }
    let mut app = TodoApp::new(args.list.resolve()?)?;
    let len = app.snapshot().len();
    let step = args.step_rows as f64 * app.config().item_extent;

    let mut frames = 0usize;
    let mut rows_built = 0usize;
    loop {
        let frame = app.frame();
        frames += 1;
        rows_built += frame.built_count();
        if app.list_state().is_at_bottom(len) {
            break;
        }
        app.list_state_mut().scroll_by(step, len);
    }
    tracing::info!(frames, rows_built, len, "scroll sweep finished");
    write_stats(out, frames, rows_built, &app.materializer_stats(), args.json)
}
