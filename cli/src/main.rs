use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dutykeeper_core::config::{self, DutyConfig};
use dutykeeper_core::{
    ClockProvider, ClockSnapshot, CounterSnapshot, HuntReferenceTable, ResetSchedule, TaskRegistry,
};
use dutykeeper_types::formatting::format_progress;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

#[derive(Parser)]
#[command(version, about = "Inspect recurring duty resets and task status")]
struct Cli {
    /// Log engine decisions (resets, schedule errors) at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the next reset of every schedule
    Resets {
        /// Data-center region code
        #[arg(short, long, default_value_t = 1)]
        region: u8,
        /// Reference instant (RFC 3339), defaults to now
        #[arg(short, long)]
        at: Option<String>,
    },
    /// Load and validate a config file
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run one tick against a snapshot file and print the result
    Status {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Hunt reference tables (TOML)
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },
}

/// Snapshot file: the clock plus the live counters.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    clock: ClockSnapshot,
    #[serde(default)]
    live: CounterSnapshot,
}

/// Engine crate target, raised to debug by `--verbose`.
const CORE_LOG_TARGET: &str = "dutykeeper_core";

fn log_filter(verbose: bool) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    if !verbose {
        return filter;
    }
    match format!("{}=debug", CORE_LOG_TARGET).parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn init_logging(verbose: bool) {
    let filter = log_filter(verbose);

    // If DUTYKEEPER_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("DUTYKEEPER_LOG_PATH")
        && let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resets { region, at } => show_resets(region, at.as_deref()),
        Commands::Check { config } => check_config(config),
        Commands::Status {
            config,
            snapshot,
            reference,
        } => show_status(config, &snapshot, reference.as_deref()),
    }
}

fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>, String> {
    match at {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| format!("Invalid time '{}': {}", text, e)),
        None => Ok(Utc::now()),
    }
}

fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf, String> {
    path.or_else(config::default_config_path)
        .ok_or_else(|| "No config path given and no user config directory found".to_string())
}

fn load_config(path: Option<PathBuf>) -> Result<(PathBuf, DutyConfig), String> {
    let path = resolve_config_path(path)?;
    let config = config::load_file(&path).map_err(|e| e.to_string())?;
    Ok((path, config))
}

fn show_resets(region: u8, at: Option<&str>) -> Result<(), String> {
    let now = parse_instant(at)?;
    println!("Resets after {} (region {})", now.to_rfc3339(), region);

    for schedule in ResetSchedule::ALL {
        let next = match schedule.next_reset(region, now) {
            Ok(Some(next)) => next.to_rfc3339(),
            Ok(None) => "never".to_string(),
            Err(e) => format!("error: {}", e),
        };
        println!("  {:<16} {}", format!("{:?}", schedule), next);
    }
    Ok(())
}

fn check_config(path: Option<PathBuf>) -> Result<(), String> {
    let (path, config) = load_config(path)?;
    println!("{}: {} task(s)", path.display(), config.tasks.len());

    for task in &config.tasks {
        println!(
            "  {:<24} {:<14} {:<16} {:?}{}",
            task.id,
            task.category().label(),
            format!("{:?}", task.schedule),
            task.kind.kind(),
            if task.enabled { "" } else { " (disabled)" }
        );
    }
    Ok(())
}

fn load_snapshot(path: &Path) -> Result<SnapshotFile, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    toml::from_str(&contents).map_err(|e| format!("{}: {}", path.display(), e))
}

fn show_status(
    config_path: Option<PathBuf>,
    snapshot_path: &Path,
    reference_path: Option<&Path>,
) -> Result<(), String> {
    let (_, config) = load_config(config_path)?;
    let snapshot = load_snapshot(snapshot_path)?;
    let reference = match reference_path {
        Some(path) => HuntReferenceTable::load(path).map_err(|e| e.to_string())?,
        None => HuntReferenceTable::new(),
    };

    let mut registry = TaskRegistry::from_config(&config).map_err(|e| e.to_string())?;
    let clock = snapshot.clock;
    let report = registry.tick(&clock, &snapshot.live, &reference);

    println!("Status at {} (region {})", clock.now().to_rfc3339(), clock.region());
    for task in registry.iter() {
        let record = task.record();
        println!(
            "  {:<24} {:<10} {}",
            record.id(),
            format!("{:?}", record.status()),
            record.status_message()
        );
    }
    for (id, err) in &report.errors {
        println!("  {:<24} error: {}", id, err);
    }

    let summary = registry.summary();
    println!("\nTodo ({} remaining)", summary.total());
    for entry in registry.todo_entries(&clock, &config.todo) {
        println!("  [{}] {}", entry.category.label(), entry.label);
    }

    println!("\nTimers");
    for timer in registry.timers(&clock, &config.timers) {
        println!(
            "  {:<24} {:>12} {:>5}",
            timer.name,
            timer.text,
            format_progress(timer.progress)
        );
    }
    Ok(())
}
