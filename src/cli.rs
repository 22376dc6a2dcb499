use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Local};
use clap::{Args, Parser, Subcommand};
use log::warn;

use crate::{
    db::{average, NewRecord, Record},
    oee::{calculate_all, render_report, render_summary, MeasurementInput},
    settings::SettingsPatch,
    App,
};

#[derive(Debug, Parser)]
#[command(name = "oee-tracker")]
#[command(about = "Overall effectiveness (availability x efficiency x quality) for R&D simulation processes")]
pub struct Cli {
    /// Directory holding the record store and settings
    #[arg(long, env = "OEE_TRACKER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the metric for one run and optionally save it
    Calculate(CalculateArgs),
    /// Average stored runs of a process over a time window
    Report {
        #[arg(long)]
        process: Option<String>,
        #[arg(long)]
        days: Option<i64>,
    },
    /// List stored runs, newest first
    List {
        /// Process name, or "all"
        #[arg(long, default_value = "all")]
        process: String,
        #[arg(long)]
        days: Option<i64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one stored run as JSON
    Show { id: String },
    /// List known process names
    Processes,
    /// Delete every stored run of a process
    Delete {
        #[arg(long)]
        process: String,
    },
    /// Show or change persisted defaults
    Config {
        #[arg(long)]
        default_process: Option<String>,
        #[arg(long)]
        history_days: Option<i64>,
        #[arg(long)]
        list_limit: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct CalculateArgs {
    #[arg(long)]
    pub process: Option<String>,
    /// Planned time in minutes
    #[arg(long)]
    pub total_time: f64,
    /// Unavailable time in minutes
    #[arg(long)]
    pub downtime: f64,
    #[arg(long)]
    pub completed_simulations: u64,
    /// Ideal minutes per simulation
    #[arg(long)]
    pub ideal_time_per_simulation: f64,
    #[arg(long)]
    pub total_simulations: u64,
    #[arg(long)]
    pub valid_simulations: u64,
    #[arg(long)]
    pub notes: Option<String>,
    /// Persist the result
    #[arg(long)]
    pub save: bool,
    /// Reject inconsistent input instead of saturating it
    #[arg(long)]
    pub strict: bool,
}

impl CalculateArgs {
    fn measurement(&self) -> MeasurementInput {
        MeasurementInput {
            total_time: self.total_time,
            downtime: self.downtime,
            completed_simulations: self.completed_simulations,
            ideal_time_per_simulation: self.ideal_time_per_simulation,
            total_simulations: self.total_simulations,
            valid_simulations: self.valid_simulations,
        }
    }
}

/// Run one command and return what should be printed.
pub async fn execute(app: &App, command: Command) -> Result<String> {
    match command {
        Command::Calculate(args) => calculate(app, args).await,
        Command::Report { process, days } => report(app, process, days).await,
        Command::List {
            process,
            days,
            limit,
        } => list(app, &process, days, limit).await,
        Command::Show { id } => show(app, &id).await,
        Command::Processes => processes(app).await,
        Command::Delete { process } => delete(app, &process).await,
        Command::Config {
            default_process,
            history_days,
            list_limit,
        } => config(
            app,
            SettingsPatch {
                default_process,
                history_days,
                list_limit,
            },
        ),
    }
}

async fn calculate(app: &App, args: CalculateArgs) -> Result<String> {
    let input = args.measurement();
    if let Err(err) = input.validate() {
        if args.strict {
            return Err(err).context("invalid measurement input");
        }
        warn!("Questionable input, ratios will saturate: {err}");
    }

    let process = args
        .process
        .unwrap_or_else(|| app.settings.get().default_process);
    let result = calculate_all(&input);
    let mut out = render_report(&result, &process);

    if args.save {
        let mut record = NewRecord::new(process, input, result);
        if let Some(notes) = args.notes {
            record = record.with_notes(notes);
        }
        let id = app.db.append(record).await.context("failed to save record")?;
        let _ = writeln!(out, "\nSaved record {id}");
    }

    Ok(out)
}

fn window(days: i64) -> Result<Duration> {
    Duration::try_days(days).with_context(|| format!("--days {days} is out of range"))
}

async fn report(app: &App, process: Option<String>, days: Option<i64>) -> Result<String> {
    let settings = app.settings.get();
    let process = process.unwrap_or(settings.default_process);
    let days = days.unwrap_or(settings.history_days);
    let since = window(days)?;

    let records = app
        .db
        .list_by(Some(&process), since, settings.list_limit)
        .await?;
    if records.is_empty() {
        return Ok(format!(
            "No data found for process '{process}' in the last {days} days.\n"
        ));
    }

    Ok(render_summary(&process, days, records.len(), &average(&records)))
}

fn format_row(record: &Record) -> String {
    let pct = |field: &str| format!("{:.2}%", record.value(field).unwrap_or(0.0) * 100.0);
    format!(
        "{:<18} {:<25} {:>12} {:>12} {:>12} {:>14}  {}",
        record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        record.process_name,
        pct("availability"),
        pct("efficiency"),
        pct("quality"),
        pct("effectiveness"),
        record.id,
    )
}

async fn list(app: &App, process: &str, days: Option<i64>, limit: Option<usize>) -> Result<String> {
    let settings = app.settings.get();
    let days = days.unwrap_or(settings.history_days);
    let limit = limit.unwrap_or(settings.list_limit);
    let filter = (process != "all").then_some(process);
    let since = window(days)?;

    let records = app.db.list_by(filter, since, limit).await?;
    let scope = filter
        .map(|name| format!(" for process '{name}'"))
        .unwrap_or_default();

    if records.is_empty() {
        return Ok(format!("No records found{scope} in the last {days} days.\n"));
    }

    let mut out = String::new();
    let _ = writeln!(out, "Recent runs{scope} in the last {days} days:");
    let _ = writeln!(out, "{}", "=".repeat(100));
    let _ = writeln!(
        out,
        "{:<18} {:<25} {:>12} {:>12} {:>12} {:>14}  {}",
        "Timestamp", "Process", "Availability", "Efficiency", "Quality", "Effectiveness", "Id"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));
    for record in &records {
        let _ = writeln!(out, "{}", format_row(record));
    }
    Ok(out)
}

async fn show(app: &App, id: &str) -> Result<String> {
    match app.db.get_record(id).await? {
        Some(record) => Ok(serde_json::to_string_pretty(&record)? + "\n"),
        None => Ok(format!("No record with id {id}.\n")),
    }
}

async fn processes(app: &App) -> Result<String> {
    let preferred = app.settings.get().default_process;
    let catalog = app.db.process_catalog(Some(&preferred)).await?;
    if catalog.is_empty() {
        return Ok("No processes recorded yet.\n".to_string());
    }

    let mut out = String::new();
    for name in &catalog.available {
        let marker = if catalog.is_current(name) { "*" } else { " " };
        let _ = writeln!(out, "{marker} {name}");
    }
    Ok(out)
}

async fn delete(app: &App, process: &str) -> Result<String> {
    let deleted = app
        .db
        .delete_all_for(process)
        .await
        .with_context(|| format!("failed to delete records for '{process}'"))?;
    Ok(format!("Deleted {deleted} records for process '{process}'.\n"))
}

fn config(app: &App, patch: SettingsPatch) -> Result<String> {
    let settings = if patch.is_empty() {
        app.settings.get()
    } else {
        app.settings.update(patch)?
    };
    Ok(serde_json::to_string_pretty(&settings)? + "\n")
}
