//! Command-line entry point for the scheduler
//!
//! Wires the real solver client, record store and file cache together and
//! exposes the solve flow and the record maintenance commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use scheduler::{
    CalendarState, RecordStore, Scheduler, SchedulerConfig, SchedulerError,
    config::parse_base_url,
    services::{EmployeeDirectory, FileCacheStore, RealRecordStore, RealSolverClient},
};
use shared::{Employee, EmployeeRecord, Shift, ShiftType, logging, types::fields::parse_timestamp};

/// Generate shift schedules with an external solver
#[derive(Parser)]
#[command(name = "scheduler")]
#[command(about = "Submit employees and shifts to a scheduling solver and show the resulting calendar")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Solver base URL (overrides SOLVER_BASE_URL)
    #[arg(long, global = true)]
    pub solver_url: Option<String>,

    /// Record store base URL (overrides RECORD_STORE_URL)
    #[arg(long, global = true)]
    pub store_url: Option<String>,

    /// Record store API key (overrides RECORD_STORE_API_KEY)
    #[arg(long, global = true)]
    pub store_api_key: Option<String>,

    /// Delay between status checks in milliseconds
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Status checks before giving up
    #[arg(long, global = true)]
    pub max_poll_attempts: Option<u32>,

    /// Employee cache file
    #[arg(long, global = true)]
    pub cache_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a schedule and print the calendar
    Solve {
        /// JSON file with employee rows (default: record store)
        #[arg(long)]
        employees: Option<PathBuf>,

        /// JSON file with shift rows (default: record store)
        #[arg(long)]
        shifts: Option<PathBuf>,
    },
    /// List employees
    Employees {
        /// Ignore the local cache
        #[arg(long)]
        refresh: bool,
    },
    /// List shifts
    Shifts,
    /// Delete an employee by id
    DeleteEmployee { id: String },
    /// Delete a shift by id
    DeleteShift { id: String },
    /// Print the shift-type category of a time span
    Classify { start: String, end: String },
}

impl Args {
    fn config(&self) -> Result<SchedulerConfig> {
        let mut config = SchedulerConfig::from_env()?;
        if let Some(url) = &self.solver_url {
            config.solver_base_url = parse_base_url("solver_url", url)?;
        }
        if let Some(url) = &self.store_url {
            config.store_base_url = parse_base_url("store_url", url)?;
        }
        if let Some(key) = &self.store_api_key {
            config.store_api_key = Some(key.clone());
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll.interval = Duration::from_millis(ms);
        }
        if let Some(attempts) = self.max_poll_attempts {
            config.poll.max_attempts = attempts;
        }
        if let Some(path) = &self.cache_path {
            config.cache_path = path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.config()?;
    tracing::debug!(
        "Solver at {}, record store at {}",
        config.solver_base_url,
        config.store_base_url
    );

    match args.command {
        Command::Solve { employees, shifts } => solve(&config, employees.as_deref(), shifts.as_deref()).await,
        Command::Employees { refresh } => list_employees(&config, refresh).await,
        Command::Shifts => list_shifts(&config).await,
        Command::DeleteEmployee { id } => {
            directory(&config)?.delete(&id).await?;
            logging::log_success(&format!("Deleted employee {id}"));
            Ok(())
        }
        Command::DeleteShift { id } => {
            RealRecordStore::new(&config)?.delete_shift(&id).await?;
            logging::log_success(&format!("Deleted shift {id}"));
            Ok(())
        }
        Command::Classify { start, end } => {
            let start = parse_timestamp(&start)?;
            let end = parse_timestamp(&end)?;
            let shift_type = ShiftType::classify(start, end);
            println!("{} ({})", shift_type.label(), shift_type.color());
            Ok(())
        }
    }
}

fn directory(config: &SchedulerConfig) -> Result<EmployeeDirectory<RealRecordStore, FileCacheStore>> {
    Ok(EmployeeDirectory::new(
        Arc::new(RealRecordStore::new(config)?),
        Arc::new(FileCacheStore::new(&config.cache_path)),
        config.employee_cache_ttl,
    ))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

async fn solve(config: &SchedulerConfig, employees_file: Option<&Path>, shifts_file: Option<&Path>) -> Result<()> {
    logging::log_startup("schedule generation");

    let employees: Vec<Employee> = match employees_file {
        Some(path) => read_json::<Vec<EmployeeRecord>>(path)
            .await?
            .into_iter()
            .map(Employee::from_record)
            .collect(),
        None => directory(config)?.employees().await?,
    };
    let shifts: Vec<Shift> = match shifts_file {
        Some(path) => read_json(path).await?,
        None => RealRecordStore::new(config)?.list_shifts().await?,
    };
    logging::log_progress(
        "Selection",
        &format!("{} employees, {} shifts", employees.len(), shifts.len()),
    );

    let scheduler = Scheduler::new(Arc::new(RealSolverClient::new(config)?), config.poll);

    let shutdown = scheduler.shutdown_token().clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("🛑 Interrupt received, cancelling");
            shutdown.cancel();
        }
    });

    match scheduler.generate_schedule(&employees, &shifts).await {
        Ok(report) => {
            if report.is_infeasible() {
                println!("No feasible schedule found for job {}.", report.job_id);
            } else {
                logging::log_success(&format!(
                    "Job {} finished after {} checks: {} entries",
                    report.job_id,
                    report.attempts,
                    report.merged.total()
                ));
            }
            print_calendar(&*scheduler.calendar().read().await);
            Ok(())
        }
        Err(e) if !e.is_user_visible() => Ok(()),
        Err(e) => {
            logging::log_error("Schedule generation", &e);
            if let SchedulerError::Timeout { .. } = e {
                eprintln!("The solver may still be working on this job.");
            }
            Err(e.into())
        }
    }
}

fn print_calendar(calendar: &CalendarState) {
    let mut days: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for item in calendar.items() {
        days.entry(item.date).or_default().push(item);
    }
    for (date, mut items) in days {
        items.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        println!("{}", date.format("%A %Y-%m-%d"));
        for item in items {
            println!(
                "  {}-{}  {:<24} {}",
                item.start_time,
                item.end_time,
                item.title,
                item.employees.join(", ")
            );
        }
    }
}

async fn list_employees(config: &SchedulerConfig, refresh: bool) -> Result<()> {
    let directory = directory(config)?;
    let employees = if refresh {
        directory.refresh().await?
    } else {
        directory.employees().await?
    };
    for employee in employees {
        println!(
            "{:>6}  {:<24} {:>3}%  {}",
            employee.id,
            employee.name,
            employee.work_percentage,
            employee.skills.join(", ")
        );
    }
    Ok(())
}

async fn list_shifts(config: &SchedulerConfig) -> Result<()> {
    let mut shifts = RealRecordStore::new(config)?.list_shifts().await?;
    shifts.sort_by_key(|shift| shift.start);
    for shift in shifts {
        println!(
            "{:>6}  {} {}-{}  {:<24} {:<12} {}",
            shift.id,
            shift.date(),
            shift.start.format("%H:%M"),
            shift.end.format("%H:%M"),
            shift.shift_type().label(),
            shift.status.label(),
            shift.location
        );
    }
    Ok(())
}
