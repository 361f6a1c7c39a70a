//! Command-line entry point for the staff directory.
//!
//! # Responsibility
//! - Open the configured SQLite file and run one staff use-case per call.
//! - Print results as JSON on stdout.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::{json, Value};
use staffdb_core::db::open_db;
use staffdb_core::{
    DepartmentRef, DepartmentRepository, EmployeeRef, EmployeeRepository,
    SqliteDepartmentRepository, SqliteEmployeeRepository, StaffService,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "staffdb", version, about = "Departments and employees in SQLite")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "STAFFDB_DB", default_value = "company.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "STAFFDB_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "STAFFDB_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create both tables if missing.
    Init,
    /// Drop and recreate both tables.
    Reset,
    /// Insert a small sample directory.
    Seed,
    /// Print every department and employee.
    List,
    /// Print one department and its employees.
    Roster {
        /// Exact department name.
        name: String,
    },
    /// Print core health and version.
    Ping,
}

const SAMPLE_DIRECTORY: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "Payroll",
        "Building A, 5th Floor",
        &[("Amir", "Accountant"), ("Bola", "Manager")],
    ),
    (
        "Human Resources",
        "Building C, East Wing",
        &[("Charlie", "Manager"), ("Dani", "Benefits Specialist")],
    ),
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| staffdb_core::default_log_level());
        staffdb_core::init_logging(level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let output = match cli.command {
        Command::Ping => ping_json(),
        command => run_with_db(&cli.db, command)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_with_db(path: &Path, command: Command) -> Result<Value> {
    let conn = open_db(path)
        .with_context(|| format!("failed to open database `{}`", path.display()))?;
    let mut staff = StaffService::new(
        SqliteDepartmentRepository::new(&conn),
        SqliteEmployeeRepository::new(&conn),
    );

    let output = match command {
        Command::Init => {
            staff.ensure_schema()?;
            json!({ "status": "ok" })
        }
        Command::Reset => {
            staff.drop_schema()?;
            staff.ensure_schema()?;
            json!({ "status": "ok" })
        }
        Command::Seed => {
            staff.ensure_schema()?;
            let hired = seed(&mut staff)?;
            info!("event=cli_seed module=cli status=ok employees={hired}");
            json!({ "status": "ok", "employees": hired })
        }
        Command::List => {
            staff.ensure_schema()?;
            let (departments, employees) = staff.directory()?;
            json!({
                "departments": departments
                    .iter()
                    .map(department_json)
                    .collect::<serde_json::Result<Vec<_>>>()?,
                "employees": employees
                    .iter()
                    .map(employee_json)
                    .collect::<serde_json::Result<Vec<_>>>()?,
            })
        }
        Command::Roster { name } => {
            staff.ensure_schema()?;
            let roster = staff
                .roster_by_name(&name)?
                .ok_or_else(|| anyhow!("no department named `{name}`"))?;
            json!({
                "department": department_json(&roster.department)?,
                "employees": roster
                    .employees
                    .iter()
                    .map(employee_json)
                    .collect::<serde_json::Result<Vec<_>>>()?,
            })
        }
        Command::Ping => ping_json(),
    };

    Ok(output)
}

fn seed<D, E>(staff: &mut StaffService<D, E>) -> Result<usize>
where
    D: DepartmentRepository,
    E: EmployeeRepository,
{
    let mut hired = 0;
    for (name, location, employees) in SAMPLE_DIRECTORY {
        let department = staff.open_department(name, location)?;
        let department_id = department
            .borrow()
            .id()
            .context("saved department has no id")?;
        for (employee, job_title) in employees.iter() {
            staff.hire(department_id, employee, job_title)?;
            hired += 1;
        }
    }
    Ok(hired)
}

fn ping_json() -> Value {
    json!({
        "ping": staffdb_core::ping(),
        "version": staffdb_core::core_version(),
    })
}

fn department_json(department: &DepartmentRef) -> serde_json::Result<Value> {
    serde_json::to_value(&*department.borrow())
}

fn employee_json(employee: &EmployeeRef) -> serde_json::Result<Value> {
    serde_json::to_value(&*employee.borrow())
}
