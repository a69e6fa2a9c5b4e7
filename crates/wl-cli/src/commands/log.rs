//! Work log commands: record, list, show, edit and delete entries.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone, Utc};
use clap::Args;
use wl_core::WorkLogStatus;
use wl_db::{Database, DbError, NewWorkLog, WorkLog};

use super::util::parse_datetime;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Employee ID the entry belongs to.
    #[arg(long)]
    pub employee: i64,
    /// Whether work started or finished.
    #[arg(long)]
    pub status: WorkLogStatus,
    /// When it happened: ISO 8601, local "YYYY-MM-DD HH:MM", or "N hours ago". Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
    /// Free-form note.
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Work log ID to edit.
    pub id: i64,
    /// Move the entry to another employee.
    #[arg(long)]
    pub employee: Option<i64>,
    /// New status.
    #[arg(long)]
    pub status: Option<WorkLogStatus>,
    /// New timestamp.
    #[arg(long)]
    pub at: Option<String>,
    /// New note.
    #[arg(long)]
    pub description: Option<String>,
}

fn resolve_time(at: Option<&str>) -> Result<DateTime<Utc>> {
    at.map_or_else(|| Ok(Utc::now()), parse_datetime)
}

fn employee_not_found(err: DbError) -> anyhow::Error {
    match err {
        DbError::EmployeeNotFound(id) => anyhow::anyhow!("employee not found: {id}"),
        other => anyhow::Error::new(other).context("failed to save work log"),
    }
}

pub fn add<W: Write>(writer: &mut W, db: &mut Database, args: &AddArgs) -> Result<()> {
    let log = NewWorkLog {
        employee_id: args.employee,
        created: resolve_time(args.at.as_deref())?,
        description: args.description.trim().to_string(),
        status: args.status,
    };

    let id = db.insert_work_log(&log).map_err(employee_not_found)?;
    writeln!(
        writer,
        "Recorded work log {id}: employee {} {} at {}",
        log.employee_id,
        log.status,
        log.created.to_rfc3339()
    )?;
    Ok(())
}

pub fn list<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &Database,
    employee: Option<i64>,
    json: bool,
    tz: &Tz,
) -> Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    if let Some(id) = employee {
        if !db.employee_exists(id)? {
            bail!("employee not found: {id}");
        }
    }
    let logs = db.list_work_logs(employee)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&logs)?)?;
    } else {
        write!(writer, "{}", format_work_log_table(&logs, tz))?;
    }
    Ok(())
}

pub fn show<W: Write, Tz: TimeZone>(writer: &mut W, db: &Database, id: i64, tz: &Tz) -> Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    let Some(log) = db.get_work_log(id)? else {
        bail!("work log not found: {id}");
    };
    write!(writer, "{}", format_work_log_details(&log, tz))?;
    Ok(())
}

pub fn edit<W: Write>(writer: &mut W, db: &mut Database, args: &EditArgs) -> Result<()> {
    let Some(existing) = db.get_work_log(args.id)? else {
        bail!("work log not found: {}", args.id);
    };

    let created = match args.at.as_deref() {
        Some(at) => parse_datetime(at).context("invalid --at")?,
        None => existing.created,
    };
    let log = NewWorkLog {
        employee_id: args.employee.unwrap_or(existing.employee_id),
        created,
        description: args
            .description
            .as_deref()
            .map_or(existing.description, |d| d.trim().to_string()),
        status: args.status.unwrap_or(existing.status),
    };

    if !db.update_work_log(args.id, &log).map_err(employee_not_found)? {
        bail!("work log not found: {}", args.id);
    }
    writeln!(writer, "Updated work log {}", args.id)?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: i64) -> Result<()> {
    if !db.delete_work_log(id)? {
        bail!("work log not found: {id}");
    }
    writeln!(writer, "Deleted work log {id}")?;
    Ok(())
}

fn format_time<Tz: TimeZone>(created: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created
        .with_timezone(tz)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Formats work log entries as an aligned table, times shown in `tz`.
pub fn format_work_log_table<Tz: TimeZone>(logs: &[WorkLog], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut output = String::new();
    writeln!(output, "WORK LOGS").unwrap();
    writeln!(output, "─────────").unwrap();

    if logs.is_empty() {
        writeln!(output, "No work logs recorded.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'wl log add --employee <id> --status started' to record one."
        )
        .unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<4}  {:<20}  {:<16}  {:<8}  DESCRIPTION",
        "ID", "EMPLOYEE", "TIME", "STATUS"
    )
    .unwrap();
    for log in logs {
        let line = format!(
            "{:<4}  {:<20}  {:<16}  {:<8}  {}",
            log.id,
            log.employee_name,
            format_time(log.created, tz),
            log.status.as_str(),
            log.description
        );
        writeln!(output, "{}", line.trim_end()).unwrap();
    }
    output
}

fn format_work_log_details<Tz: TimeZone>(log: &WorkLog, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut output = String::new();
    writeln!(output, "Work log {}", log.id).unwrap();
    writeln!(
        output,
        "Employee:    {} ({})",
        log.employee_name, log.employee_id
    )
    .unwrap();
    writeln!(output, "Time:        {}", format_time(log.created, tz)).unwrap();
    writeln!(output, "Status:      {}", log.status).unwrap();
    if !log.description.is_empty() {
        writeln!(output, "Description: {}", log.description).unwrap();
    }
    output
}
