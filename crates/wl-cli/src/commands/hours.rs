//! Hours command: total hours worked per employee.
//!
//! This module implements `wl hours`, listing every employee with the hours
//! computed from their work log, in human-readable or JSON form.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use wl_db::{Database, EmployeeWithHours};

/// Formats fractional hours as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Ym" if < 1 hour.
/// Negative or non-finite values are treated as 0m.
#[allow(clippy::cast_possible_truncation)]
pub fn format_hours(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0m".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    let whole_hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if whole_hours >= 1 {
        format!("{whole_hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Runs the hours command.
pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let report = db.employees_with_hours()?;
    tracing::debug!(employees = report.len(), "computed hours");

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_hours_report(&report))?;
    }
    Ok(())
}

/// Formats the human-readable hours report.
pub fn format_hours_report(report: &[EmployeeWithHours]) -> String {
    let mut output = String::new();
    writeln!(output, "HOURS WORKED").unwrap();
    writeln!(output, "────────────").unwrap();

    if report.is_empty() {
        writeln!(output, "No employees recorded.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'wl employee add' to create one.").unwrap();
        return output;
    }

    writeln!(output, "{:<4}  {:<20}  {:<8}  DECIMAL", "ID", "NAME", "HOURS").unwrap();
    for row in report {
        writeln!(
            output,
            "{:<4}  {:<20}  {:<8}  {:.2}",
            row.employee.id,
            row.employee.full_name(),
            format_hours(row.total_hours_worked),
            row.total_hours_worked
        )
        .unwrap();
    }

    let total: f64 = report.iter().map(|row| row.total_hours_worked).sum();
    writeln!(output).unwrap();
    writeln!(output, "Total: {} ({total:.2})", format_hours(total)).unwrap();
    output
}
