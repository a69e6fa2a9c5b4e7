//! Employee commands: add, list, show, edit and delete.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Args;
use wl_db::{Database, Employee, EmployeeUpdate, NewEmployee};

use super::util::require_non_empty;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Employee's first name.
    #[arg(long)]
    pub first_name: String,
    /// Employee's last name.
    #[arg(long)]
    pub last_name: String,
    /// Contact email.
    #[arg(long)]
    pub email: String,
    /// Job position or title.
    #[arg(long)]
    pub job_position: String,
    /// First working day (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub onboarding_day: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Employee ID to edit.
    pub id: i64,
    /// New first name.
    #[arg(long)]
    pub first_name: Option<String>,
    /// New last name.
    #[arg(long)]
    pub last_name: Option<String>,
    /// New contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// New job position.
    #[arg(long)]
    pub job_position: Option<String>,
}

pub fn add<W: Write>(writer: &mut W, db: &mut Database, args: &AddArgs) -> Result<()> {
    let employee = NewEmployee {
        first_name: require_non_empty(&args.first_name, "first name")?,
        last_name: require_non_empty(&args.last_name, "last name")?,
        email: require_non_empty(&args.email, "email")?,
        job_position: require_non_empty(&args.job_position, "job position")?,
        onboarding_day: args
            .onboarding_day
            .unwrap_or_else(|| Local::now().date_naive()),
    };

    let id = db
        .insert_employee(&employee)
        .context("failed to add employee")?;
    writeln!(
        writer,
        "Added employee {id}: {} {}",
        employee.first_name, employee.last_name
    )?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let employees = db.list_employees()?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&employees)?)?;
    } else {
        write!(writer, "{}", format_employee_table(&employees))?;
    }
    Ok(())
}

pub fn show<W: Write>(writer: &mut W, db: &Database, id: i64) -> Result<()> {
    let Some(employee) = db.get_employee(id)? else {
        bail!("employee not found: {id}");
    };
    let hours = wl_core::calculate_total_hours_worked(&db.work_log_entries(id)?);
    write!(writer, "{}", format_employee_details(&employee, hours))?;
    Ok(())
}

pub fn edit<W: Write>(writer: &mut W, db: &mut Database, args: &EditArgs) -> Result<()> {
    let Some(existing) = db.get_employee(args.id)? else {
        bail!("employee not found: {}", args.id);
    };

    let pick = |new: Option<&String>, old: &str, field: &'static str| -> Result<String> {
        new.map_or_else(|| Ok(old.to_string()), |v| Ok(require_non_empty(v, field)?))
    };
    let update = EmployeeUpdate {
        first_name: pick(args.first_name.as_ref(), &existing.first_name, "first name")?,
        last_name: pick(args.last_name.as_ref(), &existing.last_name, "last name")?,
        email: pick(args.email.as_ref(), &existing.email, "email")?,
        job_position: pick(args.job_position.as_ref(), &existing.job_position, "job position")?,
    };

    if !db.update_employee(args.id, &update)? {
        bail!("employee not found: {}", args.id);
    }
    writeln!(writer, "Updated employee {}", args.id)?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: i64) -> Result<()> {
    if !db.delete_employee(id)? {
        bail!("employee not found: {id}");
    }
    writeln!(writer, "Deleted employee {id} and their work logs")?;
    Ok(())
}

/// Formats employees as an aligned table.
pub fn format_employee_table(employees: &[Employee]) -> String {
    let mut output = String::new();
    writeln!(output, "EMPLOYEES").unwrap();
    writeln!(output, "─────────").unwrap();

    if employees.is_empty() {
        writeln!(output, "No employees recorded.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'wl employee add' to create one.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<4}  {:<20}  {:<12}  {:<10}  EMAIL",
        "ID", "NAME", "POSITION", "ONBOARDED"
    )
    .unwrap();
    for employee in employees {
        writeln!(
            output,
            "{:<4}  {:<20}  {:<12}  {:<10}  {}",
            employee.id,
            employee.full_name(),
            employee.job_position,
            employee.onboarding_day.format("%Y-%m-%d").to_string(),
            employee.email
        )
        .unwrap();
    }
    output
}

/// Formats a single employee with their hours.
fn format_employee_details(employee: &Employee, hours: f64) -> String {
    let mut output = String::new();
    writeln!(output, "Employee {}", employee.id).unwrap();
    writeln!(output, "Name:        {}", employee.full_name()).unwrap();
    writeln!(output, "Email:       {}", employee.email).unwrap();
    writeln!(output, "Position:    {}", employee.job_position).unwrap();
    writeln!(
        output,
        "Onboarded:   {}",
        employee.onboarding_day.format("%Y-%m-%d")
    )
    .unwrap();
    writeln!(
        output,
        "Hours:       {} ({hours:.2})",
        super::hours::format_hours(hours)
    )
    .unwrap();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn employee(id: i64, first: &str, last: &str, position: &str) -> Employee {
        Employee {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            job_position: position.to_string(),
            onboarding_day: NaiveDate::from_ymd_opt(2024, 8, 9).unwrap(),
        }
    }

    fn add_args(first: &str) -> AddArgs {
        AddArgs {
            first_name: first.to_string(),
            last_name: "Novak".to_string(),
            email: "jana@example.com".to_string(),
            job_position: "Developer".to_string(),
            onboarding_day: NaiveDate::from_ymd_opt(2024, 8, 9),
        }
    }

    #[test]
    fn test_employee_table_empty() {
        assert_snapshot!(format_employee_table(&[]), @r"
EMPLOYEES
─────────
No employees recorded.

Hint: Run 'wl employee add' to create one.
");
    }

    #[test]
    fn test_employee_table_rows() {
        let employees = vec![
            employee(1, "Jana", "Novak", "Developer"),
            employee(12, "Petr", "Svoboda", "QA Engineer"),
        ];
        assert_snapshot!(format_employee_table(&employees), @r"
EMPLOYEES
─────────
ID    NAME                  POSITION      ONBOARDED   EMAIL
1     Jana Novak            Developer     2024-08-09  jana@example.com
12    Petr Svoboda          QA Engineer   2024-08-09  petr@example.com
");
    }

    #[test]
    fn test_employee_details() {
        let output = format_employee_details(&employee(3, "Jana", "Novak", "Developer"), 7.5);
        assert_snapshot!(output, @r"
Employee 3
Name:        Jana Novak
Email:       jana@example.com
Position:    Developer
Onboarded:   2024-08-09
Hours:       7h 30m (7.50)
");
    }

    #[test]
    fn add_trims_and_stores_employee() {
        let mut db = Database::open_in_memory().unwrap();
        let mut args = add_args("  Jana ");
        args.email = " jana@example.com ".to_string();
        let mut output = Vec::new();

        add(&mut output, &mut db, &args).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Added employee 1: Jana Novak\n");
        let stored = db.get_employee(1).unwrap().unwrap();
        assert_eq!(stored.first_name, "Jana");
        assert_eq!(stored.email, "jana@example.com");
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut db = Database::open_in_memory().unwrap();
        let err = add(&mut Vec::<u8>::new(), &mut db, &add_args("   ")).unwrap_err();
        assert_eq!(err.to_string(), "first name cannot be empty");
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let mut db = Database::open_in_memory().unwrap();
        add(&mut Vec::<u8>::new(), &mut db, &add_args("Jana")).unwrap();

        let args = EditArgs {
            id: 1,
            first_name: None,
            last_name: Some("Horvath".to_string()),
            email: None,
            job_position: None,
        };
        edit(&mut Vec::<u8>::new(), &mut db, &args).unwrap();

        let stored = db.get_employee(1).unwrap().unwrap();
        assert_eq!(stored.full_name(), "Jana Horvath");
        assert_eq!(stored.job_position, "Developer");
    }

    #[test]
    fn edit_rejects_blank_email() {
        let mut db = Database::open_in_memory().unwrap();
        add(&mut Vec::<u8>::new(), &mut db, &add_args("Jana")).unwrap();

        let args = EditArgs {
            id: 1,
            first_name: None,
            last_name: None,
            email: Some("  ".to_string()),
            job_position: None,
        };
        let err = edit(&mut Vec::<u8>::new(), &mut db, &args).unwrap_err();

        assert_eq!(err.to_string(), "email cannot be empty");
        assert_eq!(db.get_employee(1).unwrap().unwrap().email, "jana@example.com");
    }

    #[test]
    fn edit_and_delete_unknown_employee_fail() {
        let mut db = Database::open_in_memory().unwrap();
        let args = EditArgs {
            id: 9,
            first_name: None,
            last_name: None,
            email: None,
            job_position: None,
        };
        assert_eq!(
            edit(&mut Vec::<u8>::new(), &mut db, &args).unwrap_err().to_string(),
            "employee not found: 9"
        );
        assert_eq!(
            delete(&mut Vec::<u8>::new(), &mut db, 9).unwrap_err().to_string(),
            "employee not found: 9"
        );
    }
}
