//! Seed command: fills an empty database with demo employees and work logs.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use wl_core::WorkLogStatus;
use wl_db::{Database, NewEmployee, NewWorkLog};

struct DemoEmployee {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    job_position: &'static str,
    onboarding_month: u32,
    /// `(hour, description, status)` on the demo day.
    logs: &'static [(u32, &'static str, WorkLogStatus)],
}

const DEMO_YEAR: i32 = 2024;
const DEMO_DAY: (u32, u32) = (8, 1);

const DEMO_EMPLOYEES: &[DemoEmployee] = &[
    DemoEmployee {
        first_name: "Jan",
        last_name: "Novak",
        email: "jan.novak@example.com",
        job_position: "Developer",
        onboarding_month: 1,
        logs: &[
            (9, "Started working on feature X", WorkLogStatus::Started),
            (13, "Completed feature X", WorkLogStatus::Finished),
            (14, "Started bug fixing", WorkLogStatus::Started),
            (18, "Finished bug fixing", WorkLogStatus::Finished),
        ],
    },
    DemoEmployee {
        first_name: "Petra",
        last_name: "Sukova",
        email: "petra.sukova@example.com",
        job_position: "Manager",
        onboarding_month: 2,
        logs: &[
            (10, "Started meeting with clients", WorkLogStatus::Started),
            (12, "Finished meeting with clients", WorkLogStatus::Finished),
            (13, "Started project management", WorkLogStatus::Started),
            (17, "Finished project management", WorkLogStatus::Finished),
        ],
    },
    DemoEmployee {
        first_name: "Milan",
        last_name: "Kovac",
        email: "milan.kovac@example.com",
        job_position: "Analyst",
        onboarding_month: 4,
        logs: &[
            (11, "Started data analysis", WorkLogStatus::Started),
            (16, "Finished data analysis", WorkLogStatus::Finished),
            (17, "Started data reporting", WorkLogStatus::Started),
            (19, "Finished data reporting", WorkLogStatus::Finished),
        ],
    },
];

fn demo_time(hour: u32) -> Result<DateTime<Utc>> {
    let (month, day) = DEMO_DAY;
    NaiveDate::from_ymd_opt(DEMO_YEAR, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .context("invalid demo timestamp")
}

/// Inserts the demo data. Refuses to touch a database that already has employees.
pub fn run<W: Write>(writer: &mut W, db: &mut Database) -> Result<()> {
    if !db.list_employees()?.is_empty() {
        bail!("database already has employees; seed only fills an empty database");
    }

    let mut log_count = 0;
    for demo in DEMO_EMPLOYEES {
        let employee_id = db.insert_employee(&NewEmployee {
            first_name: demo.first_name.to_string(),
            last_name: demo.last_name.to_string(),
            email: demo.email.to_string(),
            job_position: demo.job_position.to_string(),
            onboarding_day: NaiveDate::from_ymd_opt(DEMO_YEAR, demo.onboarding_month, 1)
                .context("invalid onboarding day")?,
        })?;

        for &(hour, description, status) in demo.logs {
            db.insert_work_log(&NewWorkLog {
                employee_id,
                created: demo_time(hour)?,
                description: description.to_string(),
                status,
            })?;
            log_count += 1;
        }
    }

    tracing::debug!(employees = DEMO_EMPLOYEES.len(), logs = log_count, "seeded demo data");
    writeln!(
        writer,
        "Seeded {} employees and {log_count} work logs",
        DEMO_EMPLOYEES.len()
    )?;
    Ok(())
}
