//! Storage layer for the work logger.
//!
//! Provides persistence for employees and their work logs using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. Hour totals are computed
//! after the rows are read, so the parallel part never touches the connection.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Work log timestamps are stored as TEXT in RFC 3339 format with millisecond
//! precision (e.g., `2024-01-15T10:30:00.000Z`), always UTC, so lexicographic
//! ordering matches chronological ordering. Onboarding days are stored as
//! `YYYY-MM-DD`.
//!
//! ## Status Storage
//!
//! The `status` column holds the integer code of [`WorkLogStatus`]
//! (`0` = started, `1` = finished).

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use thiserror::Error;
use wl_core::{StatusEvent, ValidationError, WorkLogEntry, WorkLogStatus, hours_by_employee};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp or date.
    #[error("invalid timestamp for {record}: {value}")]
    TimestampParse {
        record: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored status code is outside the known enumeration.
    #[error("invalid status for work log {log_id}")]
    InvalidStatus {
        log_id: i64,
        #[source]
        source: ValidationError,
    },
    /// The referenced employee does not exist.
    #[error("employee not found: {0}")]
    EmployeeNotFound(i64),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Fields needed to create an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_position: String,
    pub onboarding_day: NaiveDate,
}

/// Editable employee fields. The onboarding day is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_position: String,
}

/// An employee stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_position: String,
    pub onboarding_day: NaiveDate,
}

impl Employee {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An employee together with the hours computed from their work logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeWithHours {
    #[serde(flatten)]
    pub employee: Employee,
    pub total_hours_worked: f64,
}

/// Fields needed to record a work log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkLog {
    pub employee_id: i64,
    pub created: DateTime<Utc>,
    pub description: String,
    pub status: WorkLogStatus,
}

/// A work log entry stored in the database, joined with its employee's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkLog {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub created: DateTime<Utc>,
    pub description: String,
    pub status: WorkLogStatus,
}

impl StatusEvent for WorkLog {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created
    }

    fn status(&self) -> WorkLogStatus {
        self.status
    }
}

/// Raw employee columns before date parsing.
struct EmployeeRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    job_position: String,
    onboarding_day: String,
}

impl EmployeeRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            job_position: row.get(4)?,
            onboarding_day: row.get(5)?,
        })
    }

    fn into_employee(self) -> Result<Employee, DbError> {
        let onboarding_day =
            NaiveDate::parse_from_str(&self.onboarding_day, DATE_FORMAT).map_err(|source| {
                DbError::TimestampParse {
                    record: format!("employee {}", self.id),
                    value: self.onboarding_day.clone(),
                    source,
                }
            })?;
        Ok(Employee {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            job_position: self.job_position,
            onboarding_day,
        })
    }
}

/// Raw work log columns before timestamp and status parsing.
struct WorkLogRow {
    id: i64,
    employee_id: i64,
    employee_name: String,
    created: String,
    description: String,
    status: i64,
}

impl WorkLogRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            employee_id: row.get(1)?,
            employee_name: row.get(2)?,
            created: row.get(3)?,
            description: row.get(4)?,
            status: row.get(5)?,
        })
    }

    fn into_work_log(self) -> Result<WorkLog, DbError> {
        let created = parse_timestamp(&self.created, self.id)?;
        let status = WorkLogStatus::from_code(self.status).map_err(|source| {
            DbError::InvalidStatus {
                log_id: self.id,
                source,
            }
        })?;
        Ok(WorkLog {
            id: self.id,
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            created,
            description: self.description,
            status,
        })
    }
}

const WORK_LOG_COLUMNS: &str = "
    SELECT w.id, w.employee_id, e.first_name || ' ' || e.last_name, w.created, w.description, w.status
    FROM work_logs w
    JOIN employees e ON e.id = w.employee_id
";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                job_position TEXT NOT NULL,
                onboarding_day TEXT NOT NULL
            );

            -- Work logs: one Started/Finished marker per row
            -- created: RFC 3339 UTC (e.g., '2024-01-15T10:30:00.000Z')
            -- status: 0 = started, 1 = finished
            CREATE TABLE IF NOT EXISTS work_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                employee_id INTEGER NOT NULL,
                created TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status INTEGER NOT NULL,
                FOREIGN KEY (employee_id) REFERENCES employees(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_work_logs_employee ON work_logs(employee_id);
            CREATE INDEX IF NOT EXISTS idx_work_logs_created ON work_logs(created);
            ",
        )?;
        Ok(())
    }

    // ========== Employees ==========

    /// Inserts an employee and returns its new ID.
    pub fn insert_employee(&mut self, employee: &NewEmployee) -> Result<i64, DbError> {
        self.conn.execute(
            "
            INSERT INTO employees (first_name, last_name, email, job_position, onboarding_day)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                employee.first_name,
                employee.last_name,
                employee.email,
                employee.job_position,
                format_date(employee.onboarding_day),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "inserted employee");
        Ok(id)
    }

    /// Fetches an employee by ID.
    pub fn get_employee(&self, id: i64) -> Result<Option<Employee>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT id, first_name, last_name, email, job_position, onboarding_day
                FROM employees
                WHERE id = ?
                ",
                [id],
                EmployeeRow::from_row,
            )
            .optional()?;
        row.map(EmployeeRow::into_employee).transpose()
    }

    /// Lists employees ordered by first name then ID.
    pub fn list_employees(&self) -> Result<Vec<Employee>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, first_name, last_name, email, job_position, onboarding_day
            FROM employees
            ORDER BY first_name ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], EmployeeRow::from_row)?;
        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?.into_employee()?);
        }
        Ok(employees)
    }

    /// Updates an employee's editable fields.
    ///
    /// Returns `false` if no employee has the given ID.
    pub fn update_employee(&mut self, id: i64, update: &EmployeeUpdate) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "
            UPDATE employees
            SET first_name = ?, last_name = ?, email = ?, job_position = ?
            WHERE id = ?
            ",
            params![
                update.first_name,
                update.last_name,
                update.email,
                update.job_position,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Deletes an employee and, by cascade, their work logs.
    ///
    /// Returns `false` if no employee has the given ID.
    pub fn delete_employee(&mut self, id: i64) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    /// Returns true if an employee with the given ID exists.
    pub fn employee_exists(&self, id: i64) -> Result<bool, DbError> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM employees WHERE id = ?")?
            .exists([id])?;
        Ok(exists)
    }

    // ========== Work Logs ==========

    /// Inserts a work log entry and returns its new ID.
    pub fn insert_work_log(&mut self, log: &NewWorkLog) -> Result<i64, DbError> {
        if !self.employee_exists(log.employee_id)? {
            return Err(DbError::EmployeeNotFound(log.employee_id));
        }
        self.conn.execute(
            "
            INSERT INTO work_logs (employee_id, created, description, status)
            VALUES (?, ?, ?, ?)
            ",
            params![
                log.employee_id,
                format_timestamp(log.created),
                log.description,
                log.status.code(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, employee_id = log.employee_id, status = %log.status, "inserted work log");
        Ok(id)
    }

    /// Fetches a work log entry by ID.
    pub fn get_work_log(&self, id: i64) -> Result<Option<WorkLog>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("{WORK_LOG_COLUMNS} WHERE w.id = ?"),
                [id],
                WorkLogRow::from_row,
            )
            .optional()?;
        row.map(WorkLogRow::into_work_log).transpose()
    }

    /// Lists work log entries ordered by timestamp then ID.
    ///
    /// When `employee_id` is given, only that employee's entries are returned.
    pub fn list_work_logs(&self, employee_id: Option<i64>) -> Result<Vec<WorkLog>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORK_LOG_COLUMNS}
            WHERE (?1 IS NULL OR w.employee_id = ?1)
            ORDER BY w.created ASC, w.id ASC"
        ))?;
        let rows = stmt.query_map([employee_id], WorkLogRow::from_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?.into_work_log()?);
        }
        Ok(logs)
    }

    /// Replaces a work log entry's fields.
    ///
    /// Returns `false` if no work log has the given ID.
    pub fn update_work_log(&mut self, id: i64, log: &NewWorkLog) -> Result<bool, DbError> {
        if !self.employee_exists(log.employee_id)? {
            return Err(DbError::EmployeeNotFound(log.employee_id));
        }
        let changed = self.conn.execute(
            "
            UPDATE work_logs
            SET employee_id = ?, created = ?, description = ?, status = ?
            WHERE id = ?
            ",
            params![
                log.employee_id,
                format_timestamp(log.created),
                log.description,
                log.status.code(),
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Deletes a work log entry.
    ///
    /// Returns `false` if no work log has the given ID.
    pub fn delete_work_log(&mut self, id: i64) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM work_logs WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    /// Returns true if a work log with the given ID exists.
    pub fn work_log_exists(&self, id: i64) -> Result<bool, DbError> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM work_logs WHERE id = ?")?
            .exists([id])?;
        Ok(exists)
    }

    // ========== Hours ==========

    /// Returns one employee's work log reduced to the fields the engine reads.
    pub fn work_log_entries(&self, employee_id: i64) -> Result<Vec<WorkLogEntry>, DbError> {
        Ok(self
            .list_work_logs(Some(employee_id))?
            .iter()
            .map(|log| WorkLogEntry::new(log.created, log.status))
            .collect())
    }

    /// Lists every employee with their total hours worked.
    ///
    /// Employees without work logs report `0.0`.
    pub fn employees_with_hours(&self) -> Result<Vec<EmployeeWithHours>, DbError> {
        let employees = self.list_employees()?;

        let mut logs_by_employee: HashMap<i64, Vec<WorkLog>> = HashMap::new();
        for log in self.list_work_logs(None)? {
            logs_by_employee.entry(log.employee_id).or_default().push(log);
        }

        let grouped: Vec<(i64, Vec<WorkLog>)> = employees
            .iter()
            .map(|employee| {
                let logs = logs_by_employee.remove(&employee.id).unwrap_or_default();
                (employee.id, logs)
            })
            .collect();
        let hours = hours_by_employee(&grouped);

        Ok(employees
            .into_iter()
            .zip(hours)
            .map(|(employee, hours)| EmployeeWithHours {
                employee,
                total_hours_worked: hours.total_hours_worked,
            })
            .collect())
    }
}

fn parse_timestamp(timestamp: &str, log_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record: format!("work log {log_id}"),
            value: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
