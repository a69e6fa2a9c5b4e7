//! Work log status and the minimal event shape consumed by pairing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Status text did not name a known status.
    #[error("invalid work log status: {value}")]
    InvalidStatus { value: String },

    /// Stored status code is outside the two-valued enumeration.
    #[error("invalid work log status code: {code}")]
    InvalidStatusCode { code: i64 },

    /// Interval end precedes its start.
    #[error("interval ends at {end} before it starts at {start}")]
    InvertedInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Whether a work log entry opens or closes a work session.
///
/// The integer codes are the persisted representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkLogStatus {
    /// Work began at the entry's timestamp.
    Started,
    /// Work ended at the entry's timestamp.
    Finished,
}

impl WorkLogStatus {
    /// String representation for display and CLI parsing.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Finished => "finished",
        }
    }

    /// Integer code for database storage.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Started => 0,
            Self::Finished => 1,
        }
    }

    /// Parses a stored integer code.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(Self::Started),
            1 => Ok(Self::Finished),
            _ => Err(ValidationError::InvalidStatusCode { code }),
        }
    }
}

impl fmt::Display for WorkLogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkLogStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "started" | "start" => Ok(Self::Started),
            "finished" | "finish" => Ok(Self::Finished),
            _ => Err(ValidationError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// An event suitable for interval pairing.
///
/// This trait allows pairing to work with different event representations
/// (e.g., `WorkLog` rows from wl-db, or `WorkLogEntry`).
pub trait StatusEvent {
    /// Returns when the event was recorded.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Returns whether the event starts or finishes work.
    fn status(&self) -> WorkLogStatus;
}

/// A timestamped status marker: the only fields the engine looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    /// When the entry was recorded.
    pub created: DateTime<Utc>,
    /// Whether work started or finished at `created`.
    pub status: WorkLogStatus,
}

impl WorkLogEntry {
    #[must_use]
    pub const fn new(created: DateTime<Utc>, status: WorkLogStatus) -> Self {
        Self { created, status }
    }

    #[must_use]
    pub const fn started(created: DateTime<Utc>) -> Self {
        Self::new(created, WorkLogStatus::Started)
    }

    #[must_use]
    pub const fn finished(created: DateTime<Utc>) -> Self {
        Self::new(created, WorkLogStatus::Finished)
    }
}

impl StatusEvent for WorkLogEntry {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created
    }

    fn status(&self) -> WorkLogStatus {
        self.status
    }
}
