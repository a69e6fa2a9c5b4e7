//! Core domain logic for the work logger.
//!
//! This crate contains the fundamental types and logic for:
//! - Work log status: the `Started`/`Finished` marker attached to each entry
//! - Pairing: matching `Started` and `Finished` entries into work intervals
//! - Merging: collapsing overlapping or touching intervals into a disjoint set
//! - Hours: summing the disjoint set into fractional hours worked
//!
//! Everything here is a pure computation over in-memory slices. Nothing is
//! persisted and no state is shared between calls, so the functions can be
//! invoked from any number of threads on independent inputs.

mod hours;
mod interval;
mod pairing;
pub mod status;

pub use hours::{EmployeeHours, calculate_total_hours_worked, hours_by_employee};
pub use interval::{Interval, merge_intervals, total_hours};
pub use pairing::pair_intervals;
pub use status::{StatusEvent, ValidationError, WorkLogEntry, WorkLogStatus};
