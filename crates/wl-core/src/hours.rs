//! Total hours worked: pairing, merging and summation composed.

use rayon::prelude::*;
use serde::Serialize;

use crate::interval::{merge_intervals, total_hours};
use crate::pairing::pair_intervals;
use crate::status::StatusEvent;

/// Computes how many hours an employee worked from their raw work log.
///
/// Entries may arrive in any order. Overlapping or touching sessions are
/// counted once; unmatched entries contribute nothing.
#[must_use]
pub fn calculate_total_hours_worked<E: StatusEvent>(events: &[E]) -> f64 {
    let paired = pair_intervals(events);
    let merged = merge_intervals(&paired);
    total_hours(&merged)
}

/// Hours computed for a single employee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmployeeHours<K> {
    pub employee_id: K,
    pub total_hours_worked: f64,
}

/// Computes hours for many employees in parallel.
///
/// Output order follows input order.
pub fn hours_by_employee<K, E>(logs: &[(K, Vec<E>)]) -> Vec<EmployeeHours<K>>
where
    K: Copy + Send + Sync,
    E: StatusEvent + Sync,
{
    logs.par_iter()
        .map(|(employee_id, events)| EmployeeHours {
            employee_id: *employee_id,
            total_hours_worked: calculate_total_hours_worked(events),
        })
        .collect()
}
