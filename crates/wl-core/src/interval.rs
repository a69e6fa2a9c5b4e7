//! Work intervals and their union.
//!
//! # Algorithm Summary
//!
//! 1. Sort intervals by start time
//! 2. Fold them left to right, absorbing every interval whose start lies at or
//!    before the running end (overlap or exact touch)
//! 3. Sum the resulting disjoint set in fractional hours

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::ValidationError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A closed span of work with `start <= end`.
///
/// Deserialization goes through [`Interval::new`], so inverted input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Creates an interval, rejecting an end before the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval in fractional hours, keeping sub-second precision.
    #[must_use]
    pub fn hours(&self) -> f64 {
        (self.end - self.start)
            .to_std()
            .map_or(0.0, |d| d.as_secs_f64() / SECONDS_PER_HOUR)
    }

    /// Returns a copy stretched to end at the later of the two ends.
    #[must_use]
    fn extended_to(self, end: DateTime<Utc>) -> Self {
        Self {
            start: self.start,
            end: self.end.max(end),
        }
    }
}

/// Collapses overlapping or touching intervals into the minimal disjoint set.
///
/// The result is ascending by start and every consecutive pair satisfies
/// `previous.end < next.start`. Inputs of zero or one interval are returned
/// unchanged.
#[must_use]
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.len() <= 1 {
        return intervals.to_vec();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(Interval::start);

    let mut merged = Vec::with_capacity(sorted.len());
    let mut current = sorted[0];
    for next in sorted.into_iter().skip(1) {
        if next.start <= current.end {
            current = current.extended_to(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

/// Sums interval lengths in fractional hours. Empty input yields `0.0`.
#[must_use]
pub fn total_hours(intervals: &[Interval]) -> f64 {
    intervals.iter().map(Interval::hours).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn span(start: (u32, u32), end: (u32, u32)) -> Interval {
        Interval::new(at(start.0, start.1), at(end.0, end.1)).expect("valid interval")
    }

    #[test]
    fn new_rejects_inverted_interval() {
        let err = Interval::new(at(10, 0), at(9, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvertedInterval {
                start: at(10, 0),
                end: at(9, 0),
            }
        );
    }

    #[test]
    fn new_accepts_zero_length_interval() {
        let interval = Interval::new(at(9, 0), at(9, 0)).unwrap();
        assert!(interval.hours().abs() < f64::EPSILON);
    }

    #[test]
    fn deserialize_accepts_ordered_interval() {
        let interval: Interval = serde_json::from_str(
            r#"{"start":"2024-01-01T09:00:00Z","end":"2024-01-01T10:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(interval, span((9, 0), (10, 30)));
    }

    #[test]
    fn deserialize_rejects_inverted_interval() {
        let err = serde_json::from_str::<Interval>(
            r#"{"start":"2024-01-01T10:00:00Z","end":"2024-01-01T09:00:00Z"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("interval ends at"), "{err}");
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_intervals(&[]).is_empty());
    }

    #[test]
    fn test_merge_single_returns_unchanged() {
        let single = [span((9, 0), (10, 0))];
        assert_eq!(merge_intervals(&single), single.to_vec());
    }

    #[test]
    fn test_merge_no_overlap_keeps_both() {
        let intervals = [span((9, 0), (10, 0)), span((11, 0), (12, 0))];
        assert_eq!(merge_intervals(&intervals), intervals.to_vec());
    }

    #[test]
    fn test_merge_overlap() {
        let intervals = [span((9, 0), (11, 0)), span((10, 0), (12, 0))];
        assert_eq!(merge_intervals(&intervals), vec![span((9, 0), (12, 0))]);
    }

    #[test]
    fn test_merge_contained_interval() {
        let intervals = [span((9, 0), (13, 0)), span((10, 0), (11, 0))];
        assert_eq!(merge_intervals(&intervals), vec![span((9, 0), (13, 0))]);
    }

    #[test]
    fn test_merge_adjacent_intervals_touching_boundary() {
        let intervals = [span((9, 0), (10, 0)), span((10, 0), (11, 0))];
        assert_eq!(merge_intervals(&intervals), vec![span((9, 0), (11, 0))]);
    }

    #[test]
    fn test_merge_unsorted_input() {
        let intervals = [
            span((15, 0), (16, 0)),
            span((9, 0), (10, 0)),
            span((9, 30), (11, 0)),
        ];
        assert_eq!(
            merge_intervals(&intervals),
            vec![span((9, 0), (11, 0)), span((15, 0), (16, 0))]
        );
    }

    #[test]
    fn test_merge_chain_absorbs_later_intervals() {
        // The first interval covers the start of all others; the running end
        // must keep growing as each one is absorbed.
        let intervals = [
            span((9, 0), (10, 0)),
            span((9, 30), (12, 0)),
            span((11, 0), (11, 30)),
            span((12, 0), (13, 0)),
        ];
        assert_eq!(merge_intervals(&intervals), vec![span((9, 0), (13, 0))]);
    }

    #[test]
    fn test_total_hours_empty() {
        assert!(total_hours(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_hours_keeps_fractional_precision() {
        let start = at(9, 0);
        let end = start + Duration::minutes(90) + Duration::milliseconds(1800);
        let interval = Interval::new(start, end).unwrap();
        // 90 minutes + 1.8 seconds = 1.5005 hours
        assert!((total_hours(&[interval]) - 1.5005).abs() < 1e-12);
    }

    #[test]
    fn test_total_hours_sums_disjoint_intervals() {
        let intervals = [span((9, 0), (12, 0)), span((13, 0), (17, 0))];
        assert!((total_hours(&intervals) - 7.0).abs() < f64::EPSILON);
    }
}
