//! Pairing of `Started` and `Finished` entries into work intervals.
//!
//! Entries are split into two ascending queues, one per status. Each step
//! takes the head of both queues: the earliest unconsumed start and the
//! earliest unconsumed finish. If the start is at or before the finish they
//! form an interval and both are consumed. Otherwise pairing stops and every
//! remaining entry is discarded, including entries that could still pair
//! chronologically later in the log.
//!
//! This absorbs extra `Started` entries before a `Finished` (surplus starts
//! are left over once finishes run out) and extra `Finished` entries after a
//! `Started` (surplus finishes are never consumed).

use chrono::{DateTime, Utc};

use crate::interval::Interval;
use crate::status::{StatusEvent, WorkLogStatus};

/// Pairs entries into tentative work intervals.
///
/// Input may be in any order and of any length. Every returned interval
/// starts at a `Started` timestamp and ends at a `Finished` timestamp with
/// `start <= end`. Never fails; unmatched entries are dropped silently.
#[must_use]
pub fn pair_intervals<E: StatusEvent>(events: &[E]) -> Vec<Interval> {
    let (mut starts, mut finishes): (Vec<DateTime<Utc>>, Vec<DateTime<Utc>>) = (
        Vec::with_capacity(events.len()),
        Vec::with_capacity(events.len()),
    );
    for event in events {
        match event.status() {
            WorkLogStatus::Started => starts.push(event.timestamp()),
            WorkLogStatus::Finished => finishes.push(event.timestamp()),
        }
    }
    starts.sort_unstable();
    finishes.sort_unstable();

    // Step k sees starts[k] and finishes[k] as the earliest remaining of each.
    let intervals: Vec<Interval> = starts
        .iter()
        .zip(&finishes)
        .map_while(|(&start, &finish)| Interval::new(start, finish).ok())
        .collect();

    let discarded = events.len() - 2 * intervals.len();
    if discarded > 0 {
        tracing::trace!(
            paired = intervals.len(),
            discarded,
            "discarding unmatched work log entries"
        );
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::WorkLogEntry;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn started(hour: u32) -> WorkLogEntry {
        WorkLogEntry::started(at(hour))
    }

    fn finished(hour: u32) -> WorkLogEntry {
        WorkLogEntry::finished(at(hour))
    }

    fn bounds(intervals: &[Interval]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        intervals.iter().map(|i| (i.start(), i.end())).collect()
    }

    #[test]
    fn test_empty_events() {
        let events: Vec<WorkLogEntry> = Vec::new();
        assert!(pair_intervals(&events).is_empty());
    }

    #[test]
    fn test_single_start_finish_pair() {
        let result = pair_intervals(&[started(9), finished(17)]);
        assert_eq!(bounds(&result), vec![(at(9), at(17))]);
    }

    #[test]
    fn test_duplicate_starts_pair_in_order() {
        let events = [started(9), started(9), finished(12), started(13), finished(17)];
        let result = pair_intervals(&events);
        assert_eq!(bounds(&result), vec![(at(9), at(12)), (at(9), at(17))]);
    }

    #[test]
    fn test_overlap_via_extra_start() {
        let events = [started(9), started(10), finished(13), finished(18)];
        let result = pair_intervals(&events);
        assert_eq!(bounds(&result), vec![(at(9), at(13)), (at(10), at(18))]);
    }

    #[test]
    fn test_trailing_unmatched_starts_dropped() {
        let events = [started(9), started(10), started(11), finished(17)];
        let result = pair_intervals(&events);
        assert_eq!(bounds(&result), vec![(at(9), at(17))]);
    }

    #[test]
    fn test_extra_finishes_left_unconsumed() {
        let events = [started(9), finished(12), finished(14), finished(17)];
        let result = pair_intervals(&events);
        assert_eq!(bounds(&result), vec![(at(9), at(12))]);
    }

    #[test]
    fn test_only_starts() {
        assert!(pair_intervals(&[started(9), started(10)]).is_empty());
    }

    #[test]
    fn test_only_finishes() {
        assert!(pair_intervals(&[finished(17), finished(18)]).is_empty());
    }

    #[test]
    fn test_out_of_order_input_is_sorted() {
        let events = [finished(17), started(13), finished(12), started(9)];
        let result = pair_intervals(&events);
        assert_eq!(bounds(&result), vec![(at(9), at(12)), (at(13), at(17))]);
    }

    #[test]
    fn test_equal_timestamps_pair() {
        let result = pair_intervals(&[finished(9), started(9)]);
        assert_eq!(bounds(&result), vec![(at(9), at(9))]);
    }

    #[test]
    fn test_leading_stray_finish_discards_everything() {
        // The 08:00 finish precedes every start, so pairing stops before the
        // otherwise valid 09:00-17:00 session is considered.
        let events = [finished(8), started(9), finished(17)];
        assert!(pair_intervals(&events).is_empty());
    }

    #[test]
    fn test_stray_finish_mid_log_discards_tail() {
        // After (9, 10) is consumed the earliest finish is 11:00 while the
        // earliest start is 12:00, so the 12:00-17:00 session is lost.
        let events = [started(9), finished(10), finished(11), started(12), finished(17)];
        let result = pair_intervals(&events);
        assert_eq!(bounds(&result), vec![(at(9), at(10))]);
    }
}
