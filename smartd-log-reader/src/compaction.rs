//! Retained-log compaction
//!
//! Shortens a retained log to a bounded number of rows. The first record is the
//! baseline and always survives, followed by the most recent `max_records - 1`
//! records. Deltas of the survivors are then recomputed against their new
//! neighbours so that every row still reads as "change since the row above".

use crate::types::LogRecord;

/// Compact `records` to at most `max_records` rows
///
/// No-op if the log is already short enough. A limit of zero is treated as one
/// (the baseline is never removed).
pub fn compact(records: &mut Vec<LogRecord>, max_records: usize) {
    let max_records = max_records.max(1);
    let len = records.len();
    if len <= max_records {
        return;
    }

    let removed = records.drain(1..len - (max_records - 1)).count();
    log::debug!("Compaction removed {} interior records", removed);

    recompute_deltas(records);
}

/// Recompute every record's deltas against the immediately preceding record
///
/// Attributes missing from the predecessor keep the delta they already have.
/// The walk is sequential in timestamp order.
pub fn recompute_deltas(records: &mut [LogRecord]) {
    for ix in 1..records.len() {
        let (head, tail) = records.split_at_mut(ix);
        let previous = &head[ix - 1].attributes;
        let current = &mut tail[0].attributes;

        for (id, value) in current.iter_mut() {
            if let Some(prev) = previous.get(id) {
                *value = value.with_deltas_from(prev);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeMap, AttributeValue, Timestamp};
    use chrono::NaiveDate;

    fn at(minute: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2019, 3, 1)
            .and_then(|d| d.and_hms_opt(10, minute, 0))
            .unwrap()
    }

    fn record(minute: u32, attrs: &[(u32, i64, i64)]) -> LogRecord {
        let attributes: AttributeMap = attrs
            .iter()
            .map(|&(id, value, raw)| (id, AttributeValue::new(value, raw)))
            .collect();
        LogRecord::new(at(minute), attributes)
    }

    /// A retained log where attribute 5's raw value equals the record index
    fn retained_log(len: u32) -> Vec<LogRecord> {
        let mut records: Vec<LogRecord> = (0..len)
            .map(|i| record(i, &[(5, 100, i as i64)]))
            .collect();
        recompute_deltas(&mut records);
        records
    }

    #[test]
    fn test_short_log_untouched() {
        let mut records = retained_log(5);
        let before = records.clone();
        compact(&mut records, 20);
        assert_eq!(records, before);
    }

    #[test]
    fn test_compaction_keeps_baseline_and_tail() {
        let mut records = retained_log(25);
        let baseline = records[0].clone();

        compact(&mut records, 20);

        assert_eq!(records.len(), 20);
        assert_eq!(records[0], baseline);
        // records 1..=5 are gone, original record 6 is now second
        assert_eq!(records[1].timestamp, at(6));
        assert_eq!(records[19].timestamp, at(24));

        let second = records[1].attributes[&5];
        assert_eq!(second.raw_delta, 6);
        assert_eq!(second.value_delta, 0);
        assert_eq!(records[2].attributes[&5].raw_delta, 1);
    }

    #[test]
    fn test_deltas_match_surviving_neighbours() {
        let mut records = retained_log(40);
        compact(&mut records, 7);

        assert_eq!(records.len(), 7);
        for pair in records.windows(2) {
            let prev = pair[0].attributes[&5];
            let cur = pair[1].attributes[&5];
            assert_eq!(cur.raw_delta, cur.raw - prev.raw);
            assert_eq!(cur.value_delta, cur.value - prev.value);
        }
    }

    #[test]
    fn test_attribute_absent_from_predecessor_keeps_delta() {
        let mut records = vec![
            record(0, &[(5, 100, 0)]),
            record(1, &[(5, 100, 1)]),
            record(2, &[(5, 100, 2)]),
            record(3, &[(5, 100, 3), (197, 200, 4)]),
        ];
        records[3].attributes.insert(
            197,
            AttributeValue {
                value: 200,
                value_delta: 0,
                raw: 4,
                raw_delta: 2,
            },
        );

        compact(&mut records, 2);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].attributes[&5].raw_delta, 3);
        assert_eq!(records[1].attributes[&197].raw_delta, 2);
    }

    #[test]
    fn test_limit_of_one_keeps_only_baseline() {
        let mut records = retained_log(3);
        compact(&mut records, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, at(0));
    }
}
