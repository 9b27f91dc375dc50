//! Attribute log record parser
//!
//! A smartd attribute log line looks like
//!
//! ```text
//! 2019-03-01 12:00:00;	1;200;0;	3;175;4216;	5;200;0;
//! ```
//!
//! Field 0 is the timestamp, the last field is reserved (smartd terminates every
//! line with `;`, so it is normally empty) and the fields in between are flat
//! groups of three integers: attribute ID, normalized value, raw value.

use crate::types::{
    AttributeId, AttributeMap, AttributeValue, LogError, RecordFault, Result, Timestamp,
    TIMESTAMP_FORMAT,
};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::path::Path;

/// Field separator of smartd attribute logs
pub const FIELD_SEPARATOR: char = ';';

/// A record as parsed from one line, before change detection
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub timestamp: Timestamp,
    /// Watched attributes only, all deltas zero
    pub attributes: AttributeMap,
}

/// Split a raw log line into its fields
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n']).split(FIELD_SEPARATOR).collect()
}

/// Parse the fields of one record
///
/// `record` is the 1-based index used in error reports and `path` the source
/// file. Every attribute group is validated, but only IDs contained in `watch`
/// end up in the returned mapping.
pub fn parse_record(
    fields: &[&str],
    record: usize,
    path: &Path,
    watch: &BTreeSet<AttributeId>,
) -> Result<ParsedRecord> {
    let malformed = |reason: RecordFault| LogError::MalformedRecord {
        path: path.to_path_buf(),
        record,
        reason,
    };

    if fields.len() < 2 || (fields.len() - 2) % 3 != 0 {
        return Err(malformed(RecordFault::FieldCount {
            fields: fields.len(),
        }));
    }

    let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
        .map_err(|e| malformed(RecordFault::Timestamp(e)))?;

    let mut attributes = AttributeMap::new();

    for (ix, group) in fields[1..fields.len() - 1].chunks_exact(3).enumerate() {
        let (id, value, raw) =
            parse_group(group).ok_or_else(|| malformed(RecordFault::Attribute { group: ix + 1 }))?;

        // IDs outside the u32 range can never be on a watch-list
        let Some(id) = AttributeId::try_from(id).ok().filter(|id| watch.contains(id)) else {
            continue;
        };

        attributes.insert(id, AttributeValue::new(value, raw));
    }

    Ok(ParsedRecord {
        timestamp,
        attributes,
    })
}

fn parse_group(group: &[&str]) -> Option<(i64, i64, i64)> {
    let mut numbers = group.iter().map(|s| s.trim().parse::<i64>().ok());
    Some((numbers.next()??, numbers.next()??, numbers.next()??))
}
