//! Renderers for attribute logs
//!
//! Both renderers are read-only projections of an [`AttributeLog`]:
//! - [`render_table`] produces the aligned text table shown on a terminal
//! - [`DeviceReport`] is the structured form serialized to JSON

use crate::attribute_log::AttributeLog;
use crate::types::{AttributeId, AttributeMap};
use serde::Serialize;

/// Header of the timestamp column
pub const TIMESTAMP_HEADER: &str = "Timestamp, attr(s):";
/// Header of every delta sub-column
pub const DELTA_HEADER: &str = "Δ";
/// Placeholder for a zero or missing delta
pub const NO_CHANGE: &str = "—";

const COLUMN_SEPARATOR: &str = "  ";

/// Format a delta as `+N`, `-N` or the no-change placeholder
pub fn format_delta(delta: i64) -> String {
    match delta {
        0 => NO_CHANGE.to_string(),
        d if d > 0 => format!("+{}", d),
        d => d.to_string(),
    }
}

/// One table cell of an attribute column: raw value and its delta
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeCell {
    raw: String,
    delta: String,
}

impl AttributeCell {
    fn new(raw: impl Into<String>, delta: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            delta: delta.into(),
        }
    }
}

struct TableRow {
    label: String,
    cells: Vec<AttributeCell>,
}

/// Column widths, measured in characters
#[derive(Default)]
struct ColumnWidths {
    label: usize,
    cells: Vec<(usize, usize)>,
}

impl ColumnWidths {
    fn fit(&mut self, row: &TableRow) {
        self.label = self.label.max(row.label.chars().count());
        if self.cells.len() < row.cells.len() {
            self.cells.resize(row.cells.len(), (0, 0));
        }
        for (width, cell) in self.cells.iter_mut().zip(&row.cells) {
            width.0 = width.0.max(cell.raw.chars().count());
            width.1 = width.1.max(cell.delta.chars().count());
        }
    }

    fn format(&self, row: &TableRow) -> String {
        let mut parts = Vec::with_capacity(row.cells.len() + 1);
        parts.push(format!("{:<width$}", row.label, width = self.label));

        for (&(raw_width, delta_width), cell) in self.cells.iter().zip(&row.cells) {
            parts.push(format!(
                "{:>rw$} {:<dw$}",
                cell.raw,
                cell.delta,
                rw = raw_width,
                dw = delta_width
            ));
        }

        parts.join(COLUMN_SEPARATOR)
    }
}

/// Render a log as a text table, including the device line and a trailing blank line
pub fn render_table(log: &AttributeLog) -> String {
    let mut out = format!("{}\n", log.device);

    if log.is_empty() {
        out.push_str("  no S.M.A.R.T. attributes logged\n\n");
        return out;
    }

    let columns: Vec<AttributeId> = log.attribute_ids().into_iter().collect();

    let mut rows = Vec::with_capacity(log.records.len() + 1);
    rows.push(TableRow {
        label: TIMESTAMP_HEADER.to_string(),
        cells: columns
            .iter()
            .map(|id| AttributeCell::new(id.to_string(), DELTA_HEADER))
            .collect(),
    });

    for rec in &log.records {
        let cells = columns
            .iter()
            .map(|id| match rec.attributes.get(id) {
                Some(attr) => AttributeCell::new(attr.raw.to_string(), format_delta(attr.raw_delta)),
                None => AttributeCell::new("", NO_CHANGE),
            })
            .collect();

        rows.push(TableRow {
            label: rec.formatted_timestamp(),
            cells,
        });
    }

    let mut widths = ColumnWidths::default();
    for row in &rows {
        widths.fit(row);
    }

    for row in &rows {
        out.push_str(&widths.format(row));
        out.push('\n');
    }
    out.push('\n');

    out
}

/// Structured view of one device's log, ready for serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceReport {
    pub device: String,
    pub model: String,
    /// `(timestamp, attributes)` pairs in record order
    pub log: Vec<(String, AttributeMap)>,
}

impl DeviceReport {
    pub fn from_log(log: &AttributeLog) -> Self {
        Self {
            device: log.device.file_name.clone(),
            model: log.device.model_label.clone(),
            log: log
                .records
                .iter()
                .map(|rec| (rec.formatted_timestamp(), rec.attributes.clone()))
                .collect(),
        }
    }

    /// Attributes of the `ix`-th entry, if any
    pub fn attributes(&self, ix: usize) -> Option<&AttributeMap> {
        self.log.get(ix).map(|(_, attrs)| attrs)
    }
}

impl From<&AttributeLog> for DeviceReport {
    fn from(log: &AttributeLog) -> Self {
        Self::from_log(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeValue, DeviceName, LogRecord, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;

    fn record(ts: &str, attrs: &[(u32, AttributeValue)]) -> LogRecord {
        LogRecord::new(
            NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            attrs.iter().copied().collect(),
        )
    }

    fn sample_log() -> AttributeLog {
        AttributeLog {
            device: DeviceName::new("sda", "ST1000DM003_Z1D2"),
            records: vec![
                record(
                    "2019-03-01 10:00:00",
                    &[(5, AttributeValue::new(100, 0)), (197, AttributeValue::new(200, 8))],
                ),
                record(
                    "2019-03-02 10:00:00",
                    &[
                        (
                            5,
                            AttributeValue {
                                value: 99,
                                value_delta: -1,
                                raw: 16,
                                raw_delta: 16,
                            },
                        ),
                        (
                            197,
                            AttributeValue {
                                value: 200,
                                value_delta: 0,
                                raw: 0,
                                raw_delta: -8,
                            },
                        ),
                    ],
                ),
            ],
            raw_record_count: 12,
        }
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(0), "—");
        assert_eq!(format_delta(3), "+3");
        assert_eq!(format_delta(-8), "-8");
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&sample_log());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "sda (ST1000DM003_Z1D2)");
        assert_eq!(lines[1], "Timestamp, attr(s):   5 Δ    197 Δ ");
        assert_eq!(lines[2], "2019-03-01 10:00:00   0 —      8 — ");
        assert_eq!(lines[3], "2019-03-02 10:00:00  16 +16    0 -8");
        assert_eq!(lines[4], "");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_rows_keep_column_padding() {
        let table = render_table(&sample_log());
        let widths: Vec<usize> = table
            .lines()
            .skip(1)
            .take(3)
            .map(|line| line.chars().count())
            .collect();

        assert_eq!(widths, vec![35; 3]);
    }

    #[test]
    fn test_render_missing_attribute() {
        let mut log = sample_log();
        log.records[0].attributes.remove(&197);

        let table = render_table(&log);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "2019-03-01 10:00:00   0 —        — ");
    }

    #[test]
    fn test_render_empty_log() {
        let log = AttributeLog {
            device: DeviceName::new("sdb", "log file"),
            records: Vec::new(),
            raw_record_count: 0,
        };

        assert_eq!(
            render_table(&log),
            "sdb (log file)\n  no S.M.A.R.T. attributes logged\n\n"
        );
    }

    #[test]
    fn test_structured_report() {
        let log = sample_log();
        let report = DeviceReport::from(&log);

        assert_eq!(report.device, "sda");
        assert_eq!(report.model, "ST1000DM003_Z1D2");
        assert_eq!(report.log.len(), 2);
        assert_eq!(report.log[1].0, "2019-03-02 10:00:00");

        let json = serde_json::to_value(&report).unwrap();
        let attr = &json["log"][1][1]["5"];
        assert_eq!(attr["value"], 99);
        assert_eq!(attr["value_delta"], -1);
        assert_eq!(attr["raw"], 16);
        assert_eq!(attr["raw_delta"], 16);
    }

    #[test]
    fn test_structured_matches_records() {
        let log = sample_log();
        let report = DeviceReport::from_log(&log);

        for (ix, rec) in log.records.iter().enumerate() {
            assert_eq!(report.attributes(ix), Some(&rec.attributes));
        }
        assert!(report.attributes(2).is_none());
    }
}
