// End-to-end reads of attribute log files on disk
use smartd_log_reader::{
    load_all, render_table, AttributeLog, DeviceName, DeviceReport, LogConfig, LogError, LogJob,
    RecordFault,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_log(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

/// smartd-style line with attributes 1 (unwatched), 5 and 197
fn smartd_line(day: u32, hour: u32, realloc: i64, pending: i64) -> String {
    format!(
        "2019-03-{:02} {:02}:00:00;\t1;200;0;\t5;{};{};\t197;200;{};",
        day,
        hour,
        200 - realloc.min(100),
        realloc,
        pending
    )
}

#[test]
fn read_and_filter_smartd_log() {
    let file = write_log(&[
        smartd_line(1, 0, 0, 0),
        smartd_line(1, 1, 0, 0),
        smartd_line(1, 2, 0, 0),
        smartd_line(1, 3, 8, 0),
        smartd_line(1, 4, 8, 0),
        smartd_line(1, 5, 8, 2),
    ]);

    let log = AttributeLog::from_file(
        file.path(),
        DeviceName::new("sda", "ST1000DM003"),
        &LogConfig::new(),
    )
    .unwrap();

    assert_eq!(log.raw_record_count, 6);
    assert_eq!(log.records.len(), 3);

    let rec = &log.records[1];
    assert_eq!(rec.formatted_timestamp(), "2019-03-01 03:00:00");
    assert_eq!(rec.attributes[&5].raw_delta, 8);
    assert_eq!(rec.attributes[&5].value_delta, -8);
    assert!(!rec.attributes.contains_key(&1));

    assert_eq!(log.records[2].attributes[&197].raw_delta, 2);
}

#[test]
fn shortened_log_is_consistent() {
    // raw value of attribute 5 grows by one every hour: every record is retained
    let lines: Vec<String> = (0..50)
        .map(|i| smartd_line(1 + i / 24, i % 24, i as i64, 0))
        .collect();
    let file = write_log(&lines);

    let config = LogConfig::new().with_watch_attrs([5]).with_shorten(true);
    let log = AttributeLog::from_file(file.path(), DeviceName::new("sda", "M"), &config).unwrap();

    assert_eq!(log.raw_record_count, 50);
    assert_eq!(log.records.len(), 20);
    assert_eq!(log.records[0].attributes[&5].raw, 0);
    assert_eq!(log.records[1].attributes[&5].raw, 31);
    assert_eq!(log.records[1].attributes[&5].raw_delta, 31);

    for pair in log.records.windows(2) {
        let (prev, cur) = (pair[0].attributes[&5], pair[1].attributes[&5]);
        assert_eq!(cur.raw_delta, cur.raw - prev.raw);
    }
}

#[test]
fn malformed_record_reports_path_and_index() {
    let file = write_log(&[
        smartd_line(1, 0, 0, 0),
        "2019-03-01 01:00:00;5;100;".to_string(),
    ]);

    let err = AttributeLog::from_file(file.path(), DeviceName::new("sda", "M"), &LogConfig::new())
        .unwrap_err();

    match &err {
        LogError::MalformedRecord { path, record, reason } => {
            assert_eq!(path, file.path());
            assert_eq!(*record, 2);
            assert!(matches!(reason, RecordFault::FieldCount { fields: 4 }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn batch_stops_at_first_broken_log() {
    let good = write_log(&[smartd_line(1, 0, 0, 0)]);
    let bad = write_log(&["not a record".to_string()]);
    let never_read = write_log(&[smartd_line(1, 0, 0, 0)]);

    let jobs = vec![
        LogJob::new(good.path(), DeviceName::new("sda", "A")),
        LogJob::new(bad.path(), DeviceName::new("sdb", "B")),
        LogJob::new(never_read.path(), DeviceName::new("sdc", "C")),
    ];

    let (path, err) = load_all(jobs, &LogConfig::new()).unwrap_err();
    assert_eq!(path, bad.path());
    assert_eq!(err.record_index(), Some(1));
}

#[test]
fn table_and_json_agree() {
    let file = write_log(&[
        smartd_line(1, 0, 0, 0),
        smartd_line(1, 1, 4, 1),
        smartd_line(1, 2, 4, 0),
    ]);
    let log = AttributeLog::from_file(file.path(), DeviceName::new("sda", "M"), &LogConfig::new())
        .unwrap();

    let table = render_table(&log);
    let json = serde_json::to_value(DeviceReport::from_log(&log)).unwrap();
    let entries = json["log"].as_array().unwrap();
    assert_eq!(entries.len(), log.records.len());

    let rows: Vec<&str> = table.lines().skip(2).take(log.records.len()).collect();
    for (row, entry) in rows.iter().zip(entries) {
        let ts = entry[0].as_str().unwrap();
        assert!(row.starts_with(ts));

        for (id, attr) in entry[1].as_object().unwrap() {
            let raw = attr["raw"].as_i64().unwrap();
            assert!(row.contains(&raw.to_string()), "row {row:?} lacks attr {id}");
        }
    }

    assert_eq!(entries[1][1]["197"]["raw_delta"], 1);
    assert_eq!(entries[2][1]["197"]["raw_delta"], -1);
}
