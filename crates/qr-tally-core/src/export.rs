//! CSV rendering of the scan log.
//!
//! One row per entry in log order: ISO-8601 UTC timestamp, then the raw code.
//! Rows end with CRLF and the file blob starts with a UTF-8 BOM so spreadsheet
//! tools pick the right encoding.

use crate::error::Error;
use crate::model::ScanEntry;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

const HEADER: [&str; 2] = ["timestamp_iso", "code"];
const BOM: &str = "\u{FEFF}";
const MAX_LABEL_CHARS: usize = 48;
const FALLBACK_LABEL: &str = "inventory";

/// A finished export, ready to hand to whatever shares or saves it.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn build_export(
    entries: &[ScanEntry],
    session_label: &str,
    at: NaiveDateTime,
) -> Result<CsvExport, Error> {
    Ok(CsvExport {
        file_name: export_file_name(session_label, at),
        bytes: make_csv_file(entries)?,
    })
}

pub fn to_csv_rows(entries: &[ScanEntry]) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for entry in entries {
        let iso = iso_timestamp(entry.timestamp);
        writer.write_record([iso.as_str(), entry.code.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(e.to_string()))
}

pub fn make_csv_file(entries: &[ScanEntry]) -> Result<Vec<u8>, Error> {
    let mut out = String::from(BOM);
    out.push_str(&to_csv_rows(entries)?);
    Ok(out.into_bytes())
}

/// `inventory-<label>-<YYYYMMDD-HHMM>.csv`
pub fn export_file_name(session_label: &str, at: NaiveDateTime) -> String {
    format!(
        "inventory-{}-{}.csv",
        safe_filename(session_label),
        at.format("%Y%m%d-%H%M")
    )
}

/// Collapse every run of characters that are not ASCII alphanumerics, `-`,
/// `_`, CJK ideographs, kana or Hangul into a single `_`.
pub fn safe_filename(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_run = false;
    for c in label.chars() {
        if is_filename_safe(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    let truncated: String = out.chars().take(MAX_LABEL_CHARS).collect();
    if truncated.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        truncated
    }
}

fn is_filename_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '-'
        || c == '_'
        || ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3040}'..='\u{30FF}').contains(&c)
        || ('\u{AC00}'..='\u{D7AF}').contains(&c)
}

fn iso_timestamp(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => epoch_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(code: &str, ts: i64) -> ScanEntry {
        ScanEntry {
            code: code.to_string(),
            timestamp: ts,
        }
    }

    #[test]
    fn test_header_only_for_empty_log() {
        assert_eq!(to_csv_rows(&[]).unwrap(), "timestamp_iso,code\r\n");
    }

    #[test]
    fn test_rows_in_log_order_with_utc_millis() {
        let csv = to_csv_rows(&[entry("B", 1_700_000_000_123), entry("A", 0)]).unwrap();
        assert_eq!(
            csv,
            "timestamp_iso,code\r\n\
             2023-11-14T22:13:20.123Z,B\r\n\
             1970-01-01T00:00:00.000Z,A\r\n"
        );
    }

    #[test]
    fn test_quotes_fields_that_need_it() {
        let csv = to_csv_rows(&[
            entry("a,b", 0),
            entry("say \"hi\"", 0),
            entry("line1\nline2", 0),
            entry("plain", 0),
        ])
        .unwrap();
        let rows: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(rows[1], "1970-01-01T00:00:00.000Z,\"a,b\"");
        assert_eq!(rows[2], "1970-01-01T00:00:00.000Z,\"say \"\"hi\"\"\"");
        assert_eq!(rows[3], "1970-01-01T00:00:00.000Z,\"line1\nline2\"");
        assert_eq!(rows[4], "1970-01-01T00:00:00.000Z,plain");
    }

    #[test]
    fn test_file_starts_with_bom() {
        let bytes = make_csv_file(&[entry("X", 0)]).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text[3..].starts_with("timestamp_iso,code\r\n"));
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Warehouse A / Dec"), "Warehouse_A_Dec");
        assert_eq!(safe_filename("倉庫A-12月盤點"), "倉庫A-12月盤點");
        assert_eq!(safe_filename(""), "inventory");
        assert_eq!(safe_filename("!!!"), "_");
        assert_eq!(safe_filename(&"x".repeat(60)).chars().count(), 48);
    }

    #[test]
    fn test_export_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(
            export_file_name("Shelf 4", at),
            "inventory-Shelf_4-20240307-0905.csv"
        );
    }
}
