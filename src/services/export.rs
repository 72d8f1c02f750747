//! CSV aggregation for extracted tender records.
//!
//! The table schema is derived from the data: the header is the sorted
//! union of the fields present across all records of a run, not a fixed
//! column list.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::TenderRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write records as a CSV table.
///
/// One row per record, in input order; fields a record lacks are
/// written as empty cells. An empty record list leaves the destination
/// untouched.
pub fn write_csv(records: &[TenderRecord], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        warn!("no records to write, leaving {} untouched", path.display());
        return Ok(());
    }

    let rows: Vec<BTreeMap<&'static str, String>> = records
        .iter()
        .map(|record| record.present_fields().into_iter().collect())
        .collect();

    let mut header: BTreeSet<&'static str> = BTreeSet::new();
    for row in &rows {
        header.extend(row.keys());
    }
    if header.is_empty() {
        warn!(
            "none of the {} records carry any field, leaving {} untouched",
            records.len(),
            path.display()
        );
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header.iter())?;
    for row in &rows {
        let cells: Vec<&str> = header
            .iter()
            .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&cells)?;
    }
    writer.flush()?;

    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read a previously written table back, one map per row.
pub fn read_csv(path: &Path) -> Result<Vec<BTreeMap<String, String>>, ExportError> {
    if !path.exists() {
        return Err(ExportError::NotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::columns;
    use std::fs;
    use tempfile::tempdir;

    fn record(title: &str) -> TenderRecord {
        TenderRecord {
            title: Some(title.to_string()),
            url: Some(format!("https://rostender.info/tender/{title}")),
            ..Default::default()
        }
    }

    #[test]
    fn header_is_the_sorted_union_of_all_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut rare = record("b");
        rare.sector = Some("1. Связь".to_string());
        let records = vec![record("a"), rare, record("c")];

        write_csv(&records, &path).unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 3);
        // Every row carries the rare column; only one row fills it.
        assert_eq!(rows[0][columns::SECTOR], "");
        assert_eq!(rows[1][columns::SECTOR], "1. Связь");
        assert_eq!(rows[2][columns::SECTOR], "");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let mut sorted = header.clone();
        sorted.sort();
        assert_eq!(header, sorted);
        assert!(header.contains(&columns::SECTOR.to_string()));
    }

    #[test]
    fn fully_empty_records_still_produce_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let records = vec![record("a"), TenderRecord::empty(), record("c")];
        write_csv(&records, &path).unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][columns::TITLE], "");
        assert_eq!(rows[1][columns::URL], "");
    }

    #[test]
    fn writing_the_same_records_twice_is_byte_identical() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");

        let mut priced = record("x");
        priced.starting_price = Some(99_000);
        let records = vec![priced, record("y")];

        write_csv(&records, &first).unwrap();
        write_csv(&records, &second).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn empty_record_list_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn all_empty_records_write_nothing_but_still_succeed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![TenderRecord::empty(), TenderRecord::empty()];
        write_csv(&records, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn reading_a_missing_table_reports_not_found() {
        let dir = tempdir().unwrap();
        let err = read_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ExportError::NotFound(_)));
    }
}
