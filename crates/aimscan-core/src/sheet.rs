//! CSV spreadsheet reading and writing for paragraph and sentiment records.

use std::path::Path;

use thiserror::Error;

use crate::{ParagraphRecord, SentimentRecord};

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("failed to read spreadsheet: {0}")]
    Read(String),
    #[error("failed to write spreadsheet: {0}")]
    Write(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read all paragraph records from a CSV file.
///
/// The file must have the columns `Aim`, `Year`, `Content`. A malformed
/// or unreadable file aborts the whole run; there is no row-level recovery.
pub fn read_paragraphs(path: &Path) -> Result<Vec<ParagraphRecord>, SheetError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| SheetError::Read(e.to_string()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: ParagraphRecord = row.map_err(|e| SheetError::Read(e.to_string()))?;
        records.push(record);
    }
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded spreadsheet");
    Ok(records)
}

/// Append paragraph records to a CSV file, creating it if absent.
///
/// Existing rows are read back, the new rows concatenated, and the whole
/// file rewritten, so the output always carries a single header line.
/// Returns the total row count after the append.
pub fn append_paragraphs(path: &Path, new: &[ParagraphRecord]) -> Result<usize, SheetError> {
    let mut records = if path.exists() {
        read_paragraphs(path)?
    } else {
        Vec::new()
    };
    records.extend_from_slice(new);

    let mut writer = csv::Writer::from_path(path).map_err(|e| SheetError::Write(e.to_string()))?;
    for record in &records {
        writer
            .serialize(record)
            .map_err(|e| SheetError::Write(e.to_string()))?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Write sentiment records to a CSV file, replacing any existing content.
pub fn write_sentiments(path: &Path, rows: &[SentimentRecord]) -> Result<(), SheetError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| SheetError::Write(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| SheetError::Write(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
