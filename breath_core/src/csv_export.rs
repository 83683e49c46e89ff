//! CSV export of the practice journal.

use crate::{PracticeRecord, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    technique_id: String,
    started_at: String,
    ended_at: String,
    cycles_planned: u32,
    cycles_completed: u32,
    elapsed_seconds: u32,
    completed: bool,
}

impl From<&PracticeRecord> for CsvRow {
    fn from(record: &PracticeRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            technique_id: record.technique_id.clone(),
            started_at: record.started_at.to_rfc3339(),
            ended_at: record.ended_at.to_rfc3339(),
            cycles_planned: record.cycles_planned,
            cycles_completed: record.cycles_completed,
            elapsed_seconds: record.elapsed_seconds,
            completed: record.completed,
        }
    }
}

/// Write every journal record to `csv_path`, oldest first
///
/// The CSV is rewritten from scratch and synced to disk; the journal is left
/// untouched. Returns the number of rows written.
pub fn export_journal(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let mut records = crate::wal::read_records(wal_path)?;
    records.sort_by(|a, b| a.started_at.cmp(&b.started_at));

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(File::create(csv_path)?);

    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} sessions to {:?}", records.len(), csv_path);
    Ok(records.len())
}
