use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    error::{OrganizerError, Result},
    models::MoveRecord,
};

/// Hidden directory under the organized root holding the tool's own files.
pub const LOG_DIR_NAME: &str = ".organizer";
pub const LOG_SUBDIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "move_log";

pub const MOVE_LOG_COLUMNS: [&str; 7] = [
    "file_name",
    "source_path",
    "destination_path",
    "category",
    "classifier_type",
    "confidence",
    "status",
];

pub fn log_dir(root_path: &Path) -> PathBuf {
    root_path.join(LOG_DIR_NAME).join(LOG_SUBDIR)
}

pub fn log_file_name(timestamp: DateTime<Utc>) -> String {
    format!("{}_{}.csv", LOG_FILE_PREFIX, timestamp.format("%Y%m%d_%H%M%SZ"))
}

/// Writes the move log for a run stamped with the current UTC time.
pub fn write_move_log(records: &[MoveRecord], root_path: &Path) -> Result<PathBuf> {
    write_move_log_at(records, root_path, Utc::now())
}

/// Writes one CSV row per record under `<root>/.organizer/logs/`. A file is
/// written even when `records` is empty.
pub fn write_move_log_at(
    records: &[MoveRecord],
    root_path: &Path,
    timestamp: DateTime<Utc>,
) -> Result<PathBuf> {
    let dir = log_dir(root_path);
    fs::create_dir_all(&dir).map_err(|source| OrganizerError::Logging {
        path: dir.clone(),
        source,
    })?;

    let log_path = dir.join(log_file_name(timestamp));
    write_rows(records, &log_path).map_err(|source| OrganizerError::Logging {
        path: log_path.clone(),
        source,
    })?;

    info!("Wrote {} move records to {}", records.len(), log_path.display());
    Ok(log_path)
}

/// Always carries a decimal point, so a rule verdict reads `1.0`.
fn format_confidence(confidence: f64) -> String {
    format!("{:?}", confidence)
}

fn write_rows(records: &[MoveRecord], log_path: &Path) -> std::io::Result<()> {
    let mut writer = csv::Writer::from_path(log_path)?;
    writer.write_record(MOVE_LOG_COLUMNS)?;

    for record in records {
        writer.write_record([
            record.file_name.clone(),
            record.source.to_string_lossy().into_owned(),
            record.destination.to_string_lossy().into_owned(),
            record.category.to_string(),
            record.classifier_type.to_string(),
            record.confidence.map(format_confidence).unwrap_or_default(),
            record.status.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
