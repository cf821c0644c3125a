use crate::errors::{AppError, AppResult};
use crate::models::{record_identifier, CertificateRow};
use crate::ui;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A record that could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    /// Position of the row in the batch
    pub index: usize,
    /// Identifier the row would have been filed under
    pub identifier: String,
    pub error: AppError,
}

/// Outcome of writing a batch of rows.
#[derive(Debug, Default)]
pub struct WriteSummary {
    /// Files written, in batch order. A path appears twice if two rows share
    /// an identifier.
    pub written: Vec<PathBuf>,
    pub failures: Vec<WriteFailure>,
}

impl WriteSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Returns the output path for a record with the given identifier.
pub fn record_path(postcode_dir: &Path, identifier: &str) -> PathBuf {
    postcode_dir.join(format!("{identifier}.json"))
}

/// Writes `row` as pretty-printed JSON to `<postcode_dir>/<identifier>.json`.
///
/// Any existing file at that path is replaced in full.
///
/// # Errors
///
/// Returns `Write` if the row cannot be serialized or the file cannot be
/// written.
pub fn write_record(
    postcode_dir: &Path,
    identifier: &str,
    row: &CertificateRow,
) -> AppResult<PathBuf> {
    let path = record_path(postcode_dir, identifier);

    let mut contents = serde_json::to_string_pretty(row).map_err(|e| AppError::Write {
        path: path.clone(),
        message: format!("serialization failed: {e}"),
    })?;
    contents.push('\n');

    fs::write(&path, contents).map_err(|e| AppError::Write {
        path: path.clone(),
        message: e.to_string(),
    })?;

    Ok(path)
}

/// Writes every row in `rows` to `postcode_dir`, one file per row.
///
/// A failure on one row is reported and recorded in the summary, and the
/// remaining rows are still written. Rows without a usable `uprn` are filed as
/// `unknown.json`.
pub fn write_batch(postcode_dir: &Path, rows: &[CertificateRow]) -> WriteSummary {
    let pb = ui::create_progress_bar(rows.len() as u64).unwrap_or_else(|e| {
        warn!(error = %e, "Progress bar unavailable");
        ProgressBar::hidden()
    });

    let mut summary = WriteSummary {
        written: Vec::with_capacity(rows.len()),
        failures: Vec::new(),
    };

    for (index, row) in rows.iter().enumerate() {
        let identifier = record_identifier(row);
        pb.set_message(format!("{identifier}.json"));

        match write_record(postcode_dir, &identifier, row) {
            Ok(path) => summary.written.push(path),
            Err(e) => {
                pb.println(format!("Failed to write {identifier}: {e}"));
                warn!(index, identifier = %identifier, error = %e, "Failed to write record");
                summary.failures.push(WriteFailure {
                    index,
                    identifier,
                    error: e,
                });
            }
        }
        pb.inc(1);
    }

    if summary.is_complete() {
        pb.finish_with_message(format!("Wrote {} record(s)", summary.written.len()));
    } else {
        pb.finish_with_message(format!(
            "Wrote {} record(s), {} failed",
            summary.written.len(),
            summary.failures.len()
        ));
    }

    info!(
        written = summary.written.len(),
        failed = summary.failures.len(),
        dir = %postcode_dir.display(),
        "Records written"
    );

    summary
}
