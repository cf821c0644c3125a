//! End-to-end run for a single postcode.

use crate::auth::{AuthHeader, Credentials};
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::fetcher::{build_client, CertificateFetcher, FetchOptions};
use crate::utils::{format_duration, normalize_postcode};
use crate::writer::{write_batch, WriteFailure};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Postcode after normalization
    pub postcode: String,
    /// Directory the records were written to
    pub postcode_dir: PathBuf,
    /// Rows returned by all endpoints
    pub fetched: usize,
    /// Non-object entries dropped from the responses
    pub skipped: usize,
    /// Successful record writes, counting a rewritten identifier each time
    pub written: usize,
    /// Distinct files on disk after the run; lower than `written` when
    /// records share a `uprn`
    pub files: usize,
    pub failures: Vec<WriteFailure>,
}

/// Fetches every certificate for `postcode` and writes one file per record.
///
/// # Workflow
///
/// 1. Normalizes the postcode and builds the `Authorization` header
/// 2. Creates `<output_dir>/<postcode>/`
/// 3. Queries each configured endpoint in order and concatenates the rows
/// 4. Writes each row to `<uprn>.json`, continuing past per-row failures
///
/// Finding no certificates is not an error; the summary then reports zero rows.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty postcode or one that would name the
/// output directory itself or its parent (`.`, `..`), `Configuration` for invalid
/// settings, `Io` if the output directory cannot be created, and `Network` if
/// any page request fails. Per-record write failures are reported in
/// [`RunSummary::failures`] instead.
pub async fn run(
    postcode: &str,
    config: &ResolvedConfig,
    credentials: &Credentials,
) -> AppResult<RunSummary> {
    let started = Instant::now();
    config.validate()?;

    let postcode = normalize_postcode(postcode)
        .ok_or_else(|| AppError::InvalidInput("Postcode must not be empty".into()))?;
    let auth = AuthHeader::basic(credentials);

    let dir_name = postcode.replace(['/', '\\'], "_");
    if dir_name == "." || dir_name == ".." {
        return Err(AppError::InvalidInput(format!(
            "Postcode '{postcode}' is not a valid directory name"
        )));
    }
    let postcode_dir = config.output_dir.join(dir_name);
    fs::create_dir_all(&postcode_dir).map_err(|e| {
        AppError::Io(format!(
            "Failed to create directory {}: {e}",
            postcode_dir.display()
        ))
    })?;

    let client = build_client(config)?;
    let fetcher = CertificateFetcher::new(client, auth, FetchOptions::from(config));

    let mut all_certs = Vec::new();
    let mut skipped = 0;
    for endpoint in &config.endpoints {
        let url = endpoint.search_url(&config.base_url)?;
        info!(
            endpoint = endpoint.display_name(),
            postcode = %postcode,
            "Searching certificates"
        );
        let fetched = fetcher.fetch_certificates(&url, &postcode).await?;
        all_certs.extend(fetched.rows);
        skipped += fetched.skipped;
    }

    if all_certs.is_empty() {
        info!(postcode = %postcode, "No EPC certificates found");
        return Ok(RunSummary {
            postcode,
            postcode_dir,
            fetched: 0,
            skipped,
            written: 0,
            files: 0,
            failures: Vec::new(),
        });
    }

    info!(count = all_certs.len(), "Found certificates, writing records");
    let summary = write_batch(&postcode_dir, &all_certs);
    let files = summary.written.iter().collect::<BTreeSet<_>>().len();

    info!(
        postcode = %postcode,
        fetched = all_certs.len(),
        skipped,
        written = summary.written.len(),
        files,
        failed = summary.failures.len(),
        elapsed = %format_duration(started.elapsed()),
        "Run completed"
    );

    Ok(RunSummary {
        postcode,
        postcode_dir,
        fetched: all_certs.len(),
        skipped,
        written: summary.written.len(),
        files,
        failures: summary.failures,
    })
}
