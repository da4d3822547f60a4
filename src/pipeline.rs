// src/pipeline.rs
//! One sequential pipeline run: scan → extract → parse → route → upload.
//! Failures are contained at file or batch granularity; only an unreadable
//! incoming directory aborts the invocation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::extract::TextExtractor;
use crate::lifecycle::{self, Disposition};
use crate::parse::{normalize_text, parse_record};
use crate::profile::{DirectionProfile, ExtMatch};
use crate::record::FILE_EXTENSION;
use crate::upload::{upload_in_batches, BatchEvent, RecordSink};

/// One-time metrics registration (so series show up on first render).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fax_files_scanned_total", "Input files discovered per run.");
        describe_counter!(
            "fax_files_processed_total",
            "Files parsed into valid records."
        );
        describe_counter!(
            "fax_files_failed_total",
            "Files that failed extraction or validation."
        );
        describe_counter!(
            "fax_relocation_errors_total",
            "File moves that failed and were left for retry."
        );
        describe_counter!(
            "fax_batches_ok_total",
            "Record batches accepted by the endpoint."
        );
        describe_counter!(
            "fax_batches_failed_total",
            "Record batches rejected or unreachable."
        );
    });
}

/// Structured per-file outcome, emitted instead of free-text logs so tests
/// can assert on it directly.
#[derive(Debug)]
pub struct FileEvent {
    pub path: PathBuf,
    pub disposition: Disposition,
    /// False when the terminal move itself failed; the file then stays in
    /// the incoming set and the next invocation retries it.
    pub relocated: bool,
    pub reason: Option<String>,
}

/// Everything one run did, in order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files: Vec<FileEvent>,
    /// Leftovers moved by the end-of-run sweep (sweeping profile only).
    pub swept: Vec<PathBuf>,
    pub batches: Vec<BatchEvent>,
}

impl RunReport {
    pub fn processed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.disposition == Disposition::Processed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.disposition == Disposition::Failed)
            .count()
    }
}

/// List the incoming set: regular files matching the suffix filter, in a
/// stable order.
pub fn scan_incoming(dir: &Path, ext_match: ExtMatch) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("listing incoming directory {}", dir.display()))?;

    let suffix = format!(".{FILE_EXTENSION}");
    let mut files = Vec::new();
    for entry in entries.flatten() {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let keep = match ext_match {
            ExtMatch::CaseSensitive => name.ends_with(&suffix),
            ExtMatch::CaseInsensitive => name.to_ascii_lowercase().ends_with(&suffix),
        };
        if keep {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Run the whole pipeline once over the configured incoming directory.
pub async fn run_once(
    cfg: &PipelineConfig,
    profile: &DirectionProfile,
    extractor: &dyn TextExtractor,
    sink: &dyn RecordSink,
) -> Result<RunReport> {
    ensure_metrics_described();

    let files = scan_incoming(&cfg.incoming_dir, profile.ext_match)?;
    counter!("fax_files_scanned_total").increment(files.len() as u64);
    info!(
        target: "pipeline",
        count = files.len(),
        dir = %cfg.incoming_dir.display(),
        "incoming scan"
    );

    let mut rng = rand::rng();
    let mut records = Vec::new();
    let mut report = RunReport::default();

    for file in files {
        let (record, reason) = match extractor.extract_text(&file) {
            Ok(text) => {
                let text = normalize_text(&text);
                match fs::read(&file) {
                    Ok(bytes) => {
                        let attachment = BASE64.encode(&bytes);
                        match parse_record(&text, profile, attachment, &mut rng) {
                            Some(rec) => (Some(rec), None),
                            None => (None, Some("required fields missing".to_string())),
                        }
                    }
                    Err(e) => (None, Some(format!("attachment read failed: {e}"))),
                }
            }
            Err(e) => (None, Some(e.to_string())),
        };

        let (disposition, dest) = match &record {
            Some(_) => (Disposition::Processed, &cfg.processed_dir),
            None => (Disposition::Failed, &cfg.failed_dir),
        };

        let relocated = match lifecycle::relocate(&file, dest) {
            Ok(target) => {
                info!(
                    target: "pipeline",
                    file = %file.display(),
                    to = %target.display(),
                    outcome = ?disposition,
                    "file routed"
                );
                true
            }
            Err(e) => {
                warn!(target: "pipeline", error = %e, "relocation failed; file left for next run");
                counter!("fax_relocation_errors_total").increment(1);
                false
            }
        };

        match disposition {
            Disposition::Processed => counter!("fax_files_processed_total").increment(1),
            Disposition::Failed => counter!("fax_files_failed_total").increment(1),
        }
        if let Some(rec) = record {
            records.push(rec);
        }
        report.files.push(FileEvent {
            path: file,
            disposition,
            relocated,
            reason,
        });
    }

    if profile.sweep_leftovers {
        report.swept = lifecycle::sweep_leftovers(&cfg.incoming_dir, &cfg.failed_dir);
    }

    report.batches = upload_in_batches(&records, cfg.batch_size, sink).await;
    for batch in &report.batches {
        if batch.ok() {
            counter!("fax_batches_ok_total").increment(1);
        } else {
            counter!("fax_batches_failed_total").increment(1);
        }
    }

    info!(
        target: "pipeline",
        processed = report.processed_count(),
        failed = report.failed_count(),
        swept = report.swept.len(),
        batches = report.batches.len(),
        "run complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_filters_by_suffix_case_sensitively() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.pdf"), b"x").unwrap();
        fs::write(tmp.path().join("b.PDF"), b"x").unwrap();
        fs::write(tmp.path().join("c.txt"), b"x").unwrap();
        fs::create_dir(tmp.path().join("d.pdf")).unwrap();

        let found = scan_incoming(tmp.path(), ExtMatch::CaseSensitive).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf"]);
    }

    #[test]
    fn scan_can_ignore_suffix_case() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.pdf"), b"x").unwrap();
        fs::write(tmp.path().join("b.PDF"), b"x").unwrap();

        let found = scan_incoming(tmp.path(), ExtMatch::CaseInsensitive).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn scan_of_missing_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan_incoming(&tmp.path().join("gone"), ExtMatch::CaseSensitive).is_err());
    }
}
