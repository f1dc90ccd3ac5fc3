//! Batch runner - analyzes every record file of a directory

pub mod report;

pub use report::{AnalysisReport, BuffUptimeRow};

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{stream, StreamExt};
use tracing::{error, info, warn};

use crate::analysis::analyze_session;
use crate::config::Config;
use crate::demo::{decode, DecodeError};

/// Counts of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub analyzed: usize,
    pub failed: usize,
}

/// Runner errors
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Analysis worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RunnerError + '_ {
    move |source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Record files in `dir` with the configured extension, sorted by name
pub async fn list_records(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, RunnerError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error(dir))?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(io_error(dir))? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Decode, analyze and serialize one record buffer
fn analyze_buffer(path: &Path, raw: &[u8]) -> Result<Vec<u8>, RunnerError> {
    let record = decode(raw).map_err(|source| RunnerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let analysis = analyze_session(&record);
    let report = AnalysisReport::new(path.display().to_string(), &record, analysis);
    Ok(serde_json::to_vec_pretty(&report)?)
}

/// Analyze one record file and write its report, returning the report path
pub async fn process_record(path: PathBuf, output_dir: &Path) -> Result<PathBuf, RunnerError> {
    let raw = Bytes::from(tokio::fs::read(&path).await.map_err(io_error(&path))?);

    let worker_path = path.clone();
    let json = tokio::task::spawn_blocking(move || analyze_buffer(&worker_path, &raw)).await??;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "record".to_string());
    let out = output_dir.join(format!("{stem}.json"));
    tokio::fs::write(&out, json).await.map_err(io_error(&out))?;

    Ok(out)
}

/// Analyze every record of the input directory.
///
/// A record that fails is logged and skipped; only failures to list the input
/// or create the output directory abort the batch.
pub async fn run_batch(config: &Config) -> Result<BatchOutcome, RunnerError> {
    let paths = list_records(&config.input_dir, &config.record_extension).await?;
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(io_error(&config.output_dir))?;

    if paths.is_empty() {
        warn!(input_dir = %config.input_dir.display(), "No records found");
        return Ok(BatchOutcome::default());
    }
    info!(records = paths.len(), "Analyzing records");

    let output_dir = config.output_dir.as_path();
    let results: Vec<(PathBuf, Result<PathBuf, RunnerError>)> = stream::iter(paths)
        .map(|path| async move {
            let result = process_record(path.clone(), output_dir).await;
            (path, result)
        })
        .buffer_unordered(config.max_concurrent_records)
        .collect()
        .await;

    let mut outcome = BatchOutcome::default();
    for (path, result) in results {
        match result {
            Ok(report) => {
                info!(record = %path.display(), report = %report.display(), "Record analyzed");
                outcome.analyzed += 1;
            }
            Err(e) => {
                error!(record = %path.display(), error = %e, "Skipping record");
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}
