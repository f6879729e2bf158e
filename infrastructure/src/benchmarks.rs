//! Human benchmark file loading.
//!
//! Benchmarks arrive as a JSON array of rows collected outside this
//! system. Rows are validated through the domain constructor, so a wrong
//! distribution arity is rejected here rather than surfacing later inside
//! a correlation run.

use std::path::Path;

use panel_domain::{BenchmarkId, DomainError, HumanBenchmark};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a benchmark file
#[derive(Debug, Error)]
pub enum BenchmarkLoadError {
    #[error("Failed to read benchmark file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse benchmark file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid benchmark '{label}': {source}")]
    Invalid {
        label: String,
        #[source]
        source: DomainError,
    },
}

/// One raw benchmark row as written in the file.
#[derive(Debug, Deserialize)]
struct BenchmarkRow {
    label: String,
    #[serde(default)]
    session_label: Option<String>,
    criterion: String,
    distribution: Vec<f64>,
    #[serde(default)]
    sample_size: Option<u32>,
}

/// Loads and validates benchmark rows; ids are assigned by file position.
pub fn load_benchmarks(path: &Path) -> Result<Vec<HumanBenchmark>, BenchmarkLoadError> {
    let content = std::fs::read_to_string(path)?;
    let rows: Vec<BenchmarkRow> = serde_json::from_str(&content)?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            HumanBenchmark::new(
                BenchmarkId::new(index as u64 + 1),
                row.label.clone(),
                row.session_label,
                row.criterion,
                row.distribution,
                row.sample_size,
            )
            .map_err(|source| BenchmarkLoadError::Invalid {
                label: row.label,
                source,
            })
        })
        .collect()
}
