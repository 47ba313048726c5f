//! Query loading from CSV input.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Name of the required input column.
pub const QUERY_COLUMN: &str = "query";

/// Query loading errors.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The file has no `query` column.
    #[error("{path} must have a 'query' column")]
    MissingColumn { path: PathBuf },

    /// CSV decoding or IO error.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for query loading.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Read the non-blank values of the `query` column, trimmed, in file order.
pub fn load_queries(path: &Path) -> Result<Vec<String>> {
    let csv_err = |source| QueryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let column = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == QUERY_COLUMN)
        .ok_or_else(|| QueryError::MissingColumn {
            path: path.to_path_buf(),
        })?;

    let mut queries = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        if let Some(query) = row.get(column).map(str::trim).filter(|q| !q.is_empty()) {
            queries.push(query.to_string());
        }
    }

    debug!(path = %path.display(), count = queries.len(), "loaded queries");
    Ok(queries)
}
