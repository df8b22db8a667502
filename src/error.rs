//! Error types for the dataset I/O boundary.
//!
//! The reconciliation core itself is total: matching, de-duplication,
//! status resolution, and aggregation never fail — malformed fields
//! degrade to "signal absent". Errors only exist where files enter the
//! system.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading dataset files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DataError::Parse {
            path: path.into(),
            source,
        }
    }
}
