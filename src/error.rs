// ABOUTME: Error taxonomy for export and import runs
// ABOUTME: Every variant is terminal; main maps any of them to exit code 1

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by the export and import operations
///
/// Each variant corresponds to one step of a run. None of them are retried:
/// the first error aborts the run and is reported by the binary.
#[derive(Debug, Error)]
pub enum MigratorError {
    /// The DynamoDB client could not be configured
    #[error("Failed to configure DynamoDB client: {0}")]
    Config(String),

    #[error("Failed to describe table '{table}'")]
    SchemaLookup {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to scan table '{table}' (page {page})")]
    Scan {
        table: String,
        page: usize,
        #[source]
        source: StoreError,
    },

    /// A scanned record holds a value that has no JSON representation
    #[error("Failed to decode item {index}, attribute '{attribute}': {reason}")]
    Decode {
        index: usize,
        attribute: String,
        reason: String,
    },

    #[error("Failed to encode export document as JSON")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to read import file '{}'", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse import file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing one item failed; items before `position` are already committed
    #[error("Failed to write item {position}/{total} into table '{table}'")]
    Write {
        table: String,
        position: usize,
        total: usize,
        #[source]
        source: StoreError,
    },
}

pub type Result<T> = std::result::Result<T, MigratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_names_position() {
        let err = MigratorError::Write {
            table: "foo".to_string(),
            position: 3,
            total: 10,
            source: StoreError::Rejected {
                reason: "missing key attribute 'id'".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Failed to write item 3/10 into table 'foo'");

        let source = std::error::Error::source(&err).expect("source should be attached");
        assert!(source.to_string().contains("missing key attribute 'id'"));
    }

    #[test]
    fn test_file_read_error_shows_path() {
        let err = MigratorError::FileRead {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
