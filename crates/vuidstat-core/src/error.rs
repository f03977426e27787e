//! Fatal error classes
//!
//! Every variant aborts a run. Recoverable conditions (empty ratio
//! denominators, unknown identifiers in a status query, passing checks) are
//! modelled as values, never as errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The registry file is missing, is not valid JSON, or lacks the
    /// version descriptor or the validation table.
    #[error("registry {path} is unreadable: {reason}")]
    RegistryUnreadable { path: PathBuf, reason: String },

    /// A generated source file was not found in any candidate build directory.
    #[error("generated source {file} not found in any of: {}", searched.join(", "))]
    GeneratedSourceMissing { file: String, searched: Vec<String> },

    /// An identifier reached classification without a recognized prefix.
    /// This is a bug in the marker scanner, not bad input.
    #[error("scanner produced identifier without a recognized prefix: {id}")]
    ScannerPrefixViolation { id: String },

    /// An implementation or test source file could not be read.
    #[error("failed to read source file {path}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
