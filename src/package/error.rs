use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ExtractError;

/// Failure of the single-package lookup pipeline
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("package {0} does not exist")]
    NotFound(String),

    #[error("no versions found for package {0}")]
    NoEntries(String),

    #[error("no version directories found for package {0}")]
    NoVersionFound(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", .path.display())]
    EmptyFile { path: PathBuf },

    #[error("failed to extract sources from {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

/// Failure of the listing as a whole
///
/// Per-package failures never end up here; they are reported inline and counted.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read packages directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid start position: {start} (total packages: {total})")]
    InvalidRange { start: i64, total: usize },

    #[error("requires start and count arguments when --all is not specified")]
    MissingArguments,

    #[error("invalid {name}: {source}")]
    InvalidArgument {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },

    /// Writing the report failed
    #[error(transparent)]
    Output(#[from] std::io::Error),
}
