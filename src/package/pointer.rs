//! Reader for the per-version `data.path` pointer file

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::package::error::PackageError;

/// Read the first line of a pointer file and return it as a path.
///
/// The line ending (`\n` or `\r\n`) is removed; nothing else is trimmed.
/// Relative paths are returned as written and resolve against the working directory.
pub fn read_data_path(pointer_file: &Path) -> Result<PathBuf, PackageError> {
    let io_error = |source| PackageError::Io {
        path: pointer_file.to_path_buf(),
        source,
    };

    let file = File::open(pointer_file).map_err(io_error)?;
    match BufReader::new(file).lines().next() {
        Some(Ok(line)) => Ok(PathBuf::from(line)),
        Some(Err(source)) => Err(io_error(source)),
        None => Err(PackageError::EmptyFile {
            path: pointer_file.to_path_buf(),
        }),
    }
}
