//! Package lookup over a packages directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::config;
use crate::package::error::PackageError;
use crate::package::layout::{DirEntryInfo, first_version_dir, read_dir_sorted};
use crate::package::pointer::read_data_path;
use crate::package::types::PackageInfo;
use crate::parser::extract_first_source;

/// Source of package entries and package information
#[cfg_attr(test, automock)]
pub trait PackageRepository {
    /// Directory the packages live in, used for reporting
    fn base_dir(&self) -> PathBuf;

    /// Top-level entries, ordered by name
    fn entries(&self) -> io::Result<Vec<DirEntryInfo>>;

    /// Look up version and source URL(s) of a single package
    fn read_package(&self, package_name: &str) -> Result<PackageInfo, PackageError>;
}

/// Repository backed by a local directory tree
#[derive(Debug, Clone)]
pub struct FsRepository {
    base_dir: PathBuf,
}

impl FsRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl PackageRepository for FsRepository {
    fn base_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    fn entries(&self) -> io::Result<Vec<DirEntryInfo>> {
        read_dir_sorted(&self.base_dir)
    }

    fn read_package(&self, package_name: &str) -> Result<PackageInfo, PackageError> {
        read_package_info(&self.base_dir, package_name)
    }
}

/// Run the full lookup for one package:
/// first version directory -> `data.path` -> conandata.yml -> first `sources` entry
pub fn read_package_info(base_dir: &Path, package_name: &str) -> Result<PackageInfo, PackageError> {
    let version_dir = first_version_dir(base_dir, package_name)?;

    let metadata_path = read_data_path(&config::data_path_file(&version_dir.path))?;
    debug!(
        package = package_name,
        metadata = %metadata_path.display(),
        "Resolved metadata file"
    );

    let content = fs::read_to_string(&metadata_path).map_err(|source| PackageError::Io {
        path: metadata_path.clone(),
        source,
    })?;

    let source = extract_first_source(&content).map_err(|source| PackageError::Metadata {
        path: metadata_path,
        source,
    })?;

    Ok(PackageInfo {
        name: package_name.to_string(),
        first_version: source.version,
        first_urls: source.urls,
    })
}
