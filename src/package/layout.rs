//! On-disk layout: `<base>/<package>/<version>/data.path`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config;
use crate::package::error::PackageError;

/// Entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    /// Whether the entry itself is a directory (symlinks are not followed)
    pub is_dir: bool,
}

impl DirEntryInfo {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Version directory selected for a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDir {
    pub name: String,
    pub path: PathBuf,
}

/// List the entries of `dir`, ordered by file name.
///
/// The order is lexical on the raw name, never a version ordering. Entries
/// whose name is not valid UTF-8 are skipped.
pub fn read_dir_sorted(dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!(dir = %dir.display(), name = ?raw, "Skipping entry with non UTF-8 name");
                continue;
            }
        };
        entries.push(DirEntryInfo {
            name,
            is_dir: entry.file_type()?.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Select the first version subdirectory of a package.
///
/// Files next to the version directories are skipped.
pub fn first_version_dir(base_dir: &Path, package_name: &str) -> Result<VersionDir, PackageError> {
    let package_dir = config::package_dir(base_dir, package_name);

    if let Err(e) = fs::metadata(&package_dir)
        && e.kind() == io::ErrorKind::NotFound
    {
        return Err(PackageError::NotFound(package_name.to_string()));
    }

    let entries = read_dir_sorted(&package_dir).map_err(|source| PackageError::Io {
        path: package_dir.clone(),
        source,
    })?;

    if entries.is_empty() {
        return Err(PackageError::NoEntries(package_name.to_string()));
    }

    let version = entries
        .into_iter()
        .find(|entry| entry.is_dir)
        .ok_or_else(|| PackageError::NoVersionFound(package_name.to_string()))?;

    debug!(package = package_name, version = %version.name, "Selected version directory");

    Ok(VersionDir {
        path: package_dir.join(&version.name),
        name: version.name,
    })
}
