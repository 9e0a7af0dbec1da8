use std::path::{Path, PathBuf};

// =============================================================================
// Layout constants
// =============================================================================

/// Default directory holding one subdirectory per package
pub const DEFAULT_PACKAGES_DIR: &str = "temp-ver";

/// Name of the per-version file pointing at the package's conandata.yml
pub const DATA_PATH_FILE_NAME: &str = "data.path";

/// Top-level key of conandata.yml holding the per-version sources
pub const SOURCES_KEY: &str = "sources";

/// Key inside a version entry holding the source URL(s)
pub const URL_KEY: &str = "url";

/// Prefix that marks a source URL as GitHub-hosted (matched literally, case-sensitive)
pub const GITHUB_URL_PREFIX: &str = "https://github.com/";

// =============================================================================
// Logging
// =============================================================================

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Returns the directory of a package inside the packages directory.
pub fn package_dir(base_dir: &Path, package_name: &str) -> PathBuf {
    base_dir.join(package_name)
}

/// Returns the path to the pointer file of a given version directory.
pub fn data_path_file(version_dir: &Path) -> PathBuf {
    version_dir.join(DATA_PATH_FILE_NAME)
}
