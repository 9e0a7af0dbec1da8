//! Package record produced by a lookup

use std::fmt;

use crate::config::GITHUB_URL_PREFIX;

/// Version and source information of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package directory name (e.g., "zlib")
    pub name: String,
    /// First version declared under `sources` in conandata.yml
    pub first_version: String,
    /// Source URL(s) of that version, in document order
    pub first_urls: Vec<String>,
}

impl PackageInfo {
    pub fn first_url(&self) -> Option<&str> {
        self.first_urls.first().map(String::as_str)
    }

    /// Whether the primary source URL points at github.com
    ///
    /// The prefix is matched literally: no case folding, no scheme normalization.
    pub fn is_github_hosted(&self) -> bool {
        self.first_url()
            .is_some_and(|url| url.starts_with(GITHUB_URL_PREFIX))
    }
}

/// Renders the three-line report block, each line terminated by a newline
impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package: {}", self.name)?;
        writeln!(f, "Version: {}", self.first_version)?;
        writeln!(f, "URLs: [{}]", self.first_urls.join(" "))
    }
}
