//! Listing over a window of the packages directory

use std::io::Write;
use std::ops::Range;

use tracing::debug;

use crate::config::GITHUB_URL_PREFIX;
use crate::package::error::ListError;
use crate::package::repository::PackageRepository;

/// Window of packages to process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRange {
    start: i64,
    /// `None` means up to the last entry
    count: Option<usize>,
}

impl ListRange {
    /// Every entry of the packages directory
    pub fn all() -> Self {
        Self {
            start: 0,
            count: None,
        }
    }

    /// `count` entries starting at `start` (0-based). A negative count is unbounded.
    pub fn new(start: i64, count: i64) -> Self {
        Self {
            start,
            count: usize::try_from(count).ok(),
        }
    }

    /// Resolve against the number of directory entries
    pub fn resolve(&self, total: usize) -> Result<Range<usize>, ListError> {
        let start = usize::try_from(self.start)
            .ok()
            .filter(|start| *start < total)
            .ok_or(ListError::InvalidRange {
                start: self.start,
                total,
            })?;

        let end = match self.count {
            Some(count) => start.saturating_add(count).min(total),
            None => total,
        };
        Ok(start..end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub range: ListRange,
    /// Print the GitHub-origin statistics block after the listing
    pub count_github: bool,
}

/// Counters accumulated over one listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSummary {
    /// Size of the processed window, including non-directory entries
    pub processed: usize,
    /// Packages whose first URL starts with `https://github.com/`
    pub github: usize,
    /// Packages whose lookup failed
    pub errors: usize,
}

/// Print the report for every package directory inside the requested window.
///
/// A failing package is reported inline and counted; it never stops the listing.
pub fn list_packages<R, W>(
    repository: &R,
    options: &ListOptions,
    out: &mut W,
) -> Result<ListSummary, ListError>
where
    R: PackageRepository + ?Sized,
    W: Write + ?Sized,
{
    let base_dir = repository.base_dir();
    let entries = repository
        .entries()
        .map_err(|source| ListError::ReadDir {
            path: base_dir.clone(),
            source,
        })?;

    if entries.is_empty() {
        writeln!(out, "No packages found")?;
        return Ok(ListSummary::default());
    }

    let range = options.range.resolve(entries.len())?;
    writeln!(
        out,
        "Listing packages {} to {} (total: {}) in directory: {}\n",
        range.start + 1,
        range.end,
        entries.len(),
        base_dir.display()
    )?;

    let mut summary = ListSummary {
        processed: range.len(),
        ..ListSummary::default()
    };

    for (index, entry) in entries.iter().enumerate().take(range.end).skip(range.start) {
        if !entry.is_dir {
            continue;
        }

        writeln!(out, "=== Package {}: {} ===", index + 1, entry.name)?;
        match repository.read_package(&entry.name) {
            Ok(info) => {
                writeln!(out, "{info}")?;
                if info.is_github_hosted() {
                    summary.github += 1;
                }
            }
            Err(err) => {
                debug!(package = %entry.name, error = %err, "Package lookup failed");
                writeln!(out, "Error: {err}\n")?;
                summary.errors += 1;
            }
        }
    }

    if options.count_github {
        writeln!(out, "\n=== Statistics ===")?;
        writeln!(
            out,
            "Packages with first URL starting with {GITHUB_URL_PREFIX}: {}/{}",
            summary.github, summary.processed
        )?;
        writeln!(
            out,
            "Packages with errors: {}/{}",
            summary.errors, summary.processed
        )?;
    }

    Ok(summary)
}
