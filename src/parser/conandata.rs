//! conandata.yml `sources` extractor

use crate::config::{SOURCES_KEY, URL_KEY};
use crate::parser::yaml::{NodeKind, YamlError, YamlNode, parse_document};

/// First entry of the `sources` mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Version key as written in the document (e.g. "1.3.1")
    pub version: String,
    /// Source URLs in document order
    pub urls: Vec<String>,
}

/// Error type for extracting source information from a YAML document
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The document is not valid YAML
    #[error("failed to parse YAML content: {0}")]
    Parse(#[from] YamlError),

    /// A required key is missing, or its parent is not a mapping
    #[error("key not found: {0}")]
    KeyNotFound(&'static str),

    /// `sources` is a mapping without entries
    #[error("sources has no entries")]
    EmptySources,

    /// The first `sources` entry is not a mapping
    #[error("sources entry {version} is not a mapping node: found {found}")]
    TypeMismatch { version: String, found: NodeKind },

    /// `url` (or one of its items) is neither a scalar nor a sequence of scalars
    #[error("unsupported URL format: {0}")]
    UnsupportedFormat(NodeKind),
}

/// Extract the first declared version and its URL(s) from conandata.yml content.
///
/// "First" is positional: the first key of `sources` in document order, never
/// the highest version.
pub fn extract_first_source(content: &str) -> Result<SourceEntry, ExtractError> {
    let root = parse_document(content)?;

    let sources = root
        .as_ref()
        .and_then(|root| root.get(SOURCES_KEY))
        .filter(|sources| sources.kind() == NodeKind::Mapping)
        .ok_or(ExtractError::KeyNotFound(SOURCES_KEY))?;

    let (version, version_node) = sources.first_entry().ok_or(ExtractError::EmptySources)?;
    if version_node.kind() != NodeKind::Mapping {
        return Err(ExtractError::TypeMismatch {
            version: version.to_string(),
            found: version_node.kind(),
        });
    }

    let url = version_node
        .get(URL_KEY)
        .ok_or(ExtractError::KeyNotFound(URL_KEY))?;

    Ok(SourceEntry {
        version: version.to_string(),
        urls: collect_urls(url)?,
    })
}

fn collect_urls(node: &YamlNode) -> Result<Vec<String>, ExtractError> {
    match node {
        YamlNode::Scalar(url) => Ok(vec![url.clone()]),
        YamlNode::Sequence(items) => items
            .iter()
            .map(|item| {
                item.as_scalar()
                    .map(str::to_string)
                    .ok_or(ExtractError::UnsupportedFormat(item.kind()))
            })
            .collect(),
        other => Err(ExtractError::UnsupportedFormat(other.kind())),
    }
}
