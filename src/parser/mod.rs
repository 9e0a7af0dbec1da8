//! Parser layer
//! - yaml.rs: YAML document view built from tree-sitter (mapping/sequence/scalar/alias)
//! - conandata.rs: conandata.yml `sources` extractor

pub mod conandata;
pub mod yaml;

pub use conandata::{ExtractError, SourceEntry, extract_first_source};
pub use yaml::{NodeKind, YamlError, YamlNode, parse_document};
