//! Inspect a local package recipe tree and report, per package, the first
//! declared version and its source URL(s) from conandata.yml.

pub mod cli;
pub mod config;
pub mod log;
pub mod package;
pub mod parser;
