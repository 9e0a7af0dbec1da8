//! Package lookup layer
//!
//! Walks the local recipe tree and turns a package name into a [`PackageInfo`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Layout    │────▶│   Pointer   │────▶│  conandata  │
//! │ (version dir│     │ (data.path) │     │  (parser)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        ▲                                       │
//!        │                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │   Listing   │────────────────────────▶│ PackageInfo │
//! │ (aggregate) │                         │  (report)   │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`layout`]: Directory listing and first version selection
//! - [`pointer`]: Reads the `data.path` pointer file
//! - [`repository`]: `PackageRepository` trait and the filesystem implementation
//! - [`listing`]: Windowed listing with per-package error isolation and statistics
//! - [`types`]: `PackageInfo` record and its text rendering
//! - [`error`]: Error types for lookups and listings

pub mod error;
pub mod layout;
pub mod listing;
pub mod pointer;
pub mod repository;
pub mod types;

pub use error::{ListError, PackageError};
pub use listing::{ListOptions, ListRange, ListSummary, list_packages};
pub use repository::{FsRepository, PackageRepository, read_package_info};
pub use types::PackageInfo;
