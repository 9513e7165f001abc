//! pomerge core library.
//!
//! This crate provides the building blocks for resolving merge-conflict
//! markers inside gettext catalogs: the catalog model, the PO codec,
//! conflict extraction and resolution, and configuration.

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod errors;
pub mod po;

// Re-exports for convenience.
pub use catalog::{Catalog, Entry, Flags};
pub use config::ToolConfig;
pub use conflict::{ConflictResolver, ResolveReport, RunCounters};
pub use po::{CatalogStore, PoFile};
