//! Conflict extraction and catalog-wide resolution.
//!
//! The conflict subsystem is responsible for:
//! 1. **Extraction** -- picking one revision's variant out of a conflicted
//!    translation string.
//! 2. **Resolution** -- applying extraction to every record of a catalog and
//!    tallying what happened.

pub mod extract;
pub mod resolver;

pub use extract::{extract_variant, is_conflicted, VariantMatcher, CONFLICT_MARKER};
pub use resolver::{resolve, ConflictResolver, Outcome, ResolveReport, RunCounters, UnmatchedEntry};
