//! skillmap types - core data model shared by the skillmap crates
//!
//! Defines the category taxonomy, worker records, report entries and the
//! level rules (bounds and length reconciliation) every other crate relies on.

pub mod error;
pub mod level;
pub mod taxonomy;
pub mod worker;

pub use error::SkillError;
pub use level::{reconcile, validate_level, validate_levels, SkillLevel, MAX_LEVEL, MIN_LEVEL};
pub use taxonomy::{CategoryGroup, Taxonomy};
pub use worker::{ReportEntry, WorkerRecord};
