//! # strata-core
//!
//! Foundation crate for the Strata versioned graph store.
//! Defines the revision domain type, error types, and shared collection
//! aliases. Every other crate in the workspace depends on this.

pub mod errors;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use errors::{TemporalError, TemporalResult};
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::revision::Revision;
