//! Shared collection aliases.
//!
//! Hashing in this workspace never needs DoS resistance (keys are internal
//! revision numbers and interned ids), so FxHash is used throughout.

pub use rustc_hash::{FxHashMap, FxHashSet};
