//! Errors reported by the temporal data structures.

use crate::types::revision::Revision;

/// Errors that can occur in the temporal core.
///
/// None of these are transient: the structures are pure in-memory logic,
/// so every error is final for the calling operation and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemporalError {
    /// No value has been recorded at or before the queried revision.
    #[error("no value recorded at or before revision {rev}")]
    NotFound { rev: Revision },

    /// An index or relative seek walked past an end of the sequence.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: isize, len: usize },

    /// An assignment tried to insert a revision below the recorded tail.
    /// This is a caller error: once the window has been positioned, history
    /// may only be rewritten through truncation, never in place.
    #[error("revision {rev} is below the recorded tail {tail}")]
    OrderingViolation { rev: Revision, tail: Revision },

    /// Internal corruption: past++future not ascending, or a cursor
    /// referencing a node no longer in its chain. Unreachable given
    /// correct internal logic; reported instead of panicking so tests
    /// can assert on it.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Convenience type alias.
pub type TemporalResult<T> = Result<T, TemporalError>;
