//! The revision domain type.

/// A point in the version history of an attribute's value.
///
/// Revisions are plain ordered integers assigned by the surrounding
/// branch/revision bookkeeping layer; the temporal structures only rely
/// on their total order. Signed so that callers may use negative
/// revisions for pre-history defaults.
pub type Revision = i64;
