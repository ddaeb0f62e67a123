//! # strata-temporal
//!
//! The time-travel core of the Strata versioned graph store: in-memory
//! structures answering "what was this attribute's value as of revision N"
//! on every attribute access.
//!
//! Two structures do the work:
//!
//! - [`WindowMap`] — a revision-windowed map. History is kept split into a
//!   `past` and a `future` deque whose concatenation is always sorted
//!   ascending by revision; a merge-style `seek` slides the split point so
//!   that repeated or neighbouring lookups cost O(1) amortized.
//! - [`CursorList`] — a doubly-linked sequence with a persistent cursor
//!   (the "waist"), giving O(1) access at the last-visited position and
//!   O(|Δ|) relative seeks. Used wherever the wider store needs
//!   locality-optimized indexed access.
//!
//! Both are single-threaded and purely in-memory; callers serialize access
//! externally and retain values, never node handles.

mod arena;
pub mod cursor;
pub mod deque;
pub mod window;

pub use cursor::CursorList;
pub use deque::LinkedDeque;
pub use window::WindowMap;
