//! Revision-windowed map.
//!
//! `WindowMap` keeps every value an attribute has had over time, keyed by
//! revision number. Looking up a revision returns the value effective as of
//! that revision: the entry with the greatest recorded revision at or below
//! it. Once a revision is set, all greater revisions see its value until the
//! next recorded entry; an entry whose value is the unset sentinel means the
//! attribute is absent from that revision onward.
//!
//! History is held in two deques, `past` and `future`, whose concatenation
//! is always strictly ascending by revision. Every access first calls
//! [`WindowMap::seek`], which slides contiguous runs across the split point
//! until the queried revision's floor entry is the tail of `past`. This is a
//! merge-style rebalance, not a binary search: repeated or neighbouring
//! lookups — the dominant workload of time-stepped history traversal — cost
//! O(1) amortized, degrading to O(distance moved) for far jumps. Seek never
//! re-sorts and never drops entries.

mod serde_impl;
mod views;

pub use views::{ItemsView, Iter, Keys, KeysView, Values, ValuesView};

use smallvec::SmallVec;
use strata_core::{FxHashMap, Revision, TemporalError, TemporalResult};
use tracing::{debug, trace};

use crate::deque::LinkedDeque;

/// One recorded point in an attribute's history. `None` is the unset
/// sentinel: the attribute has no value from this revision onward.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry<V> {
    pub(crate) rev: Revision,
    pub(crate) value: Option<V>,
}

/// A map from revision numbers to the value effective as of that revision.
///
/// All operations are keyed by revision. Reads and writes position the
/// past/future window first, so a `&mut self` receiver is required even for
/// lookups; iteration and the views do not move the window.
#[derive(Debug, Clone)]
pub struct WindowMap<V> {
    past: LinkedDeque<Entry<V>>,
    future: LinkedDeque<Entry<V>>,
}

impl<V> WindowMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            past: LinkedDeque::new(),
            future: LinkedDeque::new(),
        }
    }

    /// Build a map from unordered `(revision, value)` entries.
    ///
    /// The input is sorted ascending once and loaded into `past`. Duplicate
    /// revisions are a caller error reported as
    /// [`TemporalError::OrderingViolation`].
    pub fn from_entries<I>(entries: I) -> TemporalResult<Self>
    where
        I: IntoIterator<Item = (Revision, V)>,
    {
        // Attribute histories are short in the common case; keep the sort
        // buffer inline for them.
        let mut buf: SmallVec<[(Revision, V); 8]> = entries.into_iter().collect();
        buf.sort_by_key(|(rev, _)| *rev);

        let mut past: LinkedDeque<Entry<V>> = LinkedDeque::with_capacity(buf.len());
        for (rev, value) in buf {
            if past.back().is_some_and(|tail| tail.rev == rev) {
                return Err(TemporalError::OrderingViolation { rev, tail: rev });
            }
            past.push_back(Entry {
                rev,
                value: Some(value),
            });
        }
        Ok(Self {
            past,
            future: LinkedDeque::new(),
        })
    }

    /// Build a map from an unordered mapping. Hash map keys are unique, so
    /// this cannot fail.
    pub fn from_map(map: FxHashMap<Revision, V>) -> Self {
        let mut buf: SmallVec<[(Revision, V); 8]> = map.into_iter().collect();
        buf.sort_by_key(|(rev, _)| *rev);

        let mut past = LinkedDeque::with_capacity(buf.len());
        for (rev, value) in buf {
            past.push_back(Entry {
                rev,
                value: Some(value),
            });
        }
        Self {
            past,
            future: LinkedDeque::new(),
        }
    }

    /// Number of recorded entries (including unset sentinels).
    pub fn len(&self) -> usize {
        self.past.len() + self.future.len()
    }

    /// Whether no entry has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    /// The lowest recorded revision, if any.
    pub fn first_rev(&self) -> Option<Revision> {
        self.past
            .front()
            .or_else(|| self.future.front())
            .map(|entry| entry.rev)
    }

    /// The highest recorded revision, if any.
    pub fn last_rev(&self) -> Option<Revision> {
        self.future
            .back()
            .or_else(|| self.past.back())
            .map(|entry| entry.rev)
    }

    /// Rebalance the window for `rev`: afterwards every entry in `past` has
    /// revision ≤ `rev` and every entry in `future` has revision > `rev`
    /// (or the respective side is empty). Entries are only relocated across
    /// the split point, never reordered or dropped.
    pub fn seek(&mut self, rev: Revision) {
        let mut moved: usize = 0;

        while self.past.back().is_some_and(|entry| entry.rev > rev) {
            if let Some(entry) = self.past.pop_back() {
                self.future.push_front(entry);
                moved += 1;
            }
        }
        while self.future.front().is_some_and(|entry| entry.rev <= rev) {
            if let Some(entry) = self.future.pop_front() {
                self.past.push_back(entry);
                moved += 1;
            }
        }

        if moved > 0 {
            trace!(rev, moved, "seek relocated entries across the window");
        }
    }

    /// The value effective as of `rev`.
    ///
    /// Returns `Ok(None)` when the floor entry is the unset sentinel, and
    /// [`TemporalError::NotFound`] when no revision ≤ `rev` was ever
    /// recorded.
    pub fn get(&mut self, rev: Revision) -> TemporalResult<Option<&V>> {
        self.seek(rev);
        match self.past.back() {
            Some(entry) => Ok(entry.value.as_ref()),
            None => Err(TemporalError::NotFound { rev }),
        }
    }

    /// Record `value` at `rev`.
    ///
    /// Setting the revision already at the window tail overwrites it in
    /// place. Setting a revision greater than everything recorded appends.
    /// Setting a revision below any recorded one is an
    /// [`TemporalError::OrderingViolation`]: history only moves forward,
    /// except through [`WindowMap::truncate_from`].
    pub fn set(&mut self, rev: Revision, value: V) -> TemporalResult<()> {
        if self.is_empty() {
            self.past.push_back(Entry {
                rev,
                value: Some(value),
            });
            return Ok(());
        }

        self.seek(rev);

        if let Some(tail) = self.past.back() {
            if tail.rev == rev {
                if let Some(tail) = self.past.back_mut() {
                    tail.value = Some(value);
                }
                return Ok(());
            }
        }

        // Appending a revision that is not the current floor requires that
        // nothing later is recorded; otherwise this would rewrite the middle
        // of history.
        if let Some(next) = self.future.front() {
            let tail = self
                .last_rev()
                .unwrap_or(next.rev);
            return Err(TemporalError::OrderingViolation { rev, tail });
        }

        self.past.push_back(Entry {
            rev,
            value: Some(value),
        });
        Ok(())
    }

    /// Apply a batch of assignments by repeated [`WindowMap::set`], in the
    /// order supplied. No implicit sort: out-of-order revisions fail with
    /// the same ordering error `set` reports.
    pub fn update<I>(&mut self, entries: I) -> TemporalResult<()>
    where
        I: IntoIterator<Item = (Revision, V)>,
    {
        for (rev, value) in entries {
            self.set(rev, value)?;
        }
        Ok(())
    }

    /// Discard all recorded history at or after `rev`, leaving a single
    /// unset sentinel at exactly `rev`.
    ///
    /// This is destructive and irreversible — "rewrite history forward from
    /// here", the rewind/rebase primitive — not a point deletion. Afterwards
    /// `get(r)` is unchanged for `r < rev` and reports the attribute absent
    /// for every `r ≥ rev`.
    pub fn truncate_from(&mut self, rev: Revision) {
        // Stage the whole history in `future`, ascending.
        while let Some(entry) = self.past.pop_back() {
            self.future.push_front(entry);
        }

        // Keep the strictly-earlier prefix; the first entry at or after
        // `rev` — and everything behind it — is discarded.
        let mut dropped: usize = 0;
        while let Some(entry) = self.future.pop_front() {
            if entry.rev < rev {
                self.past.push_back(entry);
            } else {
                dropped = 1 + self.future.len();
                self.future.clear();
                break;
            }
        }

        self.past.push_back(Entry { rev, value: None });
        debug!(rev, dropped, "truncated history");
    }

    /// The last revision strictly before `rev` on which the value changed.
    pub fn rev_before(&mut self, rev: Revision) -> TemporalResult<Revision> {
        self.seek(rev);
        let tail_rev = self
            .past
            .back()
            .map(|entry| entry.rev)
            .ok_or(TemporalError::NotFound { rev })?;
        if tail_rev < rev {
            return Ok(tail_rev);
        }
        // The floor entry sits exactly at `rev`; report the change before it.
        self.past
            .get(-2)
            .map(|entry| entry.rev)
            .map_err(|_| TemporalError::NotFound { rev })
    }

    /// The next revision after `rev` on which the value changes, or `None`
    /// if no later change is recorded.
    pub fn rev_after(&mut self, rev: Revision) -> Option<Revision> {
        self.seek(rev);
        self.future.front().map(|entry| entry.rev)
    }

    /// Iterate over all recorded `(revision, value)` pairs in ascending
    /// order, walking `past` then `future` without moving the window.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// View over the recorded revisions.
    pub fn keys(&self) -> KeysView<'_, V> {
        KeysView::new(self)
    }

    /// View over the recorded `(revision, value)` pairs.
    pub fn items(&self) -> ItemsView<'_, V> {
        ItemsView::new(self)
    }

    /// View over the recorded values.
    pub fn values(&self) -> ValuesView<'_, V> {
        ValuesView::new(self)
    }

    /// Verify that the concatenation of `past` and `future` is strictly
    /// ascending by revision. A failure here is a bug in this module, not a
    /// caller error.
    pub fn check_invariants(&self) -> TemporalResult<()> {
        let mut prev: Option<Revision> = None;
        for entry in self.past.iter().chain(self.future.iter()) {
            if let Some(prev) = prev {
                if prev >= entry.rev {
                    return Err(TemporalError::InvariantViolation(format!(
                        "history not strictly ascending: {} then {}",
                        prev, entry.rev
                    )));
                }
            }
            prev = Some(entry.rev);
        }
        Ok(())
    }

    pub(crate) fn past(&self) -> &LinkedDeque<Entry<V>> {
        &self.past
    }

    pub(crate) fn future(&self) -> &LinkedDeque<Entry<V>> {
        &self.future
    }
}

impl<V> Default for WindowMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality compares the full ordered history of both maps, independent of
/// where each map's window currently sits.
impl<V: PartialEq> PartialEq for WindowMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .past
                .iter()
                .chain(self.future.iter())
                .eq(other.past.iter().chain(other.future.iter()))
    }
}

impl<V: Eq> Eq for WindowMap<V> {}

impl<'a, V> IntoIterator for &'a WindowMap<V> {
    type Item = (Revision, Option<&'a V>);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}
