//! Read-only views over a [`WindowMap`]'s recorded history.
//!
//! The views walk `past` then `future` in ascending revision order without
//! moving the window, so they are safe to restart and to interleave with
//! reads. Containment checks agree with iteration; an item query below the
//! lowest recorded revision is answered negatively without a walk.

use strata_core::Revision;

use super::{Entry, WindowMap};
use crate::deque;

/// Iterator over `(revision, value)` pairs in ascending revision order.
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    inner: std::iter::Chain<deque::Iter<'a, Entry<V>>, deque::Iter<'a, Entry<V>>>,
}

impl<'a, V> Iter<'a, V> {
    pub(super) fn new(map: &'a WindowMap<V>) -> Self {
        Self {
            inner: map.past().iter().chain(map.future().iter()),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Revision, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| (entry.rev, entry.value.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// Iterator over recorded revisions in ascending order.
#[derive(Debug, Clone)]
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = Revision;

    fn next(&mut self) -> Option<Revision> {
        self.inner.next().map(|(rev, _)| rev)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// Iterator over recorded values in ascending revision order. Unset
/// sentinel entries yield `None`.
#[derive(Debug, Clone)]
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = Option<&'a V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

/// View over the recorded revisions.
#[derive(Debug, Clone, Copy)]
pub struct KeysView<'a, V> {
    map: &'a WindowMap<V>,
}

impl<'a, V> KeysView<'a, V> {
    pub(super) fn new(map: &'a WindowMap<V>) -> Self {
        Self { map }
    }

    /// Iterate over the revisions in ascending order.
    pub fn iter(&self) -> Keys<'a, V> {
        Keys {
            inner: self.map.iter(),
        }
    }

    /// Whether an entry is recorded at exactly `rev`.
    pub fn contains(&self, rev: Revision) -> bool {
        match (self.map.first_rev(), self.map.last_rev()) {
            (Some(first), Some(last)) if first <= rev && rev <= last => {
                self.iter().any(|r| r == rev)
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<'a, V> IntoIterator for &KeysView<'a, V> {
    type Item = Revision;
    type IntoIter = Keys<'a, V>;

    fn into_iter(self) -> Keys<'a, V> {
        self.iter()
    }
}

/// View over the recorded `(revision, value)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct ItemsView<'a, V> {
    map: &'a WindowMap<V>,
}

impl<'a, V> ItemsView<'a, V> {
    pub(super) fn new(map: &'a WindowMap<V>) -> Self {
        Self { map }
    }

    /// Iterate over the pairs in ascending revision order.
    pub fn iter(&self) -> Iter<'a, V> {
        self.map.iter()
    }

    /// Whether the exact `(revision, value)` pair is recorded. A revision
    /// below everything currently recorded is answered `false` outright.
    pub fn contains(&self, rev: Revision, value: Option<&V>) -> bool
    where
        V: PartialEq,
    {
        if self.map.first_rev().map_or(true, |first| rev < first) {
            return false;
        }
        self.iter().any(|(r, v)| r == rev && v == value)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<'a, V> IntoIterator for &ItemsView<'a, V> {
    type Item = (Revision, Option<&'a V>);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// View over the recorded values.
#[derive(Debug, Clone, Copy)]
pub struct ValuesView<'a, V> {
    map: &'a WindowMap<V>,
}

impl<'a, V> ValuesView<'a, V> {
    pub(super) fn new(map: &'a WindowMap<V>) -> Self {
        Self { map }
    }

    /// Iterate over the values in ascending revision order.
    pub fn iter(&self) -> Values<'a, V> {
        Values {
            inner: self.map.iter(),
        }
    }

    /// Whether any recorded entry holds `value` (`None` matches unset
    /// sentinel entries).
    pub fn contains(&self, value: Option<&V>) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<'a, V> IntoIterator for &ValuesView<'a, V> {
    type Item = Option<&'a V>;
    type IntoIter = Values<'a, V>;

    fn into_iter(self) -> Values<'a, V> {
        self.iter()
    }
}
