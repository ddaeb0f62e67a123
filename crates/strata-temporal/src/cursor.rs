//! Doubly-linked sequence with a persistent cursor.
//!
//! `CursorList` is a general-purpose bidirectional list that remembers the
//! last position visited — the "waist". Repeated nearby accesses through
//! [`CursorList::seek`] cost O(|Δ|) in the distance moved rather than
//! O(n), which is the access pattern of callers that walk histories or
//! cache recently visited objects. It still indexes like a normal sequence
//! from either end, independent of where the cursor sits.
//!
//! The waist always refers to a node currently in the chain: every
//! mutation that removes the node under the cursor re-homes it to the
//! following node, falling back to the preceding one, and only becomes
//! detached when the sequence empties.

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use strata_core::{TemporalError, TemporalResult};

use crate::arena::{Arena, NodeId};

/// A doubly-linked sequence with a movable, persistent access point.
#[derive(Debug, Clone)]
pub struct CursorList<T> {
    arena: Arena<T>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    waist: Option<NodeId>,
    len: usize,
}

impl<T> CursorList<T> {
    /// Create an empty sequence. Each instance owns fresh state; there is
    /// no shared default contents between instances.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            head: None,
            tail: None,
            waist: None,
            len: 0,
        }
    }

    /// Number of elements. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append at the tail. O(1). The first insertion into an empty
    /// sequence also parks the cursor on the new node.
    pub fn push_back(&mut self, value: T) {
        let id = self.arena.alloc(value);
        match self.tail {
            Some(tail) => {
                self.arena.node_mut(tail).next = Some(id);
                self.arena.node_mut(id).prev = Some(tail);
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
        if self.waist.is_none() {
            self.waist = Some(id);
        }
    }

    /// Prepend at the head. O(1).
    pub fn push_front(&mut self, value: T) {
        let id = self.arena.alloc(value);
        match self.head {
            Some(head) => {
                self.arena.node_mut(head).prev = Some(id);
                self.arena.node_mut(id).next = Some(head);
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        if self.waist.is_none() {
            self.waist = Some(id);
        }
    }

    /// Remove and return the tail value. O(1). A cursor on the removed
    /// node falls back to the preceding node.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        Some(self.unlink(id))
    }

    /// Remove and return the head value. O(1). A cursor on the removed
    /// node re-homes to the following node.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        Some(self.unlink(id))
    }

    /// The head value, if any.
    pub fn front(&self) -> Option<&T> {
        self.head.map(|id| &self.arena.node(id).value)
    }

    /// The tail value, if any.
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|id| &self.arena.node(id).value)
    }

    /// The value under the cursor, if any.
    pub fn current(&self) -> Option<&T> {
        self.waist.map(|id| &self.arena.node(id).value)
    }

    /// Mutable access to the value under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let id = self.waist?;
        Some(&mut self.arena.node_mut(id).value)
    }

    /// Move the cursor `delta` positions relative to where it currently
    /// sits (not relative to either end) and return the value there.
    ///
    /// A walk that would step past either end reports
    /// [`TemporalError::OutOfRange`] and leaves the cursor where it was.
    pub fn seek(&mut self, delta: isize) -> TemporalResult<&T> {
        let out_of_range = TemporalError::OutOfRange {
            index: delta,
            len: self.len,
        };
        let mut id = self.waist.ok_or_else(|| out_of_range.clone())?;

        // Validate the whole walk on a scratch handle before the cursor
        // moves, so a failed seek cannot strand it.
        if delta >= 0 {
            for _ in 0..delta {
                id = self.arena.node(id).next.ok_or_else(|| out_of_range.clone())?;
            }
        } else {
            for _ in 0..delta.unsigned_abs() {
                id = self.arena.node(id).prev.ok_or_else(|| out_of_range.clone())?;
            }
        }

        self.waist = Some(id);
        Ok(&self.arena.node(id).value)
    }

    /// Read the value at a signed index (0 = head, −1 = tail), walking
    /// from the nearer end. The cursor does not move.
    pub fn get(&self, index: isize) -> TemporalResult<&T> {
        let id = self.node_at(index)?;
        Ok(&self.arena.node(id).value)
    }

    /// Mutable access to the value at a signed index.
    pub fn get_mut(&mut self, index: isize) -> TemporalResult<&mut T> {
        let id = self.node_at(index)?;
        Ok(&mut self.arena.node_mut(id).value)
    }

    /// Overwrite the value at a signed index, returning the old value.
    ///
    /// Set-or-grow: `index == len` is defined to append and returns
    /// `None`. Callers that want strict bounds can reject it above.
    pub fn set(&mut self, index: isize, value: T) -> TemporalResult<Option<T>> {
        if index >= 0 && index as usize == self.len {
            self.push_back(value);
            return Ok(None);
        }
        let id = self.node_at(index)?;
        Ok(Some(std::mem::replace(
            &mut self.arena.node_mut(id).value,
            value,
        )))
    }

    /// Insert immediately after the cursor and move the cursor onto the
    /// new node. O(1). On an empty sequence the value becomes the sole
    /// element.
    pub fn insert_at_cursor(&mut self, value: T) {
        let Some(waist) = self.waist else {
            self.push_back(value);
            return;
        };

        let id = self.arena.alloc(value);
        let next = self.arena.node(waist).next;
        self.arena.node_mut(id).prev = Some(waist);
        self.arena.node_mut(id).next = next;
        self.arena.node_mut(waist).next = Some(id);
        match next {
            Some(next) => self.arena.node_mut(next).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
        self.waist = Some(id);
    }

    /// Remove and return the value under the cursor. O(1). The cursor
    /// re-homes to the following node, falling back to the preceding one,
    /// and detaches only when the sequence empties.
    pub fn remove_at_cursor(&mut self) -> TemporalResult<T> {
        let id = self.waist.ok_or(TemporalError::OutOfRange {
            index: 0,
            len: self.len,
        })?;
        Ok(self.unlink(id))
    }

    /// Insert at a relative offset from the cursor: an implicit
    /// [`CursorList::seek`] followed by [`CursorList::insert_at_cursor`].
    pub fn insert_relative(&mut self, offset: isize, value: T) -> TemporalResult<()> {
        if offset != 0 {
            self.seek(offset)?;
        }
        self.insert_at_cursor(value);
        Ok(())
    }

    /// Remove at a relative offset from the cursor: an implicit seek
    /// followed by [`CursorList::remove_at_cursor`].
    pub fn remove_relative(&mut self, offset: isize) -> TemporalResult<T> {
        if offset != 0 {
            self.seek(offset)?;
        }
        self.remove_at_cursor()
    }

    /// Iterate head-to-tail. The cursor does not move.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Verify chain consistency: head-to-tail step count matches `len`,
    /// and the waist (when present) is a node currently in the chain.
    pub fn check_invariants(&self) -> TemporalResult<()> {
        if let Some(waist) = self.waist {
            if !self.arena.contains(waist) {
                return Err(TemporalError::InvariantViolation(
                    "waist references a freed slot".into(),
                ));
            }
        }
        let mut steps = 0usize;
        let mut waist_seen = false;
        let mut cursor = self.head;
        let mut last = None;
        while let Some(id) = cursor {
            if steps >= self.len {
                return Err(TemporalError::InvariantViolation(
                    "chain longer than tracked length".into(),
                ));
            }
            if Some(id) == self.waist {
                waist_seen = true;
            }
            steps += 1;
            last = Some(id);
            cursor = self.arena.node(id).next;
        }
        if steps != self.len {
            return Err(TemporalError::InvariantViolation(format!(
                "chain has {} nodes but length says {}",
                steps, self.len
            )));
        }
        if last != self.tail {
            return Err(TemporalError::InvariantViolation(
                "tail does not terminate the chain".into(),
            ));
        }
        match self.waist {
            Some(_) if !waist_seen => Err(TemporalError::InvariantViolation(
                "waist references a node outside the chain".into(),
            )),
            None if self.len > 0 => Err(TemporalError::InvariantViolation(
                "non-empty sequence has no waist".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Resolve a signed index to a node handle, walking from the nearer end.
    fn node_at(&self, index: isize) -> TemporalResult<NodeId> {
        let out_of_range = TemporalError::OutOfRange {
            index,
            len: self.len,
        };
        let physical = if index < 0 {
            let back_off = index
                .checked_neg()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| out_of_range.clone())?;
            self.len.checked_sub(back_off).ok_or(out_of_range)?
        } else {
            let fwd = index as usize;
            if fwd >= self.len {
                return Err(out_of_range);
            }
            fwd
        };

        let id = if physical <= self.len / 2 {
            let mut id = self.head.expect("non-empty sequence has a head");
            for _ in 0..physical {
                id = self.arena.node(id).next.expect("chain shorter than len");
            }
            id
        } else {
            let mut id = self.tail.expect("non-empty sequence has a tail");
            for _ in 0..(self.len - 1 - physical) {
                id = self.arena.node(id).prev.expect("chain shorter than len");
            }
            id
        };
        Ok(id)
    }

    /// Detach a node, free its slot, re-home the cursor if it sat on the
    /// node, and return the value.
    fn unlink(&mut self, id: NodeId) -> T {
        let node = self.arena.release(id);
        match node.prev {
            Some(prev) => self.arena.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.arena.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;
        if self.waist == Some(id) {
            self.waist = node.next.or(node.prev);
        }
        node.value
    }
}

impl<T> Default for CursorList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for CursorList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for CursorList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = CursorList::new();
        list.extend(iter);
        list
    }
}

impl<T: PartialEq> PartialEq for CursorList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CursorList<T> {}

/// Double-ended iterator over a [`CursorList`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    list: &'a CursorList<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = self.list.arena.node(id);
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = self.list.arena.node(id);
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a CursorList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// The wire form is the plain element sequence; the cursor is a runtime
/// access optimization and is not persisted. A deserialized list starts
/// with its cursor at the head.
impl<T: Serialize> Serialize for CursorList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for value in self.iter() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CursorList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        let mut list: CursorList<T> = values.into_iter().collect();
        list.waist = list.head;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> CursorList<i64> {
        (0..10).collect()
    }

    #[test]
    fn test_fresh_cursor_sits_at_head() {
        let list = digits();
        assert_eq!(list.current(), Some(&0));
        assert_eq!(list.front(), Some(&0));
        assert_eq!(list.back(), Some(&9));
    }

    #[test]
    fn test_relative_seek() {
        let mut list = digits();
        assert_eq!(list.seek(5).unwrap(), &5);
        assert_eq!(list.seek(-2).unwrap(), &3);
        assert_eq!(list.seek(0).unwrap(), &3);
        assert_eq!(list.current(), Some(&3));
    }

    #[test]
    fn test_seek_past_end_leaves_cursor_in_place() {
        let mut list = digits();
        list.seek(4).unwrap();
        assert_eq!(
            list.seek(100),
            Err(TemporalError::OutOfRange { index: 100, len: 10 })
        );
        assert_eq!(
            list.seek(-100),
            Err(TemporalError::OutOfRange { index: -100, len: 10 })
        );
        // Failed walks did not move the cursor.
        assert_eq!(list.current(), Some(&4));
        assert_eq!(list.seek(5).unwrap(), &9);
        assert!(list.seek(1).is_err());
    }

    #[test]
    fn test_seek_on_empty() {
        let mut list: CursorList<u8> = CursorList::new();
        assert_eq!(
            list.seek(0),
            Err(TemporalError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_indexing_is_cursor_independent() {
        let mut list = digits();
        list.seek(7).unwrap();
        assert_eq!(list.get(0).unwrap(), &0);
        assert_eq!(list.get(-1).unwrap(), &9);
        assert_eq!(list.get(-10).unwrap(), &0);
        assert!(list.get(10).is_err());
        assert!(list.get(-11).is_err());
        assert_eq!(list.current(), Some(&7));
    }

    #[test]
    fn test_set_or_grow() {
        let mut list: CursorList<i64> = (0..3).collect();
        assert_eq!(list.set(1, 99).unwrap(), Some(1));
        assert_eq!(list.set(3, 42).unwrap(), None); // index == len appends
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 99, 2, 42]);
        assert!(list.set(5, 0).is_err());
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut list: CursorList<i64> = (0..4).collect();
        list.seek(1).unwrap();
        list.insert_at_cursor(77);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1, 77, 2, 3]);
        assert_eq!(list.current(), Some(&77));
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_at_cursor_at_tail_and_empty() {
        let mut list: CursorList<i64> = CursorList::new();
        list.insert_at_cursor(1);
        assert_eq!(list.current(), Some(&1));
        assert_eq!(list.back(), Some(&1));

        list.seek(0).unwrap();
        list.insert_at_cursor(2);
        assert_eq!(list.back(), Some(&2));
        assert_eq!(list.len(), 2);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_at_cursor_rehomes_to_next() {
        let mut list: CursorList<i64> = (0..5).collect();
        list.seek(2).unwrap();
        assert_eq!(list.remove_at_cursor().unwrap(), 2);
        assert_eq!(list.current(), Some(&3));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_at_cursor_falls_back_to_prev() {
        let mut list: CursorList<i64> = (0..3).collect();
        list.seek(2).unwrap();
        assert_eq!(list.remove_at_cursor().unwrap(), 2);
        assert_eq!(list.current(), Some(&1));
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_last_detaches_cursor() {
        let mut list: CursorList<i64> = std::iter::once(7).collect();
        assert_eq!(list.remove_at_cursor().unwrap(), 7);
        assert_eq!(list.current(), None);
        assert!(list.is_empty());
        assert!(list.remove_at_cursor().is_err());
        list.check_invariants().unwrap();

        // The sequence is reusable after emptying.
        list.push_back(8);
        assert_eq!(list.current(), Some(&8));
    }

    #[test]
    fn test_pop_ends_rehome_cursor() {
        let mut list: CursorList<i64> = (0..3).collect();
        assert_eq!(list.current(), Some(&0));
        assert_eq!(list.pop_front(), Some(0));
        assert_eq!(list.current(), Some(&1)); // re-homed to the new head

        list.seek(1).unwrap();
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.current(), Some(&1)); // fell back to the previous node
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_relative_insert_and_remove() {
        let mut list: CursorList<i64> = (0..6).collect();
        list.seek(3).unwrap();
        assert_eq!(list.remove_relative(-2).unwrap(), 1);
        assert_eq!(list.current(), Some(&2));
        list.insert_relative(1, 99).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 99, 4, 5]);
        assert_eq!(list.current(), Some(&99));
        assert!(list.insert_relative(100, 0).is_err());
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_push_front_and_iter_rev() {
        let mut list = CursorList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        // The cursor stayed on the first value ever inserted.
        assert_eq!(list.current(), Some(&2));
    }

    #[test]
    fn test_serde_round_trip_resets_cursor_to_head() {
        let mut list = digits();
        list.seek(6).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, "[0,1,2,3,4,5,6,7,8,9]");
        let restored: CursorList<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, list);
        assert_eq!(restored.current(), Some(&0));
        restored.check_invariants().unwrap();
    }
}
