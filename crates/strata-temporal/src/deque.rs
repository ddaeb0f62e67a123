//! Arena-backed bidirectional queue.
//!
//! `LinkedDeque` is the building block of the revision-windowed map: the
//! map's `past` and `future` halves are both instances of it. It is a plain
//! doubly-linked list with O(1) ends, signed indexed access, and
//! multi-element pops that return a scratch queue of the same kind.
//!
//! Length is tracked with an explicit counter; `len` never walks the chain.

use strata_core::{TemporalError, TemporalResult};

use crate::arena::{Arena, NodeId};

/// A doubly-linked deque over an arena of slots.
///
/// Indexing accepts signed positions: `0` is the head, `-1` the tail, and
/// an out-of-range index in either direction reports
/// [`TemporalError::OutOfRange`]. Traversal always starts from the nearer
/// end, so indexed access costs O(min(i, n−i)).
#[derive(Debug, Clone)]
pub struct LinkedDeque<T> {
    arena: Arena<T>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> LinkedDeque<T> {
    /// Create an empty deque.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Create an empty deque with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of elements. O(1): the counter is maintained incrementally.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the deque holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a value at the tail. O(1).
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
    }

    /// Prepend a value at the head. O(1).
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
    }

    /// Remove and return the tail value. O(1).
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        Some(self.unlink(id))
    }

    /// Remove and return the head value. O(1).
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

    /// Mutable access to the head value.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let id = self.head?;
        Some(&mut self.arena.node_mut(id).value)
    }

    /// Mutable access to the tail value.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let id = self.tail?;
        Some(&mut self.arena.node_mut(id).value)
    }

    /// Read the value at a signed index.
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
    pub fn set(&mut self, index: isize, value: T) -> TemporalResult<T> {
        let id = self.node_at(index)?;
        Ok(std::mem::replace(&mut self.arena.node_mut(id).value, value))
    }

    /// Remove up to `n` elements from the head, returned as a scratch deque
    /// of the same kind with their relative order preserved.
    pub fn pop_front_n(&mut self, n: usize) -> LinkedDeque<T> {
        let take = n.min(self.len);
        let mut scratch = LinkedDeque::with_capacity(take);
        for _ in 0..take {
            let value = self.pop_front().expect("length counter out of sync");
            scratch.push_back(value);
        }
        scratch
    }

    /// Remove up to `n` elements from the tail, returned as a scratch deque
    /// of the same kind with their relative order preserved.
    pub fn pop_back_n(&mut self, n: usize) -> LinkedDeque<T> {
        let take = n.min(self.len);
        let mut scratch = LinkedDeque::with_capacity(take);
        for _ in 0..take {
            let value = self.pop_back().expect("length counter out of sync");
            scratch.push_front(value);
        }
        scratch
    }

    /// Drop all elements. Slots are released; capacity is retained.
    pub fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }

    /// Iterate head-to-tail without mutating the deque.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            deque: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
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
            let fwd = usize::try_from(index).expect("non-negative index");
            if fwd >= self.len {
                return Err(out_of_range);
            }
            fwd
        };

        let id = if physical <= self.len / 2 {
            let mut id = self.head.expect("non-empty deque has a head");
            for _ in 0..physical {
                id = self.arena.node(id).next.expect("chain shorter than len");
            }
            id
        } else {
            let mut id = self.tail.expect("non-empty deque has a tail");
            for _ in 0..(self.len - 1 - physical) {
                id = self.arena.node(id).prev.expect("chain shorter than len");
            }
            id
        };
        Ok(id)
    }

    /// Detach a node from the chain, free its slot, and return its value.
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
        node.value
    }
}

impl<T> Default for LinkedDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for LinkedDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for LinkedDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = LinkedDeque::new();
        deque.extend(iter);
        deque
    }
}

impl<T: PartialEq> PartialEq for LinkedDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedDeque<T> {}

/// Double-ended iterator over a [`LinkedDeque`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    deque: &'a LinkedDeque<T>,
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
        let node = self.deque.arena.node(id);
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
        let node = self.deque.arena.node(id);
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a LinkedDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
