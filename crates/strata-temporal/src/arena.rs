//! Slot arena backing the linked structures.
//!
//! Doubly-linked prev/next pointers are mutually referencing and do not fit
//! a strict ownership tree, so the chains are stored in a growable table of
//! slots addressed by integer handles. The containers hold head/tail (and
//! cursor) handles; removal frees the slot and patches neighbour handles,
//! keeping link operations O(1) with no aliasing hazards.

/// Handle to a node slot. Only meaningful within the arena that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A doubly-linked cell: a value plus non-owning neighbour handles.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

/// Growable slot table with a free list.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Allocate a detached node and return its handle.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        self.len += 1;
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(Some(node));
            id
        }
    }

    /// Free a slot and return the node that occupied it. The caller is
    /// responsible for having already unlinked it from its chain.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<T> {
        let node = self.slots[id.index()].take().expect("released a vacant slot");
        self.free.push(id);
        self.len -= 1;
        node
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        self.slots[id.index()].as_ref().expect("read a vacant slot")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.slots[id.index()].as_mut().expect("wrote a vacant slot")
    }

    /// Whether the handle refers to a live slot. Used by invariant checks.
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.is_some())
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
