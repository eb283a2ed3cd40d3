//! Recency order backed by `SlotArena`.
//!
//! A doubly linked list whose nodes live in a [`SlotArena`] and link to each
//! other by [`SlotId`]. The front is the most-recently-used position, the back
//! the least-recently-used one. `Option<SlotId>` plays the role of the dummy
//! boundary nodes in pointer-based renditions: splicing at either end goes
//! through the same `detach`/`attach_front` pair with no special cases.
//!
//! ```text
//!   head ─► [id_2] ◄──► [id_0] ◄──► [id_1] ◄── tail
//!            (MRU)                   (LRU)
//! ```
//!
//! All reordering primitives are O(1); only iteration is O(n).

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked recency order over arena-allocated nodes.
#[derive(Debug)]
pub struct RecencyList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` names a live node in this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the value at the MRU position.
    pub fn front(&self) -> Option<&T> {
        self.get(self.head?)
    }

    /// Returns the value at the LRU position.
    pub fn back(&self) -> Option<&T> {
        self.get(self.tail?)
    }

    /// Returns the `SlotId` at the LRU position.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the value for a node id, if present.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to a node value, if present.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Inserts a new node at the MRU position and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(old_head) => {
                if let Some(node) = self.arena.get_mut(old_head) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Removes and returns the value at the LRU position.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.detach(id);
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the MRU position.
    ///
    /// Returns `false` if `id` is not a live node. A node already at the
    /// front stays where it is.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.detach(id);
            self.attach_front(id);
        }
        true
    }

    /// Clears the list and frees all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Returns an iterator over values from MRU to LRU.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = match self.arena.get(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(node) = self.arena.get_mut(prev_id) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(node) = self.arena.get_mut(next_id) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return;
        }
        match old_head {
            Some(old_head) => {
                if let Some(node) = self.arena.get_mut(old_head) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;

        while let Some(id) = current {
            let node = self.arena.get(id).expect("linked node missing from arena");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len(), "cycle detected in recency list");
        }

        assert_eq!(count, self.len());
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over list values from MRU to LRU.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}
