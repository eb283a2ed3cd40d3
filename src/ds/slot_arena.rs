/// Stable handle into a [`SlotArena`].
///
/// Handles stay valid until the slot they name is removed; removing a slot
/// recycles its index for a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Slotted arena with a free list.
///
/// Owns all entry storage for the cache engine; the key index and the recency
/// list refer to entries only through `SlotId` handles, which avoids the
/// ownership cycles a pointer-linked representation would create.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                SlotId(idx)
            }
            None => {
                self.slots.push(Some(value));
                SlotId(self.slots.len() - 1)
            }
        }
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
