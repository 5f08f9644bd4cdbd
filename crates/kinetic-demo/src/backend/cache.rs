use std::collections::HashMap;

use crate::shape::ShapeId;

/// Per-shape resources keyed by id, with a separate live flag.
///
/// `remove` keeps the resource but hides it; `release` frees it.
#[derive(Debug)]
pub struct ShapeCache<T> {
    entries: HashMap<ShapeId, Entry<T>>,
}

#[derive(Debug)]
struct Entry<T> {
    value: T,
    live: bool,
}

impl<T> ShapeCache<T> {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn insert(&mut self, id: ShapeId, value: T) {
        self.entries.insert(id, Entry { value, live: true });
    }

    pub fn remove(&mut self, id: ShapeId) {
        if let Some(e) = self.entries.get_mut(&id) {
            e.live = false;
        }
    }

    pub fn release(&mut self, id: ShapeId) -> Option<T> {
        self.entries.remove(&id).map(|e| e.value)
    }

    /// Resource for a shape that is still live.
    pub fn live(&self, id: ShapeId) -> Option<&T> {
        self.entries.get(&id).filter(|e| e.live).map(|e| &e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cached entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for ShapeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
