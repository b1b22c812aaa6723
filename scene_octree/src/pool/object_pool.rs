/// Fixed-slot object pool with stable keys.
///
/// Backs octree nodes and entity records. Allocation and release are
/// O(1); a key stays valid (and keeps pointing at the same value) until
/// it is freed. Storage is never compacted, so holding a key is the
/// safe equivalent of holding a stable address. Freed slots are
/// recycled, and a stale key never aliases the value that reuses its
/// slot.
///
/// # Example
///
/// ```ignore
/// slotmap::new_key_type! { struct ThingKey; }
///
/// let mut pool: ObjectPool<ThingKey, u32> = ObjectPool::new();
/// let a = pool.alloc(10);
/// pool.free(a);            // slot goes back to the pool
/// assert!(pool.get(a).is_none());
/// ```

use std::ops::{Index, IndexMut};
use slotmap::{Key, SlotMap};

pub struct ObjectPool<K: Key, T> {
    slots: SlotMap<K, T>,
    peak_len: usize,
}

impl<K: Key, T> ObjectPool<K, T> {
    /// Create a new empty pool
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            peak_len: 0,
        }
    }

    /// Create a pool with room for `capacity` objects before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            peak_len: 0,
        }
    }

    /// Store `value` in a free slot and return its key
    pub fn alloc(&mut self, value: T) -> K {
        let key = self.slots.insert(value);
        self.peak_len = self.peak_len.max(self.slots.len());
        key
    }

    /// Release a slot, returning its value if the key was live
    pub fn free(&mut self, key: K) -> Option<T> {
        self.slots.remove(key)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key)
    }

    /// Whether `key` refers to a live object
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no objects are live
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of objects the pool can hold without growing
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Highest number of simultaneously live objects seen so far
    pub fn peak_len(&self) -> usize {
        self.peak_len
    }

    /// Iterate over all live objects
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.slots.iter()
    }
}

/// Panics on a stale key, like slice indexing out of bounds.
impl<K: Key, T> Index<K> for ObjectPool<K, T> {
    type Output = T;

    fn index(&self, key: K) -> &T {
        &self.slots[key]
    }
}

impl<K: Key, T> IndexMut<K> for ObjectPool<K, T> {
    fn index_mut(&mut self, key: K) -> &mut T {
        &mut self.slots[key]
    }
}

impl<K: Key, T> Default for ObjectPool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "object_pool_tests.rs"]
mod tests;
