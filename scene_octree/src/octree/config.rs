/// Octree configuration, storage and statistics.

use crate::pool::ObjectPool;
use super::node::{Node, NodeKey, BASE_SIZE};
use super::record::{EntityRecord, EntityRecordKey};

/// Octree configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeConfig {
    /// Data list length at which a node is split
    pub max_entries_per_cell: usize,
    /// Edge length of a level-0 cell (the root's initial size)
    pub base_size: f32,
    /// Deepest placement level; degenerate boxes are placed here
    pub min_level: i32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_entries_per_cell: 30,
            base_size: BASE_SIZE,
            min_level: -32,
        }
    }
}

/// Backing pools for nodes and entity records.
///
/// Owned by exactly one octree; pass a fresh one to each index.
#[derive(Default)]
pub struct OctreeStorage {
    pub nodes: ObjectPool<NodeKey, Node>,
    pub records: ObjectPool<EntityRecordKey, EntityRecord>,
}

impl OctreeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size both pools
    pub fn with_capacity(nodes: usize, records: usize) -> Self {
        Self {
            nodes: ObjectPool::with_capacity(nodes),
            records: ObjectPool::with_capacity(records),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.records.is_empty()
    }
}

/// Octree statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Number of live nodes (never decreases)
    pub node_count: usize,
    /// Number of live entity records
    pub entity_count: usize,
    /// Current root level
    pub root_level: i32,
    /// Levels between the root and the deepest node
    pub max_depth: u32,
    /// Number of `expand()` calls so far
    pub expansions: u64,
    /// Number of `split()` calls so far
    pub splits: u64,
}
