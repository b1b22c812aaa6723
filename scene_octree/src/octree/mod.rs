//! Octree module — the loose octree index and its frame queries.

mod config;
mod node;
mod octree;
mod query;
mod record;

pub use config::{OctreeConfig, OctreeStats, OctreeStorage};
pub use node::{
    cell_size, min_level, octant_center, octant_index,
    Node, NodeKey, BASE_SIZE, NODE_OFFSETS,
};
pub use octree::Octree;
pub use query::VisibleSet;
pub use record::{EntityRecord, EntityRecordKey};
