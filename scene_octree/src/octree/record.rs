/// Per-entity cache stored in the octree.

use glam::Mat4;
use slotmap::new_key_type;
use crate::math::AABB;
use crate::scene::EntityId;
use super::node::NodeKey;

new_key_type! {
    /// Stable key of an entity record in the octree's record pool
    pub struct EntityRecordKey;
}

/// Cached placement of one indexed entity.
///
/// Created by `Octree::add`, refreshed by `Octree::update`, freed by
/// `Octree::remove`. Lives in exactly one node's data list.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub(crate) entity: EntityId,
    pub(crate) world_bounding_box: AABB,
    pub(crate) world_transform: Mat4,
    pub(crate) group: u32,
    pub(crate) node: NodeKey,
}

impl EntityRecord {
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Conservative world AABB of the entity's mesh box
    pub fn world_bounding_box(&self) -> &AABB {
        &self.world_bounding_box
    }

    pub fn world_transform(&self) -> &Mat4 {
        &self.world_transform
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    /// Node whose data list holds this record
    pub fn node(&self) -> NodeKey {
        self.node
    }
}
