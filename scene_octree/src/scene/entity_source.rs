/// Scene boundary consumed by the octree.
///
/// The octree never owns entity data. For each entity id it asks an
/// `EntitySource` for the model-space bounding box of the renderable,
/// its world transform and its render group. Entity creation, removal
/// and movement arrive as `SceneEvent`s.

use std::sync::Arc;
use glam::Mat4;
use crate::math::AABB;

/// Opaque reference to an entity of the external scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Placement data for one entity, read from the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityBounds {
    /// Bounding box of the renderable's mesh, in model space
    pub model_aabb: AABB,
    /// Position/rotation/scale of the entity
    pub world_transform: Mat4,
    /// Opaque render grouping tag (0 by default)
    pub group: u32,
}

impl EntityBounds {
    /// Bounds with the default group
    pub fn new(model_aabb: AABB, world_transform: Mat4) -> Self {
        Self { model_aabb, world_transform, group: 0 }
    }

    /// Set the render group
    pub fn with_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    /// Conservative world-space box: the 8 model corners pushed through
    /// the world transform.
    pub fn world_aabb(&self) -> AABB {
        self.model_aabb.transformed(&self.world_transform)
    }
}

/// Read access to the entities the octree indexes.
///
/// Implementors only answer for entities that carry both a renderable
/// and a transform. `entity_bounds` returning `None` for an id handed to
/// `Octree::add` is a caller contract violation.
pub trait EntitySource {
    /// Placement data of an entity, `None` if it is not renderable
    fn entity_bounds(&self, entity: EntityId) -> Option<EntityBounds>;

    /// Every renderable entity currently in the scene
    fn renderable_entities(&self) -> Vec<EntityId>;

    /// Renderable entities whose transform may change every frame
    fn dynamic_entities(&self) -> Vec<EntityId> {
        Vec::new()
    }
}

impl<S: EntitySource + ?Sized> EntitySource for &S {
    fn entity_bounds(&self, entity: EntityId) -> Option<EntityBounds> {
        (**self).entity_bounds(entity)
    }

    fn renderable_entities(&self) -> Vec<EntityId> {
        (**self).renderable_entities()
    }

    fn dynamic_entities(&self) -> Vec<EntityId> {
        (**self).dynamic_entities()
    }
}

impl<S: EntitySource + ?Sized> EntitySource for Box<S> {
    fn entity_bounds(&self, entity: EntityId) -> Option<EntityBounds> {
        (**self).entity_bounds(entity)
    }

    fn renderable_entities(&self) -> Vec<EntityId> {
        (**self).renderable_entities()
    }

    fn dynamic_entities(&self) -> Vec<EntityId> {
        (**self).dynamic_entities()
    }
}

impl<S: EntitySource + ?Sized> EntitySource for Arc<S> {
    fn entity_bounds(&self, entity: EntityId) -> Option<EntityBounds> {
        (**self).entity_bounds(entity)
    }

    fn renderable_entities(&self) -> Vec<EntityId> {
        (**self).renderable_entities()
    }

    fn dynamic_entities(&self) -> Vec<EntityId> {
        (**self).dynamic_entities()
    }
}

/// Scene notifications the octree reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Renderable entities were created → `Octree::add`
    EntitiesCreated(Vec<EntityId>),
    /// Entities were destroyed → `Octree::remove`
    EntitiesDestroyed(Vec<EntityId>),
    /// Entities moved, rotated or rescaled → `Octree::update`
    TransformsChanged(Vec<EntityId>),
}
