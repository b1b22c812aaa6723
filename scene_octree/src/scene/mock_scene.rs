/// MockScene — in-memory `EntitySource` for tests and tools.
///
/// Holds just enough per-entity state (optional mesh box, optional
/// transform, group, dynamic flag) to drive the octree without a real
/// entity-component system.

use rustc_hash::FxHashMap;
use glam::{Mat4, Quat, Vec3};
use crate::math::AABB;
use super::entity_source::{EntityBounds, EntityId, EntitySource};

#[derive(Debug, Clone)]
struct MockEntity {
    model_aabb: Option<AABB>,
    transform: Option<Mat4>,
    group: u32,
    dynamic: bool,
}

/// In-memory scene
#[derive(Debug, Clone, Default)]
pub struct MockScene {
    entities: FxHashMap<EntityId, MockEntity>,
    next_id: u64,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a renderable entity with a model box and world transform
    pub fn spawn(&mut self, model_aabb: AABB, transform: Mat4) -> EntityId {
        self.insert(MockEntity {
            model_aabb: Some(model_aabb),
            transform: Some(transform),
            group: 0,
            dynamic: false,
        })
    }

    /// Spawn a unit-cube mesh scaled to `size` and centered on `position`
    pub fn spawn_cube(&mut self, position: Vec3, size: f32) -> EntityId {
        let unit = AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(size),
            Quat::IDENTITY,
            position,
        );
        self.spawn(unit, transform)
    }

    /// Spawn an entity that has a transform but no renderable
    pub fn spawn_without_mesh(&mut self, transform: Mat4) -> EntityId {
        self.insert(MockEntity {
            model_aabb: None,
            transform: Some(transform),
            group: 0,
            dynamic: false,
        })
    }

    /// Remove an entity from the scene
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        self.entities.remove(&entity).is_some()
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Mat4) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.transform = Some(transform);
        }
    }

    /// Move a cube spawned with `spawn_cube`, keeping its size
    pub fn move_cube(&mut self, entity: EntityId, position: Vec3, size: f32) {
        self.set_transform(
            entity,
            Mat4::from_scale_rotation_translation(Vec3::splat(size), Quat::IDENTITY, position),
        );
    }

    pub fn set_group(&mut self, entity: EntityId, group: u32) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.group = group;
        }
    }

    /// Flag an entity as dynamic (re-validated by `Octree::update_dynamic`)
    pub fn set_dynamic(&mut self, entity: EntityId, dynamic: bool) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.dynamic = dynamic;
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn insert(&mut self, entity: MockEntity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    fn sorted_ids(&self, filter: impl Fn(&MockEntity) -> bool) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities
            .iter()
            .filter(|(_, e)| e.model_aabb.is_some() && e.transform.is_some() && filter(e))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl EntitySource for MockScene {
    fn entity_bounds(&self, entity: EntityId) -> Option<EntityBounds> {
        let e = self.entities.get(&entity)?;
        Some(EntityBounds {
            model_aabb: e.model_aabb?,
            world_transform: e.transform?,
            group: e.group,
        })
    }

    fn renderable_entities(&self) -> Vec<EntityId> {
        self.sorted_ids(|_| true)
    }

    fn dynamic_entities(&self) -> Vec<EntityId> {
        self.sorted_ids(|e| e.dynamic)
    }
}

#[cfg(test)]
#[path = "mock_scene_tests.rs"]
mod tests;
