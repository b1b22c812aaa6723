/// Octree — dynamic loose octree over scene entity bounding boxes.
///
/// Each entity is stored in exactly one node, chosen by its size: an
/// entity rests no deeper than its `min_level`, the level whose cells
/// are between one and two times its largest edge. Nodes are created
/// lazily while descending, the root doubles around the origin whenever
/// an entity does not fit (`expand`), and a node whose data list
/// reaches `max_entries_per_cell` pushes what it can down into its
/// children (`split`).
///
/// Node boxes are loose: a box encloses the node's nominal cell and
/// everything stored below it, and only ever grows. Removal never
/// shrinks boxes or frees nodes.
///
/// Single-threaded: mutation takes `&mut self`, queries take `&self`.

use rustc_hash::FxHashMap;
use glam::Vec3;
use crate::error::{Error, Result};
use crate::math::AABB;
use crate::pool::ObjectPool;
use crate::scene::{EntityBounds, EntityId, EntitySource, SceneEvent};
use super::config::{OctreeConfig, OctreeStats, OctreeStorage};
use super::node::{self, Node, NodeKey};
use super::record::{EntityRecord, EntityRecordKey};

const LOG_SOURCE: &str = "octree3d::Octree";

/// Loose octree spatial index.
///
/// Generic over the entity source it reads bounds from: an owned scene,
/// a `&Scene`, or an `Arc<Scene>`.
pub struct Octree<S: EntitySource> {
    source: S,
    config: OctreeConfig,
    pub(crate) nodes: ObjectPool<NodeKey, Node>,
    pub(crate) records: ObjectPool<EntityRecordKey, EntityRecord>,
    pub(crate) root: NodeKey,
    /// Records per entity id. Adding an id twice yields two records.
    entity_records: FxHashMap<EntityId, Vec<EntityRecordKey>>,
    expansions: u64,
    splits: u64,
}

impl<S: EntitySource> Octree<S> {
    /// Create an octree and index every renderable entity of `source`.
    ///
    /// The root starts at level 0, covering `[-8, 8]` on every axis.
    ///
    /// # Arguments
    ///
    /// * `source` - Entity source the octree reads bounds from
    /// * `max_entries_per_cell` - Data list length that triggers a split
    pub fn init(source: S, max_entries_per_cell: usize) -> Self {
        let config = OctreeConfig {
            max_entries_per_cell,
            ..OctreeConfig::default()
        };
        Self::with_config(source, config, OctreeStorage::new())
    }

    /// Create an octree with explicit configuration and backing storage.
    ///
    /// `storage` must be empty. Every renderable entity the source
    /// reports is indexed; entities that fail are logged and skipped.
    pub fn with_config(source: S, config: OctreeConfig, storage: OctreeStorage) -> Self {
        debug_assert!(storage.is_empty(), "octree storage must not be shared");
        debug_assert!(config.max_entries_per_cell > 0, "max_entries_per_cell must be positive");

        let OctreeStorage { mut nodes, records } = storage;
        let root = nodes.alloc(Node::new(0, Vec3::ZERO, config.base_size, None));

        let mut octree = Self {
            source,
            config,
            nodes,
            records,
            root,
            entity_records: FxHashMap::default(),
            expansions: 0,
            splits: 0,
        };

        let initial = octree.source.renderable_entities();
        let mut indexed = 0usize;
        for entity in initial {
            if octree.add(entity).is_ok() {
                indexed += 1;
            }
        }

        crate::octree_info!(LOG_SOURCE, "Octree initialized with {} entities", indexed);
        octree
    }

    // ===== INSERTION =====

    /// Index an entity, reading its bounds from the source.
    ///
    /// Returns the key of the new record. Adding an id that is already
    /// indexed creates a second, independent record.
    ///
    /// # Errors
    ///
    /// - `MissingComponents` if the source has no renderable bounds or
    ///   transform for `entity` (caller contract violation)
    /// - `InvalidBounds` if the world box is not finite
    pub fn add(&mut self, entity: EntityId) -> Result<EntityRecordKey> {
        let bounds = self.source.entity_bounds(entity).ok_or_else(|| {
            log_and_return_error(Error::MissingComponents(format!(
                "{} has no renderable bounding box or world transform",
                entity
            )))
        })?;

        self.insert_bounds(entity, bounds)
    }

    /// Index an entity with bounds supplied directly.
    pub fn insert_bounds(&mut self, entity: EntityId, bounds: EntityBounds) -> Result<EntityRecordKey> {
        let world = checked_world_aabb(entity, &bounds)?;

        let key = self.records.alloc(EntityRecord {
            entity,
            world_bounding_box: world,
            world_transform: bounds.world_transform,
            group: bounds.group,
            node: self.root,
        });
        self.entity_records.entry(entity).or_default().push(key);

        let node = self.insert_record(key);
        crate::octree_trace!(
            LOG_SOURCE,
            "{} placed at level {} (record {:?})",
            entity,
            self.nodes[node].level,
            key
        );

        Ok(key)
    }

    /// Place a detached record into the tree. Returns the node it landed in.
    fn insert_record(&mut self, key: EntityRecordKey) -> NodeKey {
        let world = self.records[key].world_bounding_box;
        let min_level = self.min_level_for(&world);

        // Grow the root until it strictly encloses the box and sits above min_level
        while !self.nodes[self.root].cell_bounds().contains_strict(&world)
            || self.nodes[self.root].level < min_level + 1
        {
            self.expand();
        }

        let mut current = self.root;
        loop {
            let node = &self.nodes[current];

            if node.level <= min_level || !node.has_children() {
                self.nodes[current].data.push(key);
                self.records[key].node = current;
                self.propagate_growth(current, &world);

                if self.nodes[current].data.len() >= self.config.max_entries_per_cell {
                    self.split(current);
                }
                return self.records[key].node;
            }

            let octant = node::octant_index(node.center, world.center());
            let existing = node.children[octant];
            current = match existing {
                Some(child) => child,
                None => self.create_child(current, octant),
            };
        }
    }

    /// Level an entity with this world box may rest in directly.
    pub fn min_level_for(&self, world: &AABB) -> i32 {
        node::min_level(world.max_dimension(), self.config.base_size, self.config.min_level)
    }

    // ===== RESTRUCTURING =====

    /// Double the root cell around the origin.
    ///
    /// Every existing child `i` of the root is pushed one level down: a
    /// new intermediate node takes octant `i` of the bigger root, and the
    /// old child becomes its octant `7 - i` (doubling about the center
    /// flips which half of the intermediate cell it occupies). Only the
    /// new layer's boxes are recomputed.
    pub fn expand(&mut self) {
        let root = self.root;
        let (old_level, old_size, old_children) = {
            let r = &self.nodes[root];
            (r.level, r.size, r.children)
        };
        let new_size = node::cell_size(self.config.base_size, old_level + 1);

        let mut root_box = AABB::cube(Vec3::ZERO, new_size);

        for (octant, old_child) in old_children.into_iter().enumerate() {
            let Some(old_child) = old_child else { continue };

            let center = node::octant_center(Vec3::ZERO, new_size, octant);
            let mut middle = Node::new(old_level, center, old_size, Some(root));
            middle.children[7 - octant] = Some(old_child);
            middle.bounding_box.grow(&self.nodes[old_child].bounding_box);
            root_box.grow(&middle.bounding_box);

            let middle_key = self.nodes.alloc(middle);
            self.nodes[old_child].parent = Some(middle_key);
            self.nodes[root].children[octant] = Some(middle_key);
        }

        for &key in &self.nodes[root].data {
            root_box.grow(&self.records[key].world_bounding_box);
        }

        let r = &mut self.nodes[root];
        r.level = old_level + 1;
        r.size = new_size;
        r.bounding_box = root_box;
        self.expansions += 1;

        crate::octree_debug!(
            LOG_SOURCE,
            "Root expanded to level {} (cell size {})",
            old_level + 1,
            new_size
        );
    }

    /// Redistribute a node's data list into its children.
    ///
    /// Records whose largest edge is at least half the cell stay in the
    /// node. The others are bucketed by the octant of their center; each
    /// non-empty bucket goes into its child (created if absent), the
    /// child box grows to cover the bucket and that growth is
    /// propagated to the root.
    pub(crate) fn split(&mut self, node_key: NodeKey) {
        let (center, size, level) = {
            let n = &self.nodes[node_key];
            (n.center, n.size, n.level)
        };

        let data = std::mem::take(&mut self.nodes[node_key].data);
        let total = data.len();
        let mut keep = Vec::new();
        let mut buckets: [Vec<EntityRecordKey>; 8] = Default::default();

        for key in data {
            let bbox = self.records[key].world_bounding_box;
            if bbox.max_dimension() >= size * 0.5 {
                keep.push(key);
            } else {
                buckets[node::octant_index(center, bbox.center())].push(key);
            }
        }

        let kept = keep.len();
        self.nodes[node_key].data = keep;

        for (octant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let child = match self.nodes[node_key].child(octant) {
                Some(child) => child,
                None => self.create_child(node_key, octant),
            };

            let mut child_box = self.nodes[child].bounding_box;
            for &key in &bucket {
                let record = &mut self.records[key];
                child_box.grow(&record.world_bounding_box);
                record.node = child;
            }

            let c = &mut self.nodes[child];
            c.bounding_box = child_box;
            c.data.extend(bucket);

            self.propagate_growth(node_key, &child_box);
        }

        self.splits += 1;
        crate::octree_debug!(
            LOG_SOURCE,
            "Split node at level {}: {} records, {} kept",
            level,
            total,
            kept
        );
    }

    /// Allocate child `octant` of `parent`: half the size, one level down.
    fn create_child(&mut self, parent: NodeKey, octant: usize) -> NodeKey {
        let (level, center, size) = {
            let p = &self.nodes[parent];
            (p.level - 1, node::octant_center(p.center, p.size, octant), p.size * 0.5)
        };

        let child = self.nodes.alloc(Node::new(level, center, size, Some(parent)));
        self.nodes[parent].children[octant] = Some(child);
        child
    }

    /// Grow `start`'s box to cover `aabb`, then walk up while boxes change.
    fn propagate_growth(&mut self, start: NodeKey, aabb: &AABB) {
        let mut current = start;
        let mut grown = *aabb;

        loop {
            let node = &mut self.nodes[current];
            if !node.bounding_box.grow(&grown) {
                break;
            }
            grown = node.bounding_box;

            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    // ===== UPDATE / REMOVAL =====

    /// Re-read an entity's bounds and move its records if needed.
    ///
    /// A record stays in its node when the new center is still inside
    /// the node's cell and the node is not too small for the new size;
    /// its box growth is propagated. Otherwise it is detached and
    /// reinserted under the same key. Returns the number of records
    /// updated.
    ///
    /// # Errors
    ///
    /// - `EntityNotIndexed` if `entity` has no record
    /// - `MissingComponents` / `InvalidBounds` as for `add`
    pub fn update(&mut self, entity: EntityId) -> Result<usize> {
        let keys = self.entity_records.get(&entity).cloned().ok_or_else(|| {
            log_and_return_error(Error::EntityNotIndexed(format!("{} cannot be updated", entity)))
        })?;

        let bounds = self.source.entity_bounds(entity).ok_or_else(|| {
            log_and_return_error(Error::MissingComponents(format!(
                "{} lost its renderable bounding box or world transform",
                entity
            )))
        })?;
        let world = checked_world_aabb(entity, &bounds)?;

        for &key in &keys {
            self.update_record(key, &bounds, world);
        }

        Ok(keys.len())
    }

    fn update_record(&mut self, key: EntityRecordKey, bounds: &EntityBounds, world: AABB) {
        let record = &mut self.records[key];
        record.world_bounding_box = world;
        record.world_transform = bounds.world_transform;
        record.group = bounds.group;
        let node_key = record.node;

        let min_level = self.min_level_for(&world);
        let node = &self.nodes[node_key];
        // The root must stay one level above everything it holds
        let level_ok = if node_key == self.root {
            min_level < node.level
        } else {
            min_level <= node.level
        };
        let still_fits = level_ok && node.cell_bounds().contains_point(world.center());

        if still_fits {
            self.propagate_growth(node_key, &world);
        } else {
            self.detach(key);
            let node = self.insert_record(key);
            crate::octree_trace!(
                LOG_SOURCE,
                "{} moved to level {}",
                self.records[key].entity,
                self.nodes[node].level
            );
        }
    }

    /// Update every entity the source reports as dynamic.
    ///
    /// Intended to run once per frame. Failures are logged and skipped.
    /// Returns the number of entities updated.
    pub fn update_dynamic(&mut self) -> usize {
        let dynamic = self.source.dynamic_entities();
        dynamic
            .into_iter()
            .filter(|&entity| self.update(entity).is_ok())
            .count()
    }

    /// Remove every record of an entity. Returns how many were removed.
    ///
    /// Node boxes are not shrunk and emptied nodes are kept.
    ///
    /// # Errors
    ///
    /// `EntityNotIndexed` if `entity` has no record.
    pub fn remove(&mut self, entity: EntityId) -> Result<usize> {
        let keys = self.entity_records.remove(&entity).ok_or_else(|| {
            log_and_return_error(Error::EntityNotIndexed(format!("{} cannot be removed", entity)))
        })?;

        for &key in &keys {
            self.detach(key);
            self.records.free(key);
        }

        Ok(keys.len())
    }

    /// Remove a single record, leaving other records of the same entity.
    ///
    /// # Errors
    ///
    /// `StaleRecord` if the key was already freed.
    pub fn remove_record(&mut self, key: EntityRecordKey) -> Result<()> {
        if !self.records.contains(key) {
            return Err(log_and_return_error(Error::StaleRecord(format!(
                "{:?} is not a live record",
                key
            ))));
        }

        self.detach(key);
        if let Some(record) = self.records.free(key) {
            if let Some(keys) = self.entity_records.get_mut(&record.entity) {
                keys.retain(|&k| k != key);
                if keys.is_empty() {
                    self.entity_records.remove(&record.entity);
                }
            }
        }

        Ok(())
    }

    /// Take a record out of its node's data list (record stays allocated).
    fn detach(&mut self, key: EntityRecordKey) {
        let node_key = self.records[key].node;
        let data = &mut self.nodes[node_key].data;
        if let Some(pos) = data.iter().position(|&k| k == key) {
            data.swap_remove(pos);
        }
    }

    /// Apply a scene notification. Returns the number of entities applied.
    ///
    /// Entities that fail are logged and skipped.
    pub fn handle_event(&mut self, event: &SceneEvent) -> usize {
        let (entities, action) = match event {
            SceneEvent::EntitiesCreated(entities) => (entities, "add"),
            SceneEvent::EntitiesDestroyed(entities) => (entities, "remove"),
            SceneEvent::TransformsChanged(entities) => (entities, "update"),
        };

        let mut applied = 0;
        for &entity in entities {
            let result = match event {
                SceneEvent::EntitiesCreated(_) => self.add(entity).map(|_| ()),
                SceneEvent::EntitiesDestroyed(_) => self.remove(entity).map(|_| ()),
                SceneEvent::TransformsChanged(_) => self.update(entity).map(|_| ()),
            };

            match result {
                Ok(()) => applied += 1,
                Err(_) => crate::octree_warn!(LOG_SOURCE, "Skipped {} for {}", action, entity),
            }
        }

        applied
    }

    // ===== ACCESSORS =====

    /// Key of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn root_level(&self) -> i32 {
        self.nodes[self.root].level
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn record(&self, key: EntityRecordKey) -> Option<&EntityRecord> {
        self.records.get(key)
    }

    /// Iterate over every node (in pool order)
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Iterate over every record (in pool order)
    pub fn records(&self) -> impl Iterator<Item = (EntityRecordKey, &EntityRecord)> {
        self.records.iter()
    }

    /// Records currently held for an entity (empty if not indexed)
    pub fn records_of(&self, entity: EntityId) -> &[EntityRecordKey] {
        self.entity_records
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_entity(&self, entity: EntityId) -> bool {
        self.entity_records.contains_key(&entity)
    }

    /// Number of live records
    pub fn entity_count(&self) -> usize {
        self.records.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source; call `update` afterwards for
    /// entities whose bounds changed.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn stats(&self) -> OctreeStats {
        let root_level = self.root_level();
        let deepest = self.nodes.iter().map(|(_, n)| n.level).min().unwrap_or(root_level);

        OctreeStats {
            node_count: self.nodes.len(),
            entity_count: self.records.len(),
            root_level,
            max_depth: (root_level - deepest) as u32,
            expansions: self.expansions,
            splits: self.splits,
        }
    }
}

/// World box of `bounds`, rejecting NaN/infinite results.
fn checked_world_aabb(entity: EntityId, bounds: &EntityBounds) -> Result<AABB> {
    let world = bounds.world_aabb();
    if world.is_finite() {
        Ok(world)
    } else {
        Err(log_and_return_error(Error::InvalidBounds(format!(
            "{} has a non-finite world box {:?}",
            entity, world
        ))))
    }
}

/// Log errors before returning them so every failure shows up once.
fn log_and_return_error(error: Error) -> Error {
    crate::octree_error!(LOG_SOURCE, "{}", error);
    error
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
