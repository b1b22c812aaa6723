/// Frustum queries over the octree (frame consumer side).
///
/// 3-way classification at each node, using the node's loose box:
/// - `Outside` → skip entire subtree
/// - `Inside` → collect all records from subtree without further testing
/// - `Partial` → test records individually, recurse into children

use std::collections::BTreeMap;
use crate::camera::{Frustum, FrustumTest};
use crate::scene::{EntityId, EntitySource};
use super::node::NodeKey;
use super::octree::Octree;
use super::record::{EntityRecord, EntityRecordKey};

/// Result of `Octree::cull`. Ephemeral: lives for one frame.
///
/// Visible records bucketed by their render group, groups in ascending
/// order.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    groups: BTreeMap<u32, Vec<EntityRecordKey>>,
    len: usize,
}

impl VisibleSet {
    /// Visible records of one group (empty if none)
    pub fn group(&self, group: u32) -> &[EntityRecordKey] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Groups with at least one visible record
    pub fn group_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[EntityRecordKey])> {
        self.groups.iter().map(|(&group, keys)| (group, keys.as_slice()))
    }

    pub fn contains(&self, key: EntityRecordKey) -> bool {
        self.groups.values().any(|keys| keys.contains(&key))
    }

    /// Total number of visible records
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, group: u32, key: EntityRecordKey) {
        self.groups.entry(group).or_default().push(key);
        self.len += 1;
    }
}

impl<S: EntitySource> Octree<S> {
    /// Call `visitor` for every record whose box may be visible.
    ///
    /// Conservative: may visit records slightly outside the frustum,
    /// never skips a visible one.
    pub fn visit_frustum<F>(&self, frustum: &Frustum, mut visitor: F)
    where
        F: FnMut(EntityRecordKey, &EntityRecord),
    {
        let root_class = frustum.classify_aabb(self.nodes[self.root].bounding_box());
        self.visit_recursive(self.root, frustum, root_class, &mut visitor);
    }

    /// Append the ids of potentially visible entities to `results`.
    ///
    /// An entity with several records appears once per visible record.
    pub fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<EntityId>) {
        self.visit_frustum(frustum, |_, record| results.push(record.entity));
    }

    /// Cull the octree and bucket the visible records by render group.
    pub fn cull(&self, frustum: &Frustum) -> VisibleSet {
        let mut visible = VisibleSet::default();
        self.visit_frustum(frustum, |key, record| visible.push(record.group, key));
        visible
    }

    fn visit_recursive<F>(
        &self,
        node_key: NodeKey,
        frustum: &Frustum,
        classification: FrustumTest,
        visitor: &mut F,
    ) where
        F: FnMut(EntityRecordKey, &EntityRecord),
    {
        let node = &self.nodes[node_key];

        match classification {
            FrustumTest::Outside => {}

            FrustumTest::Inside => self.collect_all(node_key, visitor),

            FrustumTest::Partial => {
                for &key in &node.data {
                    let record = &self.records[key];
                    if frustum.intersects_aabb(&record.world_bounding_box) {
                        visitor(key, record);
                    }
                }

                for child in node.children.iter().flatten() {
                    let child_class = frustum.classify_aabb(&self.nodes[*child].bounding_box);
                    self.visit_recursive(*child, frustum, child_class, visitor);
                }
            }
        }
    }

    /// Visit every record of a subtree (no frustum test).
    fn collect_all<F>(&self, node_key: NodeKey, visitor: &mut F)
    where
        F: FnMut(EntityRecordKey, &EntityRecord),
    {
        let node = &self.nodes[node_key];
        for &key in &node.data {
            visitor(key, &self.records[key]);
        }

        for child in node.children.iter().flatten() {
            self.collect_all(*child, visitor);
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
