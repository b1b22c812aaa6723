/// Octree cells and the grid math shared by insertion and splitting.
///
/// A node at `level` covers a nominal cube of edge `base_size * 2^level`
/// centered on `center`. Nominal cells always sit on a power-of-two
/// grid around the origin, including after the root has been expanded.
/// The node's `bounding_box` is the loose box: nominal cell plus
/// everything stored below it. It only grows.

use glam::Vec3;
use slotmap::new_key_type;
use crate::math::AABB;
use super::record::EntityRecordKey;

new_key_type! {
    /// Stable key of a node in the octree's node pool
    pub struct NodeKey;
}

/// Edge length of a level-0 cell
pub const BASE_SIZE: f32 = 16.0;

/// Position of each octant's minimum corner inside its parent cell,
/// in units of the parent's edge length.
///
/// Bit layout of the octant index: bit0 = X, bit1 = Y, bit2 = Z
/// (0 = low half, 1 = high half). `7 - i` is the point-mirrored octant.
pub const NODE_OFFSETS: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.5, 0.0, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(0.0, 0.0, 0.5),
    Vec3::new(0.5, 0.0, 0.5),
    Vec3::new(0.0, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
];

/// Nominal edge length of a cell at `level`.
pub fn cell_size(base_size: f32, level: i32) -> f32 {
    base_size * 2.0f32.powi(level)
}

/// Octant of `point` relative to a cell center.
pub fn octant_index(center: Vec3, point: Vec3) -> usize {
    (point.x >= center.x) as usize
        | (((point.y >= center.y) as usize) << 1)
        | (((point.z >= center.z) as usize) << 2)
}

/// Center of octant `octant` of the cell (`center`, `size`).
pub fn octant_center(center: Vec3, size: f32, octant: usize) -> Vec3 {
    let cell_min = center - Vec3::splat(size * 0.5);
    cell_min + NODE_OFFSETS[octant] * size + Vec3::splat(size * 0.25)
}

/// Shallowest level an entity of edge `box_size` may rest in directly.
///
/// Steps from level 0 until `box_size / cell_size(level)` falls in
/// `[0.5, 1.0]`. Zero, negative and NaN sizes never reach that range and
/// get `floor`; the downward search also stops at `floor`.
pub fn min_level(box_size: f32, base_size: f32, floor: i32) -> i32 {
    if box_size.is_nan() || box_size <= 0.0 {
        return floor;
    }

    let mut level = 0;
    let mut ratio = box_size / base_size;

    while ratio > 1.0 || ratio < 0.5 {
        if ratio > 1.0 {
            level += 1;
        } else if level > floor {
            level -= 1;
        } else {
            break;
        }
        ratio = box_size / cell_size(base_size, level);
    }

    level
}

/// A cubic cell of the octree.
///
/// Nodes are created and mutated by `Octree` only; the frame consumer
/// and tests read them through the accessors below.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) level: i32,
    pub(crate) center: Vec3,
    pub(crate) size: f32,
    pub(crate) bounding_box: AABB,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: [Option<NodeKey>; 8],
    pub(crate) data: Vec<EntityRecordKey>,
}

impl Node {
    /// Empty node whose loose box starts as its nominal cell.
    pub(crate) fn new(level: i32, center: Vec3, size: f32, parent: Option<NodeKey>) -> Self {
        Self {
            level,
            center,
            size,
            bounding_box: AABB::cube(center, size),
            parent,
            children: [None; 8],
            data: Vec::new(),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Center of the nominal cell
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Edge length of the nominal cell
    pub fn cell_size(&self) -> f32 {
        self.size
    }

    /// The nominal grid cell (not the loose box)
    pub fn cell_bounds(&self) -> AABB {
        AABB::cube(self.center, self.size)
    }

    /// Accumulated box enclosing the cell and all content below it
    pub fn bounding_box(&self) -> &AABB {
        &self.bounding_box
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[Option<NodeKey>; 8] {
        &self.children
    }

    pub fn child(&self, octant: usize) -> Option<NodeKey> {
        self.children[octant]
    }

    pub fn has_children(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }

    /// Records stored directly in this node
    pub fn data(&self) -> &[EntityRecordKey] {
        &self.data
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
