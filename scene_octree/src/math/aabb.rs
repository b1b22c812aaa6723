/// Axis-aligned bounding box used by the octree and the frustum.
///
/// Every box in the index is world-space. Node boxes only ever grow,
/// so `grow()` reports whether anything changed to let callers stop
/// propagating early.

use glam::{Mat4, Vec3};

// ===== AABB =====

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create a box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a cube of edge `size` centered on `center`.
    pub fn cube(center: Vec3, size: f32) -> Self {
        let half = Vec3::splat(size * 0.5);
        Self { min: center - half, max: center + half }
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along x, y and z.
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest edge length.
    ///
    /// This is the "box size" used to pick the placement level of an entity.
    pub fn max_dimension(&self) -> f32 {
        self.dimensions().max_element()
    }

    /// Whether both corners only hold finite values.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Test if this AABB fully contains another AABB (touching faces count).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if `other` lies strictly inside this AABB (no shared faces).
    ///
    /// The root growth check uses the strict form: an entity touching
    /// the root boundary triggers one more expansion.
    pub fn contains_strict(&self, other: &AABB) -> bool {
        self.min.x < other.min.x && self.max.x > other.max.x
        && self.min.y < other.min.y && self.max.y > other.max.y
        && self.min.z < other.min.z && self.max.z > other.max.z
    }

    /// Test if a point lies inside this AABB (inclusive).
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow this box in place so it encloses `other`.
    ///
    /// Returns `true` if any bound moved.
    pub fn grow(&mut self, other: &AABB) -> bool {
        let grown = self.union(other);
        let changed = grown != *self;
        *self = grown;
        changed
    }

    /// The 8 corners of the box.
    ///
    /// Corner `i` takes `max` on x when bit 0 is set, on y for bit 1
    /// and on z for bit 2.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Transform this model-space AABB by a matrix, returning a world AABB.
    ///
    /// All 8 corners are transformed and the component-wise min/max is
    /// taken, giving a conservative AABB of the oriented box.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = self.corners();
        let first = matrix.transform_point3(corners[0]);
        let mut result = AABB { min: first, max: first };

        for corner in &corners[1..] {
            let p = matrix.transform_point3(*corner);
            result.min = result.min.min(p);
            result.max = result.max.max(p);
        }

        result
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
