/// Frustum — six clipping planes for visibility culling.
///
/// Each plane is a Vec4 (A, B, C, D): (A, B, C) is the inward-pointing
/// unit normal and D the signed offset. A point P is on the visible side
/// of a plane when `dot(n, P) + D >= 0`.
///
/// The octree only reads frusta. Building them from a camera is the
/// caller's job; `from_view_projection()` is provided as a utility.

use glam::{Mat4, Vec3, Vec4};
use crate::math::AABB;

/// Result of a 3-way frustum/AABB classification.
///
/// Drives the hierarchical octree traversal:
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect the subtree without further testing
/// - `Partial` → test records individually and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Normalized planes, indexed by the `PLANE_*` constants
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Build a frustum from raw planes, normalizing each one.
    pub fn from_planes(planes: [Vec4; 6]) -> Self {
        let mut planes = planes;
        for plane in &mut planes {
            let normal_len = plane.truncate().length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Gribb & Hartmann extraction for glam's clip space, where depth
    /// runs from 0 (near) to 1 (far). Works for perspective and
    /// orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        Self::from_planes([
            row3 + row0, // left
            row3 - row0, // right
            row3 + row1, // bottom
            row3 - row1, // top
            row2,        // near (z_ndc >= 0)
            row3 - row2, // far
        ])
    }

    /// Signed distance from a point to one of the planes.
    pub fn distance(&self, plane: usize, point: Vec3) -> f32 {
        let p = self.planes[plane];
        p.truncate().dot(point) + p.w
    }

    /// Test if a point is inside all six planes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        (0..6).all(|i| self.distance(i, point) >= 0.0)
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Conservative: may report boxes near a frustum corner as visible,
    /// never rejects a visible box.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes
            .iter()
            .all(|plane| signed_distance(plane, positive_vertex(plane, aabb)) >= 0.0)
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// The p-vertex outside any plane means `Outside`. Otherwise, an
    /// n-vertex outside some plane means `Partial`, else `Inside`.
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut all_inside = true;

        for plane in &self.planes {
            if signed_distance(plane, positive_vertex(plane, aabb)) < 0.0 {
                return FrustumTest::Outside;
            }
            if signed_distance(plane, negative_vertex(plane, aabb)) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

/// Corner of `aabb` furthest along the plane normal.
fn positive_vertex(plane: &Vec4, aabb: &AABB) -> Vec3 {
    Vec3::new(
        if plane.x >= 0.0 { aabb.max.x } else { aabb.min.x },
        if plane.y >= 0.0 { aabb.max.y } else { aabb.min.y },
        if plane.z >= 0.0 { aabb.max.z } else { aabb.min.z },
    )
}

/// Corner of `aabb` furthest against the plane normal.
fn negative_vertex(plane: &Vec4, aabb: &AABB) -> Vec3 {
    Vec3::new(
        if plane.x >= 0.0 { aabb.min.x } else { aabb.max.x },
        if plane.y >= 0.0 { aabb.min.y } else { aabb.max.y },
        if plane.z >= 0.0 { aabb.min.z } else { aabb.max.z },
    )
}

fn signed_distance(plane: &Vec4, point: Vec3) -> f32 {
    plane.truncate().dot(point) + plane.w
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
