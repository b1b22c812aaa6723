//! Math module — bounding volumes shared by the octree and the frustum.

mod aabb;

pub use aabb::AABB;
