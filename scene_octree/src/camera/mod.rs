//! Camera module — view frustum used by the frame consumer.
//!
//! The octree does NOT own cameras. The caller computes a frustum
//! once per frame and hands it to the culling queries.

mod frustum;

pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
