/*!
# Scene Octree

Dynamic loose octree over scene entity bounding boxes, used to cull the
renderable entities of a 3D scene against a camera frustum.

## Architecture

- **Octree**: the spatial index. Grows its root on demand, splits crowded
  nodes, keeps loose per-node boxes that enclose everything below them
- **EntitySource**: the scene boundary the octree reads model boxes and
  world transforms from (`MockScene` for tests and tools)
- **Frustum**: six-plane view volume with a 3-way AABB classification
- **ObjectPool**: slotmap-backed storage for nodes and entity records

The octree never owns entity data; it caches each entity's world box in
an `EntityRecord` stored in exactly one node.
*/

// Internal modules
mod error;
pub mod log;
pub mod math;
pub mod camera;
pub mod pool;
pub mod scene;
pub mod octree;

// Main octree3d namespace module
pub mod octree3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Index
    pub use crate::octree::{
        EntityRecord, EntityRecordKey, Node, NodeKey, Octree,
        OctreeConfig, OctreeStats, OctreeStorage, VisibleSet,
    };

    // Scene boundary
    pub use crate::scene::{EntityBounds, EntityId, EntitySource, MockScene, SceneEvent};

    // Geometry
    pub use crate::camera::{Frustum, FrustumTest};
    pub use crate::math::AABB;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            DefaultLogger, LogEntry, LogSeverity, Logger, reset_logger, set_logger,
        };
    }
}

// Re-export math library at crate root
pub use glam;
