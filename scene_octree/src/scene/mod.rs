//! Scene module — the entity boundary the octree reads from.
//!
//! The octree only sees entity ids, their mesh bounding boxes and
//! world transforms. `MockScene` is an in-memory implementation used by
//! tests and tools.

mod entity_source;
pub mod mock_scene;

pub use entity_source::{EntityBounds, EntityId, EntitySource, SceneEvent};
pub use mock_scene::MockScene;
