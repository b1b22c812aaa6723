//! Object pools backing the octree's nodes and entity records.

mod object_pool;

pub use object_pool::ObjectPool;
