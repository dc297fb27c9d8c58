#![doc = include_str!("../README.md")]

pub mod arena;
pub mod error;
pub mod factory;
pub mod hierarchical;
pub mod pool;
pub mod quadtree;
pub mod rtree;

pub use arena::{Arena, ArenaKey};
pub use error::{IndexError, IndexResult};
pub use factory::IndexFactory;
pub use hierarchical::{HierarchicalIndex, HierarchyStats, ShapeId};
pub use pool::{TaskHandle, WorkerPool};
pub use quadtree::{Quadtree, QuadtreeStats};
pub use rtree::{RTree, MAX_ENTRIES, MIN_ENTRIES};
