//! Picks hierarchical-index parameters from an expected-object-count hint,
//! so callers don't have to hand-tune `max_objects_per_block` /
//! `max_hierarchy_levels` themselves for a workload of roughly known size.

use layoutcore_geom::Rectangle;

use crate::hierarchical::HierarchicalIndex;

/// Builds a [`HierarchicalIndex`] pre-sized for a workload of roughly
/// `expected_count` objects.
pub struct IndexFactory;

impl IndexFactory {
    /// Chooses `max_objects_per_block` / `max_hierarchy_levels` from
    /// `expected_count`, coarser-grained the larger the expected workload
    /// (fewer, deeper levels of splitting relative to block size) so
    /// `optimize_hierarchy` doesn't thrash on enormous designs.
    pub fn create_optimized_index<T>(world_bounds: Rectangle, expected_count: u64) -> HierarchicalIndex<T> {
        let (max_objects_per_block, max_hierarchy_levels) = if expected_count > 100_000_000 {
            (10_000_000, 12)
        } else if expected_count > 10_000_000 {
            (1_000_000, 10)
        } else {
            (1_000_000, 8)
        };

        HierarchicalIndex::with_optimization_limits(world_bounds, max_objects_per_block, max_hierarchy_levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Rectangle {
        Rectangle::new(0.0, 0.0, 1_000_000.0, 1_000_000.0).unwrap()
    }

    #[test]
    fn small_workload_gets_shallow_default_tier() {
        let idx: HierarchicalIndex<u32> = IndexFactory::create_optimized_index(world(), 5_000);
        idx.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1);
        assert_eq!(idx.stats().object_count, 1);
    }

    #[test]
    fn huge_workload_gets_the_deepest_tier() {
        let idx: HierarchicalIndex<u32> = IndexFactory::create_optimized_index(world(), 200_000_000);
        idx.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1);
        assert_eq!(idx.stats().object_count, 1);
    }
}
