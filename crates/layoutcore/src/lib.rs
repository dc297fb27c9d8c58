#![doc = include_str!("../README.md")]

mod error;

use std::sync::{Mutex, OnceLock};

use bitflags::bitflags;

pub use error::{LayoutCoreError, LayoutCoreResult};

pub use layoutcore_geom::{
    approx_eq, is_near_zero, orientation, segment_closest_points, segment_distance,
    segment_intersection_point, segments_intersect, GeomError, GeomResult, Orientation, Point,
    Polygon, Rectangle, TOLERANCE_EPSILON,
};
pub use layoutcore_morton::{
    calc_common_prefix, decode, encode, encode_point, find_split, generate_hierarchy, morton_2d_u16,
    HNode, HNodeId, MortonCode,
};
pub use layoutcore_index::{
    Arena, ArenaKey, HierarchicalIndex, HierarchyStats, IndexError, IndexFactory, IndexResult,
    Quadtree, QuadtreeStats, RTree, ShapeId, TaskHandle, WorkerPool, MAX_ENTRIES, MIN_ENTRIES,
};
pub use layoutcore_drc::{
    find_edge_intersections, find_narrow_regions, find_narrow_regions_many, sharp_angles,
    sharp_angles_with_threshold, NarrowRegion, DEFAULT_SHARP_ANGLE_THRESHOLD_DEGREES,
};

bitflags! {
    /// Process-global feature toggles set by [`initialize`].
    ///
    /// Mirrors the teacher's `NodeState` bitflags pattern (a small, fixed
    /// universe of boolean flags packed into one byte) rather than a
    /// struct of `bool` fields, even though today there is exactly one
    /// flag — `worker_threads`/`max_objects_per_block`/etc. are numeric
    /// knobs and live on [`LibraryConfig`] instead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Whether `parallel_*` operations may use the worker pool at all.
        /// When unset, callers should fall back to the sequential path
        /// (`bulk_insert` instead of `parallel_bulk_insert`, etc.) — the
        /// flag is advisory, since nothing in `layoutcore-index` consults
        /// process-global state directly (every index owns its own
        /// [`WorkerPool`]).
        const PARALLEL_ENABLED = 1;
    }
}

/// The numeric configuration knobs `§6` of the specification recognizes.
///
/// `tolerance_epsilon` is informational here: every predicate in
/// [`layoutcore_geom`] is built on the crate-wide
/// [`TOLERANCE_EPSILON`] constant, which is fixed at compile time rather
/// than threaded through every call site as a runtime parameter. Recording
/// the intended value on [`LibraryConfig`] keeps the full configuration
/// surface visible to callers even though changing it would require
/// recompiling `layoutcore-geom` with a different constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryConfig {
    pub max_objects_per_block: usize,
    pub max_hierarchy_levels: u32,
    pub tolerance_epsilon: f64,
    pub worker_threads: Option<usize>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            max_objects_per_block: 1_000_000,
            max_hierarchy_levels: 8,
            tolerance_epsilon: TOLERANCE_EPSILON,
            worker_threads: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct LifecycleState {
    initialized: bool,
    capabilities: Capabilities,
    config: LibraryConfig,
}

static LIFECYCLE: OnceLock<Mutex<LifecycleState>> = OnceLock::new();

fn lifecycle() -> &'static Mutex<LifecycleState> {
    LIFECYCLE.get_or_init(|| Mutex::new(LifecycleState::default()))
}

/// `"major.minor.patch"` of the crate currently linked.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Brings the process-wide lifecycle state up, recording whether
/// `parallel_*` operations are expected to use worker pools.
///
/// Idempotent-with-warning: a second call while already initialized is not
/// an error — it returns `true` without changing the recorded
/// [`Capabilities`]/[`LibraryConfig`] a first call established. (This core
/// emits no log of its own per its error-handling design — see the crate
/// docs — so the "warning" the specification describes is this
/// no-op-but-successful return rather than a printed message; callers who
/// need to detect re-initialization should check [`is_initialized`]
/// before calling.)
pub fn initialize(enable_parallel: bool) -> bool {
    let mut state = lifecycle().lock().expect("lifecycle mutex poisoned");
    if state.initialized {
        return true;
    }
    state.initialized = true;
    state.capabilities.set(Capabilities::PARALLEL_ENABLED, enable_parallel);
    true
}

/// Like [`initialize`], but also records the numeric knobs in
/// [`LibraryConfig`] (otherwise left at [`LibraryConfig::default`]).
pub fn initialize_with_config(enable_parallel: bool, config: LibraryConfig) -> bool {
    let first_time = initialize(enable_parallel);
    let mut state = lifecycle().lock().expect("lifecycle mutex poisoned");
    state.config = config;
    first_time
}

/// Returns the library to the uninitialized state, discarding any
/// recorded [`Capabilities`]/[`LibraryConfig`]. Does not affect indices
/// already constructed — those own their own worker pools and arenas and
/// remain queryable independent of process-global lifecycle state.
pub fn cleanup() {
    let mut state = lifecycle().lock().expect("lifecycle mutex poisoned");
    *state = LifecycleState::default();
}

/// Whether [`initialize`] has been called since the last [`cleanup`].
pub fn is_initialized() -> bool {
    lifecycle().lock().expect("lifecycle mutex poisoned").initialized
}

/// Whether the process is initialized with `enable_parallel = true`.
/// `false` both before [`initialize`] and after an `enable_parallel: false`
/// call.
pub fn parallel_enabled() -> bool {
    let state = lifecycle().lock().expect("lifecycle mutex poisoned");
    state.initialized && state.capabilities.contains(Capabilities::PARALLEL_ENABLED)
}

/// The [`LibraryConfig`] recorded by the most recent [`initialize_with_config`]
/// call, or the default config if none has run (or after [`cleanup`]).
pub fn config() -> LibraryConfig {
    lifecycle().lock().expect("lifecycle mutex poisoned").config
}

/// Builds a [`WorkerPool`] honoring the current [`parallel_enabled`] state
/// and [`LibraryConfig::worker_threads`] override: a single-worker pool
/// when parallel processing is disabled (so `parallel_*` calls still work,
/// just without concurrency), otherwise a pool sized to
/// `worker_threads` or [`std::thread::available_parallelism`].
pub fn worker_pool() -> WorkerPool {
    if !parallel_enabled() {
        return WorkerPool::with_size(1);
    }
    match config().worker_threads {
        Some(size) => WorkerPool::with_size(size),
        None => WorkerPool::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // The lifecycle is process-global state shared by every test in this
    // binary; serialize access so tests don't observe each other's
    // initialize/cleanup calls.
    static TEST_LOCK: StdMutex<()> = StdMutex::new(());

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }

    #[test]
    fn initialize_is_idempotent_and_cleanup_resets() {
        let _guard = TEST_LOCK.lock().unwrap();
        cleanup();
        assert!(!is_initialized());

        assert!(initialize(true));
        assert!(is_initialized());
        assert!(parallel_enabled());

        // Second call while already initialized still returns true and
        // does not flip the recorded capability back off.
        assert!(initialize(false));
        assert!(parallel_enabled());

        cleanup();
        assert!(!is_initialized());
        assert!(!parallel_enabled());
    }

    #[test]
    fn worker_pool_is_single_threaded_when_parallel_disabled() {
        let _guard = TEST_LOCK.lock().unwrap();
        cleanup();
        initialize(false);
        let pool = worker_pool();
        assert_eq!(pool.worker_count(), 1);
        cleanup();
    }

    #[test]
    fn config_defaults_match_library_config_default() {
        let _guard = TEST_LOCK.lock().unwrap();
        cleanup();
        assert_eq!(config(), LibraryConfig::default());
    }

    #[test]
    fn parallel_bulk_insert_ten_thousand_seeded_rects_then_range_query_matches_exactly() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let world = Rectangle::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let index: HierarchicalIndex<()> = HierarchicalIndex::new(world);
        index
            .create_ip_block("north", Rectangle::new(0.0, 500.0, 1000.0, 500.0).unwrap(), "root")
            .unwrap();

        // Each 1x1 rectangle is placed wholly below y=498 or wholly at/above
        // y=500, never straddling the block boundary, so "center y >= 500"
        // and "routed into (or overlapping) the north block" agree exactly.
        let mut rng = StdRng::seed_from_u64(42);
        let mut expected_north = 0usize;
        let items: Vec<(Rectangle, ())> = (0..10_000)
            .map(|_| {
                let x = rng.random_range(0.0..999.0);
                let in_north = rng.random::<bool>();
                let y = if in_north {
                    expected_north += 1;
                    rng.random_range(500.0..999.0)
                } else {
                    rng.random_range(0.0..498.0)
                };
                (Rectangle::new(x, y, 1.0, 1.0).unwrap(), ())
            })
            .collect();

        let pool = WorkerPool::with_size(4);
        index.parallel_bulk_insert(items, &pool);

        let hits = index.parallel_query_range(Rectangle::new(0.0, 500.0, 1000.0, 500.0).unwrap(), &pool);
        assert_eq!(hits.len(), expected_north);
    }
}
