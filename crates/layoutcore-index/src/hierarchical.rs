//! A hierarchical spatial index over a tree of named IP blocks: each block
//! owns its own quadtree and R-tree, blocks nest by boundary containment,
//! and bulk insert runs through a Morton pre-sort so spatially close shapes
//! land in the index in close-together order.
//!
//! Like the individual trees it wraps, block-tree structure (creating a
//! block, splitting one during [`HierarchicalIndex::optimize_hierarchy`])
//! takes a write lock over the block map; inserting into or querying an
//! already-existing block only needs a read lock on the map itself — the
//! per-block quadtree and R-tree then take their own lock for the actual
//! insert/query, same as everywhere else in this crate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use hashbrown::HashMap;

use layoutcore_geom::Rectangle;
use layoutcore_morton::encode_point;

use crate::error::{IndexError, IndexResult};
use crate::pool::WorkerPool;
use crate::quadtree::Quadtree;
use crate::rtree::RTree;

const ROOT_BLOCK: &str = "root";
const DEFAULT_BLOCK_CAPACITY: usize = 100;
const DEFAULT_BLOCK_MAX_DEPTH: u32 = 8;
const DEFAULT_MAX_OBJECTS_PER_BLOCK: usize = 500;
const DEFAULT_MAX_HIERARCHY_LEVELS: u32 = 6;

/// Identifies a single shape registered with a [`HierarchicalIndex`],
/// independent of which block currently owns it. Stable across
/// [`HierarchicalIndex::optimize_hierarchy`] re-routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u64);

struct BlockNode {
    boundary: Rectangle,
    level: u32,
    parent: Option<String>,
    children: Vec<String>,
    components: RwLock<Vec<ShapeId>>,
    quadtree: Quadtree<ShapeId>,
    rtree: RTree<ShapeId>,
}

impl BlockNode {
    fn new(boundary: Rectangle, level: u32, parent: Option<String>) -> Self {
        Self {
            boundary,
            level,
            parent,
            children: Vec::new(),
            components: RwLock::new(Vec::new()),
            quadtree: Quadtree::with_capacity(boundary, DEFAULT_BLOCK_CAPACITY, DEFAULT_BLOCK_MAX_DEPTH),
            rtree: RTree::new(),
        }
    }
}

/// Aggregate counters describing the whole hierarchy's current shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    pub block_count: usize,
    pub object_count: usize,
    pub max_level_reached: u32,
    pub average_objects_per_block: f64,
}

/// A tree of named IP blocks, each with its own quadtree and R-tree, over
/// one shared world-coordinate space used for Morton pre-sorting on bulk
/// insert. A `"root"` block spanning `world_bounds` always exists.
pub struct HierarchicalIndex<T> {
    world_bounds: Rectangle,
    blocks: RwLock<HashMap<String, BlockNode>>,
    objects: RwLock<HashMap<ShapeId, (String, Rectangle, T)>>,
    next_id: AtomicU64,
    max_objects_per_block: usize,
    max_hierarchy_levels: u32,
}

impl<T> HierarchicalIndex<T> {
    pub fn new(world_bounds: Rectangle) -> Self {
        Self::with_optimization_limits(world_bounds, DEFAULT_MAX_OBJECTS_PER_BLOCK, DEFAULT_MAX_HIERARCHY_LEVELS)
    }

    pub fn with_optimization_limits(world_bounds: Rectangle, max_objects_per_block: usize, max_hierarchy_levels: u32) -> Self {
        let mut blocks = HashMap::new();
        blocks.insert(ROOT_BLOCK.to_string(), BlockNode::new(world_bounds, 0, None));

        Self {
            world_bounds,
            blocks: RwLock::new(blocks),
            objects: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            max_objects_per_block: max_objects_per_block.max(1),
            max_hierarchy_levels,
        }
    }

    /// Create a new named block nested under `parent_name` (`"root"` for a
    /// top-level block).
    ///
    /// # Errors
    ///
    /// - [`IndexError::UnknownBlock`] if `parent_name` has no registered block.
    /// - [`IndexError::BoundaryEscape`] if `boundary` is not fully contained
    ///   within the parent's boundary.
    /// - [`IndexError::DuplicateBlock`] if `name` is already in use.
    pub fn create_ip_block(&self, name: &str, boundary: Rectangle, parent_name: &str) -> IndexResult<()> {
        let mut blocks = self.blocks.write().expect("block map lock poisoned");

        if blocks.contains_key(name) {
            return Err(IndexError::DuplicateBlock(name.to_string()));
        }

        let (parent_boundary, level) = {
            let parent = blocks
                .get(parent_name)
                .ok_or_else(|| IndexError::UnknownBlock(parent_name.to_string()))?;
            (parent.boundary, parent.level + 1)
        };

        if !parent_boundary.contains_rectangle(&boundary) {
            return Err(IndexError::BoundaryEscape {
                child: name.to_string(),
                parent: parent_name.to_string(),
            });
        }

        blocks.insert(name.to_string(), BlockNode::new(boundary, level, Some(parent_name.to_string())));
        blocks.get_mut(parent_name).expect("just looked up above").children.push(name.to_string());

        Ok(())
    }

    pub fn block_names(&self) -> Vec<String> {
        self.blocks.read().expect("block map lock poisoned").keys().cloned().collect()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.read().expect("block map lock poisoned").len()
    }

    /// Which block currently owns `id`, if `id` is live.
    pub fn block_of(&self, id: ShapeId) -> Option<String> {
        self.objects
            .read()
            .expect("object map lock poisoned")
            .get(&id)
            .map(|(block, _, _)| block.clone())
    }

    /// Run `f` against the stored rectangle and value for `id`, if live.
    pub fn with_object<R>(&self, id: ShapeId, f: impl FnOnce(Rectangle, &T) -> R) -> Option<R> {
        let objects = self.objects.read().expect("object map lock poisoned");
        objects.get(&id).map(|(_, rect, value)| f(*rect, value))
    }

    /// Insert one shape. Descends the block tree from `"root"`, entering
    /// the first child whose boundary fully contains `rect` at each level;
    /// the shape is registered with whichever block it bottoms out at.
    pub fn insert(&self, rect: Rectangle, value: T) -> ShapeId {
        let id = ShapeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let block = self.route_and_insert(rect, id);
        self.objects.write().expect("object map lock poisoned").insert(id, (block, rect, value));
        id
    }

    /// Insert many shapes at once, Morton-sorted by rectangle center over
    /// the world bounds first so spatially nearby shapes are routed and
    /// inserted consecutively.
    pub fn bulk_insert(&self, items: Vec<(Rectangle, T)>) -> Vec<ShapeId> {
        let mut items: Vec<(u64, Rectangle, T)> = items
            .into_iter()
            .map(|(rect, value)| (encode_point(rect.center(), self.world_bounds), rect, value))
            .collect();
        items.sort_unstable_by_key(|(code, _, _)| *code);

        let mut ids = Vec::with_capacity(items.len());
        let mut objects = self.objects.write().expect("object map lock poisoned");
        for (_, rect, value) in items.drain(..) {
            let id = ShapeId(self.next_id.fetch_add(1, Ordering::Relaxed));
            let block = self.route_and_insert(rect, id);
            objects.insert(id, (block, rect, value));
            ids.push(id);
        }
        ids
    }

    /// Like [`Self::bulk_insert`], but partitions the Morton-sorted batch
    /// into [`WorkerPool::worker_count`] chunks and routes+inserts each
    /// chunk on its own scoped thread. Every per-block quadtree/R-tree
    /// insert is internally synchronized via its own lock, so concurrent
    /// routing across chunks is safe; scoped threads (rather than the
    /// pool's `'static` job queue) are what let each chunk borrow straight
    /// into `self` instead of needing an owned clone of the whole index.
    pub fn parallel_bulk_insert(&self, items: Vec<(Rectangle, T)>, pool: &WorkerPool) -> Vec<ShapeId>
    where
        T: Send + Sync,
    {
        let mut items: Vec<(u64, Rectangle, T)> = items
            .into_iter()
            .map(|(rect, value)| (encode_point(rect.center(), self.world_bounds), rect, value))
            .collect();
        items.sort_unstable_by_key(|(code, _, _)| *code);

        let chunk_count = pool.worker_count().max(1);
        let chunk_size = items.len().div_ceil(chunk_count).max(1);

        let mut chunks = Vec::with_capacity(chunk_count);
        while !items.is_empty() {
            let rest = items.split_off(chunk_size.min(items.len()));
            chunks.push(std::mem::replace(&mut items, rest));
        }

        std::thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|chunk| {
                    scope.spawn(|| {
                        chunk
                            .into_iter()
                            .map(|(_, rect, value)| {
                                let id = ShapeId(self.next_id.fetch_add(1, Ordering::Relaxed));
                                let block = self.route_and_insert(rect, id);
                                (id, block, rect, value)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut objects = self.objects.write().expect("object map lock poisoned");
            let mut ids = Vec::new();
            for handle in handles {
                for (id, block, rect, value) in handle.join().expect("insert worker panicked") {
                    objects.insert(id, (block, rect, value));
                    ids.push(id);
                }
            }
            ids
        })
    }

    /// All shapes in any block whose boundary overlaps `range`, fanned out
    /// across blocks on scoped threads (at most [`WorkerPool::worker_count`]
    /// at a time). Deduplicated even though, under the current
    /// one-block-per-object invariant, any given shape can only be
    /// answered once — safety against a future design where an object is
    /// tracked by more than one block.
    pub fn parallel_query_range(&self, range: Rectangle, pool: &WorkerPool) -> Vec<ShapeId>
    where
        T: Sync,
    {
        let blocks = self.blocks.read().expect("block map lock poisoned");
        let candidates: Vec<&BlockNode> = blocks.values().filter(|b| b.boundary.intersects(&range)).collect();
        let batch_size = pool.worker_count().max(1);

        let mut hits = Vec::new();
        for batch in candidates.chunks(batch_size) {
            let batch_hits: Vec<Vec<ShapeId>> = std::thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|block| {
                        scope.spawn(|| {
                            block
                                .quadtree
                                .query_range(range)
                                .into_iter()
                                .filter_map(|key| block.quadtree.get(key, |id| *id))
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().expect("query worker panicked")).collect()
            });
            hits.extend(batch_hits.into_iter().flatten());
        }

        hits.sort_unstable_by_key(|id| id.0);
        hits.dedup();
        hits
    }

    /// Candidate intersecting pairs, gathered independently per block (no
    /// cross-block pairs are produced — by this design an object belongs
    /// to exactly one block, so cross-block candidates would all be false
    /// positives by construction). Fanned out across scoped threads like
    /// [`Self::parallel_query_range`].
    pub fn parallel_find_intersections(&self, pool: &WorkerPool) -> Vec<(ShapeId, ShapeId)>
    where
        T: Sync,
    {
        let blocks = self.blocks.read().expect("block map lock poisoned");
        let all_blocks: Vec<&BlockNode> = blocks.values().collect();
        let batch_size = pool.worker_count().max(1);

        let mut pairs = Vec::new();
        for batch in all_blocks.chunks(batch_size) {
            let batch_pairs: Vec<Vec<(ShapeId, ShapeId)>> = std::thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|block| {
                        scope.spawn(|| {
                            block
                                .quadtree
                                .find_potential_intersections()
                                .into_iter()
                                .filter_map(|(a, b)| {
                                    let id_a = block.quadtree.get(a, |id| *id)?;
                                    let id_b = block.quadtree.get(b, |id| *id)?;
                                    Some((id_a, id_b))
                                })
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().expect("intersection worker panicked")).collect()
            });
            pairs.extend(batch_pairs.into_iter().flatten());
        }

        pairs
    }

    /// Splits any block whose component count exceeds
    /// `max_objects_per_block` (and whose level is still below
    /// `max_hierarchy_levels`) into four quadrant children named
    /// `{block}_q0`..`{block}_q3` in NW/NE/SW/SE order. Each existing
    /// component is re-routed into the first quadrant that fully contains
    /// it; components straddling a quadrant boundary stay with the parent.
    /// Since neither tree type supports removal, the parent's quadtree and
    /// R-tree are rebuilt from only the retained (straddling) components
    /// rather than mutated in place. A freshly split child that is itself
    /// still overfull (and below `max_hierarchy_levels`) is queued and
    /// split again in the same call, so one call fully subdivides a dense
    /// block rather than leaving overfull grandchildren behind.
    pub fn optimize_hierarchy(&self) -> IndexResult<()>
    where
        T: Clone,
    {
        let mut blocks = self.blocks.write().expect("block map lock poisoned");
        let objects = self.objects.read().expect("object map lock poisoned");

        let mut worklist: std::collections::VecDeque<String> = blocks
            .iter()
            .filter(|(_, b)| b.components.read().expect("components lock poisoned").len() > self.max_objects_per_block && b.level < self.max_hierarchy_levels)
            .map(|(name, _)| name.clone())
            .collect();

        while let Some(name) = worklist.pop_front() {
            let (boundary, level, components) = {
                let block = blocks.get(&name).expect("name from this map");
                (block.boundary, block.level, block.components.read().expect("components lock poisoned").clone())
            };

            if components.len() <= self.max_objects_per_block || level >= self.max_hierarchy_levels {
                continue;
            }

            let quadrants = quadrant_split(boundary);
            let mut quadrant_components: [Vec<ShapeId>; 4] = Default::default();
            let mut retained = Vec::new();

            for id in components {
                let rect = objects.get(&id).map(|(_, r, _)| *r).expect("live component must exist in objects map");
                if let Some(q) = quadrants.iter().position(|q| q.contains_rectangle(&rect)) {
                    quadrant_components[q].push(id);
                } else {
                    retained.push(id);
                }
            }

            let mut new_children = Vec::new();
            for (i, quadrant_boundary) in quadrants.into_iter().enumerate() {
                if quadrant_components[i].is_empty() {
                    continue;
                }
                let child_name = format!("{name}_q{i}");
                let mut child = BlockNode::new(quadrant_boundary, level + 1, Some(name.clone()));
                for &id in &quadrant_components[i] {
                    let rect = objects.get(&id).map(|(_, r, _)| *r).expect("live component");
                    child.quadtree.insert(rect, id);
                    child.rtree.insert(rect, id);
                }
                *child.components.get_mut().expect("fresh lock") = quadrant_components[i].clone();

                if quadrant_components[i].len() > self.max_objects_per_block && level + 1 < self.max_hierarchy_levels {
                    worklist.push_back(child_name.clone());
                }
                new_children.push((child_name, child));
            }

            let rebuilt_quadtree = Quadtree::with_capacity(boundary, DEFAULT_BLOCK_CAPACITY, DEFAULT_BLOCK_MAX_DEPTH);
            let rebuilt_rtree = RTree::new();
            for &id in &retained {
                let rect = objects.get(&id).map(|(_, r, _)| *r).expect("live component");
                rebuilt_quadtree.insert(rect, id);
                rebuilt_rtree.insert(rect, id);
            }

            let child_names: Vec<String> = new_children.iter().map(|(n, _)| n.clone()).collect();
            for (child_name, child) in new_children {
                blocks.insert(child_name, child);
            }

            let parent = blocks.get_mut(&name).expect("name from this map");
            parent.quadtree = rebuilt_quadtree;
            parent.rtree = rebuilt_rtree;
            *parent.components.get_mut().expect("components lock poisoned") = retained;
            parent.children.extend(child_names);
        }

        drop(objects);

        // Moved components now live in a different block; reflect that in
        // the global object map's block-name bookkeeping.
        let mut objects = self.objects.write().expect("object map lock poisoned");
        for (name, block) in blocks.iter() {
            for &id in block.components.read().expect("components lock poisoned").iter() {
                if let Some(entry) = objects.get_mut(&id) {
                    entry.0 = name.clone();
                }
            }
        }

        Ok(())
    }

    pub fn stats(&self) -> HierarchyStats {
        let blocks = self.blocks.read().expect("block map lock poisoned");
        let object_count = self.objects.read().expect("object map lock poisoned").len();
        let block_count = blocks.len();
        let max_level_reached = blocks.values().map(|b| b.level).max().unwrap_or(0);
        let average_objects_per_block = if block_count == 0 { 0.0 } else { object_count as f64 / block_count as f64 };

        HierarchyStats { block_count, object_count, max_level_reached, average_objects_per_block }
    }

    fn route_and_insert(&self, rect: Rectangle, id: ShapeId) -> String {
        let blocks = self.blocks.read().expect("block map lock poisoned");
        let name = find_routed_block(&blocks, rect);
        let node = blocks.get(&name).expect("routing always lands on a known block");
        node.quadtree.insert(rect, id);
        node.rtree.insert(rect, id);
        node.components.write().expect("components lock poisoned").push(id);
        name
    }

    fn route_block_name(&self, rect: Rectangle) -> String {
        let blocks = self.blocks.read().expect("block map lock poisoned");
        find_routed_block(&blocks, rect)
    }
}

fn find_routed_block(blocks: &HashMap<String, BlockNode>, rect: Rectangle) -> String {
    let mut current = ROOT_BLOCK.to_string();
    loop {
        let node = blocks.get(&current).expect("current block always exists");
        let next = node
            .children
            .iter()
            .find(|child| blocks.get(*child).is_some_and(|c| c.boundary.contains_rectangle(&rect)));
        match next {
            Some(child) => current = child.clone(),
            None => return current,
        }
    }
}

/// Splits `boundary` into four equal quadrants, in NW/NE/SW/SE order —
/// matching [`crate::quadtree::Quadtree`]'s own subdivision convention.
fn quadrant_split(boundary: Rectangle) -> [Rectangle; 4] {
    let hw = boundary.width / 2.0;
    let hh = boundary.height / 2.0;
    let (x, y) = (boundary.x, boundary.y);
    [
        Rectangle { x, y: y + hh, width: hw, height: hh }, // NW
        Rectangle { x: x + hw, y: y + hh, width: hw, height: hh }, // NE
        Rectangle { x, y, width: hw, height: hh }, // SW
        Rectangle { x: x + hw, y, width: hw, height: hh }, // SE
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Rectangle {
        Rectangle::new(0.0, 0.0, 1000.0, 1000.0).unwrap()
    }

    #[test]
    fn root_block_exists_from_the_start() {
        let idx: HierarchicalIndex<u32> = HierarchicalIndex::new(world());
        assert_eq!(idx.block_count(), 1);
        assert_eq!(idx.block_names(), vec!["root".to_string()]);
    }

    #[test]
    fn create_ip_block_rejects_duplicate_name() {
        let idx: HierarchicalIndex<u32> = HierarchicalIndex::new(world());
        let b = Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap();
        idx.create_ip_block("core", b, "root").unwrap();
        assert!(matches!(idx.create_ip_block("core", b, "root"), Err(IndexError::DuplicateBlock(_))));
    }

    #[test]
    fn create_ip_block_rejects_unknown_parent() {
        let idx: HierarchicalIndex<u32> = HierarchicalIndex::new(world());
        let b = Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap();
        assert!(matches!(idx.create_ip_block("core", b, "missing"), Err(IndexError::UnknownBlock(_))));
    }

    #[test]
    fn create_ip_block_rejects_boundary_escaping_parent() {
        let idx: HierarchicalIndex<u32> = HierarchicalIndex::new(world());
        let outside = Rectangle::new(900.0, 900.0, 500.0, 500.0).unwrap();
        assert!(matches!(idx.create_ip_block("core", outside, "root"), Err(IndexError::BoundaryEscape { .. })));
    }

    #[test]
    fn insert_routes_into_the_deepest_containing_block() {
        let idx: HierarchicalIndex<&str> = HierarchicalIndex::new(world());
        idx.create_ip_block("alu", Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap(), "root").unwrap();

        let inside_alu = Rectangle::new(10.0, 10.0, 5.0, 5.0).unwrap();
        let id = idx.insert(inside_alu, "gate");
        assert_eq!(idx.block_of(id), Some("alu".to_string()));

        let outside_alu = Rectangle::new(500.0, 500.0, 5.0, 5.0).unwrap();
        let id2 = idx.insert(outside_alu, "gate2");
        assert_eq!(idx.block_of(id2), Some("root".to_string()));
    }

    #[test]
    fn bulk_insert_preserves_all_items_and_is_queryable() {
        let idx: HierarchicalIndex<usize> = HierarchicalIndex::new(world());
        let items: Vec<_> = (0..50).map(|i| (Rectangle::new(i as f64, i as f64, 1.0, 1.0).unwrap(), i)).collect();
        let ids = idx.bulk_insert(items);
        assert_eq!(ids.len(), 50);
        assert_eq!(idx.stats().object_count, 50);
    }

    #[test]
    fn parallel_query_range_matches_sequential_block_query() {
        let idx: HierarchicalIndex<u32> = HierarchicalIndex::new(world());
        idx.create_ip_block("a", Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap(), "root").unwrap();
        idx.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1);
        idx.insert(Rectangle::new(500.0, 500.0, 1.0, 1.0).unwrap(), 2);
        let pool = WorkerPool::with_size(2);

        let hits = idx.parallel_query_range(world(), &pool);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn parallel_bulk_insert_and_query_matches_the_sequential_path_for_every_range() {
        let world = Rectangle::new(0.0, 0.0, 200.0, 200.0).unwrap();
        let items: Vec<(Rectangle, usize)> = (0..200)
            .map(|i| (Rectangle::new((i * 3 % 190) as f64, (i * 7 % 190) as f64, 2.0, 2.0).unwrap(), i))
            .collect();

        let sequential: HierarchicalIndex<usize> = HierarchicalIndex::new(world);
        sequential.bulk_insert(items.clone());

        let parallel: HierarchicalIndex<usize> = HierarchicalIndex::new(world);
        let pool = WorkerPool::with_size(4);
        parallel.parallel_bulk_insert(items, &pool);

        for range in [
            Rectangle::new(0.0, 0.0, 200.0, 200.0).unwrap(),
            Rectangle::new(0.0, 0.0, 50.0, 50.0).unwrap(),
            Rectangle::new(100.0, 100.0, 100.0, 100.0).unwrap(),
        ] {
            let mut seq_values: Vec<usize> = sequential
                .parallel_query_range(range, &pool)
                .into_iter()
                .filter_map(|id| sequential.with_object(id, |_, &v| v))
                .collect();
            let mut par_values: Vec<usize> = parallel
                .parallel_query_range(range, &pool)
                .into_iter()
                .filter_map(|id| parallel.with_object(id, |_, &v| v))
                .collect();
            seq_values.sort_unstable();
            par_values.sort_unstable();
            assert_eq!(seq_values, par_values);
        }
    }

    #[test]
    fn parallel_find_intersections_has_no_false_negatives_within_a_block() {
        let idx: HierarchicalIndex<&str> = HierarchicalIndex::new(world());
        let a = idx.insert(Rectangle::new(0.0, 0.0, 5.0, 5.0).unwrap(), "a");
        let b = idx.insert(Rectangle::new(3.0, 3.0, 5.0, 5.0).unwrap(), "b");
        let pool = WorkerPool::with_size(2);

        let pairs = idx.parallel_find_intersections(&pool);
        let found = pairs.iter().any(|&(x, y)| (x == a && y == b) || (x == b && y == a));
        assert!(found);
    }

    #[test]
    fn optimize_hierarchy_splits_an_overfull_block_into_quadrants() {
        let idx: HierarchicalIndex<usize> = HierarchicalIndex::with_optimization_limits(world(), 10, 6);
        for i in 0..40 {
            idx.insert(Rectangle::new((i * 20) as f64 % 900.0 + 1.0, (i * 13) as f64 % 900.0 + 1.0, 1.0, 1.0).unwrap(), i);
        }
        idx.optimize_hierarchy().unwrap();
        assert!(idx.block_count() > 1);
        assert_eq!(idx.stats().object_count, 40);
    }

    #[test]
    fn statistics_report_block_and_object_counts() {
        let idx: HierarchicalIndex<u32> = HierarchicalIndex::new(world());
        idx.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1);
        let stats = idx.stats();
        assert_eq!(stats.block_count, 1);
        assert_eq!(stats.object_count, 1);
    }
}
