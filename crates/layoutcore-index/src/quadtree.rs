//! Axis-aligned quadtree: fixed capacity per node, recursive four-way
//! subdivision in NW/NE/SW/SE order, bounded by a maximum depth.

use std::sync::RwLock;

use layoutcore_geom::{Point, Rectangle};

use crate::arena::{Arena, ArenaKey};

const DEFAULT_CAPACITY: usize = 8;
const DEFAULT_MAX_DEPTH: u32 = 12;

struct Entry<T> {
    rect: Rectangle,
    value: T,
}

enum Children {
    /// NW, NE, SW, SE, in that order.
    Leaf,
    Split([Box<QuadNode>; 4]),
}

struct QuadNode {
    bounds: Rectangle,
    depth: u32,
    entries: Vec<ArenaKey>,
    children: Children,
}

impl QuadNode {
    fn new(bounds: Rectangle, depth: u32) -> Self {
        Self { bounds, depth, entries: Vec::new(), children: Children::Leaf }
    }

    fn quadrants(&self) -> [Rectangle; 4] {
        let hw = self.bounds.width / 2.0;
        let hh = self.bounds.height / 2.0;
        let (x, y) = (self.bounds.x, self.bounds.y);
        [
            Rectangle { x, y: y + hh, width: hw, height: hh }, // NW
            Rectangle { x: x + hw, y: y + hh, width: hw, height: hh }, // NE
            Rectangle { x, y, width: hw, height: hh }, // SW
            Rectangle { x: x + hw, y, width: hw, height: hh }, // SE
        ]
    }
}

/// Aggregate counters describing the tree's current shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadtreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub entry_count: usize,
    pub max_depth_reached: u32,
}

/// An axis-aligned quadtree over [`Rectangle`]-bounded values of type `T`.
///
/// Structural mutation (insert) and traversal (query) are guarded by a
/// single [`RwLock`] over the whole tree rather than per-node locks:
/// queries run concurrently with each other; insert takes the write lock
/// and excludes every other operation.
pub struct Quadtree<T> {
    root: RwLock<QuadNode>,
    arena: Arena<Entry<T>>,
    capacity: usize,
    max_depth: u32,
}

impl<T> Quadtree<T> {
    pub fn new(bounds: Rectangle) -> Self {
        Self::with_capacity(bounds, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    pub fn with_capacity(bounds: Rectangle, capacity: usize, max_depth: u32) -> Self {
        Self {
            root: RwLock::new(QuadNode::new(bounds, 0)),
            arena: Arena::new(),
            capacity: capacity.max(1),
            max_depth,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.root.read().expect("quadtree lock poisoned").bounds
    }

    /// Insert `value` bounded by `rect`. The only failure is `rect` not
    /// being fully contained by the tree's root boundary, in which case
    /// `None` is returned and nothing is allocated.
    pub fn insert(&self, rect: Rectangle, value: T) -> Option<ArenaKey> {
        let mut root = self.root.write().expect("quadtree lock poisoned");
        if !root.bounds.contains_rectangle(&rect) {
            return None;
        }
        let key = self.arena.alloc(Entry { rect, value });
        insert_into(&mut root, rect, key, &self.arena, self.capacity, self.max_depth);
        Some(key)
    }

    /// Always returns `false`: the quadtree is insert/query only. A leaf
    /// vacated by removal would otherwise need re-merging logic this
    /// index never exercises, so removal is explicitly unsupported rather
    /// than partially implemented.
    pub fn remove(&self, _key: ArenaKey) -> bool {
        false
    }

    /// All entries whose rectangle overlaps `target`.
    pub fn query_range(&self, target: Rectangle) -> Vec<ArenaKey> {
        let root = self.root.read().expect("quadtree lock poisoned");
        let mut hits = Vec::new();
        let mut stack = vec![&*root];

        while let Some(node) = stack.pop() {
            if !node.bounds.intersects(&target) {
                continue;
            }
            for &key in &node.entries {
                let overlaps = self
                    .arena
                    .with(key, |entry| entry.rect.intersects(&target))
                    .unwrap_or(false);
                if overlaps {
                    hits.push(key);
                }
            }
            if let Children::Split(children) = &node.children {
                stack.extend(children.iter().map(|c| c.as_ref()));
            }
        }

        hits
    }

    /// All entries whose rectangle contains `point`.
    pub fn query_point(&self, point: Point) -> Vec<ArenaKey> {
        let root = self.root.read().expect("quadtree lock poisoned");
        let mut hits = Vec::new();
        let mut stack = vec![&*root];

        while let Some(node) = stack.pop() {
            if !node.bounds.contains_point(point) {
                continue;
            }
            for &key in &node.entries {
                let contains = self
                    .arena
                    .with(key, |entry| entry.rect.contains_point(point))
                    .unwrap_or(false);
                if contains {
                    hits.push(key);
                }
            }
            if let Children::Split(children) = &node.children {
                stack.extend(children.iter().map(|c| c.as_ref()));
            }
        }

        hits
    }

    pub fn get<R>(&self, key: ArenaKey, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.arena.with(key, |entry| f(&entry.value)).ok()
    }

    /// All entries within `distance` of `target`, measured as
    /// [`Rectangle::distance_to_rectangle`] between the candidate's stored
    /// rectangle and `target`. Candidates are gathered by first expanding
    /// `target` by `distance` on every side and running [`Self::query_range`]
    /// against that, then discarding any whose true distance exceeds
    /// `distance` — the expansion over-approximates (a rectangle can be
    /// within the expanded box's corners but farther than `distance` in
    /// Euclidean terms), so this exact filter is still required.
    pub fn query_nearby(&self, target: Rectangle, distance: f64) -> Vec<ArenaKey> {
        let expanded = target.expand(distance.max(0.0));
        self.query_range(expanded)
            .into_iter()
            .filter(|&key| {
                self.arena
                    .with(key, |entry| entry.rect.distance_to_rectangle(&target) <= distance)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Candidate pairs of entries whose rectangles may intersect.
    ///
    /// Guaranteed to contain every truly-intersecting pair (no false
    /// negatives); callers still need an exact geometric test (e.g.
    /// [`layoutcore_geom::Rectangle::intersects`] or a full polygon test)
    /// to rule out false positives. Pairs spanning a node's local entries
    /// and an ancestor's local entries, and pairs spanning two different
    /// child subtrees, are both covered in addition to same-node pairs.
    pub fn find_potential_intersections(&self) -> Vec<(ArenaKey, ArenaKey)>
    where
        T: Sync,
    {
        let root = self.root.read().expect("quadtree lock poisoned");
        let mut pairs = Vec::new();
        collect_intersections(&root, &mut Vec::new(), &self.arena, &mut pairs);
        pairs
    }

    /// Rebuilds the tree in place with new `capacity`/`max_depth`
    /// parameters: every live entry is collected, the node structure is
    /// discarded, and entries are reinserted one by one under the new
    /// parameters. Entries that no longer fit the (unchanged) root bounds
    /// cannot occur since bounds are untouched by this call.
    pub fn rebuild(&mut self, capacity: usize, max_depth: u32) {
        let bounds = self.bounds();
        let mut root = self.root.write().expect("quadtree lock poisoned");
        let entries = collect_all(&root, &self.arena);

        self.capacity = capacity.max(1);
        self.max_depth = max_depth;
        *root = QuadNode::new(bounds, 0);

        for (rect, key) in entries {
            insert_into(&mut root, rect, key, &self.arena, self.capacity, self.max_depth);
        }
    }

    /// Number of live entries in the tree.
    pub fn size(&self) -> usize {
        self.arena.len()
    }

    /// Discards every entry, resetting the tree to a single empty leaf.
    pub fn clear(&mut self) {
        let bounds = self.bounds();
        let mut root = self.root.write().expect("quadtree lock poisoned");
        for (_, key) in collect_all(&root, &self.arena) {
            self.arena.dealloc(key);
        }
        *root = QuadNode::new(bounds, 0);
    }

    pub fn stats(&self) -> QuadtreeStats {
        let root = self.root.read().expect("quadtree lock poisoned");
        let mut stats = QuadtreeStats::default();
        let mut stack = vec![&*root];

        while let Some(node) = stack.pop() {
            stats.node_count += 1;
            stats.entry_count += node.entries.len();
            stats.max_depth_reached = stats.max_depth_reached.max(node.depth);
            match &node.children {
                Children::Leaf => stats.leaf_count += 1,
                Children::Split(children) => {
                    stack.extend(children.iter().map(|c| c.as_ref()));
                }
            }
        }

        stats
    }
}

/// Routes `rect` to the unique child whose bounds fully contain it, if
/// any such child exists; an object straddling a quadrant boundary (or
/// one that doesn't fit any single child) stays in this node's own
/// `entries` list instead of being duplicated across children.
fn insert_into<T>(
    node: &mut QuadNode,
    rect: Rectangle,
    key: ArenaKey,
    arena: &Arena<Entry<T>>,
    capacity: usize,
    max_depth: u32,
) {
    if let Children::Split(children) = &mut node.children {
        if let Some(child) = children.iter_mut().find(|c| c.bounds.contains_rectangle(&rect)) {
            insert_into(child, rect, key, arena, capacity, max_depth);
        } else {
            node.entries.push(key);
        }
        return;
    }

    node.entries.push(key);

    if node.entries.len() > capacity && node.depth < max_depth {
        subdivide(node, arena, capacity, max_depth);
    }
}

/// Turn a leaf into four children and push its existing entries back
/// through [`insert_into`] so they land in whichever quadrant(s) their
/// rectangle actually overlaps.
fn subdivide<T>(node: &mut QuadNode, arena: &Arena<Entry<T>>, capacity: usize, max_depth: u32) {
    let quadrants = node.quadrants();
    let children: [Box<QuadNode>; 4] =
        quadrants.map(|q| Box::new(QuadNode::new(q, node.depth + 1)));
    node.children = Children::Split(children);

    let entries = std::mem::take(&mut node.entries);
    for key in entries {
        if let Ok(rect) = arena.with(key, |entry| entry.rect) {
            insert_into(node, rect, key, arena, capacity, max_depth);
        }
    }
}

fn collect_all<T>(node: &QuadNode, arena: &Arena<Entry<T>>) -> Vec<(Rectangle, ArenaKey)> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        for &key in &n.entries {
            if let Ok(rect) = arena.with(key, |e| e.rect) {
                out.push((rect, key));
            }
        }
        if let Children::Split(children) = &n.children {
            stack.extend(children.iter().map(|c| c.as_ref()));
        }
    }
    out
}

/// Gathers every entry key in the subtree rooted at `node`, used to build
/// cross-child-subtree candidate pairs.
fn gather_subtree<T>(node: &QuadNode, arena: &Arena<Entry<T>>) -> Vec<(Rectangle, ArenaKey)> {
    collect_all(node, arena)
}

fn collect_intersections<T>(
    node: &QuadNode,
    ancestors: &mut Vec<(Rectangle, ArenaKey)>,
    arena: &Arena<Entry<T>>,
    pairs: &mut Vec<(ArenaKey, ArenaKey)>,
) where
    T: Sync,
{
    let local: Vec<(Rectangle, ArenaKey)> = node
        .entries
        .iter()
        .filter_map(|&key| arena.with(key, |e| (e.rect, key)).ok())
        .collect();

    // Pairs within this node's own local list.
    for i in 0..local.len() {
        for j in (i + 1)..local.len() {
            if local[i].0.intersects(&local[j].0) {
                pairs.push((local[i].1, local[j].1));
            }
        }
    }

    // Pairs between this node's local entries and every ancestor's local
    // entries (objects straddling a boundary live higher up the tree than
    // the objects they may overlap further down).
    for &(a_rect, a_key) in ancestors.iter() {
        for &(l_rect, l_key) in &local {
            if a_rect.intersects(&l_rect) {
                pairs.push((a_key, l_key));
            }
        }
    }

    if let Children::Split(children) = &node.children {
        ancestors.extend(local.iter().copied());

        // Cross-child-subtree pairs: gather each child's full subtree once,
        // then check all pairs across *different* children.
        let subtrees: Vec<Vec<(Rectangle, ArenaKey)>> =
            children.iter().map(|c| gather_subtree(c, arena)).collect();
        for i in 0..subtrees.len() {
            for j in (i + 1)..subtrees.len() {
                for &(ra, ka) in &subtrees[i] {
                    for &(rb, kb) in &subtrees[j] {
                        if ra.intersects(&rb) {
                            pairs.push((ka, kb));
                        }
                    }
                }
            }
        }

        for child in children.iter() {
            collect_intersections(child, ancestors, arena, pairs);
        }

        ancestors.truncate(ancestors.len() - local.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rectangle {
        Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap()
    }

    #[test]
    fn insert_and_query_point_finds_containing_rect() {
        let qt = Quadtree::new(bounds());
        let r = Rectangle::new(10.0, 10.0, 5.0, 5.0).unwrap();
        let key = qt.insert(r, "a").unwrap();
        let hits = qt.query_point(Point::new(12.0, 12.0));
        assert_eq!(hits, vec![key]);
    }

    #[test]
    fn insert_outside_bounds_returns_none() {
        let qt = Quadtree::new(bounds());
        let outside = Rectangle::new(1000.0, 1000.0, 5.0, 5.0).unwrap();
        assert!(qt.insert(outside, "x").is_none());
    }

    #[test]
    fn query_range_finds_overlapping_entries() {
        let qt = Quadtree::new(bounds());
        let a = qt.insert(Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap(), 1).unwrap();
        let b = qt.insert(Rectangle::new(90.0, 90.0, 5.0, 5.0).unwrap(), 2).unwrap();

        let hits = qt.query_range(Rectangle::new(0.0, 0.0, 20.0, 20.0).unwrap());
        assert!(hits.contains(&a));
        assert!(!hits.contains(&b));
    }

    #[test]
    fn range_query_over_four_labeled_rects_finds_exactly_the_overlapping_two() {
        let world = Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let qt = Quadtree::with_capacity(world, 2, 4);
        let a = qt.insert(Rectangle::new(5.0, 5.0, 10.0, 10.0).unwrap(), "A").unwrap();
        let b = qt.insert(Rectangle::new(20.0, 20.0, 5.0, 5.0).unwrap(), "B").unwrap();
        let c = qt.insert(Rectangle::new(60.0, 60.0, 10.0, 10.0).unwrap(), "C").unwrap();
        let d = qt.insert(Rectangle::new(80.0, 10.0, 5.0, 5.0).unwrap(), "D").unwrap();

        let hits = qt.query_range(Rectangle::new(0.0, 0.0, 30.0, 30.0).unwrap());
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&a));
        assert!(hits.contains(&b));
        assert!(!hits.contains(&c));
        assert!(!hits.contains(&d));
    }

    #[test]
    fn remove_is_unsupported() {
        let qt = Quadtree::new(bounds());
        let key = qt.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1).unwrap();
        assert!(!qt.remove(key));
    }

    #[test]
    fn stats_report_at_least_the_root_node() {
        let qt = Quadtree::new(bounds());
        qt.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1);
        let stats = qt.stats();
        assert!(stats.node_count >= 1);
        assert_eq!(stats.entry_count, 1);
    }

    #[test]
    fn straddling_object_stays_in_parent_local_list() {
        // Force a split, then insert an object that straddles all four
        // quadrants: it must end up counted once, not duplicated.
        let qt = Quadtree::with_capacity(bounds(), 1, 8);
        qt.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), "forces-split-a");
        qt.insert(Rectangle::new(90.0, 90.0, 1.0, 1.0).unwrap(), "forces-split-b");

        let straddling = Rectangle::new(40.0, 40.0, 20.0, 20.0).unwrap();
        qt.insert(straddling, "straddler");

        let hits = qt.query_range(straddling);
        let count = hits
            .iter()
            .filter(|&&k| qt.get(k, |v| *v) == Some("straddler"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn insert_outside_root_bounds_by_containment_not_overlap() {
        let qt = Quadtree::new(bounds());
        // Overlaps the root but isn't fully contained by it.
        let overhanging = Rectangle::new(-5.0, -5.0, 10.0, 10.0).unwrap();
        assert!(qt.insert(overhanging, "x").is_none());
    }

    #[test]
    fn query_nearby_respects_distance() {
        let qt = Quadtree::new(bounds());
        let near = qt.insert(Rectangle::new(10.0, 10.0, 2.0, 2.0).unwrap(), "near").unwrap();
        let far = qt.insert(Rectangle::new(90.0, 90.0, 2.0, 2.0).unwrap(), "far").unwrap();

        let target = Rectangle::new(10.0, 10.0, 1.0, 1.0).unwrap();
        let hits = qt.query_nearby(target, 5.0);
        assert!(hits.contains(&near));
        assert!(!hits.contains(&far));
    }

    #[test]
    fn find_potential_intersections_has_no_false_negatives() {
        let qt = Quadtree::with_capacity(bounds(), 1, 8);
        let a = qt.insert(Rectangle::new(0.0, 0.0, 5.0, 5.0).unwrap(), "a").unwrap();
        let b = qt.insert(Rectangle::new(3.0, 3.0, 5.0, 5.0).unwrap(), "b").unwrap();
        qt.insert(Rectangle::new(90.0, 90.0, 2.0, 2.0).unwrap(), "c");

        let pairs = qt.find_potential_intersections();
        let found = pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a));
        assert!(found, "overlapping pair a/b must appear as a candidate");
    }

    #[test]
    fn rebuild_preserves_all_entries() {
        let mut qt = Quadtree::with_capacity(bounds(), 4, 8);
        for i in 0..30 {
            qt.insert(Rectangle::new(i as f64, i as f64, 1.0, 1.0).unwrap(), i);
        }
        assert_eq!(qt.size(), 30);
        qt.rebuild(2, 10);
        assert_eq!(qt.size(), 30);
        let hits = qt.query_range(bounds());
        assert_eq!(hits.len(), 30);
    }

    #[test]
    fn query_range_over_world_bounds_returns_exactly_every_inserted_entry() {
        let qt = Quadtree::with_capacity(bounds(), 3, 6);
        let mut keys = Vec::new();
        for i in 0..37 {
            let x = (i * 7 % 90) as f64;
            let y = (i * 13 % 90) as f64;
            keys.push(qt.insert(Rectangle::new(x, y, 1.0, 1.0).unwrap(), i).unwrap());
        }

        let mut hits = qt.query_range(bounds());
        hits.sort_by_key(|k| k.index());
        let mut expected = keys.clone();
        expected.sort_by_key(|k| k.index());
        assert_eq!(hits, expected);
    }

    #[test]
    fn repeated_rebuild_with_the_same_parameters_yields_identical_statistics() {
        let mut qt = Quadtree::with_capacity(bounds(), 4, 8);
        for i in 0..30 {
            qt.insert(Rectangle::new(i as f64, i as f64, 1.0, 1.0).unwrap(), i);
        }

        qt.rebuild(2, 6);
        let first = qt.stats();
        qt.rebuild(2, 6);
        let second = qt.stats();
        assert_eq!(first, second);
    }

    #[test]
    fn clear_empties_the_tree() {
        let mut qt = Quadtree::new(bounds());
        qt.insert(Rectangle::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1);
        qt.clear();
        assert_eq!(qt.size(), 0);
        assert!(qt.query_range(bounds()).is_empty());
    }
}
