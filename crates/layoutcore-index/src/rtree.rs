//! R-tree: MBR-clustered tree with Guttman's quadratic split on overflow.
//!
//! Grounded on the `choose_leaf`/`refresh_bbox` shape of a reference R-tree
//! (least-enlargement child selection with an area tie-break), but node
//! storage follows this workspace's own arena-backed style rather than
//! that reference's `Box<Node<T>>`/`Clone` tree: leaf values live in a
//! [`crate::arena::Arena`] exactly like the quadtree, and tree structure is
//! a flat, index-addressed `Vec<RNode>` so splits only move indices around,
//! never clone values.

use std::sync::RwLock;

use layoutcore_geom::Rectangle;

use crate::arena::{Arena, ArenaKey};

pub const MAX_ENTRIES: usize = 16;
pub const MIN_ENTRIES: usize = 4;

enum RNode {
    Leaf(Vec<(Rectangle, ArenaKey)>),
    Internal(Vec<(Rectangle, usize)>),
}

/// An R-tree over [`Rectangle`]-bounded values of type `T`.
///
/// Like [`crate::quadtree::Quadtree`], the whole tree is guarded by one
/// [`RwLock`]: queries read-lock, insert write-locks.
pub struct RTree<T> {
    nodes: RwLock<Vec<RNode>>,
    arena: Arena<T>,
    max_entries: usize,
    min_entries: usize,
}

impl<T> RTree<T> {
    pub fn new() -> Self {
        Self::with_entry_bounds(MAX_ENTRIES, MIN_ENTRIES)
    }

    pub fn with_entry_bounds(max_entries: usize, min_entries: usize) -> Self {
        Self {
            nodes: RwLock::new(vec![RNode::Leaf(Vec::new())]),
            arena: Arena::new(),
            max_entries: max_entries.max(2),
            min_entries: min_entries.max(1),
        }
    }

    /// Bounding rectangle of the whole tree, or `None` if empty.
    pub fn bounds(&self) -> Option<Rectangle> {
        let nodes = self.nodes.read().expect("rtree lock poisoned");
        node_bbox(&nodes, 0)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&self, rect: Rectangle, value: T) -> ArenaKey {
        let key = self.arena.alloc(value);
        let mut nodes = self.nodes.write().expect("rtree lock poisoned");

        let split = insert_recursive(&mut nodes, 0, rect, key, self.min_entries, self.max_entries);

        if let Some((split_rect, split_idx)) = split {
            let old_root_bbox =
                node_bbox(&nodes, 0).expect("root always has at least one entry after insert");
            let old_root = std::mem::replace(&mut nodes[0], RNode::Internal(Vec::new()));
            nodes.push(old_root);
            let old_root_idx = nodes.len() - 1;
            nodes[0] = RNode::Internal(vec![(old_root_bbox, old_root_idx), (split_rect, split_idx)]);
        }

        key
    }

    /// Always returns `false`: condensation after removal is out of scope
    /// for this index — see the module docs on why removal isn't
    /// implemented.
    pub fn remove(&self, _key: ArenaKey) -> bool {
        false
    }

    /// All entries whose rectangle overlaps `target`.
    pub fn query_range(&self, target: Rectangle) -> Vec<ArenaKey> {
        let nodes = self.nodes.read().expect("rtree lock poisoned");
        let mut hits = Vec::new();
        let mut stack = vec![0usize];

        while let Some(idx) = stack.pop() {
            match &nodes[idx] {
                RNode::Leaf(entries) => {
                    for &(rect, key) in entries {
                        if rect.intersects(&target) {
                            hits.push(key);
                        }
                    }
                }
                RNode::Internal(children) => {
                    for &(rect, child_idx) in children {
                        if rect.intersects(&target) {
                            stack.push(child_idx);
                        }
                    }
                }
            }
        }

        hits
    }

    /// All entries whose rectangle contains `point`.
    pub fn query_point(&self, point: layoutcore_geom::Point) -> Vec<ArenaKey> {
        let nodes = self.nodes.read().expect("rtree lock poisoned");
        let mut hits = Vec::new();
        let mut stack = vec![0usize];

        while let Some(idx) = stack.pop() {
            match &nodes[idx] {
                RNode::Leaf(entries) => {
                    for &(rect, key) in entries {
                        if rect.contains_point(point) {
                            hits.push(key);
                        }
                    }
                }
                RNode::Internal(children) => {
                    for &(rect, child_idx) in children {
                        if rect.contains_point(point) {
                            stack.push(child_idx);
                        }
                    }
                }
            }
        }

        hits
    }

    pub fn get<R>(&self, key: ArenaKey, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.arena.with(key, f).ok()
    }

    /// Number of live entries in the tree.
    pub fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn node_bbox(nodes: &[RNode], idx: usize) -> Option<Rectangle> {
    match &nodes[idx] {
        RNode::Leaf(entries) => entries
            .iter()
            .map(|&(rect, _)| rect)
            .reduce(|a, b| a.union(&b)),
        RNode::Internal(children) => children
            .iter()
            .map(|&(rect, _)| rect)
            .reduce(|a, b| a.union(&b)),
    }
}

fn enlargement(existing: Rectangle, rect: Rectangle) -> f64 {
    existing.union(&rect).area() - existing.area()
}

/// Least-enlargement child selection, tying on smaller existing area.
fn choose_best_child(children: &[(Rectangle, usize)], rect: Rectangle) -> usize {
    let mut best = 0;
    let mut best_enlargement = enlargement(children[0].0, rect);
    let mut best_area = children[0].0.area();

    for (i, &(child_rect, _)) in children.iter().enumerate().skip(1) {
        let enl = enlargement(child_rect, rect);
        let area = child_rect.area();
        if enl < best_enlargement || (enl == best_enlargement && area < best_area) {
            best = i;
            best_enlargement = enl;
            best_area = area;
        }
    }

    best
}

fn insert_recursive(
    nodes: &mut Vec<RNode>,
    node_idx: usize,
    rect: Rectangle,
    key: ArenaKey,
    min_entries: usize,
    max_entries: usize,
) -> Option<(Rectangle, usize)> {
    let is_leaf = matches!(nodes[node_idx], RNode::Leaf(_));

    if is_leaf {
        let count = if let RNode::Leaf(entries) = &mut nodes[node_idx] {
            entries.push((rect, key));
            entries.len()
        } else {
            unreachable!()
        };

        if count > max_entries {
            return Some(split_leaf(nodes, node_idx, min_entries));
        }
        return None;
    }

    let best_pos = match &nodes[node_idx] {
        RNode::Internal(children) => choose_best_child(children, rect),
        RNode::Leaf(_) => unreachable!(),
    };
    let child_idx = match &nodes[node_idx] {
        RNode::Internal(children) => children[best_pos].1,
        RNode::Leaf(_) => unreachable!(),
    };

    let split = insert_recursive(nodes, child_idx, rect, key, min_entries, max_entries);

    let child_bbox = node_bbox(nodes, child_idx).expect("child always has at least one entry");
    if let RNode::Internal(children) = &mut nodes[node_idx] {
        children[best_pos].0 = child_bbox;
    }

    if let Some((split_rect, split_idx)) = split {
        let count = if let RNode::Internal(children) = &mut nodes[node_idx] {
            children.push((split_rect, split_idx));
            children.len()
        } else {
            unreachable!()
        };

        if count > max_entries {
            return Some(split_internal(nodes, node_idx, min_entries));
        }
    }

    None
}

/// Guttman's quadratic split: pick the pair of entries that would waste
/// the most area if kept together as seeds, then repeatedly assign the
/// remaining entry with the strongest preference for one group over the
/// other, topping up whichever group is short of `min_entries` once the
/// other side has taken enough to make that unavoidable.
fn quadratic_split<Id: Copy>(mut items: Vec<(Rectangle, Id)>, min_entries: usize) -> (Vec<(Rectangle, Id)>, Vec<(Rectangle, Id)>) {
    let (seed_a, seed_b) = pick_seeds(&items);
    // Remove the higher index first so the lower index stays valid.
    let (hi, lo) = if seed_a > seed_b { (seed_a, seed_b) } else { (seed_b, seed_a) };
    let item_hi = items.remove(hi);
    let item_lo = items.remove(lo);

    let mut group_a = vec![item_lo];
    let mut group_b = vec![item_hi];
    let mut bbox_a = group_a[0].0;
    let mut bbox_b = group_b[0].0;

    let total = items.len();
    for (i, (rect, id)) in items.into_iter().enumerate() {
        // Entries still to be placed after this one, inclusive of it.
        let remaining_including_this = total - i;

        if min_entries > group_a.len() && min_entries - group_a.len() >= remaining_including_this {
            group_a.push((rect, id));
            bbox_a = bbox_a.union(&rect);
            continue;
        }
        if min_entries > group_b.len() && min_entries - group_b.len() >= remaining_including_this {
            group_b.push((rect, id));
            bbox_b = bbox_b.union(&rect);
            continue;
        }

        let enl_a = enlargement(bbox_a, rect);
        let enl_b = enlargement(bbox_b, rect);
        if enl_a < enl_b || (enl_a == enl_b && bbox_a.area() <= bbox_b.area()) {
            group_a.push((rect, id));
            bbox_a = bbox_a.union(&rect);
        } else {
            group_b.push((rect, id));
            bbox_b = bbox_b.union(&rect);
        }
    }

    (group_a, group_b)
}

fn pick_seeds<Id: Copy>(items: &[(Rectangle, Id)]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut worst_waste = f64::NEG_INFINITY;

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let union = items[i].0.union(&items[j].0);
            let waste = union.area() - items[i].0.area() - items[j].0.area();
            if waste > worst_waste {
                worst_waste = waste;
                best = (i, j);
            }
        }
    }

    best
}

fn split_leaf(nodes: &mut Vec<RNode>, node_idx: usize, min_entries: usize) -> (Rectangle, usize) {
    let entries = match std::mem::replace(&mut nodes[node_idx], RNode::Leaf(Vec::new())) {
        RNode::Leaf(entries) => entries,
        RNode::Internal(_) => unreachable!(),
    };

    let (keep, split_off) = quadratic_split(entries, min_entries);
    nodes[node_idx] = RNode::Leaf(keep);
    nodes.push(RNode::Leaf(split_off));
    let new_idx = nodes.len() - 1;
    let new_bbox = node_bbox(nodes, new_idx).expect("split group is non-empty");
    (new_bbox, new_idx)
}

fn split_internal(nodes: &mut Vec<RNode>, node_idx: usize, min_entries: usize) -> (Rectangle, usize) {
    let children = match std::mem::replace(&mut nodes[node_idx], RNode::Internal(Vec::new())) {
        RNode::Internal(children) => children,
        RNode::Leaf(_) => unreachable!(),
    };

    let (keep, split_off) = quadratic_split(children, min_entries);
    nodes[node_idx] = RNode::Internal(keep);
    nodes.push(RNode::Internal(split_off));
    let new_idx = nodes.len() - 1;
    let new_bbox = node_bbox(nodes, new_idx).expect("split group is non-empty");
    (new_bbox, new_idx)
}
