//! Geometry analyses layered on top of [`layoutcore_geom`]'s primitives and
//! [`layoutcore_index`]'s spatial index: sharp-angle scanning, narrow-region
//! (minimum-spacing) detection, and edge-intersection detection.

use layoutcore_geom::{segment_closest_points, Point, Polygon, Rectangle};
use layoutcore_index::{HierarchicalIndex, WorkerPool};

/// Default sharp-angle threshold, in degrees, used by [`sharp_angles`].
pub const DEFAULT_SHARP_ANGLE_THRESHOLD_DEGREES: f64 = 30.0;

/// Vertex indices of `polygon` whose interior angle is sharper than
/// [`DEFAULT_SHARP_ANGLE_THRESHOLD_DEGREES`] or flatter than its complement
/// (`180 - threshold`). `O(n)` in the vertex count.
pub fn sharp_angles(polygon: &Polygon) -> Vec<usize> {
    sharp_angles_with_threshold(polygon, DEFAULT_SHARP_ANGLE_THRESHOLD_DEGREES)
}

/// Like [`sharp_angles`] but with an explicit threshold in degrees.
pub fn sharp_angles_with_threshold(polygon: &Polygon, threshold_degrees: f64) -> Vec<usize> {
    polygon.get_sharp_angles(threshold_degrees)
}

/// A pair of closest points (one on each polygon's boundary) whose
/// separation is below some minimum-spacing threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrowRegion {
    pub edge_p: usize,
    pub edge_q: usize,
    pub point_on_p: Point,
    pub point_on_q: Point,
    pub distance: f64,
}

fn edge_at(vertices: &[Point], i: usize) -> (Point, Point) {
    let n = vertices.len();
    (vertices[i], vertices[(i + 1) % n])
}

/// Every edge-pair between `p` and `q` whose minimum gap is below
/// `min_separation`, as [`NarrowRegion`] records carrying the actual
/// closest-point pair. `O(|p| * |q|)`.
pub fn find_narrow_regions(p: &Polygon, q: &Polygon, min_separation: f64) -> Vec<NarrowRegion> {
    p.find_narrow_regions(q, min_separation)
        .into_iter()
        .map(|(edge_p, edge_q, distance)| {
            let (p1, q1) = edge_at(p.vertices(), edge_p);
            let (p2, q2) = edge_at(q.vertices(), edge_q);
            let (point_on_p, point_on_q, _) = segment_closest_points(p1, q1, p2, q2);
            NarrowRegion { edge_p, edge_q, point_on_p, point_on_q, distance }
        })
        .collect()
}

fn world_bounds_of(polygons: &[Polygon]) -> Option<Rectangle> {
    let boxes: Vec<Rectangle> = polygons.iter().map(Polygon::bounding_box).collect();
    Rectangle::bounding_box_of_rectangles(&boxes).ok()
}

/// Index-accelerated narrow-region detection over many polygons: every
/// polygon is registered in a scratch [`HierarchicalIndex`] by its bounding
/// rectangle; for each polygon, its bbox is expanded by `min_separation`
/// and queried to cut the candidate partner set down before the exact
/// `O(|p|*|q|)` edge-pair scan runs. Pairs are reported once, with
/// `i < j`. Returns an empty vector (rather than panicking) if `polygons`
/// is empty.
pub fn find_narrow_regions_many(
    polygons: &[Polygon],
    min_separation: f64,
    pool: &WorkerPool,
) -> Vec<(usize, usize, NarrowRegion)> {
    let Some(world_bounds) = world_bounds_of(polygons) else {
        return Vec::new();
    };

    let index: HierarchicalIndex<usize> = HierarchicalIndex::new(world_bounds);
    for (i, polygon) in polygons.iter().enumerate() {
        index.insert(polygon.bounding_box(), i);
    }

    let mut results = Vec::new();
    for (i, polygon) in polygons.iter().enumerate() {
        let expanded = polygon.bounding_box().expand(min_separation.max(0.0));
        let candidates = index.parallel_query_range(expanded, pool);

        for id in candidates {
            let Some(j) = index.with_object(id, |_, &value| value) else {
                continue;
            };
            if j <= i {
                continue;
            }
            for region in find_narrow_regions(polygon, &polygons[j], min_separation) {
                results.push((i, j, region));
            }
        }
    }

    results
}

/// Index-accelerated edge-intersection detection over many polygons: every
/// polygon is registered in a scratch [`HierarchicalIndex`] by its bounding
/// rectangle; [`HierarchicalIndex::parallel_find_intersections`] supplies
/// the candidate-pair set (guaranteed no false negatives), and each
/// candidate then gets a full edge-by-edge segment intersection test.
/// Returns `(i, j, points)` triples with `i < j` for pairs whose polygons
/// actually intersect.
pub fn find_edge_intersections(polygons: &[Polygon], pool: &WorkerPool) -> Vec<(usize, usize, Vec<Point>)> {
    let Some(world_bounds) = world_bounds_of(polygons) else {
        return Vec::new();
    };

    let index: HierarchicalIndex<usize> = HierarchicalIndex::new(world_bounds);
    for (i, polygon) in polygons.iter().enumerate() {
        index.insert(polygon.bounding_box(), i);
    }

    let mut results = Vec::new();
    for (a, b) in index.parallel_find_intersections(pool) {
        let (Some(i), Some(j)) = (
            index.with_object(a, |_, &value| value),
            index.with_object(b, |_, &value| value),
        ) else {
            continue;
        };
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        if lo == hi {
            continue;
        }

        let points = polygons[lo].intersection_points(&polygons[hi]);
        if !points.is_empty() {
            results.push((lo, hi, points));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
        .unwrap()
    }

    #[test]
    fn sharp_angles_finds_an_arrowhead_notch() {
        let arrow = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 3.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(sharp_angles_with_threshold(&arrow, 90.0).contains(&2));
    }

    #[test]
    fn narrow_regions_reports_the_gap_between_close_parallel_edges() {
        let p = square_at(0.0, 0.0, 10.0);
        let q = square_at(11.0, 0.0, 10.0);
        let regions = find_narrow_regions(&p, &q, 2.0);
        assert!(regions.iter().any(|r| (r.distance - 1.0).abs() < 1e-9));
    }

    #[test]
    fn narrow_regions_reports_the_exact_gap_between_two_close_rectangles() {
        let p = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 1.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap();
        let q = Polygon::new(vec![
            Point::new(0.0, 1.05),
            Point::new(10.0, 1.05),
            Point::new(10.0, 2.0),
            Point::new(0.0, 2.0),
        ])
        .unwrap();
        let regions = find_narrow_regions(&p, &q, 0.1);
        assert!(regions.iter().any(|r| (0.05..=0.05 + 1e-6).contains(&r.distance)));
    }

    #[test]
    fn reversing_vertex_order_reports_the_same_sharp_vertices_under_the_index_mapping() {
        let arrow = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 3.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        let n = arrow.vertices().len();
        let reversed = Polygon::new(arrow.vertices().iter().rev().copied().collect()).unwrap();

        let forward: std::collections::HashSet<usize> = sharp_angles_with_threshold(&arrow, 90.0).into_iter().collect();
        let backward: std::collections::HashSet<usize> =
            sharp_angles_with_threshold(&reversed, 90.0).into_iter().collect();
        let mapped: std::collections::HashSet<usize> = backward.into_iter().map(|i| n - 1 - i).collect();

        assert_eq!(forward, mapped);
    }

    #[test]
    fn narrow_regions_ignores_edges_beyond_threshold() {
        let p = square_at(0.0, 0.0, 10.0);
        let q = square_at(100.0, 100.0, 10.0);
        assert!(find_narrow_regions(&p, &q, 2.0).is_empty());
    }

    #[test]
    fn find_narrow_regions_many_matches_brute_force_for_one_close_pair() {
        let polygons = vec![
            square_at(0.0, 0.0, 10.0),
            square_at(11.0, 0.0, 10.0),
            square_at(1000.0, 1000.0, 10.0),
        ];
        let pool = WorkerPool::with_size(2);
        let found = find_narrow_regions_many(&polygons, 2.0, &pool);
        assert!(found.iter().any(|&(i, j, _)| i == 0 && j == 1));
        assert!(!found.iter().any(|&(i, j, _)| i == 2 || j == 2));
    }

    #[test]
    fn find_edge_intersections_detects_an_overlapping_pair() {
        let polygons = vec![
            square_at(0.0, 0.0, 10.0),
            square_at(5.0, 5.0, 10.0),
            square_at(1000.0, 1000.0, 5.0),
        ];
        let pool = WorkerPool::with_size(2);
        let found = find_edge_intersections(&polygons, &pool);
        assert!(found.iter().any(|&(i, j, ref pts)| i == 0 && j == 1 && !pts.is_empty()));
        assert!(!found.iter().any(|&(i, j, _)| i == 2 || j == 2));
    }

    #[test]
    fn find_edge_intersections_empty_for_disjoint_polygons() {
        let polygons = vec![square_at(0.0, 0.0, 5.0), square_at(100.0, 100.0, 5.0)];
        let pool = WorkerPool::with_size(2);
        assert!(find_edge_intersections(&polygons, &pool).is_empty());
    }
}
