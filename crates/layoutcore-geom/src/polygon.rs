use crate::error::{GeomError, GeomResult};
use crate::point::Point;
use crate::predicates::{self, segments_intersect};
use crate::rect::Rectangle;
use crate::tolerance::TOLERANCE_EPSILON;

/// A simple or self-intersecting planar polygon, stored as an ordered ring
/// of vertices (no explicit closing duplicate of the first vertex).
///
/// Winding order is preserved as given; use [`Polygon::is_clockwise`] to
/// inspect it and [`Polygon::signed_area`] when the sign matters.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// # Errors
    ///
    /// [`GeomError::InvalidShape`] if fewer than three vertices are given.
    pub fn new(vertices: Vec<Point>) -> GeomResult<Self> {
        if vertices.len() < 3 {
            return Err(GeomError::InvalidShape {
                reason: "a polygon needs at least three vertices",
            });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn edge(&self, i: usize) -> (Point, Point) {
        let n = self.vertices.len();
        (self.vertices[i], self.vertices[(i + 1) % n])
    }

    /// Shoelace formula, unsigned.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Shoelace formula; positive for counter-clockwise winding, negative
    /// for clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut sum = 0.0;
        for i in 0..n {
            let (p, q) = self.edge(i);
            sum += p.x * q.y - q.x * p.y;
        }
        sum / 2.0
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn perimeter(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let (p, q) = self.edge(i);
                p.distance_to(q)
            })
            .sum()
    }

    /// Area-weighted centroid of the polygon (not the vertex average).
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len();
        let area6 = self.signed_area() * 6.0;

        if area6.abs() < TOLERANCE_EPSILON {
            // Degenerate (zero-area) polygon: fall back to vertex average.
            let sum = self
                .vertices
                .iter()
                .fold(Point::ORIGIN, |acc, p| acc.add(*p));
            return sum.scale(1.0 / n as f64);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let (p, q) = self.edge(i);
            let cross = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        Point::new(cx / area6, cy / area6)
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::bounding_box_of_points(&self.vertices)
            .expect("polygon always has at least three vertices")
    }

    /// A polygon is convex iff every triple of consecutive vertices turns
    /// the same way (allowing collinear edges).
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let mut sign = 0i8;

        for i in 0..n {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % n];
            let r = self.vertices[(i + 2) % n];
            let cross = q.sub(p).cross(r.sub(q));

            if cross.abs() < TOLERANCE_EPSILON {
                continue;
            }

            let this_sign = if cross > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = this_sign;
            } else if sign != this_sign {
                return false;
            }
        }

        true
    }

    /// `true` iff no two non-adjacent edges intersect.
    pub fn is_simple(&self) -> bool {
        !self.has_self_intersections()
    }

    /// `true` iff any two non-adjacent edges intersect.
    pub fn has_self_intersections(&self) -> bool {
        let n = self.vertices.len();
        if n < 4 {
            return false;
        }

        for i in 0..n {
            let (p1, q1) = self.edge(i);
            for j in (i + 1)..n {
                // Skip edges sharing a vertex (adjacent, or the wrap-around
                // pair when i == 0 and j == n-1).
                if j == i || j == (i + 1) % n || (j + 1) % n == i {
                    continue;
                }
                let (p2, q2) = self.edge(j);
                if segments_intersect(p1, q1, p2, q2) {
                    return true;
                }
            }
        }

        false
    }

    /// Ray-casting point-in-polygon test. Boundary points (on an edge or
    /// coincident with a vertex) count as contained.
    pub fn contains_point(&self, point: Point) -> bool {
        let n = self.vertices.len();

        for i in 0..n {
            let (a, b) = self.edge(i);
            if point.distance_to_segment(a, b) < TOLERANCE_EPSILON {
                return true;
            }
        }

        let mut inside = false;
        for i in 0..n {
            let (a, b) = self.edge(i);
            let crosses_scanline = (a.y > point.y) != (b.y > point.y);
            if crosses_scanline {
                let x_at_y = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_at_y {
                    inside = !inside;
                }
            }
        }

        inside
    }

    /// Interior angle at vertex `i`, in **degrees**, in `[0, 180]`.
    ///
    /// `v1 = prev - curr`, `v2 = next - curr`; the angle is
    /// `acos(clamp(v1.v2 / (|v1||v2|), -1, 1))`. Degenerate edges (a
    /// vector with magnitude below [`TOLERANCE_EPSILON`]) yield `0.0`
    /// rather than dividing by (near-)zero.
    pub fn vertex_angle(&self, i: usize) -> f64 {
        let n = self.vertices.len();
        let prev = self.vertices[(i + n - 1) % n];
        let curr = self.vertices[i];
        let next = self.vertices[(i + 1) % n];

        let v1 = prev.sub(curr);
        let v2 = next.sub(curr);
        let denom = v1.magnitude() * v2.magnitude();

        if denom < TOLERANCE_EPSILON {
            return 0.0;
        }

        (v1.dot(v2) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Indices of vertices whose interior angle is sharper than
    /// `threshold_degrees` (a spike) or flatter than `180 -
    /// threshold_degrees` (the unsigned-angle reading a reflex vertex
    /// folds back to). Returned in ascending order.
    pub fn get_sharp_angles(&self, threshold_degrees: f64) -> Vec<usize> {
        let upper = 180.0 - threshold_degrees;
        (0..self.vertices.len())
            .filter(|&i| {
                let angle = self.vertex_angle(i);
                angle < threshold_degrees || angle > upper
            })
            .collect()
    }

    /// Minimum distance between any edge of `self` and any edge of `other`;
    /// `0.0` if the polygons overlap or touch.
    pub fn distance_to_polygon(&self, other: &Polygon) -> f64 {
        let n = self.vertices.len();
        let m = other.vertices.len();
        let mut min_dist = f64::INFINITY;

        for i in 0..n {
            let (p1, q1) = self.edge(i);
            for j in 0..m {
                let (p2, q2) = other.edge(j);
                let d = predicates::segment_distance(p1, q1, p2, q2);
                if d < min_dist {
                    min_dist = d;
                }
                if min_dist < TOLERANCE_EPSILON {
                    return 0.0;
                }
            }
        }

        min_dist
    }

    pub fn distance_to_point(&self, point: Point) -> f64 {
        if self.contains_point(point) {
            return 0.0;
        }

        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let (a, b) = self.edge(i);
                point.distance_to_segment(a, b)
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// `true` if `self` and `other` overlap: either polygon contains a
    /// vertex of the other, or any pair of edges intersects.
    pub fn intersects(&self, other: &Polygon) -> bool {
        if !self.bounding_box().intersects(&other.bounding_box()) {
            return false;
        }

        if self.vertices.iter().any(|&v| other.contains_point(v))
            || other.vertices.iter().any(|&v| self.contains_point(v))
        {
            return true;
        }

        let n = self.vertices.len();
        let m = other.vertices.len();
        for i in 0..n {
            let (p1, q1) = self.edge(i);
            for j in 0..m {
                let (p2, q2) = other.edge(j);
                if segments_intersect(p1, q1, p2, q2) {
                    return true;
                }
            }
        }

        false
    }

    /// All pairwise edge/edge intersection points between `self` and
    /// `other`. Overlapping collinear edges do not contribute a point.
    pub fn intersection_points(&self, other: &Polygon) -> Vec<Point> {
        let n = self.vertices.len();
        let m = other.vertices.len();
        let mut points = Vec::new();

        for i in 0..n {
            let (p1, q1) = self.edge(i);
            for j in 0..m {
                let (p2, q2) = other.edge(j);
                if let Some(p) = predicates::segment_intersection_point(p1, q1, p2, q2) {
                    points.push(p);
                }
            }
        }

        points
    }

    /// Pairs of edges (by index, `(self_edge_index, other_edge_index)`)
    /// across `self` and `other` whose minimum gap is below
    /// `min_separation` but that do not actually intersect — a narrow
    /// channel between two boundaries rather than an overlap.
    pub fn find_narrow_regions(
        &self,
        other: &Polygon,
        min_separation: f64,
    ) -> Vec<(usize, usize, f64)> {
        let n = self.vertices.len();
        let m = other.vertices.len();
        let mut narrow = Vec::new();

        for i in 0..n {
            let (p1, q1) = self.edge(i);
            for j in 0..m {
                let (p2, q2) = other.edge(j);
                if segments_intersect(p1, q1, p2, q2) {
                    continue;
                }
                let d = predicates::segment_distance(p1, q1, p2, q2);
                if d < min_separation {
                    narrow.push((i, j, d));
                }
            }
        }

        narrow
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Polygon {
        let offset = Point::new(dx, dy);
        Polygon {
            vertices: self.vertices.iter().map(|p| p.add(offset)).collect(),
        }
    }

    /// Rotate every vertex by `angle` radians around the origin.
    pub fn rotate(&self, angle: f64) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().map(|p| p.rotate(angle)).collect(),
        }
    }

    pub fn rotate_around(&self, center: Point, angle: f64) -> Polygon {
        Polygon {
            vertices: self
                .vertices
                .iter()
                .map(|p| p.rotate_around(center, angle))
                .collect(),
        }
    }

    /// Scale every vertex by `factor` around the polygon's own centroid.
    pub fn scale(&self, factor: f64) -> Polygon {
        let center = self.centroid();
        Polygon {
            vertices: self
                .vertices
                .iter()
                .map(|p| center.add(p.sub(center).scale(factor)))
                .collect(),
        }
    }
}
