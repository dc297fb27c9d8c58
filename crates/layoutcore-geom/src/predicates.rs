//! Numerically careful predicates the rest of the workspace builds on:
//! orientation, segment intersection, and segment-to-segment distance.

use crate::point::Point;
use crate::tolerance::TOLERANCE_EPSILON;

/// The turn described by three ordered points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// `(qy-py)(rx-qx) - (qx-px)(ry-qy)`, classified against
/// [`crate::tolerance::TOLERANCE_EPSILON`].
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let value =
        (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if value.abs() < TOLERANCE_EPSILON {
        Orientation::Collinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// `true` iff `r` lies on the closed bounding box of segment `p`-`q`,
/// given that `p`, `q`, `r` are already known to be collinear.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    r.x <= p.x.max(q.x) + TOLERANCE_EPSILON
        && r.x >= p.x.min(q.x) - TOLERANCE_EPSILON
        && r.y <= p.y.max(q.y) + TOLERANCE_EPSILON
        && r.y >= p.y.min(q.y) - TOLERANCE_EPSILON
}

/// `true` iff the closed segments `p1`-`q1` and `p2`-`q2` share any point.
///
/// Standard orientation-based test: the general case is `o1 != o2 && o3 !=
/// o4`; collinear overlap and touching endpoints fall back to explicit
/// on-segment tests whenever one of the four orientations is collinear.
pub fn segments_intersect(
    p1: Point,
    q1: Point,
    p2: Point,
    q2: Point,
) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    if o1 == Orientation::Collinear && on_segment(p1, q1, p2) {
        return true;
    }
    if o2 == Orientation::Collinear && on_segment(p1, q1, q2) {
        return true;
    }
    if o3 == Orientation::Collinear && on_segment(p2, q2, p1) {
        return true;
    }
    if o4 == Orientation::Collinear && on_segment(p2, q2, q1) {
        return true;
    }

    false
}

/// Minimum distance between the two closed segments `p1`-`q1` and
/// `p2`-`q2`: the minimum over the four point-to-segment distances (each
/// endpoint of one segment measured against the other segment).
///
/// Returns `0.0` if the segments intersect.
pub fn segment_distance(
    p1: Point,
    q1: Point,
    p2: Point,
    q2: Point,
) -> f64 {
    if segments_intersect(p1, q1, p2, q2) {
        return 0.0;
    }

    let candidates = [
        p1.distance_to_segment(p2, q2),
        q1.distance_to_segment(p2, q2),
        p2.distance_to_segment(p1, q1),
        q2.distance_to_segment(p1, q1),
    ];

    candidates.into_iter().fold(f64::INFINITY, f64::min)
}

/// The projection of `point` onto the closed segment `a`-`b`.
fn project_onto_segment(point: Point, a: Point, b: Point) -> Point {
    let ab = b.sub(a);
    let len_sq = ab.dot(ab);
    if len_sq < TOLERANCE_EPSILON {
        return a;
    }
    let t = (point.sub(a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a.add(ab.scale(t))
}

/// Closest-point pair between the two closed segments `e = p1-q1` and
/// `f = p2-q2`, alongside the distance between them: the minimum over the
/// four point-to-segment distances (each endpoint of one segment against
/// the other segment), returned as `(point_on_e, point_on_f, distance)`.
pub fn segment_closest_points(
    p1: Point,
    q1: Point,
    p2: Point,
    q2: Point,
) -> (Point, Point, f64) {
    let candidates = [
        (p1, project_onto_segment(p1, p2, q2)),
        (q1, project_onto_segment(q1, p2, q2)),
        (project_onto_segment(p2, p1, q1), p2),
        (project_onto_segment(q2, p1, q1), q2),
    ];

    candidates
        .into_iter()
        .map(|(on_e, on_f)| (on_e, on_f, on_e.distance_to(on_f)))
        .fold(
            (p1, p2, f64::INFINITY),
            |best, cand| if cand.2 < best.2 { cand } else { best },
        )
}

/// Parametric intersection point of the infinite-extended lines through
/// `p1`-`q1` and `p2`-`q2`, accepted only if both parameters land within
/// `[-epsilon, 1+epsilon]` of their respective closed segments.
///
/// Returns `None` for parallel segments (`|denom| < epsilon`) or whenever
/// the intersection falls outside either segment.
pub fn segment_intersection_point(
    p1: Point,
    q1: Point,
    p2: Point,
    q2: Point,
) -> Option<Point> {
    let r = q1.sub(p1);
    let s = q2.sub(p2);
    let denom = r.cross(s);

    if denom.abs() < TOLERANCE_EPSILON {
        return None;
    }

    let p2_p1 = p2.sub(p1);
    let t = p2_p1.cross(s) / denom;
    let u = p2_p1.cross(r) / denom;

    let slack = TOLERANCE_EPSILON.max(1e-9);
    if t >= -slack
        && t <= 1.0 + slack
        && u >= -slack
        && u <= 1.0 + slack
    {
        Some(p1.add(r.scale(t)))
    } else {
        None
    }
}
