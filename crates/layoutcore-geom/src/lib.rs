//! Planar geometry primitives for `layoutcore`: points, axis-aligned
//! rectangles, polygons, and the orientation/intersection predicates they
//! share.
//!
//! Every predicate here is built on one tolerance constant,
//! [`TOLERANCE_EPSILON`], and none of them use tolerance-based equality as a
//! hash or sort key — see [`tolerance`] for why.

mod error;
mod point;
mod polygon;
mod predicates;
mod rect;
mod tolerance;

pub use error::{GeomError, GeomResult};
pub use point::Point;
pub use polygon::Polygon;
pub use predicates::{
    segment_closest_points, segment_distance, segment_intersection_point, segments_intersect,
    orientation, Orientation,
};
pub use rect::Rectangle;
pub use tolerance::{approx_eq, is_near_zero, TOLERANCE_EPSILON};
