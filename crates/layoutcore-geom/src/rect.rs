use crate::error::{GeomError, GeomResult};
use crate::point::{Point, validate_finite};
use crate::tolerance::{TOLERANCE_EPSILON, is_near_zero};

/// An axis-aligned rectangle `{x, y, width, height}`.
///
/// `width >= 0` and `height >= 0` always hold; a rectangle with zero width
/// or height [`is_empty`](Rectangle::is_empty) but is still valid. This is
/// the common bounding-volume currency used throughout `layoutcore`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    /// # Errors
    ///
    /// [`GeomError::InvalidShape`] if `width`/`height` is negative or any
    /// field is NaN/infinite.
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> GeomResult<Self> {
        validate_finite(x, y)?;
        validate_finite(width, height)?;
        if width < 0.0 || height < 0.0 {
            return Err(GeomError::InvalidShape {
                reason: "rectangle width/height must be non-negative",
            });
        }
        Ok(Self { x, y, width, height })
    }

    /// Builds a rectangle directly, without validation. Reserved for
    /// internal callers (index node bookkeeping) that already know the
    /// inputs are well-formed; public construction goes through
    /// [`Rectangle::new`].
    pub(crate) fn new_unchecked(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_corners(
        min: Point,
        max: Point,
    ) -> GeomResult<Self> {
        let (x0, x1) = (min.x.min(max.x), min.x.max(max.x));
        let (y0, y1) = (min.y.min(max.y), min.y.max(max.y));
        Rectangle::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn from_center_size(
        center: Point,
        width: f64,
        height: f64,
    ) -> GeomResult<Self> {
        Rectangle::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub const fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= TOLERANCE_EPSILON || self.height <= TOLERANCE_EPSILON
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closed containment: `left <= x <= right && bottom <= y <= top`.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() - TOLERANCE_EPSILON
            && p.x <= self.right() + TOLERANCE_EPSILON
            && p.y >= self.bottom() - TOLERANCE_EPSILON
            && p.y <= self.top() + TOLERANCE_EPSILON
    }

    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        self.contains_point(Point::new(other.left(), other.bottom()))
            && self.contains_point(Point::new(other.right(), other.top()))
    }

    /// `true` if the rectangles overlap; edge-touching counts as
    /// intersecting.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left() <= other.right() + TOLERANCE_EPSILON
            && self.right() >= other.left() - TOLERANCE_EPSILON
            && self.bottom() <= other.top() + TOLERANCE_EPSILON
            && self.top() >= other.bottom() - TOLERANCE_EPSILON
    }

    /// The (possibly empty) overlap rectangle.
    pub fn intersection(&self, other: &Rectangle) -> Rectangle {
        let x0 = self.left().max(other.left());
        let y0 = self.bottom().max(other.bottom());
        let x1 = self.right().min(other.right());
        let y1 = self.top().min(other.top());

        if x1 <= x0 || y1 <= y0 {
            Rectangle::new_unchecked(x0, y0, 0.0, 0.0)
        } else {
            Rectangle::new_unchecked(x0, y0, x1 - x0, y1 - y0)
        }
    }

    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let x0 = self.left().min(other.left());
        let y0 = self.bottom().min(other.bottom());
        let x1 = self.right().max(other.right());
        let y1 = self.top().max(other.top());
        Rectangle::new_unchecked(x0, y0, x1 - x0, y1 - y0)
    }

    /// Grows the rectangle by `margin` on every side (shrinks if negative;
    /// clamped so width/height never go below zero).
    pub fn expand(&self, margin: f64) -> Rectangle {
        let width = (self.width + 2.0 * margin).max(0.0);
        let height = (self.height + 2.0 * margin).max(0.0);
        Rectangle::new_unchecked(
            self.x - margin,
            self.y - margin,
            width,
            height,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rectangle {
        Rectangle::new_unchecked(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Scales width/height by `factor`, keeping the center fixed.
    ///
    /// # Errors
    ///
    /// [`GeomError::DegenerateOperation`] if `factor` is (near) zero or
    /// negative; a negative factor would offset the center rather than
    /// keep it fixed, since width/height are always non-negative.
    pub fn scale(&self, factor: f64) -> GeomResult<Rectangle> {
        if is_near_zero(factor) || factor < 0.0 {
            return Err(GeomError::DegenerateOperation {
                reason: "cannot scale a rectangle by a zero or negative factor",
            });
        }
        let center = self.center();
        let width = self.width * factor;
        let height = self.height * factor;
        Ok(Rectangle::new_unchecked(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        ))
    }

    /// `0.0` if the rectangles overlap; otherwise the Euclidean distance
    /// between the axis-aligned gaps.
    pub fn distance_to_rectangle(&self, other: &Rectangle) -> f64 {
        let dx = if self.right() < other.left() {
            other.left() - self.right()
        } else if other.right() < self.left() {
            self.left() - other.right()
        } else {
            0.0
        };

        let dy = if self.top() < other.bottom() {
            other.bottom() - self.top()
        } else if other.top() < self.bottom() {
            self.bottom() - other.top()
        } else {
            0.0
        };

        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_to_point(&self, p: Point) -> f64 {
        let dx = if p.x < self.left() {
            self.left() - p.x
        } else if p.x > self.right() {
            p.x - self.right()
        } else {
            0.0
        };

        let dy = if p.y < self.bottom() {
            self.bottom() - p.y
        } else if p.y > self.top() {
            p.y - self.top()
        } else {
            0.0
        };

        (dx * dx + dy * dy).sqrt()
    }

    /// Bottom-left, bottom-right, top-right, top-left, in that order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.bottom()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.right(), self.top()),
            Point::new(self.left(), self.top()),
        ]
    }

    /// The smallest rectangle containing every point in `points`.
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidShape`] if `points` is empty.
    pub fn bounding_box_of_points(points: &[Point]) -> GeomResult<Rectangle> {
        let mut iter = points.iter();
        let first = iter.next().ok_or(GeomError::InvalidShape {
            reason: "cannot compute bounding box of zero points",
        })?;

        let (mut x0, mut x1) = (first.x, first.x);
        let (mut y0, mut y1) = (first.y, first.y);

        for p in iter {
            x0 = x0.min(p.x);
            x1 = x1.max(p.x);
            y0 = y0.min(p.y);
            y1 = y1.max(p.y);
        }

        Ok(Rectangle::new_unchecked(x0, y0, x1 - x0, y1 - y0))
    }

    /// The smallest rectangle containing every rectangle in `rects`.
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidShape`] if `rects` is empty.
    pub fn bounding_box_of_rectangles(
        rects: &[Rectangle],
    ) -> GeomResult<Rectangle> {
        let mut iter = rects.iter();
        let mut acc = *iter.next().ok_or(GeomError::InvalidShape {
            reason: "cannot compute bounding box of zero rectangles",
        })?;

        for r in iter {
            acc = acc.union(r);
        }

        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_point_matches_closed_bounds() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        for (x, y, expected) in [
            (5.0, 5.0, true),
            (0.0, 0.0, true),
            (10.0, 10.0, true),
            (10.001, 5.0, false),
            (-0.001, 5.0, false),
        ] {
            assert_eq!(r.contains_point(Point::new(x, y)), expected);
        }
    }

    #[test]
    fn intersects_is_symmetric_and_matches_intersection() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rectangle::new(5.0, 5.0, 10.0, 10.0).unwrap();
        let c = Rectangle::new(20.0, 20.0, 1.0, 1.0).unwrap();

        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert!(a.intersects(&b));
        assert!(!a.intersection(&b).is_empty());

        assert_eq!(a.intersects(&c), c.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn zero_width_rectangle_is_empty_but_valid() {
        let r = Rectangle::new(0.0, 0.0, 0.0, 5.0).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        assert!(Rectangle::new(0.0, 0.0, -1.0, 5.0).is_err());
    }

    #[test]
    fn distance_to_rectangle_is_zero_when_overlapping() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rectangle::new(5.0, 5.0, 10.0, 10.0).unwrap();
        assert_eq!(a.distance_to_rectangle(&b), 0.0);
    }

    #[test]
    fn distance_to_rectangle_measures_the_gap() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rectangle::new(13.0, 0.0, 10.0, 10.0).unwrap();
        assert!((a.distance_to_rectangle(&b) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn corners_are_in_expected_order() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 5.0).unwrap();
        let corners = r.corners();
        assert_eq!(corners[0], Point::new(0.0, 0.0));
        assert_eq!(corners[1], Point::new(10.0, 0.0));
        assert_eq!(corners[2], Point::new(10.0, 5.0));
        assert_eq!(corners[3], Point::new(0.0, 5.0));
    }

    #[test]
    fn bounding_box_of_points_covers_all() {
        let points = [
            Point::new(1.0, 5.0),
            Point::new(-2.0, 3.0),
            Point::new(4.0, -1.0),
        ];
        let bbox = Rectangle::bounding_box_of_points(&points).unwrap();
        for p in points {
            assert!(bbox.contains_point(p));
        }
    }
}
