use crate::error::{GeomError, GeomResult};
use crate::tolerance::{TOLERANCE_EPSILON, is_near_zero};

/// An immutable 2-D point with `f64` coordinates.
///
/// Points are copied freely and never owned by the index or tree types that
/// reference them; equality is tolerance-based (see
/// [`crate::tolerance::TOLERANCE_EPSILON`]) and therefore never used as a
/// hash or sort key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Tolerance-based equality: `|x1-x2| < epsilon && |y1-y2| < epsilon`.
    pub fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < TOLERANCE_EPSILON
            && (self.y - other.y).abs() < TOLERANCE_EPSILON
    }

    pub fn add(&self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn distance_squared_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// Project `self` onto the closed segment `a`-`b`, clamping the
    /// parameter to `[0, 1]`, and return the distance to the projection.
    pub fn distance_to_segment(&self, a: Point, b: Point) -> f64 {
        let ab = b.sub(a);
        let len_sq = ab.dot(ab);

        if is_near_zero(len_sq) {
            // Degenerate segment: both endpoints coincide.
            return self.distance_to(a);
        }

        let t = self.sub(a).dot(ab) / len_sq;
        let t_clamped = t.clamp(0.0, 1.0);
        let projection = a.add(ab.scale(t_clamped));
        self.distance_to(projection)
    }

    /// Dot product `x1*x2 + y1*y2`.
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2-D scalar cross product `x1*y2 - y1*x2`.
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Unit vector in the same direction as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::DegenerateOperation`] if `self` is (near) the
    /// zero vector.
    pub fn normalize(&self) -> GeomResult<Point> {
        let mag = self.magnitude();
        if is_near_zero(mag) {
            return Err(GeomError::DegenerateOperation {
                reason: "cannot normalize the zero vector",
            });
        }
        Ok(self.scale(1.0 / mag))
    }

    /// Rotate `self` (as a vector from the origin) by `angle` radians.
    pub fn rotate(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    /// Rotate `self` by `angle` radians around `center`.
    pub fn rotate_around(&self, center: Point, angle: f64) -> Point {
        self.sub(center).rotate(angle).add(center)
    }
}

impl PartialEq for Point {
    /// Exact bitwise equality, for container keys and deterministic tests.
    ///
    /// Use [`Point::approx_eq`] for the tolerance-based comparison spec'd
    /// for geometric predicates.
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Validates that a coordinate pair is finite (not NaN/Inf), the
/// precondition shared by every primitive constructor in this crate.
pub(crate) fn validate_finite(x: f64, y: f64) -> GeomResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(GeomError::InvalidShape {
            reason: "coordinate is NaN or infinite",
        });
    }
    Ok(())
}
