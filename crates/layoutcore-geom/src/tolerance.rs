//! The single tolerance constant every predicate in this crate is built on.
//!
//! Tolerance-based equality is not a reliable equivalence relation: `a == b`
//! and `b == c` does not imply `a == c` once `epsilon` is a hard threshold.
//! Nothing in `layoutcore` uses [`TOLERANCE_EPSILON`]-based equality as a
//! hash or sort key — containers that need stable identity key on names or
//! indices, never on geometry.

/// Default tolerance used by every geometric predicate in the workspace.
pub const TOLERANCE_EPSILON: f64 = 1e-10;

/// `true` iff `|a - b| < TOLERANCE_EPSILON`.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE_EPSILON
}

/// `true` iff `a.abs() < TOLERANCE_EPSILON`.
#[inline]
pub fn is_near_zero(a: f64) -> bool {
    a.abs() < TOLERANCE_EPSILON
}
