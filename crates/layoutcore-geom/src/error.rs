use thiserror::Error;

/// Errors raised by primitive construction and geometric operations.
///
/// All geometric predicates on already-valid inputs are total; these two
/// variants only fire at construction time or in the handful of operations
/// that divide by a magnitude that may legitimately be zero.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeomError {
    /// A polygon was built with fewer than three vertices, a rectangle was
    /// given a negative dimension, or a coordinate was NaN/infinite.
    #[error("invalid shape: {reason}")]
    InvalidShape { reason: &'static str },

    /// Division by a (near-)zero magnitude, e.g. normalizing the zero
    /// vector or scaling a zero-size rectangle about its own center.
    #[error("degenerate operation: {reason}")]
    DegenerateOperation { reason: &'static str },
}

pub type GeomResult<T> = Result<T, GeomError>;
