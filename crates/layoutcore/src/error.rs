use thiserror::Error;

use layoutcore_geom::GeomError;
use layoutcore_index::IndexError;

/// Unified error surface across every sub-crate this facade re-exports.
#[derive(Debug, Error)]
pub enum LayoutCoreError {
    #[error(transparent)]
    Geom(#[from] GeomError),

    #[error(transparent)]
    Index(#[from] IndexError),

    /// `initialize`/`cleanup`/a config setter was called in a way the
    /// lifecycle state machine rejects (e.g. a config value out of range).
    #[error("invalid library configuration: {0}")]
    InvalidConfig(String),
}

pub type LayoutCoreResult<T> = Result<T, LayoutCoreError>;
