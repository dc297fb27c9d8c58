use thiserror::Error;

/// Errors raised by the spatial index, the arena it is built on, and the
/// worker pool that runs parallel operations over it.
#[derive(Debug, Error)]
pub enum IndexError {
    /// An arena key (quadtree/R-tree node handle) no longer refers to a
    /// live value, either because it was never issued by this arena or
    /// because the slot has since been reused.
    #[error("arena key {0} is stale or unknown")]
    StaleKey(String),

    /// An IP-block name was looked up that has no entry in the
    /// hierarchical index.
    #[error("unknown block: {0}")]
    UnknownBlock(String),

    /// The worker pool was asked to run a task after [`crate::WorkerPool`]
    /// had already been shut down.
    #[error("worker pool is shut down")]
    PoolShutDown,

    /// A queued task panicked before producing a result.
    #[error("worker task panicked before completing")]
    TaskPanicked,

    /// A structural invariant was violated building a tree (e.g. an
    /// R-tree split producing an empty partition).
    #[error("invalid index state: {0}")]
    InvalidState(String),

    /// [`crate::HierarchicalIndex::create_ip_block`] was asked to create a
    /// block under a name that already exists.
    #[error("block name already in use: {0}")]
    DuplicateBlock(String),

    /// A child block's boundary is not fully contained within its parent's
    /// boundary.
    #[error("block '{child}' boundary is not contained within parent '{parent}'")]
    BoundaryEscape { child: String, parent: String },

    /// A bulk operation would exceed a configured capacity limit.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// A parallel operation was abandoned before every task completed.
    #[error("operation cancelled before completion")]
    Cancelled,
}

pub type IndexResult<T> = Result<T, IndexError>;
