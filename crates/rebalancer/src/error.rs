//! Rebalancer error types.

/// Result type alias for rebalancing analysis.
pub type Result<T> = std::result::Result<T, RebalanceError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RebalanceError {
    /// A lookup against one of the rings failed.
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// Two key assignments being compared cover different keys.
    #[error("key sets differ; cannot compare movement ({before} keys before, {after} after)")]
    KeySetMismatch { before: usize, after: usize },

    /// A sampled estimate was requested over zero keys.
    #[error("cannot estimate from an empty sample")]
    EmptySample,

    /// A thread counting part of a parallel load distribution panicked.
    #[error("load distribution worker panicked")]
    WorkerPanicked,
}
