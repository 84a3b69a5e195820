//! Error types for the benchmark driver.

use thiserror::Error;

use crate::domain::Path;

/// Benchmark driver errors
#[derive(Debug, Error)]
pub enum BenchError {
    /// A path was configured without replicas.
    #[error("No replicas configured for the {path} path")]
    NoReplicas { path: Path },

    /// A broadcast reached none of the path's replicas.
    #[error("No {path} replica accepted command seq {seq}")]
    PathUnreachable { path: Path, seq: u32 },

    /// The window admits no pair at all.
    #[error("Window must admit at least one pair")]
    ZeroWindow,

    /// Pair counter ran out.
    #[error("Sequence space exhausted after {issued} pairs")]
    SequenceExhausted { issued: u64 },
}

/// Result type for benchmark operations
pub type BenchResult<T> = Result<T, BenchError>;
