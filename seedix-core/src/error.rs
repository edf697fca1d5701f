//! Error type shared by the index and its collaborators

use std::collections::TryReserveError;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors surfaced before any build or sort job is scheduled.
///
/// Jobs themselves are infallible given valid inputs; a histogram that does not
/// match the sequences it was computed from is a programming error and panics
/// inside the job instead of appearing here.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to allocate seed buffer of {entries} entries: {source}")]
    Allocation {
        entries: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("seed buffer holds {capacity} entries but the partition range needs {required}")]
    BufferTooSmall { capacity: usize, required: usize },

    #[error("histogram has {histogram} chunks but {boundaries} chunk boundaries were given")]
    ChunkMismatch { histogram: usize, boundaries: usize },

    #[error("chunk boundaries must start at 0, never decrease and end at {sequences}")]
    InvalidChunks { sequences: usize },

    #[error("shape produces {shape} partitions but the histogram has {histogram}")]
    PartitionMismatch { shape: usize, histogram: usize },

    #[error("invalid partition range {begin}..{end} for {partitions} partitions")]
    InvalidRange {
        begin: usize,
        end: usize,
        partitions: usize,
    },

    #[error("invalid seed shape: {0}")]
    InvalidShape(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("sequence collection exceeds the {max} letter location space")]
    LocationOverflow { max: u64 },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
