//! Seedix Core Library
//!
//! Partitioned, sorted seed index for seed-and-extend sequence search: histogram
//! driven buffer sizing, parallel build and per-partition sort, and the grouped
//! and merge iteration used to find sequences sharing a seed.

pub mod config;
pub mod entry;
pub mod error;
pub mod histogram;
pub mod index;
pub mod io;
pub mod scheduler;
pub mod sequence;
pub mod shape;

// Re-export commonly used types and functions
pub use config::IndexConfig;
pub use entry::{PackedLoc, SeedEntry, MAX_LOC};
pub use error::{IndexError, IndexResult};
pub use histogram::{PartitionRange, SeedHistogram};
pub use index::{
    Bucket, GroupedIter, IndexStats, MergeIter, PartitionOffsets, RandomAccessIter, SeedBuffer,
    SortedSeedIndex,
};
pub use sequence::SequenceSet;
pub use shape::{SeedKey, SeedShape, SpacedShape};

/// Version information for the seedix core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
