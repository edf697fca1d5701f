//! Sorted, partitioned seed index
//!
//! Construction runs two scheduled phases over one shared [`SeedBuffer`]:
//!
//! 1. build: one job per sequence chunk writes its seeds into slices carved
//!    from the buffer by the histogram, so no two jobs ever touch the same entry;
//! 2. sort: one job per active partition sorts that partition's region by key.
//!
//! The phases are separated by the pool join inside
//! [`run_scheduled`](crate::scheduler::run_scheduled). Afterwards the index is
//! read-only and can be shared freely between threads.

pub mod buffer;
mod builder;
pub mod iter;
pub mod merge;
pub mod offsets;
mod sorter;

use std::time::Instant;

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::entry::SeedEntry;
use crate::error::{IndexError, IndexResult};
use crate::histogram::{PartitionRange, SeedHistogram};
use crate::scheduler::run_scheduled;
use crate::sequence::SequenceSet;
use crate::shape::SeedShape;

pub use buffer::SeedBuffer;
pub use builder::WRITE_BUFFER_LEN;
pub use iter::{Bucket, GroupedIter, RandomAccessIter};
pub use merge::MergeIter;
pub use offsets::PartitionOffsets;

use builder::{carve_chunk_regions, BuildJob};
use sorter::sort_jobs;

/// Summary of a built index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Entries over all active partitions
    pub entries: usize,
    /// Distinct (partition, key) buckets
    pub buckets: usize,
    /// Largest bucket
    pub max_bucket: usize,
    /// Active partitions holding at least one entry
    pub active_partitions: usize,
}

/// Read-only seed index over one partition range.
///
/// Borrows the buffer it was built into; dropping the index releases the
/// buffer for the next range.
#[derive(Debug)]
pub struct SortedSeedIndex<'a> {
    data: &'a [SeedEntry],
    offsets: PartitionOffsets,
    range: PartitionRange,
}

impl<'a> SortedSeedIndex<'a> {
    /// Build and sort the seeds of `range` into `buffer`.
    ///
    /// `chunks` are the sequence chunk boundaries the histogram rows were
    /// computed for: they start at 0, never decrease and end at `seqs.len()`. The histogram must match the seeds `shape` finds in
    /// `seqs`; a mismatch panics inside the build job.
    pub fn build<S: SeedShape + ?Sized>(
        buffer: &'a mut SeedBuffer,
        seqs: &SequenceSet,
        shape: &S,
        hst: &SeedHistogram,
        range: PartitionRange,
        chunks: &[usize],
        pool: &ThreadPool,
    ) -> IndexResult<Self> {
        if shape.partitions() != hst.partitions() {
            return Err(IndexError::PartitionMismatch {
                shape: shape.partitions(),
                histogram: hst.partitions(),
            });
        }
        if range.begin > range.end || range.end > hst.partitions() {
            return Err(IndexError::InvalidRange {
                begin: range.begin,
                end: range.end,
                partitions: hst.partitions(),
            });
        }
        if chunks.len() != hst.chunk_count() + 1 {
            return Err(IndexError::ChunkMismatch {
                histogram: hst.chunk_count(),
                boundaries: chunks.len(),
            });
        }
        if chunks.first() != Some(&0)
            || chunks.last() != Some(&seqs.len())
            || chunks.windows(2).any(|w| w[0] > w[1])
        {
            return Err(IndexError::InvalidChunks {
                sequences: seqs.len(),
            });
        }

        let offsets = PartitionOffsets::compute(hst, range);
        if offsets.total() > buffer.capacity() {
            return Err(IndexError::BufferTooSmall {
                capacity: buffer.capacity(),
                required: offsets.total(),
            });
        }

        let data: &'a mut [SeedEntry] = buffer.as_mut_slice();

        log::debug!(
            "Building seed list for partitions {}..{} ({} entries, {} chunks)",
            range.begin,
            range.end,
            offsets.total(),
            hst.chunk_count()
        );
        let timer = Instant::now();
        let jobs: Vec<BuildJob<S>> = carve_chunk_regions(&mut *data, &offsets, hst, range)
            .into_iter()
            .zip(chunks.windows(2))
            .map(|(regions, w)| BuildJob {
                seqs,
                shape,
                range,
                sequences: w[0]..w[1],
                regions,
            })
            .collect();
        let written: usize = run_scheduled(pool, jobs).into_iter().sum();
        debug_assert_eq!(written, offsets.total());
        log::debug!("Built seed list in {:.3}s", timer.elapsed().as_secs_f64());

        let timer = Instant::now();
        let jobs = sort_jobs(&mut data[..offsets.total()], offsets.as_slice());
        let sorted = jobs.len();
        run_scheduled(pool, jobs);
        log::debug!(
            "Sorted {} partitions in {:.3}s",
            sorted,
            timer.elapsed().as_secs_f64()
        );

        let data: &'a [SeedEntry] = data;
        Ok(Self {
            data: &data[..offsets.total()],
            offsets,
            range,
        })
    }

    /// Sorted entries of `partition`; empty for partitions outside the range
    pub fn partition(&self, partition: usize) -> &'a [SeedEntry] {
        &self.data[self.offsets.region(partition)]
    }

    pub fn grouped(&self, partition: usize) -> GroupedIter<'a> {
        GroupedIter::new(self.partition(partition))
    }

    /// Resume at `offset` inside `partition`, as recorded by
    /// [`iterator_offset`](Self::iterator_offset)
    pub fn random_access(&self, partition: usize, offset: usize) -> RandomAccessIter<'a> {
        RandomAccessIter::new(self.partition(partition), offset)
    }

    /// Offset of a grouped iterator's current bucket within its partition
    pub fn iterator_offset(&self, it: &GroupedIter<'_>) -> usize {
        it.offset()
    }

    /// Entries over all active partitions
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn range(&self) -> PartitionRange {
        self.range
    }

    pub fn partitions(&self) -> usize {
        self.offsets.partitions()
    }

    pub fn offsets(&self) -> &PartitionOffsets {
        &self.offsets
    }

    /// Walk every active partition once and summarize its buckets
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            entries: self.len(),
            ..IndexStats::default()
        };
        for p in self.range.iter() {
            if self.offsets.width(p) == 0 {
                continue;
            }
            stats.active_partitions += 1;
            for bucket in self.grouped(p) {
                stats.buckets += 1;
                stats.max_bucket = stats.max_bucket.max(bucket.len());
            }
        }
        stats
    }
}
