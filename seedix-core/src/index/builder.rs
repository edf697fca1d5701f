//! Parallel fill of the seed buffer, one job per sequence chunk

use std::ops::Range;

use crate::entry::SeedEntry;
use crate::histogram::{PartitionRange, SeedHistogram};
use crate::scheduler::Job;
use crate::sequence::SequenceSet;
use crate::shape::{scan_seeds, SeedShape};

use super::offsets::PartitionOffsets;

/// Entries batched per partition before they are copied into the buffer
pub const WRITE_BUFFER_LEN: usize = 16;

/// Cut the buffer into one slice per (chunk, partition).
///
/// Partition `p`'s region is split in chunk order by the histogram counts, so
/// chunk `c` starts writing `p` at `begin(p) + sum(count(c', p) for c' < c)`.
/// The returned slices are pairwise disjoint; row `c` is handed to build job `c`.
pub(crate) fn carve_chunk_regions<'a>(
    data: &'a mut [SeedEntry],
    offsets: &PartitionOffsets,
    hst: &SeedHistogram,
    range: PartitionRange,
) -> Vec<Vec<&'a mut [SeedEntry]>> {
    let partitions = offsets.partitions();
    let mut rows: Vec<Vec<&'a mut [SeedEntry]>> = (0..hst.chunk_count())
        .map(|_| Vec::with_capacity(partitions))
        .collect();

    let mut rest = &mut data[..offsets.total()];
    for p in 0..partitions {
        let (mut region, tail) = std::mem::take(&mut rest).split_at_mut(offsets.width(p));
        rest = tail;
        for (c, row) in rows.iter_mut().enumerate() {
            let n = if range.contains(p) { hst.count(c, p) } else { 0 };
            let (piece, tail) = std::mem::take(&mut region).split_at_mut(n);
            region = tail;
            row.push(piece);
        }
        debug_assert!(region.is_empty());
    }
    rows
}

/// Per-partition write batches in front of the job's buffer slices
pub(crate) struct BufferedWriter<'a> {
    regions: Vec<&'a mut [SeedEntry]>,
    cursors: Vec<usize>,
    batch: Vec<SeedEntry>,
    fill: Vec<u8>,
}

impl<'a> BufferedWriter<'a> {
    pub fn new(regions: Vec<&'a mut [SeedEntry]>) -> Self {
        let partitions = regions.len();
        Self {
            regions,
            cursors: vec![0; partitions],
            batch: vec![SeedEntry::default(); partitions * WRITE_BUFFER_LEN],
            fill: vec![0; partitions],
        }
    }

    #[inline]
    pub fn push(&mut self, partition: usize, entry: SeedEntry) {
        let n = self.fill[partition] as usize;
        debug_assert!(n < WRITE_BUFFER_LEN);
        self.batch[partition * WRITE_BUFFER_LEN + n] = entry;
        self.fill[partition] += 1;
        if n + 1 == WRITE_BUFFER_LEN {
            self.flush_partition(partition);
        }
    }

    fn flush_partition(&mut self, partition: usize) {
        let n = self.fill[partition] as usize;
        let cursor = self.cursors[partition];
        let batch = &self.batch[partition * WRITE_BUFFER_LEN..partition * WRITE_BUFFER_LEN + n];
        // Panics when the histogram undercounted this partition for this chunk.
        self.regions[partition][cursor..cursor + n].copy_from_slice(batch);
        self.cursors[partition] = cursor + n;
        self.fill[partition] = 0;
    }

    /// Flush every partial batch. Returns the number of entries written.
    pub fn finish(mut self) -> usize {
        for p in 0..self.regions.len() {
            if self.fill[p] > 0 {
                self.flush_partition(p);
            }
        }
        debug_assert!(
            self.cursors
                .iter()
                .zip(&self.regions)
                .all(|(&cursor, region)| cursor == region.len()),
            "histogram counts do not match the seeds written"
        );
        self.cursors.iter().sum()
    }
}

/// Fill job for one chunk of sequences
pub(crate) struct BuildJob<'a, S: ?Sized> {
    pub seqs: &'a SequenceSet,
    pub shape: &'a S,
    pub range: PartitionRange,
    pub sequences: Range<usize>,
    pub regions: Vec<&'a mut [SeedEntry]>,
}

impl<S: SeedShape + ?Sized> Job for BuildJob<'_, S> {
    type Output = usize;

    fn run(self) -> usize {
        let range = self.range;
        let mut writer = BufferedWriter::new(self.regions);
        scan_seeds(self.seqs, self.sequences, self.shape, |seed, loc| {
            let partition = seed.partition as usize;
            if range.contains(partition) {
                writer.push(partition, SeedEntry::new(seed.key, loc));
            }
        });
        writer.finish()
    }
}
