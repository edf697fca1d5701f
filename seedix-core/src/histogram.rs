//! Per-chunk seed counts and buffer capacity planning

use std::ops::Range;
use std::time::Instant;

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};
use crate::scheduler::{run_scheduled, Job};
use crate::sequence::SequenceSet;
use crate::shape::{scan_seeds, SeedShape};

/// Half-open range of partitions indexed in one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionRange {
    pub begin: usize,
    pub end: usize,
}

impl PartitionRange {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Every partition
    pub fn all(partitions: usize) -> Self {
        Self::new(0, partitions)
    }

    /// Cover `0..partitions` with `n` consecutive ranges of near-equal width.
    ///
    /// `n` is clamped to `1..=partitions`.
    pub fn split(partitions: usize, n: usize) -> Vec<Self> {
        let n = n.clamp(1, partitions.max(1));
        (0..n)
            .map(|i| Self::new(i * partitions / n, (i + 1) * partitions / n))
            .collect()
    }

    #[inline]
    pub fn contains(&self, partition: usize) -> bool {
        partition >= self.begin && partition < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Range<usize> {
        self.begin..self.end
    }
}

/// Seed counts per (chunk, partition).
///
/// Row `c` holds the counts of the sequences in chunk `c`. The build phase
/// trusts these counts: they must match what [`scan_seeds`] produces for the
/// same sequences and shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedHistogram {
    partitions: usize,
    counts: Vec<Vec<u32>>,
}

struct CountJob<'a, S: ?Sized> {
    seqs: &'a SequenceSet,
    shape: &'a S,
    range: Range<usize>,
}

impl<S: SeedShape + ?Sized> Job for CountJob<'_, S> {
    type Output = Vec<u32>;

    fn run(self) -> Vec<u32> {
        let mut counts = vec![0u32; self.shape.partitions()];
        scan_seeds(self.seqs, self.range, self.shape, |seed, _| {
            counts[seed.partition as usize] += 1;
        });
        counts
    }
}

impl SeedHistogram {
    /// Wrap an externally computed table
    pub fn from_counts(partitions: usize, counts: Vec<Vec<u32>>) -> IndexResult<Self> {
        if let Some((chunk, row)) = counts
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != partitions)
        {
            return Err(IndexError::InvalidConfig(format!(
                "histogram chunk {chunk} has {} partition counts, expected {partitions}",
                row.len()
            )));
        }
        Ok(Self { partitions, counts })
    }

    /// Count seeds of every chunk in parallel, one job per chunk
    pub fn compute<S: SeedShape + ?Sized>(
        seqs: &SequenceSet,
        shape: &S,
        chunks: &[usize],
        pool: &ThreadPool,
    ) -> Self {
        let timer = Instant::now();
        let jobs: Vec<CountJob<S>> = chunks
            .windows(2)
            .map(|w| CountJob {
                seqs,
                shape,
                range: w[0]..w[1],
            })
            .collect();
        let counts = run_scheduled(pool, jobs);
        log::debug!(
            "Computed seed histogram for {} chunks in {:.3}s",
            counts.len(),
            timer.elapsed().as_secs_f64()
        );
        Self {
            partitions: shape.partitions(),
            counts,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.counts.len()
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    #[inline]
    pub fn count(&self, chunk: usize, partition: usize) -> usize {
        self.counts[chunk][partition] as usize
    }

    pub fn chunk(&self, chunk: usize) -> &[u32] {
        &self.counts[chunk]
    }

    /// Seeds in `partition` over all chunks
    pub fn partition_size(&self, partition: usize) -> usize {
        self.counts.iter().map(|row| row[partition] as usize).sum()
    }

    /// Seeds in all partitions of `range`
    pub fn range_size(&self, range: PartitionRange) -> usize {
        range
            .iter()
            .filter(|&p| p < self.partitions)
            .map(|p| self.partition_size(p))
            .sum()
    }

    /// Buffer capacity needed to build any one of `ranges` into the same buffer
    pub fn max_chunk_size(&self, ranges: &[PartitionRange]) -> usize {
        ranges
            .iter()
            .map(|&range| self.range_size(range))
            .max()
            .unwrap_or(0)
    }

    /// Seeds over every chunk and partition
    pub fn total(&self) -> usize {
        self.range_size(PartitionRange::all(self.partitions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::SpacedShape;

    fn example() -> SeedHistogram {
        SeedHistogram::from_counts(4, vec![vec![2, 0, 1, 0], vec![1, 1, 0, 3]]).unwrap()
    }

    #[test]
    fn test_partition_and_range_sizes() {
        let hst = example();
        assert_eq!(hst.chunk_count(), 2);
        assert_eq!(hst.partition_size(0), 3);
        assert_eq!(hst.partition_size(3), 3);
        assert_eq!(hst.range_size(PartitionRange::new(1, 3)), 2);
        assert_eq!(hst.total(), 8);
    }

    #[test]
    fn test_max_chunk_size() {
        let hst = example();
        let ranges = PartitionRange::split(4, 2);
        assert_eq!(ranges, vec![PartitionRange::new(0, 2), PartitionRange::new(2, 4)]);
        // 0..2 holds 4 seeds, 2..4 holds 4
        assert_eq!(hst.max_chunk_size(&ranges), 4);
        assert_eq!(hst.max_chunk_size(&[PartitionRange::new(3, 4)]), 3);
        assert_eq!(hst.max_chunk_size(&[]), 0);
    }

    #[test]
    fn test_split_covers_everything() {
        for partitions in [1, 3, 16, 1024] {
            for n in 1..10 {
                let ranges = PartitionRange::split(partitions, n);
                assert_eq!(ranges[0].begin, 0);
                assert_eq!(ranges.last().unwrap().end, partitions);
                assert!(ranges.windows(2).all(|w| w[0].end == w[1].begin));
                assert!(ranges.iter().all(|r| !r.is_empty()));
            }
        }
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = SeedHistogram::from_counts(4, vec![vec![1, 2, 3, 4], vec![1, 2]]);
        assert!(matches!(err, Err(IndexError::InvalidConfig(_))));
    }

    #[test]
    fn test_compute_matches_scan() {
        let mut seqs = SequenceSet::new();
        seqs.push("a", b"ACGTACGTTTGACCA").unwrap();
        seqs.push("b", b"GGCATNNACGTAC").unwrap();
        seqs.push("c", b"AC").unwrap();
        let shape = SpacedShape::new("1101", 2).unwrap();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();

        let chunks = seqs.partition(2);
        let hst = SeedHistogram::compute(&seqs, &shape, &chunks, &pool);
        assert_eq!(hst.chunk_count(), chunks.len() - 1);

        let mut expected = 0;
        scan_seeds(&seqs, 0..seqs.len(), &shape, |_, _| expected += 1);
        assert_eq!(hst.total(), expected);
    }
}
