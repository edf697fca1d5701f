//! Partition regions inside the shared seed buffer

use std::ops::Range;

use crate::histogram::{PartitionRange, SeedHistogram};

/// Prefix sums of partition widths.
///
/// `limits[p]..limits[p + 1]` is the region of partition `p`. Partitions outside
/// the active range have zero width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOffsets {
    limits: Vec<usize>,
}

impl PartitionOffsets {
    pub fn compute(hst: &SeedHistogram, range: PartitionRange) -> Self {
        let mut limits = Vec::with_capacity(hst.partitions() + 1);
        limits.push(0);
        let mut end = 0;
        for p in 0..hst.partitions() {
            if range.contains(p) {
                end += hst.partition_size(p);
            }
            limits.push(end);
        }
        Self { limits }
    }

    pub fn partitions(&self) -> usize {
        self.limits.len() - 1
    }

    #[inline]
    pub fn begin(&self, partition: usize) -> usize {
        self.limits[partition]
    }

    #[inline]
    pub fn end(&self, partition: usize) -> usize {
        self.limits[partition + 1]
    }

    #[inline]
    pub fn width(&self, partition: usize) -> usize {
        self.end(partition) - self.begin(partition)
    }

    pub fn region(&self, partition: usize) -> Range<usize> {
        self.begin(partition)..self.end(partition)
    }

    /// Entries over all partitions
    pub fn total(&self) -> usize {
        self.limits[self.limits.len() - 1]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> SeedHistogram {
        SeedHistogram::from_counts(4, vec![vec![2, 0, 1, 0], vec![1, 1, 0, 3]]).unwrap()
    }

    #[test]
    fn test_offsets_all_partitions() {
        let offsets = PartitionOffsets::compute(&example(), PartitionRange::all(4));
        assert_eq!(offsets.as_slice(), &[0, 3, 4, 5, 8]);
        assert_eq!(offsets.region(0), 0..3);
        assert_eq!(offsets.width(3), 3);
        assert_eq!(offsets.total(), 8);
        assert_eq!(offsets.partitions(), 4);
    }

    #[test]
    fn test_excluded_partitions_have_zero_width() {
        let offsets = PartitionOffsets::compute(&example(), PartitionRange::new(1, 3));
        assert_eq!(offsets.as_slice(), &[0, 0, 1, 2, 2]);
        assert_eq!(offsets.width(0), 0);
        assert_eq!(offsets.width(3), 0);
        assert_eq!(offsets.total(), 2);
    }

    #[test]
    fn test_regions_are_disjoint() {
        let hst = example();
        let offsets = PartitionOffsets::compute(&hst, PartitionRange::all(4));
        for p in 0..4 {
            for q in p + 1..4 {
                let (a, b) = (offsets.region(p), offsets.region(q));
                assert!(a.end <= b.start || b.end <= a.start);
            }
        }
    }
}
