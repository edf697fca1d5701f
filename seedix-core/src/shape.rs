//! Seed shapes: turning a sequence window into a partition and a key

use std::ops::Range;

use crate::entry::PackedLoc;
use crate::error::{IndexError, IndexResult};
use crate::sequence::SequenceSet;

/// Seed split into its partition and the within-partition key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedKey {
    pub partition: u32,
    pub key: u32,
}

/// Turns a fixed-length window into a seed.
///
/// Implementations must be pure: the histogram and the builder call `seed` on
/// the same windows independently and rely on identical answers.
pub trait SeedShape: Sync {
    /// Window length in letters
    fn length(&self) -> usize;

    /// Number of partitions seeds are sharded into
    fn partitions(&self) -> usize;

    /// Seed for `window` (exactly `length()` letters), or `None` if the window
    /// holds no valid seed
    fn seed(&self, window: &[u8]) -> Option<SeedKey>;
}

/// Encode a nucleotide to 2-bit representation
#[inline]
pub fn encode_nucleotide(nucleotide: u8) -> Option<u64> {
    match nucleotide.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// Spaced nucleotide seed such as `111010010100110111`.
///
/// Care positions (`1`) are 2-bit encoded, first position in the highest bits.
/// The low `partition_bits` of the packed seed select the partition, the
/// remaining bits form the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacedShape {
    pattern: String,
    positions: Vec<usize>,
    length: usize,
    partition_bits: u32,
}

impl SpacedShape {
    pub const DEFAULT_PATTERN: &'static str = "111010010100110111";
    pub const DEFAULT_PARTITION_BITS: u32 = 10;

    pub fn new(pattern: &str, partition_bits: u32) -> IndexResult<Self> {
        if pattern.is_empty() {
            return Err(IndexError::InvalidShape("empty pattern".to_string()));
        }
        if let Some(c) = pattern.chars().find(|c| *c != '0' && *c != '1') {
            return Err(IndexError::InvalidShape(format!(
                "pattern '{pattern}' contains '{c}', expected only 0 and 1"
            )));
        }
        if !pattern.starts_with('1') || !pattern.ends_with('1') {
            return Err(IndexError::InvalidShape(format!(
                "pattern '{pattern}' must start and end with a care position"
            )));
        }
        if !(1..=16).contains(&partition_bits) {
            return Err(IndexError::InvalidShape(format!(
                "partition bits must be between 1 and 16, got {partition_bits}"
            )));
        }

        let positions: Vec<usize> = pattern
            .bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'1')
            .map(|(i, _)| i)
            .collect();
        let seed_bits = 2 * positions.len() as u32;
        if seed_bits <= partition_bits {
            return Err(IndexError::InvalidShape(format!(
                "weight {} leaves no key bits after {partition_bits} partition bits",
                positions.len()
            )));
        }
        if seed_bits - partition_bits > 32 {
            return Err(IndexError::InvalidShape(format!(
                "weight {} needs {} key bits, at most 32 fit",
                positions.len(),
                seed_bits - partition_bits
            )));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            length: pattern.len(),
            positions,
            partition_bits,
        })
    }

    /// Contiguous k-mer shape
    pub fn contiguous(k: usize, partition_bits: u32) -> IndexResult<Self> {
        Self::new(&"1".repeat(k), partition_bits)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of care positions
    pub fn weight(&self) -> usize {
        self.positions.len()
    }

    pub fn partition_bits(&self) -> u32 {
        self.partition_bits
    }
}

impl Default for SpacedShape {
    fn default() -> Self {
        Self {
            pattern: Self::DEFAULT_PATTERN.to_string(),
            positions: Self::DEFAULT_PATTERN
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'1')
                .map(|(i, _)| i)
                .collect(),
            length: Self::DEFAULT_PATTERN.len(),
            partition_bits: Self::DEFAULT_PARTITION_BITS,
        }
    }
}

impl SeedShape for SpacedShape {
    fn length(&self) -> usize {
        self.length
    }

    fn partitions(&self) -> usize {
        1 << self.partition_bits
    }

    #[inline]
    fn seed(&self, window: &[u8]) -> Option<SeedKey> {
        let mut packed = 0u64;
        for &pos in &self.positions {
            packed = (packed << 2) | encode_nucleotide(window[pos])?;
        }
        Some(SeedKey {
            partition: (packed & ((1 << self.partition_bits) - 1)) as u32,
            key: (packed >> self.partition_bits) as u32,
        })
    }
}

/// Visit every seed of sequences `seqs[range]` in order.
///
/// This is the only seed enumeration in the crate, so histogram counts and
/// builder writes see exactly the same windows.
pub fn scan_seeds<S, F>(seqs: &SequenceSet, range: Range<usize>, shape: &S, mut f: F)
where
    S: SeedShape + ?Sized,
    F: FnMut(SeedKey, PackedLoc),
{
    let len = shape.length();
    for i in range {
        let seq = seqs.get(i);
        if seq.len() < len {
            continue;
        }
        for (j, window) in seq.windows(len).enumerate() {
            if let Some(seed) = shape.seed(window) {
                f(seed, seqs.position(i, j));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nucleotide_encoding() {
        assert_eq!(encode_nucleotide(b'A'), Some(0));
        assert_eq!(encode_nucleotide(b'c'), Some(1));
        assert_eq!(encode_nucleotide(b'G'), Some(2));
        assert_eq!(encode_nucleotide(b't'), Some(3));
        assert_eq!(encode_nucleotide(b'N'), None);
    }

    #[test]
    fn test_spaced_shape_ignores_dont_care_positions() {
        let shape = SpacedShape::new("1101", 2).unwrap();
        assert_eq!(shape.length(), 4);
        assert_eq!(shape.weight(), 3);
        assert_eq!(shape.partitions(), 4);

        // ACxT -> 00 01 11 = 0b000111; partition 0b11, key 0b0001
        let a = shape.seed(b"ACGT").unwrap();
        let b = shape.seed(b"ACNT").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, SeedKey { partition: 3, key: 1 });
    }

    #[test]
    fn test_invalid_letter_at_care_position() {
        let shape = SpacedShape::contiguous(4, 2).unwrap();
        assert!(shape.seed(b"ACNT").is_none());
    }

    #[test]
    fn test_shape_validation() {
        assert!(SpacedShape::new("", 4).is_err());
        assert!(SpacedShape::new("1021", 4).is_err());
        assert!(SpacedShape::new("0111", 4).is_err());
        assert!(SpacedShape::new("1110", 4).is_err());
        assert!(SpacedShape::new("11", 4).is_err());
        assert!(SpacedShape::contiguous(8, 0).is_err());
        assert!(SpacedShape::contiguous(8, 17).is_err());
        // 2 * 24 - 10 = 38 key bits
        assert!(SpacedShape::contiguous(24, 10).is_err());
        assert!(SpacedShape::contiguous(21, 10).is_ok());
    }

    #[test]
    fn test_default_shape_is_valid() {
        let default = SpacedShape::default();
        let parsed = SpacedShape::new(
            SpacedShape::DEFAULT_PATTERN,
            SpacedShape::DEFAULT_PARTITION_BITS,
        )
        .unwrap();
        assert_eq!(default, parsed);
    }

    #[test]
    fn test_scan_seeds_skips_short_sequences() {
        let mut seqs = SequenceSet::new();
        seqs.push("short", b"ACG").unwrap();
        seqs.push("long", b"ACGTNACGT").unwrap();
        let shape = SpacedShape::contiguous(4, 2).unwrap();

        let mut locs = Vec::new();
        scan_seeds(&seqs, 0..seqs.len(), &shape, |_, loc| {
            locs.push(seqs.local_position(loc))
        });
        // windows at 0 and 5 are the only ones without N
        assert_eq!(locs, vec![(1, 0), (1, 5)]);
    }
}
