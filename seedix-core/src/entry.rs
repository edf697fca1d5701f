//! Packed index entries
//!
//! A [`SeedEntry`] is the unit stored in the seed buffer. It is a byte-aligned,
//! padding-free 9-byte record, so the buffer is a flat array of:
//!
//! ```text
//! byte  0..4   key   u32 little-endian, within-partition part of the seed
//! byte  4..9   loc   40-bit little-endian location
//! ```

use bytemuck::{Pod, Zeroable};

/// Number of bits available for a location
pub const LOC_BITS: u32 = 40;

/// Largest representable location
pub const MAX_LOC: u64 = (1u64 << LOC_BITS) - 1;

/// A 40-bit global position inside a [`SequenceSet`](crate::sequence::SequenceSet).
///
/// The sequence index and the offset inside that sequence are recovered with
/// [`SequenceSet::local_position`](crate::sequence::SequenceSet::local_position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PackedLoc(u64);

impl PackedLoc {
    /// Wrap a raw position. Positions above [`MAX_LOC`] are a caller bug.
    pub fn new(position: u64) -> Self {
        debug_assert!(position <= MAX_LOC, "location {position} exceeds 40 bits");
        Self(position & MAX_LOC)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<PackedLoc> for u64 {
    fn from(loc: PackedLoc) -> Self {
        loc.0
    }
}

/// One (key, location) pair of the seed index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct SeedEntry {
    key: [u8; 4],
    loc: [u8; 5],
}

impl SeedEntry {
    pub fn new(key: u32, loc: PackedLoc) -> Self {
        let raw = loc.get().to_le_bytes();
        Self {
            key: key.to_le_bytes(),
            loc: [raw[0], raw[1], raw[2], raw[3], raw[4]],
        }
    }

    #[inline]
    pub fn key(&self) -> u32 {
        u32::from_le_bytes(self.key)
    }

    #[inline]
    pub fn loc(&self) -> PackedLoc {
        let mut raw = [0u8; 8];
        raw[..5].copy_from_slice(&self.loc);
        PackedLoc(u64::from_le_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_is_nine_packed_bytes() {
        assert_eq!(std::mem::size_of::<SeedEntry>(), 9);
        assert_eq!(std::mem::align_of::<SeedEntry>(), 1);
    }

    #[test]
    fn test_location_uses_all_forty_bits() {
        let loc = PackedLoc::new(MAX_LOC);
        let entry = SeedEntry::new(7, loc);
        assert_eq!(entry.key(), 7);
        assert_eq!(entry.loc(), loc);

        let high = PackedLoc::new(0x12_3456_789A);
        assert_eq!(SeedEntry::new(0, high).loc().get(), 0x12_3456_789A);
    }

    #[test]
    fn test_byte_layout() {
        let entry = SeedEntry::new(0x0102_0304, PackedLoc::new(0xAB_1122_3344));
        let bytes = bytemuck::bytes_of(&entry);
        assert_eq!(bytes, &[0x04, 0x03, 0x02, 0x01, 0x44, 0x33, 0x22, 0x11, 0xAB]);
    }

    #[test]
    fn test_slice_of_entries_is_contiguous_bytes() {
        let entries = vec![SeedEntry::new(1, PackedLoc::new(2)); 4];
        let bytes: &[u8] = bytemuck::cast_slice(&entries);
        assert_eq!(bytes.len(), 36);
        assert_eq!(bytes[9], 1);
        assert_eq!(bytes[13], 2);
    }

    #[test]
    fn test_default_is_zeroed() {
        let entry = SeedEntry::default();
        assert_eq!(entry.key(), 0);
        assert_eq!(entry.loc().get(), 0);
    }
}
