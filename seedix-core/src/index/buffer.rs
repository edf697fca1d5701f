//! The one contiguous allocation every index pass is built into

use crate::entry::SeedEntry;
use crate::error::{IndexError, IndexResult};

/// Owned seed storage, allocated once and reused across partition ranges.
///
/// Size it with [`SeedHistogram::max_chunk_size`](crate::histogram::SeedHistogram::max_chunk_size)
/// over every range the caller will build.
#[derive(Debug)]
pub struct SeedBuffer {
    entries: Vec<SeedEntry>,
}

impl SeedBuffer {
    /// Allocate room for `capacity` entries, failing instead of aborting when
    /// the allocator refuses
    pub fn allocate(capacity: usize) -> IndexResult<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|source| IndexError::Allocation {
                entries: capacity,
                source,
            })?;
        entries.resize(capacity, SeedEntry::default());
        log::debug!(
            "Allocated seed buffer: {} entries ({} bytes)",
            capacity,
            capacity * std::mem::size_of::<SeedEntry>()
        );
        Ok(Self { entries })
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [SeedEntry] {
        &mut self.entries
    }
}
