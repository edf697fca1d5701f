//! Concatenated sequence collection indexed by the seed builder

use crate::entry::{PackedLoc, MAX_LOC};
use crate::error::{IndexError, IndexResult};

/// Sequences stored back to back in one letter array.
///
/// `starts[i]` is the global position of the first letter of sequence `i`;
/// the table carries one trailing element holding the total letter count.
#[derive(Debug, Clone)]
pub struct SequenceSet {
    data: Vec<u8>,
    starts: Vec<u64>,
    ids: Vec<String>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            starts: vec![0],
            ids: Vec::new(),
        }
    }

    /// Append a sequence and return its index
    pub fn push(&mut self, id: impl Into<String>, letters: &[u8]) -> IndexResult<usize> {
        let end = self.letters() + letters.len() as u64;
        if end > MAX_LOC + 1 {
            return Err(IndexError::LocationOverflow { max: MAX_LOC + 1 });
        }
        self.data.extend_from_slice(letters);
        self.starts.push(end);
        self.ids.push(id.into());
        Ok(self.ids.len() - 1)
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Total number of letters over all sequences
    pub fn letters(&self) -> u64 {
        self.starts[self.starts.len() - 1]
    }

    pub fn get(&self, i: usize) -> &[u8] {
        &self.data[self.starts[i] as usize..self.starts[i + 1] as usize]
    }

    pub fn id(&self, i: usize) -> &str {
        &self.ids[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        (0..self.len()).map(move |i| (self.id(i), self.get(i)))
    }

    /// Location of letter `offset` of sequence `seq`
    #[inline]
    pub fn position(&self, seq: usize, offset: usize) -> PackedLoc {
        debug_assert!(self.starts[seq] + (offset as u64) < self.starts[seq + 1]);
        PackedLoc::new(self.starts[seq] + offset as u64)
    }

    /// Recover `(sequence index, offset)` from a location
    pub fn local_position(&self, loc: PackedLoc) -> (usize, usize) {
        let pos = loc.get();
        let seq = self.starts[..self.len()].partition_point(|&start| start <= pos) - 1;
        (seq, (pos - self.starts[seq]) as usize)
    }

    /// Split the collection into at most `chunks` contiguous ranges of roughly
    /// equal letter count.
    ///
    /// Returns the chunk boundaries: `bounds[c]..bounds[c + 1]` are the
    /// sequences of chunk `c`. An empty collection yields `[0]`, i.e. no chunks.
    pub fn partition(&self, chunks: usize) -> Vec<usize> {
        let chunks = chunks.max(1);
        let mut bounds = vec![0];
        if self.is_empty() {
            return bounds;
        }

        let target = self.letters().div_ceil(chunks as u64).max(1);
        let mut filled = 0u64;
        for i in 0..self.len() - 1 {
            filled += self.get(i).len() as u64;
            if bounds.len() < chunks && filled >= target * bounds.len() as u64 {
                bounds.push(i + 1);
            }
        }
        bounds.push(self.len());
        bounds
    }
}

impl Default for SequenceSet {
    fn default() -> Self {
        Self::new()
    }
}
