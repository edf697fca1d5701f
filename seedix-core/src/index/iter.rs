//! Read-only views over one sorted partition

use crate::entry::{PackedLoc, SeedEntry};

/// Maximal run of entries sharing one key.
///
/// Order inside a bucket is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket<'a> {
    pub key: u32,
    pub entries: &'a [SeedEntry],
}

impl<'a> Bucket<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = PackedLoc> + 'a {
        self.entries.iter().map(SeedEntry::loc)
    }
}

/// Steps through a sorted partition bucket by bucket.
///
/// The cursor methods (`key`, `bucket_size`, `value`, `advance`) are what the
/// merge protocol uses; the `Iterator` impl yields the same buckets in order.
#[derive(Debug, Clone)]
pub struct GroupedIter<'a> {
    entries: &'a [SeedEntry],
    pos: usize,
    n: usize,
}

impl<'a> GroupedIter<'a> {
    pub fn new(entries: &'a [SeedEntry]) -> Self {
        let mut it = Self { entries, pos: 0, n: 0 };
        it.n = it.count_bucket();
        it
    }

    fn count_bucket(&self) -> usize {
        match self.entries.get(self.pos) {
            Some(first) => self.entries[self.pos..]
                .iter()
                .take_while(|e| e.key() == first.key())
                .count(),
            None => 0,
        }
    }

    /// Key of the current bucket, `None` at the end
    #[inline]
    pub fn key(&self) -> Option<u32> {
        self.entries.get(self.pos).map(SeedEntry::key)
    }

    #[inline]
    pub fn bucket_size(&self) -> usize {
        self.n
    }

    /// `k`-th location of the current bucket
    #[inline]
    pub fn value(&self, k: usize) -> Option<PackedLoc> {
        if k < self.n {
            Some(self.entries[self.pos + k].loc())
        } else {
            None
        }
    }

    pub fn bucket(&self) -> Option<Bucket<'a>> {
        let key = self.key()?;
        Some(Bucket {
            key,
            entries: &self.entries[self.pos..self.pos + self.n],
        })
    }

    /// Move past the whole current bucket
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.n;
        self.n = self.count_bucket();
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.entries.len()
    }

    /// Position of the current bucket relative to the partition start
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for GroupedIter<'a> {
    type Item = Bucket<'a>;

    fn next(&mut self) -> Option<Bucket<'a>> {
        let bucket = self.bucket()?;
        self.advance();
        Some(bucket)
    }
}

/// Walks entries one at a time from an arbitrary offset while they keep the
/// key found at that offset.
///
/// Used to come back to a bucket recorded earlier as `(partition, offset)`.
#[derive(Debug, Clone)]
pub struct RandomAccessIter<'a> {
    entries: &'a [SeedEntry],
    pos: usize,
    key: u32,
}

impl<'a> RandomAccessIter<'a> {
    pub fn new(entries: &'a [SeedEntry], offset: usize) -> Self {
        let key = entries.get(offset).map(SeedEntry::key).unwrap_or(0);
        Self {
            entries,
            pos: offset,
            key,
        }
    }

    /// True while the entry under the cursor still carries the initial key
    #[inline]
    pub fn good(&self) -> bool {
        self.entries
            .get(self.pos)
            .is_some_and(|e| e.key() == self.key)
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    #[inline]
    pub fn value(&self) -> Option<PackedLoc> {
        if self.good() {
            Some(self.entries[self.pos].loc())
        } else {
            None
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl Iterator for RandomAccessIter<'_> {
    type Item = PackedLoc;

    fn next(&mut self) -> Option<PackedLoc> {
        let loc = self.value()?;
        self.advance();
        Some(loc)
    }
}
