//! Merge-join of two sorted partitions

use super::iter::{Bucket, GroupedIter};

/// Walks two grouped iterators in lockstep and stops on every key present in
/// both.
///
/// Protocol: call [`seek_match`](Self::seek_match); on `true` both sides sit on
/// buckets with the same key, read them through [`left`](Self::left) and
/// [`right`](Self::right), then call [`advance`](Self::advance) before seeking
/// again. The scan ends as soon as either side is exhausted.
#[derive(Debug, Clone)]
pub struct MergeIter<'a, 'b> {
    left: GroupedIter<'a>,
    right: GroupedIter<'b>,
}

impl<'a, 'b> MergeIter<'a, 'b> {
    pub fn new(left: GroupedIter<'a>, right: GroupedIter<'b>) -> Self {
        Self { left, right }
    }

    /// Skip whole buckets on the smaller side until both keys agree
    pub fn seek_match(&mut self) -> bool {
        loop {
            let (Some(l), Some(r)) = (self.left.key(), self.right.key()) else {
                return false;
            };
            if l < r {
                self.left.advance();
            } else if r < l {
                self.right.advance();
            } else {
                return true;
            }
        }
    }

    /// Step both sides past the current match
    pub fn advance(&mut self) {
        self.left.advance();
        self.right.advance();
    }

    pub fn left(&self) -> &GroupedIter<'a> {
        &self.left
    }

    pub fn right(&self) -> &GroupedIter<'b> {
        &self.right
    }
}

impl<'a, 'b> Iterator for MergeIter<'a, 'b> {
    type Item = (Bucket<'a>, Bucket<'b>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.seek_match() {
            return None;
        }
        let pair = (self.left.bucket()?, self.right.bucket()?);
        self.advance();
        Some(pair)
    }
}
