//! Per-partition sort after the build phase

use crate::entry::SeedEntry;
use crate::scheduler::Job;

/// Sorts one partition region by key. Stability is not needed: entries sharing
/// a key form an unordered bucket.
pub(crate) struct SortJob<'a> {
    pub region: &'a mut [SeedEntry],
}

impl Job for SortJob<'_> {
    type Output = ();

    fn run(self) {
        self.region.sort_unstable_by_key(SeedEntry::key);
    }
}

/// Split the built buffer into the regions that need sorting
pub(crate) fn sort_jobs<'a>(
    data: &'a mut [SeedEntry],
    limits: &[usize],
) -> Vec<SortJob<'a>> {
    let mut jobs = Vec::new();
    let mut rest = data;
    for w in limits.windows(2) {
        let (region, tail) = std::mem::take(&mut rest).split_at_mut(w[1] - w[0]);
        rest = tail;
        if region.len() > 1 {
            jobs.push(SortJob { region });
        }
    }
    jobs
}
