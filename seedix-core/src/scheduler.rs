//! Runs independent jobs across a thread pool

use rayon::prelude::*;
use rayon::ThreadPool;

/// A unit of work handed to the pool by value.
///
/// A job owns everything it writes; shared inputs are borrowed read-only.
pub trait Job: Send {
    type Output: Send;

    fn run(self) -> Self::Output;
}

/// Run all `jobs` on `pool` and return their outputs in job order.
///
/// Returns only after every job has finished, which is the barrier between the
/// build and sort phases.
pub fn run_scheduled<J: Job>(pool: &ThreadPool, jobs: Vec<J>) -> Vec<J::Output> {
    pool.install(|| jobs.into_par_iter().map(Job::run).collect())
}
