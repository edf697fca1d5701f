use std::collections::BTreeSet;

use proptest::prelude::*;
use seedix_core::shape::scan_seeds;
use seedix_core::*;

fn dna() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'A', b'C', b'G', b'T', b'N']), 0..80)
}

fn sorted_entries(mut keys: Vec<u32>) -> Vec<SeedEntry> {
    keys.sort_unstable();
    keys.into_iter()
        .enumerate()
        .map(|(i, k)| SeedEntry::new(k, PackedLoc::new(i as u64)))
        .collect()
}

proptest! {
    #[test]
    fn prop_offsets_cover_active_counts(
        counts in prop::collection::vec(prop::collection::vec(0u32..50, 8), 1..6),
        begin in 0usize..8,
        width in 0usize..8,
    ) {
        let hst = SeedHistogram::from_counts(8, counts.clone()).unwrap();
        let range = PartitionRange::new(begin, (begin + width).min(8));
        let offsets = PartitionOffsets::compute(&hst, range);

        let expected: usize = counts
            .iter()
            .flat_map(|row| row.iter().enumerate())
            .filter(|(p, _)| range.contains(*p))
            .map(|(_, &c)| c as usize)
            .sum();
        prop_assert_eq!(offsets.total(), expected);
        prop_assert_eq!(offsets.as_slice()[0], 0);
        prop_assert!(offsets.as_slice().windows(2).all(|w| w[0] <= w[1]));
        for p in 0..8 {
            if !range.contains(p) {
                prop_assert_eq!(offsets.width(p), 0);
            }
        }
    }

    #[test]
    fn prop_build_is_complete_and_sorted(
        records in prop::collection::vec(dna(), 0..30),
        seq_chunks in 1usize..6,
        index_chunks in 1usize..5,
        threads in 1usize..4,
    ) {
        let mut seqs = SequenceSet::new();
        for (i, r) in records.iter().enumerate() {
            seqs.push(format!("r{i}"), r).unwrap();
        }
        let shape = SpacedShape::new("11011", 3).unwrap();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        let chunks = seqs.partition(seq_chunks);
        let hst = SeedHistogram::compute(&seqs, &shape, &chunks, &pool);
        let ranges = PartitionRange::split(shape.partitions(), index_chunks);
        let mut buffer = SeedBuffer::allocate(hst.max_chunk_size(&ranges)).unwrap();

        let mut expected = Vec::new();
        scan_seeds(&seqs, 0..seqs.len(), &shape, |seed, loc| {
            expected.push((seed.partition as usize, seed.key, loc.get()))
        });
        expected.sort_unstable();

        let mut found = Vec::new();
        for &range in &ranges {
            let index = SortedSeedIndex::build(&mut buffer, &seqs, &shape, &hst, range, &chunks, &pool)
                .unwrap();
            for p in range.iter() {
                let part = index.partition(p);
                prop_assert!(part.windows(2).all(|w| w[0].key() <= w[1].key()));
                found.extend(part.iter().map(|e| (p, e.key(), e.loc().get())));
            }
        }
        found.sort_unstable();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_grouped_iteration_visits_each_entry_once(keys in prop::collection::vec(0u32..20, 0..100)) {
        let entries = sorted_entries(keys);
        let mut visited = 0;
        let mut previous: Option<u32> = None;
        for bucket in GroupedIter::new(&entries) {
            prop_assert!(!bucket.is_empty());
            prop_assert!(bucket.entries.iter().all(|e| e.key() == bucket.key));
            prop_assert!(previous.map_or(true, |k| k < bucket.key));
            previous = Some(bucket.key);
            visited += bucket.len();
        }
        prop_assert_eq!(visited, entries.len());
    }

    #[test]
    fn prop_merge_reports_key_intersection(
        a in prop::collection::vec(0u32..40, 0..60),
        b in prop::collection::vec(0u32..40, 0..60),
    ) {
        let left = sorted_entries(a.clone());
        let right = sorted_entries(b.clone());
        let reported: Vec<u32> = MergeIter::new(GroupedIter::new(&left), GroupedIter::new(&right))
            .map(|(l, r)| {
                assert_eq!(l.key, r.key);
                l.key
            })
            .collect();

        let sa: BTreeSet<u32> = a.into_iter().collect();
        let sb: BTreeSet<u32> = b.into_iter().collect();
        let expected: Vec<u32> = sa.intersection(&sb).copied().collect();
        prop_assert_eq!(reported, expected);
    }
}
