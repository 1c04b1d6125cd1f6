use manzini::{FmIndex, Symbol};
use proptest::prelude::*;

fn symbols() -> [Symbol; 3] {
    [Symbol::Sentinel, Symbol::Zero, Symbol::One]
}

fn binary_sequence(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(prop_oneof![Just(b'0'), Just(b'1')], len)
}

fn naive_occurrences(sequence: &[u8], pattern: &[u8]) -> Vec<usize> {
    sequence
        .windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern)
        .map(|(offset, _)| offset)
        .collect()
}

proptest! {
    #[test]
    fn rank_totals_are_consistent(sequence in binary_sequence(4..128)) {
        let index = FmIndex::build(&sequence).expect("index build succeeds");
        let last = index.len() as isize;

        prop_assert_eq!(
            index.rank(Symbol::Zero, last) + index.rank(Symbol::One, last),
            index.len(),
            "digit totals should sum to the sequence length"
        );
        prop_assert_eq!(index.rank(Symbol::Sentinel, last), 1, "exactly one sentinel");

        for symbol in symbols() {
            let mut previous = 0;
            for row in 0..=index.len() {
                let rank = index.rank(symbol, row as isize);
                prop_assert!(rank >= previous, "rank must be monotonic");
                prop_assert!(rank - previous <= 1, "rank grows by at most one per row");
                previous = rank;
            }
        }
    }

    #[test]
    fn occurrences_agree_with_a_naive_scan(
        sequence in binary_sequence(4..96),
        pattern in binary_sequence(1..8),
    ) {
        let index = FmIndex::build(&sequence).expect("index build succeeds");
        let found = index.occurrences(&pattern).expect("search succeeds");
        prop_assert_eq!(found, naive_occurrences(&sequence, &pattern));
    }

    #[test]
    fn inversion_recovers_the_sequence(sequence in binary_sequence(4..160)) {
        let index = FmIndex::build(&sequence).expect("index build succeeds");
        prop_assert_eq!(index.invert(), sequence);
    }

    #[test]
    fn lf_mapping_is_a_permutation(sequence in binary_sequence(4..64)) {
        let index = FmIndex::build(&sequence).expect("index build succeeds");
        let mut image: Vec<usize> = (0..index.rows()).map(|row| index.lf(row)).collect();
        image.sort_unstable();
        prop_assert_eq!(image, (0..index.rows()).collect::<Vec<usize>>());
    }

    #[test]
    fn locate_agrees_with_a_rebuilt_suffix_array(sequence in binary_sequence(4..64)) {
        let index = FmIndex::build(&sequence).expect("index build succeeds");

        let mut text = sequence.clone();
        text.push(b'$');
        let sa = manzini::suffix_array(&text);

        for (row, &expected) in sa.iter().enumerate() {
            prop_assert_eq!(index.locate(row).expect("locate succeeds"), expected);
        }
    }
}
