//! Property tests for the oracle/selector contracts: summary bounds,
//! distinct ids, cached-value consistency, peek purity, monotonicity,
//! submodularity, and history growth, over randomized small streams.

use proptest::prelude::*;

use submax::{
    Element, GaussianKernelOracle, IndependentSetImprovement, Oracle, Preemption, Selector,
    StreamingGreedy, Summary, TextCoverageOracle,
};

fn numeric_dataset() -> impl Strategy<Value = (usize, Vec<Element>)> {
    (1usize..=3).prop_flat_map(|dim| {
        prop::collection::vec(prop::collection::vec(-1.0f64..1.0, dim), 1..12).prop_map(
            move |rows| {
                let data = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, coords)| Element::numeric(i, coords))
                    .collect();
                (dim, data)
            },
        )
    })
}

fn tweet_dataset() -> impl Strategy<Value = Vec<Element>> {
    prop::collection::vec(
        (0.0f64..10.0, prop::collection::vec(0usize..8, 1..5)),
        1..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (w, tokens))| {
                let words = tokens.into_iter().map(|t| format!("w{t}")).collect();
                Element::tokens(i, w, words)
            })
            .collect()
    })
}

/// f(S) recomputed by a fresh oracle over the summary's members.
fn recompute_gk(dim: usize, summary: &Summary) -> f64 {
    let mut oracle = GaussianKernelOracle::new(dim);
    let mut s = Summary::new();
    for e in summary.iter() {
        let pos = s.len();
        oracle.apply(&mut s, e, pos).unwrap();
    }
    oracle.value(&s)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn check_streaming_selector(sel: &mut dyn Selector, dim: usize, data: &[Element], k: usize) {
    sel.run(data).unwrap();

    // |S| ≤ k, ids pairwise distinct
    assert!(sel.summary().len() <= k);
    let mut ids: Vec<usize> = sel.summary().iter().map(|e| e.id.as_usize()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), sel.summary().len());

    // cached value agrees with a from-scratch evaluation
    assert!(close(sel.value(), recompute_gk(dim, sel.summary())));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn streaming_selectors_respect_the_bound((dim, data) in numeric_dataset(), k in 1usize..4) {
        let oracle = GaussianKernelOracle::new(dim);
        let mut isi = IndependentSetImprovement::new(k, &oracle);
        check_streaming_selector(&mut isi, dim, &data, k);
        // the reordering selector keeps tags descending
        let tags: Vec<f64> = isi.summary().iter().map(|e| e.fdelta).collect();
        prop_assert!(tags.windows(2).all(|w| w[0] >= w[1]));

        let mut sg = StreamingGreedy::new(k, &oracle);
        check_streaming_selector(&mut sg, dim, &data, k);

        let mut pre = Preemption::new(k, &oracle, 1.0);
        check_streaming_selector(&mut pre, dim, &data, k);
    }

    #[test]
    fn gk_peek_is_pure_and_monotone((dim, data) in numeric_dataset()) {
        let mut oracle = GaussianKernelOracle::new(dim);
        let mut s = Summary::new();
        let (probe, members) = data.split_last().unwrap();
        for e in members {
            let pos = s.len();
            oracle.apply(&mut s, e, pos).unwrap();
        }

        let before = oracle.value(&s);
        for pos in 0..=s.len() {
            let a = oracle.peek(&s, probe, pos).unwrap();
            let b = oracle.peek(&s, probe, pos).unwrap();
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
        prop_assert_eq!(oracle.value(&s).to_bits(), before.to_bits());

        // non-negative append marginal
        let appended = oracle.peek(&s, probe, s.len()).unwrap();
        prop_assert!(appended >= before - 1e-9);
    }

    #[test]
    fn tc_peek_is_pure_and_monotone(data in tweet_dataset()) {
        let mut oracle = TextCoverageOracle::new();
        let mut s = Summary::new();
        let (probe, members) = data.split_last().unwrap();
        for e in members {
            let pos = s.len();
            oracle.apply(&mut s, e, pos).unwrap();
        }

        let before = oracle.value(&s);
        for pos in 0..=s.len() {
            let a = oracle.peek(&s, probe, pos).unwrap();
            let b = oracle.peek(&s, probe, pos).unwrap();
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
        prop_assert_eq!(oracle.value(&s).to_bits(), before.to_bits());

        let appended = oracle.peek(&s, probe, s.len()).unwrap();
        prop_assert!(appended >= before - 1e-9);
    }

    #[test]
    fn gk_marginals_diminish_on_nested_summaries(
        (dim, data) in numeric_dataset(),
        cut in 0usize..10,
    ) {
        prop_assume!(data.len() >= 2);
        let (probe, members) = data.split_last().unwrap();
        let cut = cut % members.len();

        // S = members[..cut] ⊂ T = members; x = probe ∉ T
        let mut small = GaussianKernelOracle::new(dim);
        let mut s = Summary::new();
        for e in &members[..cut] {
            let pos = s.len();
            small.apply(&mut s, e, pos).unwrap();
        }
        let mut big = GaussianKernelOracle::new(dim);
        let mut t = Summary::new();
        for e in members {
            let pos = t.len();
            big.apply(&mut t, e, pos).unwrap();
        }

        let gain_small = small.peek(&s, probe, s.len()).unwrap() - small.value(&s);
        let gain_big = big.peek(&t, probe, t.len()).unwrap() - big.value(&t);
        prop_assert!(gain_small >= gain_big - 1e-9);
    }

    #[test]
    fn tc_marginals_diminish_on_nested_summaries(
        data in tweet_dataset(),
        cut in 0usize..10,
    ) {
        prop_assume!(data.len() >= 2);
        let (probe, members) = data.split_last().unwrap();
        let cut = cut % members.len();

        let mut small = TextCoverageOracle::new();
        let mut s = Summary::new();
        for e in &members[..cut] {
            let pos = s.len();
            small.apply(&mut s, e, pos).unwrap();
        }
        let mut big = TextCoverageOracle::new();
        let mut t = Summary::new();
        for e in members {
            let pos = t.len();
            big.apply(&mut t, e, pos).unwrap();
        }

        let gain_small = small.peek(&s, probe, s.len()).unwrap() - small.value(&s);
        let gain_big = big.peek(&t, probe, t.len()).unwrap() - big.value(&t);
        prop_assert!(gain_small >= gain_big - 1e-9);
    }

    #[test]
    fn history_grows_monotonically(
        (dim, data) in numeric_dataset(),
        slots in prop::collection::vec(0usize..100, 1..12),
    ) {
        let mut oracle = GaussianKernelOracle::new(dim);
        oracle.enable_history();
        let mut s = Summary::new();

        for (e, slot) in data.iter().zip(slots.iter()) {
            let pos = slot % (s.len() + 1); // any valid append/replace slot
            let len_before = oracle.history().len();
            let val_before = oracle.history_value();
            oracle.apply(&mut s, e, pos).unwrap();
            prop_assert_eq!(oracle.history().len(), len_before + 1);
            prop_assert!(oracle.history_value() >= val_before - 1e-9);
        }

        // ids in A are strictly increasing (arrival order)
        let hist_ids: Vec<usize> = oracle.history().iter().map(|e| e.id.as_usize()).collect();
        prop_assert!(hist_ids.windows(2).all(|w| w[0] < w[1]));
    }
}
