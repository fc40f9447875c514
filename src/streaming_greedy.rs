//! Streaming greedy with replacement
//!
//! Fills S with the first k arrivals, then considers each new element as a
//! replacement for the incumbent whose *diminishing marginal*, its gain
//! against the summary members that arrived before it, is smallest. The
//! swap happens only when the newcomer's append marginal is at least twice
//! that minimum: the newcomer must be worth more than what the weakest
//! incumbent still contributes, with a factor-2 margin for the value the
//! eviction forfeits.

use crate::element::Element;
use crate::oracle::{Oracle, Summary};
use crate::select::{SelectError, Selector, SelectorState};

/// Streaming greedy with diminishing-marginal replacement.
pub struct StreamingGreedy<O: Oracle> {
    state: SelectorState<O>,
}

impl<O: Oracle> StreamingGreedy<O> {
    /// Bound `k` over a fresh clone of `oracle`.
    pub fn new(k: usize, oracle: &O) -> Self {
        Self {
            state: SelectorState::new(k, oracle),
        }
    }
}

impl<O: Oracle> Selector for StreamingGreedy<O> {
    fn name(&self) -> &'static str {
        "StreamingGreedy"
    }

    fn k(&self) -> usize {
        self.state.k
    }

    fn feed(&mut self, x: &Element) -> Result<(), SelectError> {
        let state = &mut self.state;
        if state.summary.len() < state.k {
            let pos = state.summary.len();
            state.accept(x, pos)?;
            return Ok(());
        }

        // Weakest incumbent: minimal gain against its older co-members,
        // strict-less updates so ties keep the lowest slot.
        let mut min_delta = f64::INFINITY;
        let mut min_pos = 0usize;
        for i in 0..state.summary.len() {
            let d = state
                .oracle
                .peek_delta_older(&state.summary, &state.summary[i])?;
            if i == 0 || d < min_delta {
                min_delta = d;
                min_pos = i;
            }
        }

        let delta = state.oracle.peek(&state.summary, x, state.summary.len())? - state.value;
        if delta >= 2.0 * min_delta {
            state.accept(x, min_pos)?;
        }
        Ok(())
    }

    fn summary(&self) -> &Summary {
        &self.state.summary
    }

    fn value(&self) -> f64 {
        self.state.value
    }

    fn queries(&self) -> u64 {
        self.state.oracle.query_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::TextCoverageOracle;
    use crate::element::ElementId;
    use crate::gaussian::GaussianKernelOracle;

    fn tweet(id: usize, weight: f64, words: &[&str]) -> Element {
        Element::tokens(id, weight, words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn fills_before_replacing() {
        let oracle = GaussianKernelOracle::new(1);
        let mut sel = StreamingGreedy::new(2, &oracle);
        sel.feed(&Element::numeric(0, vec![0.0])).unwrap();
        sel.feed(&Element::numeric(1, vec![1.0])).unwrap();
        assert_eq!(sel.summary().len(), 2);
        // growth phase spends no queries
        assert_eq!(sel.queries(), 0);
    }

    #[test]
    fn dominant_tweet_evicts_weakest_incumbent() {
        let oracle = TextCoverageOracle::new();
        let mut sel = StreamingGreedy::new(2, &oracle);
        sel.feed(&tweet(0, 1.0, &["a"])).unwrap();
        sel.feed(&tweet(1, 1.0, &["b"])).unwrap();
        // per-feed cost at capacity: k older-deltas + one append peek
        sel.feed(&tweet(2, 100.0, &["z"])).unwrap();
        assert_eq!(sel.queries(), 3);
        assert!(sel.summary().contains_id(ElementId(2)));
        assert_eq!(sel.summary().len(), 2);
    }

    #[test]
    fn weak_arrival_is_ignored() {
        let oracle = TextCoverageOracle::new();
        let mut sel = StreamingGreedy::new(2, &oracle);
        sel.feed(&tweet(0, 4.0, &["a"])).unwrap();
        sel.feed(&tweet(1, 4.0, &["b"])).unwrap();
        // append gain 1, both incumbents contribute 2 ⇒ 1 < 2·2
        sel.feed(&tweet(2, 1.0, &["c"])).unwrap();
        let ids: Vec<usize> = sel.summary().iter().map(|e| e.id.as_usize()).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
