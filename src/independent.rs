//! Independent-set-improvement
//!
//! Streaming policy that keeps S sorted by descending tagged marginal gain
//! (`fdelta`). Every arrival is tagged with its append marginal Δ; while
//! |S| < k it is accepted outright, afterwards it evicts the tail (the
//! incumbent with the smallest tag) only when Δ exceeds *twice* the tail's
//! tag. The factor-2 bar is what makes improvements "independent": a new
//! element must beat the weakest incumbent by enough to pay for the
//! interactions it may destroy.

use crate::element::Element;
use crate::oracle::{Oracle, Summary};
use crate::select::{SelectError, Selector, SelectorState};

/// Independent-set-improvement streaming selection.
pub struct IndependentSetImprovement<O: Oracle> {
    state: SelectorState<O>,
}

impl<O: Oracle> IndependentSetImprovement<O> {
    /// Bound `k` over a fresh clone of `oracle`.
    pub fn new(k: usize, oracle: &O) -> Self {
        Self {
            state: SelectorState::new(k, oracle),
        }
    }
}

impl<O: Oracle> Selector for IndependentSetImprovement<O> {
    fn name(&self) -> &'static str {
        "IndependentSetImprovement"
    }

    fn k(&self) -> usize {
        self.state.k
    }

    fn feed(&mut self, x: &Element) -> Result<(), SelectError> {
        let state = &mut self.state;
        let pos = state.summary.len();
        let delta = state.oracle.peek(&state.summary, x, pos)? - state.value;
        let mut tagged = x.clone();
        tagged.fdelta = delta;

        if state.summary.len() < state.k {
            state.accept(&tagged, pos)?;
            state.oracle.reorder_by_marginal(&mut state.summary);
        } else {
            let tail_tag = state
                .summary
                .last()
                .map(|e| e.fdelta)
                .unwrap_or(f64::NEG_INFINITY);
            if delta > 2.0 * tail_tag {
                let tail = state.summary.len() - 1;
                state.accept(&tagged, tail)?;
                state.oracle.reorder_by_marginal(&mut state.summary);
            }
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
