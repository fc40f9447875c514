//! Preemption policy
//!
//! Fills S with the first k arrivals, then scans every slot as a
//! replacement target for each newcomer and takes the best strictly
//! positive peek. The replacement fires only when it improves the current
//! value by at least `c·f(S)/k`, one k-th of the current value scaled by
//! the aggressiveness parameter `c`.
//!
//! The scan keeps the original tie policy exactly: the running maximum
//! starts at 0 with slot 0 as the default target and only a strictly
//! greater peek moves it, so a candidate that merely matches the current
//! value never wins. Changing this shifts benchmark outputs.

use crate::element::Element;
use crate::oracle::{Oracle, Summary};
use crate::select::{SelectError, Selector, SelectorState};

/// Preemption streaming selection with improvement threshold `c`.
pub struct Preemption<O: Oracle> {
    state: SelectorState<O>,
    c: f64,
}

impl<O: Oracle> Preemption<O> {
    /// Bound `k`, threshold parameter `c`, fresh clone of `oracle`.
    pub fn new(k: usize, oracle: &O, c: f64) -> Self {
        Self {
            state: SelectorState::new(k, oracle),
            c,
        }
    }

    /// The threshold parameter.
    pub fn c(&self) -> f64 {
        self.c
    }
}

impl<O: Oracle> Selector for Preemption<O> {
    fn name(&self) -> &'static str {
        "Preemption"
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

        let mut best_val = 0.0;
        let mut best_pos = 0usize;
        for i in 0..state.k {
            let v = state.oracle.peek(&state.summary, x, i)?;
            if v > best_val {
                best_val = v;
                best_pos = i;
            }
        }

        if best_val - state.value >= self.c * state.value / state.k as f64 {
            state.accept(x, best_pos)?;
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
