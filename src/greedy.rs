//! Offline greedy
//!
//! The classic batch baseline: while |S| < k, append the element with the
//! largest append-peek over the remaining pool, first-best-wins on ties
//! (arrival order). Stops early when the best marginal gain is no longer
//! positive: a saturated objective cannot be improved by padding S.
//!
//! Greedy is not a streaming policy; `feed` is a contract violation.

use crate::element::Element;
use crate::oracle::{Oracle, Summary};
use crate::select::{SelectError, Selector, SelectorState};

/// Offline greedy selection, batch only.
pub struct Greedy<O: Oracle> {
    state: SelectorState<O>,
}

impl<O: Oracle> Greedy<O> {
    /// Greedy with bound `k` over a fresh clone of `oracle`.
    pub fn new(k: usize, oracle: &O) -> Self {
        Self {
            state: SelectorState::new(k, oracle),
        }
    }
}

impl<O: Oracle> Selector for Greedy<O> {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn k(&self) -> usize {
        self.state.k
    }

    fn feed(&mut self, _x: &Element) -> Result<(), SelectError> {
        Err(SelectError::StreamingUnsupported { algorithm: "Greedy" })
    }

    fn run(&mut self, dataset: &[Element]) -> Result<(), SelectError> {
        let state = &mut self.state;
        let mut remaining: Vec<usize> = (0..dataset.len()).collect();

        while state.summary.len() < state.k && !remaining.is_empty() {
            let pos = state.summary.len();
            let mut best_val = f64::NEG_INFINITY;
            let mut best_at = 0usize;
            for (at, &idx) in remaining.iter().enumerate() {
                let v = state.oracle.peek(&state.summary, &dataset[idx], pos)?;
                if v > best_val {
                    best_val = v;
                    best_at = at;
                }
            }
            if best_val - state.value <= 0.0 {
                break;
            }
            let idx = remaining.remove(best_at);
            state.accept(&dataset[idx], pos)?;
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
    use crate::gaussian::GaussianKernelOracle;

    #[test]
    fn feed_is_unsupported() {
        let oracle = GaussianKernelOracle::new(1);
        let mut g = Greedy::new(2, &oracle);
        let err = g.feed(&Element::numeric(0, vec![0.0])).unwrap_err();
        assert!(matches!(
            err,
            SelectError::StreamingUnsupported { algorithm: "Greedy" }
        ));
    }

    #[test]
    fn empty_input_selects_nothing() {
        let oracle = GaussianKernelOracle::new(3);
        let mut g = Greedy::new(10, &oracle);
        g.run(&[]).unwrap();
        assert_eq!(g.summary().len(), 0);
        assert_eq!(g.value(), 0.0);
        assert_eq!(g.queries(), 0);
    }

    #[test]
    fn unit_square_picks_origin_then_far_corner() {
        // dim=2, k=2: the first pick is a tie, broken by arrival order
        // (id 0); the second maximizes the determinant, i.e. the corner
        // farthest from (0,0).
        let oracle = GaussianKernelOracle::new(2);
        let dataset = vec![
            Element::numeric(0, vec![0.0, 0.0]),
            Element::numeric(1, vec![1.0, 0.0]),
            Element::numeric(2, vec![0.0, 1.0]),
            Element::numeric(3, vec![1.0, 1.0]),
        ];
        let mut g = Greedy::new(2, &oracle);
        g.run(&dataset).unwrap();

        let ids: Vec<usize> = g.summary().iter().map(|e| e.id.as_usize()).collect();
        assert_eq!(ids, vec![0, 3]);

        // ℓ = 1/(2√2) ⇒ off-diagonal a·exp(−d²/(2ℓ²)) = exp(−8) for d² = 2.
        let off = (-8.0f64).exp();
        let expect = 0.5 * (4.0 - off * off).ln();
        assert!((g.value() - expect).abs() < 1e-12);

        // first round peeks all 4, second round the remaining 3
        assert_eq!(g.queries(), 7);
    }
}
