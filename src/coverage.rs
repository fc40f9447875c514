//! Text-coverage oracle
//!
//! Concave-over-sum coverage for token-bag elements:
//!
//! ```text
//! f(Q) = Σ_t √( Σ_{y ∈ Q : t ∈ words(y)} weight(y) )
//! ```
//!
//! Token weights pool over records, then square-root per token, then sum;
//! this is monotone submodular. Values over arbitrary sets are recomputed from
//! scratch; only the history aggregate is cached (a token → accumulated
//! weight map folded on every apply). Accumulation order is the ordered
//! map's key order, so repeated evaluations sum identically.

use std::collections::BTreeMap;

use crate::element::Element;
use crate::oracle::{Oracle, OracleError, Summary};

/// Coverage value of an arbitrary collection of elements.
fn pooled_value<'a>(items: impl Iterator<Item = &'a Element>) -> f64 {
    let mut weights: BTreeMap<&str, f64> = BTreeMap::new();
    for e in items {
        for w in e.words() {
            *weights.entry(w.as_str()).or_insert(0.0) += e.weight();
        }
    }
    weights.values().map(|w| w.sqrt()).sum()
}

/// Token-coverage oracle over word–weight aggregates.
#[derive(Clone, Debug, Default)]
pub struct TextCoverageOracle {
    track_history: bool,
    history: Vec<Element>,
    hist_weights: BTreeMap<String, f64>,
    hist_value: f64,
    queries: u64,
}

impl TextCoverageOracle {
    /// New oracle; history tracking starts disabled.
    pub fn new() -> Self {
        Self::default()
    }

    fn fold_into(weights: &mut BTreeMap<String, f64>, x: &Element) {
        for w in x.words() {
            *weights.entry(w.clone()).or_insert(0.0) += x.weight();
        }
    }
}

impl Oracle for TextCoverageOracle {
    fn value(&self, summary: &Summary) -> f64 {
        pooled_value(summary.iter())
    }

    fn peek(&mut self, summary: &Summary, x: &Element, pos: usize) -> Result<f64, OracleError> {
        self.queries += 1;
        let n = summary.len();
        if pos > n {
            return Err(OracleError::SlotOutOfRange { pos, len: n });
        }
        if pos == n {
            Ok(pooled_value(summary.iter().chain(std::iter::once(x))))
        } else {
            Ok(pooled_value(
                summary
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != pos)
                    .map(|(_, e)| e)
                    .chain(std::iter::once(x)),
            ))
        }
    }

    fn apply(
        &mut self,
        summary: &mut Summary,
        x: &Element,
        pos: usize,
    ) -> Result<(), OracleError> {
        let n = summary.len();
        if pos > n {
            return Err(OracleError::SlotOutOfRange { pos, len: n });
        }
        summary.place(x.clone(), pos);

        if self.track_history {
            self.history.push(x.clone());
            Self::fold_into(&mut self.hist_weights, x);
            self.hist_value = self.hist_weights.values().map(|w| w.sqrt()).sum();
        }
        Ok(())
    }

    fn reorder_by_marginal(&mut self, summary: &mut Summary) {
        summary.sort_by_fdelta_desc();
    }

    fn peek_delta_history(&mut self, x: &Element) -> Result<f64, OracleError> {
        self.queries += 1;
        if !self.track_history {
            return Err(OracleError::HistoryDisabled);
        }
        let mut scratch = self.hist_weights.clone();
        Self::fold_into(&mut scratch, x);
        let after: f64 = scratch.values().map(|w| w.sqrt()).sum();
        Ok(after - self.hist_value)
    }

    fn peek_delta_older(&mut self, summary: &Summary, x: &Element) -> Result<f64, OracleError> {
        self.queries += 1;
        if !summary.contains_id(x.id) {
            return Err(OracleError::NotInSummary(x.id));
        }
        let older: Vec<&Element> = summary.iter().filter(|y| y.id < x.id).collect();
        let before = pooled_value(older.iter().copied());
        let after = pooled_value(older.iter().copied().chain(std::iter::once(x)));
        Ok(after - before)
    }

    fn fresh(&self) -> Self {
        Self {
            track_history: self.track_history,
            ..Self::default()
        }
    }

    fn enable_history(&mut self) {
        self.track_history = true;
    }

    fn history_enabled(&self) -> bool {
        self.track_history
    }

    fn history(&self) -> &[Element] {
        &self.history
    }

    fn history_value(&self) -> f64 {
        self.hist_value
    }

    fn query_count(&self) -> u64 {
        self.queries
    }
}
