//! Run measurement & records
//!
//! [`evaluate`] drives one selector over one dataset and captures the
//! benchmark's three axes (achieved value, wall-clock runtime, and oracle
//! queries) into a [`RunRecord`]. Records serialize to JSON for
//! machine-readable sweeps and render as the tab-separated line the
//! textual report prints.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::element::Element;
use crate::select::{SelectError, Selector};

/// Outcome of one (algorithm, k, parameter) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// Policy name.
    pub algorithm: String,
    /// Cardinality bound.
    pub k: usize,
    /// Policy parameter (c or r), when the policy has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<f64>,
    /// Final objective value f(S).
    pub value: f64,
    /// Final summary size |S| (may be below k).
    pub selected: usize,
    /// Wall-clock runtime of `run`, in seconds.
    pub runtime_secs: f64,
    /// Oracle queries spent.
    pub queries: u64,
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:\tselecting {} -> {} points",
            self.algorithm, self.k, self.selected
        )?;
        if let Some(p) = self.param {
            write!(f, " (param = {p})")?;
        }
        write!(
            f,
            "\tfval: {:.6}\truntime: {:.6}s\tqueries: {}",
            self.value, self.runtime_secs, self.queries
        )
    }
}

/// Run `selector` over `dataset`, timing the full pass.
pub fn evaluate(
    selector: &mut dyn Selector,
    dataset: &[Element],
    param: Option<f64>,
) -> Result<RunRecord, SelectError> {
    let start = Instant::now();
    selector.run(dataset)?;
    let runtime_secs = start.elapsed().as_secs_f64();
    Ok(RunRecord {
        algorithm: selector.name().to_string(),
        k: selector.k(),
        param,
        value: selector.value(),
        selected: selector.summary().len(),
        runtime_secs,
        queries: selector.queries(),
    })
}
