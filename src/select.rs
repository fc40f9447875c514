//! Selector abstraction
//!
//! A selector maintains a bounded summary S (|S| ≤ k) of a stream under an
//! owned submodular oracle, deciding per element whether it enters S, where
//! it is placed, and which incumbent it may evict. Six policies implement
//! this contract (offline greedy, independent-set-improvement, streaming
//! greedy, preemption, free disposal, online adaptive/non-adaptive); each
//! lives in its own module.
//!
//! ## Contract
//!
//! - Construction takes `(k, &oracle)` plus any policy parameter and calls
//!   [`crate::oracle::Oracle::fresh`], so a selector and its oracle form a
//!   shared-nothing unit and the query counter measures this selector only.
//! - [`Selector::feed`] integrates one element; the caller feeds elements
//!   in strictly increasing id order (the replacement policies recover
//!   "arrived earlier" relations from ids).
//! - [`Selector::run`] defaults to feeding the dataset in order; the
//!   offline policy overrides it with its batch sweep and rejects `feed`.
//! - After every accepted element, the cached value equals
//!   `oracle.value(summary)`.
//!
//! The trait is object-safe: the driver sweeps heterogeneous policies as
//! `Box<dyn Selector>` without seeing the oracle's concrete form.

use crate::element::Element;
use crate::oracle::{Oracle, OracleError, Summary};

/// Errors surfaced by selector construction and streaming.
///
/// All of them are configuration or contract violations; selection itself
/// has no recoverable errors, and oracle errors pass through untranslated.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// `feed` on a policy that only supports batch `run`.
    #[error("{algorithm} does not support streaming; use run()")]
    StreamingUnsupported {
        /// Offending policy name.
        algorithm: &'static str,
    },
    /// A threshold constant is not tabulated for the requested k.
    #[error("no tabulated {table} constant for k = {k}")]
    UntabulatedK {
        /// Which table missed.
        table: &'static str,
        /// Requested cardinality bound.
        k: usize,
    },
    /// An oracle contract violation, propagated unchanged.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// A subset-selection policy over an owned oracle.
pub trait Selector {
    /// Human-readable policy name for reports.
    fn name(&self) -> &'static str;

    /// Cardinality bound k.
    fn k(&self) -> usize;

    /// Integrate one streamed element (in arrival order).
    fn feed(&mut self, x: &Element) -> Result<(), SelectError>;

    /// Process a whole dataset. Streaming policies feed each element in
    /// order; the offline policy replaces this with its batch sweep.
    fn run(&mut self, dataset: &[Element]) -> Result<(), SelectError> {
        for x in dataset {
            self.feed(x)?;
        }
        Ok(())
    }

    /// The current summary, by reference.
    fn summary(&self) -> &Summary;

    /// f(S) for the current summary.
    fn value(&self) -> f64;

    /// Oracle queries spent so far by this selector.
    fn queries(&self) -> u64;
}

/// State every policy carries: the bound, the owned oracle clone, the
/// summary, and the cached objective value.
#[derive(Debug)]
pub struct SelectorState<O: Oracle> {
    /// Cardinality bound.
    pub k: usize,
    /// Owned oracle, freshly derived at construction.
    pub oracle: O,
    /// Current summary S.
    pub summary: Summary,
    /// Cached f(S), refreshed after every accepted element.
    pub value: f64,
}

impl<O: Oracle> SelectorState<O> {
    /// Derive a fresh oracle from `prototype` and start with an empty
    /// summary.
    pub fn new(k: usize, prototype: &O) -> Self {
        Self {
            k,
            oracle: prototype.fresh(),
            summary: Summary::new(),
            value: 0.0,
        }
    }

    /// Apply `x` at `pos` and refresh the cached value.
    pub fn accept(&mut self, x: &Element, pos: usize) -> Result<(), SelectError> {
        self.oracle.apply(&mut self.summary, x, pos)?;
        self.value = self.oracle.value(&self.summary);
        Ok(())
    }
}
