//! Crate root: public surface and harness-wide invariants
//!
//! `submax` benchmarks a family of algorithms that maintain a bounded
//! summary S (|S| ≤ k) of a streaming dataset so as to approximately
//! maximize a monotone submodular objective f, measuring each policy on
//! achieved value, runtime, and oracle-query count.
//!
//! ## Invariants (harness-wide)
//!
//! - **Uniform contracts.** Selection policies talk to objectives only
//!   through the [`Oracle`] trait (marginal values and deltas, never the
//!   oracle's caches), and the driver talks to policies only through the
//!   object-safe [`Selector`] trait.
//! - **Query accounting.** Every peek-family oracle call counts as exactly
//!   one query; `value` and `apply` are free. This convention is the work
//!   metric the benchmark reports, and every oracle preserves it.
//! - **Peek purity.** `peek*` never mutates oracle state beyond the query
//!   counter; repeated peeks return bit-identical values.
//! - **Shared-nothing units.** A selector owns a fresh oracle derived at
//!   construction (empty state, zero counters); nothing is shared between
//!   selectors, and no global mutable state exists; the only process-wide
//!   data are the compile-time α/η threshold tables.
//! - **Arrival order.** Element ids are zero-based stream positions, and
//!   streaming policies must be fed in strictly increasing id order; the
//!   replacement policies recover "arrived earlier" relations from ids.
//!
//! Failures are precise typed errors ([`OracleError`], [`SelectError`],
//! [`DatasetError`]); there is no recovery layer and no partial progress
//! is committed past an error.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Stream elements (numeric vectors or token bags) and their ids.
pub mod element;
/// Symmetric positive-definite helpers: Cholesky log-det, border, permute.
pub mod linalg;
/// The submodular-oracle abstraction: summary, trait, errors.
pub mod oracle;
/// Gaussian-kernel (log-determinant) oracle with incremental Gram upkeep.
pub mod gaussian;
/// Text-coverage oracle over word–weight aggregates.
pub mod coverage;
/// The selector abstraction: trait, shared state, errors.
pub mod select;
/// Offline greedy (batch only).
pub mod greedy;
/// Independent-set-improvement streaming policy.
pub mod independent;
/// Streaming greedy with diminishing-marginal replacement.
pub mod streaming_greedy;
/// Preemption policy with improvement threshold c.
pub mod preemption;
/// Free-disposal policy over a history-tracking oracle.
pub mod free_disposal;
/// Online adaptive / non-adaptive threshold policies.
pub mod online;
/// Dataset readers, writers, and synthetic generators.
pub mod dataset;
/// Timed evaluation and serializable run records.
pub mod report;

pub use crate::element::{Element, ElementId, Payload};
pub use crate::oracle::{Oracle, OracleError, Summary};
pub use crate::select::{SelectError, Selector, SelectorState};

pub use crate::coverage::TextCoverageOracle;
pub use crate::gaussian::GaussianKernelOracle;

pub use crate::free_disposal::FreeDisposal;
pub use crate::greedy::Greedy;
pub use crate::independent::IndependentSetImprovement;
pub use crate::online::{OnlineAdaptive, OnlineNonAdaptive};
pub use crate::preemption::Preemption;
pub use crate::streaming_greedy::StreamingGreedy;

pub use crate::dataset::DatasetError;
pub use crate::report::{evaluate, RunRecord};
