//! Online threshold policies
//!
//! Both policies gate arrivals on the weighted mass of the summary's
//! tagged marginals: an element whose append marginal Δ falls below
//! `β·τ/k` is skipped outright; an accepted one appends while |S| < k and
//! otherwise replaces the tail (the weakest tag after the last reorder).
//! After every accept the summary is re-sorted by descending tag and
//!
//! ```text
//! τ = Σ_i (1+α)^i · fdelta(S[i])
//! ```
//!
//! is recomputed, so far-down (weak) tags weigh exponentially more in the
//! admission bar.
//!
//! The two variants differ only in how the relaxation α evolves:
//!
//! - **Adaptive**: α interpolates from η at |S| = 0 up to `r·η` at
//!   |S| = k on the schedule
//!   `α = min(exp(|S|^e · ln r / k^e) · η, 1)` with
//!   `e = ln(ln k / ln 1.2) / ln 2`, and β is re-derived from the live α
//!   after each accept.
//! - **Non-adaptive**: α is pinned to `min(r·η, 1)` (the adaptive
//!   schedule's endpoint) at construction and β is computed once.
//!
//! η is the positive root of `(1+x)^(k+1) = kx + x + 2`, tabulated for
//! k ∈ {10, 20, …, 150}; construction for other k fails.

use crate::element::Element;
use crate::oracle::{Oracle, Summary};
use crate::select::{SelectError, Selector, SelectorState};

/// Tabulated η per k: the positive root of `(1+x)^(k+1) = kx + x + 2`.
const ETA_BY_K: &[(usize, f64)] = &[
    (10, 0.112823),
    (20, 0.0568559),
    (30, 0.0380041),
    (40, 0.0285408),
    (50, 0.0228508),
    (60, 0.0190525),
    (70, 0.0163369),
    (80, 0.0142988),
    (90, 0.0127129),
    (100, 0.0114436),
    (110, 0.0104048),
    (120, 0.0095389),
    (130, 0.00880604),
    (140, 0.00817776),
    (150, 0.00763315),
];

fn eta_for(k: usize) -> Option<f64> {
    ETA_BY_K.iter().find(|(kk, _)| *kk == k).map(|(_, e)| *e)
}

#[inline]
fn beta_from(alpha: f64, k: usize) -> f64 {
    (1.0 + k as f64 * alpha) / ((1.0 + alpha).powi(k as i32) - 1.0)
}

/// τ over the (already reordered) summary for relaxation `alpha`.
fn tau_over(summary: &Summary, alpha: f64) -> f64 {
    summary
        .iter()
        .enumerate()
        .map(|(i, e)| (1.0 + alpha).powi(i as i32) * e.fdelta)
        .sum()
}

/// Online policy with an adaptive relaxation schedule.
#[derive(Debug)]
pub struct OnlineAdaptive<O: Oracle> {
    state: SelectorState<O>,
    r: f64,
    eta: f64,
    beta: f64,
    tau: f64,
}

impl<O: Oracle> OnlineAdaptive<O> {
    /// Bound `k` (must be tabulated) with relaxation target `r`, over a
    /// fresh clone of `oracle`.
    pub fn new(k: usize, oracle: &O, r: f64) -> Result<Self, SelectError> {
        let eta = eta_for(k).ok_or(SelectError::UntabulatedK {
            table: "online eta",
            k,
        })?;
        Ok(Self {
            state: SelectorState::new(k, oracle),
            r,
            eta,
            beta: beta_from(eta, k),
            tau: 0.0,
        })
    }

    /// The admission factor β currently in force.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// The running weighted tag mass τ.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// The α the schedule prescribes for the current summary size.
    fn scheduled_alpha(&self) -> f64 {
        let k = self.state.k as f64;
        let exponent = ((k.ln() / 1.2f64.ln()).ln()) / 2.0f64.ln();
        let s = self.state.summary.len() as f64;
        ((s.powf(exponent) * self.r.ln() / k.powf(exponent)).exp() * self.eta).min(1.0)
    }
}

impl<O: Oracle> Selector for OnlineAdaptive<O> {
    fn name(&self) -> &'static str {
        "OnlineAdaptive"
    }

    fn k(&self) -> usize {
        self.state.k
    }

    fn feed(&mut self, x: &Element) -> Result<(), SelectError> {
        let pos = self.state.summary.len();
        let delta = self.state.oracle.peek(&self.state.summary, x, pos)? - self.state.value;
        if delta < self.beta * self.tau / self.state.k as f64 {
            return Ok(());
        }
        let mut tagged = x.clone();
        tagged.fdelta = delta;

        let target = if self.state.summary.len() < self.state.k {
            self.state.summary.len()
        } else {
            self.state.summary.len() - 1
        };
        self.state.accept(&tagged, target)?;

        // the schedule reads the post-insertion |S|
        let alpha = self.scheduled_alpha();
        self.beta = beta_from(alpha, self.state.k);
        self.state
            .oracle
            .reorder_by_marginal(&mut self.state.summary);
        self.tau = tau_over(&self.state.summary, alpha);
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

/// Online policy with the relaxation pinned at construction.
#[derive(Debug)]
pub struct OnlineNonAdaptive<O: Oracle> {
    state: SelectorState<O>,
    alpha: f64,
    beta: f64,
    tau: f64,
}

impl<O: Oracle> OnlineNonAdaptive<O> {
    /// Bound `k` (must be tabulated) with fixed relaxation
    /// `α = min(r·η, 1)`, over a fresh clone of `oracle`.
    pub fn new(k: usize, oracle: &O, r: f64) -> Result<Self, SelectError> {
        let eta = eta_for(k).ok_or(SelectError::UntabulatedK {
            table: "online eta",
            k,
        })?;
        let alpha = (r * eta).min(1.0);
        Ok(Self {
            state: SelectorState::new(k, oracle),
            alpha,
            beta: beta_from(alpha, k),
            tau: 0.0,
        })
    }

    /// The fixed relaxation α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl<O: Oracle> Selector for OnlineNonAdaptive<O> {
    fn name(&self) -> &'static str {
        "OnlineNonAdaptive"
    }

    fn k(&self) -> usize {
        self.state.k
    }

    fn feed(&mut self, x: &Element) -> Result<(), SelectError> {
        let pos = self.state.summary.len();
        let delta = self.state.oracle.peek(&self.state.summary, x, pos)? - self.state.value;
        if delta < self.beta * self.tau / self.state.k as f64 {
            return Ok(());
        }
        let mut tagged = x.clone();
        tagged.fdelta = delta;

        let target = if self.state.summary.len() < self.state.k {
            self.state.summary.len()
        } else {
            self.state.summary.len() - 1
        };
        self.state.accept(&tagged, target)?;
        self.state
            .oracle
            .reorder_by_marginal(&mut self.state.summary);
        self.tau = tau_over(&self.state.summary, self.alpha);
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
