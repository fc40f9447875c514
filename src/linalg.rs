//! Symmetric positive-definite matrix helpers
//!
//! The kernel oracle keeps Gram matrices that are symmetric and positive
//! definite by construction, and every update touches at most one
//! row/column. This module centralizes the three operations the oracle
//! needs on top of `ndarray`:
//!
//! - [`log_det_spd`]: `log det` via an in-place Cholesky factorization
//!   (`log det = 2·Σ log L_ii`). Raw determinants lose precision rapidly
//!   as the matrix grows; the factorized form does not. A numerically
//!   non-PD input (non-positive or non-finite pivot) yields `None`, which
//!   callers map to `-inf` so threshold comparisons reject the candidate
//!   instead of propagating NaN.
//! - [`bordered`]: extend an n×n Gram matrix by one row/column.
//! - [`permute_symmetric`]: reindex both axes by one permutation, the
//!   bookkeeping a summary reorder requires.

use ndarray::{Array2, ArrayView2};

/// `log det` of a symmetric positive-definite matrix via Cholesky.
///
/// Returns `None` when the factorization hits a non-positive or non-finite
/// pivot, i.e. the matrix is not numerically PD. The 0×0 matrix has
/// determinant 1, so its log-det is `Some(0.0)`.
///
/// Only the lower triangle of `m` is read.
pub fn log_det_spd(m: &ArrayView2<'_, f64>) -> Option<f64> {
    let n = m.nrows();
    debug_assert_eq!(n, m.ncols(), "log_det_spd needs a square matrix");

    let mut l = Array2::<f64>::zeros((n, n));
    let mut acc = 0.0;

    for j in 0..n {
        let mut diag = m[(j, j)];
        for k in 0..j {
            diag -= l[(j, k)] * l[(j, k)];
        }
        if !(diag > 0.0) || !diag.is_finite() {
            return None;
        }
        let ljj = diag.sqrt();
        l[(j, j)] = ljj;
        acc += ljj.ln();

        for i in (j + 1)..n {
            let mut v = m[(i, j)];
            for k in 0..j {
                v -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = v / ljj;
        }
    }

    Some(2.0 * acc)
}

/// Extend a symmetric matrix by one row/column.
///
/// The existing block is copied, the new off-diagonals are `border`
/// (mirrored), and the new diagonal entry is `corner`. `border.len()` must
/// equal the current size.
pub fn bordered(base: &ArrayView2<'_, f64>, border: &[f64], corner: f64) -> Array2<f64> {
    let n = base.nrows();
    debug_assert_eq!(n, base.ncols());
    debug_assert_eq!(n, border.len(), "border length must match matrix size");

    let mut out = Array2::<f64>::zeros((n + 1, n + 1));
    for i in 0..n {
        for j in 0..n {
            out[(i, j)] = base[(i, j)];
        }
    }
    for (i, &v) in border.iter().enumerate() {
        out[(i, n)] = v;
        out[(n, i)] = v;
    }
    out[(n, n)] = corner;
    out
}

/// Reindex both axes of a symmetric matrix by the same permutation:
/// `out[(i, j)] = src[(perm[i], perm[j])]`.
pub fn permute_symmetric(src: &ArrayView2<'_, f64>, perm: &[usize]) -> Array2<f64> {
    let n = perm.len();
    debug_assert_eq!(n, src.nrows());
    debug_assert_eq!(n, src.ncols());

    let mut out = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            out[(i, j)] = src[(perm[i], perm[j])];
        }
    }
    out
}
