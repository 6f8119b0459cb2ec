//! Ordinary least squares.
//!
//! The forecaster fits a single-feature trend:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2
//! ```
//!
//! We build the `[1, x]` design matrix and solve it with SVD, which handles tall
//! systems (many rows, two columns) without forming the normal equations.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)

use nalgebra::{DMatrix, DVector};

use crate::domain::LinearFit;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = intercept + slope * x`.
///
/// Returns `None` when the inputs differ in length, contain fewer than two distinct
/// `x` values (the slope is undefined), or contain non-finite numbers.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return None;
    }

    let first = xs[0];
    if xs.iter().all(|&x| x == first) {
        return None;
    }

    let n = xs.len();
    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { xs[row] });
    let target = DVector::from_column_slice(ys);

    let beta = solve_least_squares(&design, &target)?;
    Some(LinearFit {
        intercept: beta[0],
        slope: beta[1],
    })
}
