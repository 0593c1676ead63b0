//! Least squares for the log-log demand fit.
//!
//! Each SKU needs a single straight-line regression `y = a + b·x`. We solve it on
//! centered data:
//!
//! ```text
//! b = argmin Σ ((y_i - ȳ) - b (x_i - x̄))^2
//! a = ȳ - b x̄
//! ```
//!
//! Centering makes a degenerate design (every `x_i` equal) collapse to the
//! minimum-norm answer `b = 0` instead of an arbitrary split between intercept
//! and slope.

use nalgebra::{DMatrix, DVector};

/// Intercept and slope of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    /// Coefficient of determination; `None` when `y` has no variance.
    pub r_squared: Option<f64>,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution is found.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Singular values below the tolerance are treated as zero, which yields the
    // minimum-norm solution for rank-deficient designs.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = intercept + slope·x` by ordinary least squares.
///
/// Returns `None` for mismatched or empty inputs, non-finite values, or when the
/// solver cannot produce a finite answer.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let design = DMatrix::from_iterator(n, 1, x.iter().map(|v| v - x_mean));
    let target = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));

    let beta = solve_least_squares(&design, &target)?;
    let slope = beta[0];
    let intercept = y_mean - slope * x_mean;

    let ss_tot = target.iter().map(|v| v * v).sum::<f64>();
    let r_squared = if ss_tot > 0.0 {
        let ss_res = design
            .column(0)
            .iter()
            .zip(target.iter())
            .map(|(xc, yc)| (yc - slope * xc).powi(2))
            .sum::<f64>();
        Some(1.0 - ss_res / ss_tot)
    } else {
        None
    };

    Some(LineFit {
        intercept,
        slope,
        r_squared,
    })
}
