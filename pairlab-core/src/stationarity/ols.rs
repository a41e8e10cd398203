//! Ordinary least squares for the unit-root regressions.
//!
//! Solved through the Cholesky factor of X'X. Degenerate spreads surface here
//! as "not computable" instead of producing garbage coefficients:
//!
//! - a column that is (numerically) a combination of earlier columns makes
//!   the design singular;
//! - residuals that vanish against the response make the fit exact, and
//!   t-values of an exact fit are ratios of round-off.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Smallest share of a column's squared norm that earlier columns may leave
/// unexplained (the squared Cholesky pivot over the X'X diagonal).
const COLLINEARITY_TOLERANCE: f64 = 1e-10;

/// Largest `ssr / y'y` still treated as an exact fit.
const EXACT_FIT_TOLERANCE: f64 = 1e-16;

#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum OlsError {
    #[error("{nobs} observations leave no residual degrees of freedom for {k} regressors")]
    NoDegreesOfFreedom { nobs: usize, k: usize },

    #[error("singular regression")]
    Singular,

    #[error("regression fits exactly; residual variance is zero")]
    ExactFit,
}

#[derive(Debug, Clone)]
pub(crate) struct OlsFit {
    pub params: DVector<f64>,
    pub std_errors: DVector<f64>,
    pub residuals: DVector<f64>,
    pub ssr: f64,
    pub nobs: usize,
}

impl OlsFit {
    /// Number of estimated parameters (constant included).
    pub fn k(&self) -> usize {
        self.params.len()
    }

    pub fn t_value(&self, i: usize) -> f64 {
        self.params[i] / self.std_errors[i]
    }

    /// Gaussian log-likelihood at the ML variance estimate `ssr / nobs`.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k() as f64
    }

    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood() + self.k() as f64 * (self.nobs as f64).ln()
    }
}

/// Fit `y = X b + e`.
pub(crate) fn fit(y: &DVector<f64>, x: &DMatrix<f64>) -> Result<OlsFit, OlsError> {
    let (nobs, k) = x.shape();
    if nobs <= k || y.len() != nobs {
        return Err(OlsError::NoDegreesOfFreedom { nobs, k });
    }

    let xt = x.transpose();
    let xtx = &xt * x;
    let diag = xtx.diagonal();
    let chol = xtx.cholesky().ok_or(OlsError::Singular)?;
    let pivots = chol.l_dirty().diagonal();
    if (0..k).any(|i| pivots[i] * pivots[i] <= COLLINEARITY_TOLERANCE * diag[i]) {
        return Err(OlsError::Singular);
    }
    let xtx_inv = chol.inverse();
    let params = &xtx_inv * (&xt * y);

    let residuals = y - x * &params;
    let ssr = residuals.norm_squared();
    if ssr <= EXACT_FIT_TOLERANCE * y.norm_squared() {
        return Err(OlsError::ExactFit);
    }
    let s2 = ssr / (nobs - k) as f64;
    let std_errors = DVector::from_iterator(k, (0..k).map(|i| (s2 * xtx_inv[(i, i)]).sqrt()));

    Ok(OlsFit {
        params,
        std_errors,
        residuals,
        ssr,
        nobs,
    })
}
