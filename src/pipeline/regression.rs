//! Ordinary least squares without an intercept, plus optional backward elimination
//!
//! The fit solves the normal equations `XᵀX β = Xᵀy` through a Cholesky
//! factorisation. Because no constant column is added, R² and the
//! F-statistic are the uncentered variants (`1 - RSS / Σy²`).

use faer::prelude::*;
use faer::{Mat, Side};
use polars::prelude::{DataFrame, DataType};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use thiserror::Error;

/// Variance inflation above which a predictor is treated as a linear
/// combination of the others.
const MAX_VARIANCE_INFLATION: f64 = 1e10;

/// Confidence level for coefficient intervals.
const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("no predictor columns left to regress on")]
    NoPredictors,

    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("column '{column}' must be numeric, found {dtype}")]
    NonNumericColumn { column: String, dtype: String },

    #[error("only {rows} complete row(s) for {params} parameter(s); need more rows than parameters")]
    InsufficientRows { rows: usize, params: usize },

    #[error("design matrix is rank deficient (collinear predictor: {column})")]
    RankDeficient { column: String },

    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Estimate and inference for one predictor
#[derive(Debug, Clone, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl Coefficient {
    /// True when the p-value is defined and at most `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        !self.p_value.is_nan() && self.p_value <= alpha
    }
}

/// Result of an OLS fit
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    pub response: String,
    pub coefficients: Vec<Coefficient>,
    /// Rows used in the fit.
    pub n_obs: usize,
    /// Rows excluded for a missing response or predictor.
    pub n_dropped: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub durbin_watson: f64,
    pub rss: f64,
}

impl OlsFit {
    pub fn predictors(&self) -> Vec<&str> {
        self.coefficients.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    /// Predictors whose p-value exceeds `alpha` (or is undefined).
    pub fn insignificant(&self, alpha: f64) -> Vec<&Coefficient> {
        self.coefficients
            .iter()
            .filter(|c| !c.is_significant(alpha))
            .collect()
    }
}

/// A predictor removed during backward elimination
#[derive(Debug, Clone, Serialize)]
pub struct EliminationStep {
    pub predictor: String,
    pub p_value: f64,
}

/// Final fit after backward elimination and the removal history.
#[derive(Debug, Clone)]
pub struct Elimination {
    pub fit: OlsFit,
    pub removed: Vec<EliminationStep>,
}

/// Fit `response ~ predictors` by OLS with no intercept.
///
/// Rows with a missing (null or non-finite) value in the response or in any
/// predictor are excluded.
pub fn fit_ols(
    df: &DataFrame,
    response: &str,
    predictors: &[String],
) -> Result<OlsFit, RegressionError> {
    if predictors.is_empty() {
        return Err(RegressionError::NoPredictors);
    }

    let (x, y, dropped) = design_matrix(df, response, predictors)?;
    let n = x.nrows();
    let p = x.ncols();

    if n <= p {
        return Err(RegressionError::InsufficientRows { rows: n, params: p });
    }

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;

    let cholesky = xtx
        .cholesky(Side::Lower)
        .map_err(|_| RegressionError::RankDeficient {
            column: most_collinear(&xtx, predictors),
        })?;
    let xtx_inv = cholesky.solve(&Mat::<f64>::identity(p, p));

    for (j, name) in predictors.iter().enumerate() {
        let inv_jj = xtx_inv[(j, j)];
        let inflation = xtx[(j, j)] * inv_jj;
        if !inv_jj.is_finite() || inv_jj <= 0.0 || inflation > MAX_VARIANCE_INFLATION {
            return Err(RegressionError::RankDeficient {
                column: name.clone(),
            });
        }
    }

    let beta = cholesky.solve(&xty);
    let fitted = &x * &beta;

    let residuals: Vec<f64> = (0..n).map(|i| y[(i, 0)] - fitted[(i, 0)]).collect();
    let rss: f64 = residuals.iter().map(|e| e * e).sum();
    let tss: f64 = (0..n).map(|i| y[(i, 0)] * y[(i, 0)]).sum();

    let n_f = n as f64;
    let p_f = p as f64;
    let df_resid = n - p;
    let df_resid_f = df_resid as f64;

    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };
    let adj_r_squared = 1.0 - (n_f / df_resid_f) * (1.0 - r_squared);
    let sigma2 = rss / df_resid_f;

    let t_dist = StudentsT::new(0.0, 1.0, df_resid_f)
        .map_err(|e| RegressionError::Distribution(e.to_string()))?;
    let t_crit = t_dist.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);

    let coefficients: Vec<Coefficient> = predictors
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let estimate = beta[(j, 0)];
            let std_error = (sigma2 * xtx_inv[(j, j)]).sqrt();
            let t_statistic = estimate / std_error;
            let p_value = if t_statistic.is_nan() {
                f64::NAN
            } else {
                (2.0 * t_dist.sf(t_statistic.abs())).min(1.0)
            };
            Coefficient {
                name: name.clone(),
                estimate,
                std_error,
                t_statistic,
                p_value,
                ci_lower: estimate - t_crit * std_error,
                ci_upper: estimate + t_crit * std_error,
            }
        })
        .collect();

    let f_statistic = ((tss - rss) / p_f) / (rss / df_resid_f);
    let f_dist = FisherSnedecor::new(p_f, df_resid_f)
        .map_err(|e| RegressionError::Distribution(e.to_string()))?;
    let f_p_value = if f_statistic.is_nan() {
        f64::NAN
    } else {
        f_dist.sf(f_statistic)
    };

    let log_likelihood =
        -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + (rss / n_f).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * p_f;
    let bic = -2.0 * log_likelihood + p_f * n_f.ln();

    let durbin_watson = residuals
        .windows(2)
        .map(|w| (w[1] - w[0]).powi(2))
        .sum::<f64>()
        / rss;

    Ok(OlsFit {
        response: response.to_string(),
        coefficients,
        n_obs: n,
        n_dropped: dropped,
        df_model: p,
        df_resid,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        log_likelihood,
        aic,
        bic,
        durbin_watson,
        rss,
    })
}

/// Repeatedly drop the least significant predictor above `alpha` and refit.
///
/// Stops when every remaining p-value is `<= alpha` or one predictor is left.
/// An undefined p-value counts as least significant.
pub fn backward_eliminate(
    df: &DataFrame,
    response: &str,
    predictors: &[String],
    alpha: f64,
) -> Result<Elimination, RegressionError> {
    let mut current: Vec<String> = predictors.to_vec();
    let mut removed = Vec::new();

    loop {
        let fit = fit_ols(df, response, &current)?;

        let worst = fit
            .coefficients
            .iter()
            .map(|c| (c, if c.p_value.is_nan() { 1.0 } else { c.p_value }))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match worst {
            Some((coef, p_value)) if p_value > alpha && current.len() > 1 => {
                log::debug!("eliminating {} (p = {:.4})", coef.name, p_value);
                removed.push(EliminationStep {
                    predictor: coef.name.clone(),
                    p_value: coef.p_value,
                });
                let name = coef.name.clone();
                current.retain(|c| *c != name);
            }
            _ => return Ok(Elimination { fit, removed }),
        }
    }
}

/// Build X (n x p) and y (n x 1) from the complete rows. Returns the count of
/// excluded rows as the third element.
fn design_matrix(
    df: &DataFrame,
    response: &str,
    predictors: &[String],
) -> Result<(Mat<f64>, Mat<f64>, usize), RegressionError> {
    let response_values = float_values(df, response)?;
    let predictor_values: Vec<Vec<Option<f64>>> = predictors
        .iter()
        .map(|name| float_values(df, name))
        .collect::<Result<_, _>>()?;

    let complete_rows: Vec<usize> = (0..df.height())
        .filter(|&i| {
            response_values[i].is_some() && predictor_values.iter().all(|col| col[i].is_some())
        })
        .collect();

    let n = complete_rows.len();
    let mut x = Mat::<f64>::zeros(n, predictors.len());
    let mut y = Mat::<f64>::zeros(n, 1);

    for (row_idx, &i) in complete_rows.iter().enumerate() {
        y[(row_idx, 0)] = response_values[i].unwrap_or_default();
        for (col_idx, col) in predictor_values.iter().enumerate() {
            x[(row_idx, col_idx)] = col[i].unwrap_or_default();
        }
    }

    Ok((x, y, df.height() - n))
}

/// Column values as f64, with nulls and non-finite values mapped to `None`.
fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, RegressionError> {
    let column = df
        .column(name)
        .map_err(|_| RegressionError::MissingColumn(name.to_string()))?;

    if !column.dtype().is_primitive_numeric() {
        return Err(RegressionError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let cast = column
        .cast(&DataType::Float64)
        .map_err(|_| RegressionError::MissingColumn(name.to_string()))?;
    let ca = cast
        .f64()
        .map_err(|_| RegressionError::MissingColumn(name.to_string()))?;

    Ok(ca
        .iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Best guess at the offending predictor when the factorisation fails outright:
/// the one with the smallest sum of squares.
fn most_collinear(xtx: &Mat<f64>, predictors: &[String]) -> String {
    (0..predictors.len())
        .min_by(|&a, &b| {
            xtx[(a, a)]
                .partial_cmp(&xtx[(b, b)])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|j| predictors[j].clone())
        .unwrap_or_default()
}
