//! Signal cleaning applied before biomarker extraction: confound
//! regression and per-channel standardization.

use nalgebra::{DMatrix, DVector};

use crate::error::{EngineError, Result};
use crate::ingest::Recording;

/// Standardize every channel to mean 0 and unit sample variance (ddof=1).
///
/// Channels with zero variance become all-zero instead of NaN.
pub fn zscore(recording: &mut Recording) {
    for channel in &mut recording.data {
        let n = channel.len();
        if n < 2 {
            for v in channel.iter_mut() {
                *v = 0.0;
            }
            continue;
        }

        let mean = channel.iter().sum::<f64>() / n as f64;
        let var = channel.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);

        if var <= f64::EPSILON {
            for v in channel.iter_mut() {
                *v = 0.0;
            }
            continue;
        }

        let std = var.sqrt();
        for v in channel.iter_mut() {
            *v = (*v - mean) / std;
        }
    }
}

/// Remove confound series from every channel by ordinary least squares.
///
/// The design matrix is `[1, confounds...]`; each channel is replaced by
/// its residual after projecting onto that subspace. Confounds are
/// column-major (`confounds[regressor][sample]`) and must cover the same
/// samples as the recording.
pub fn regress_confounds(recording: &mut Recording, confounds: &[Vec<f64>]) -> Result<()> {
    if confounds.is_empty() {
        return Ok(());
    }

    let n_samples = recording.n_samples();
    for (i, regressor) in confounds.iter().enumerate() {
        if regressor.len() != n_samples {
            return Err(EngineError::InvalidParameter(format!(
                "Confound regressor {} has {} samples, recording has {}",
                i,
                regressor.len(),
                n_samples
            )));
        }
    }

    let n_regressors = confounds.len();
    if n_regressors + 1 >= n_samples {
        return Err(EngineError::InvalidParameter(format!(
            "Too many confound regressors ({}) for {} samples",
            n_regressors, n_samples
        )));
    }

    // Design matrix with intercept column
    let design = DMatrix::<f64>::from_fn(n_samples, n_regressors + 1, |row, col| {
        if col == 0 {
            1.0
        } else {
            confounds[col - 1][row]
        }
    });
    let svd = design.clone().svd(true, true);

    for channel in &mut recording.data {
        let y = DVector::<f64>::from_column_slice(channel);
        let beta = svd
            .solve(&y, 1e-12)
            .map_err(|e| EngineError::AnalysisFailed(format!("Confound regression: {}", e)))?;
        let fitted = &design * beta;
        for (v, f) in channel.iter_mut().zip(fitted.iter()) {
            *v -= f;
        }
    }

    log::info!(
        "Regressed {} confound series from {} channels",
        n_regressors,
        recording.n_channels()
    );
    Ok(())
}
