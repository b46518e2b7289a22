//! Spectral biomarkers: Welch PSD of the global field signal and
//! band-power ratios.

use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::SpectralBiomarkers;

/// Delta band (Hz)
pub const DELTA_BAND: (f64, f64) = (0.5, 4.0);
/// Theta band (Hz); power increases with degeneration
pub const THETA_BAND: (f64, f64) = (4.0, 8.0);
/// Alpha band (Hz); power decreases with degeneration
pub const ALPHA_BAND: (f64, f64) = (8.0, 12.0);
/// Beta band (Hz)
pub const BETA_BAND: (f64, f64) = (12.0, 30.0);

/// One-sided power spectral density estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsdEstimate {
    /// Bin center frequencies (Hz), 0..=fs/2
    pub freqs: Vec<f64>,
    /// Power density per bin (unit²/Hz)
    pub power: Vec<f64>,
    /// Hz per bin
    pub resolution: f64,
    /// Segments averaged
    pub n_segments: usize,
}

/// Welch's method: Hann window, 50% overlap, per-segment constant
/// detrend, density scaling, mean of one-sided periodograms.
///
/// `nperseg` is shrunk to the signal length when the signal is shorter.
pub fn welch_psd(signal: &[f64], sample_rate: f64, nperseg: usize) -> Result<PsdEstimate> {
    if sample_rate <= 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "Sampling rate must be positive (got {})",
            sample_rate
        )));
    }
    let nperseg = nperseg.min(signal.len());
    if nperseg < 2 {
        return Err(EngineError::InvalidParameter(format!(
            "Signal too short for PSD estimation ({} samples)",
            signal.len()
        )));
    }

    let window = hann_window(nperseg);
    let window_energy: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sample_rate * window_energy);

    let step = nperseg - nperseg / 2;
    let starts: Vec<usize> = (0..)
        .map(|i| i * step)
        .take_while(|s| s + nperseg <= signal.len())
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);
    let n_bins = nperseg / 2 + 1;

    let periodograms: Vec<Vec<f64>> = starts
        .par_iter()
        .map(|&start| {
            let segment = &signal[start..start + nperseg];
            let mean = segment.iter().sum::<f64>() / nperseg as f64;

            let mut buffer: Vec<Complex<f64>> = segment
                .iter()
                .zip(window.iter())
                .map(|(&s, &w)| Complex::new((s - mean) * w, 0.0))
                .collect();
            fft.process(&mut buffer);

            let mut power: Vec<f64> = buffer[..n_bins]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im) * scale)
                .collect();
            // One-sided: double everything except DC and (for even lengths)
            // the Nyquist bin
            let last_doubled = if nperseg % 2 == 0 {
                n_bins - 1
            } else {
                n_bins
            };
            for bin in power.iter_mut().take(last_doubled).skip(1) {
                *bin *= 2.0;
            }
            power
        })
        .collect();

    let n_segments = periodograms.len();
    let mut power = vec![0.0; n_bins];
    for periodogram in &periodograms {
        for (acc, &p) in power.iter_mut().zip(periodogram.iter()) {
            *acc += p;
        }
    }
    for p in &mut power {
        *p /= n_segments as f64;
    }

    let resolution = sample_rate / nperseg as f64;
    let freqs: Vec<f64> = (0..n_bins).map(|i| i as f64 * resolution).collect();

    log::debug!(
        "Welch PSD: {} segments of {} samples, {:.4} Hz/bin",
        n_segments,
        nperseg,
        resolution
    );

    Ok(PsdEstimate {
        freqs,
        power,
        resolution,
        n_segments,
    })
}

/// Mean PSD over bins with `lo <= f <= hi` (inclusive edges).
/// Returns 0 when no bin falls inside the band.
pub fn band_power(psd: &PsdEstimate, lo: f64, hi: f64) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (&f, &p) in psd.freqs.iter().zip(psd.power.iter()) {
        if f >= lo && f <= hi {
            sum += p;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Band powers plus the theta/alpha ratio.
pub fn spectral_biomarkers(psd: &PsdEstimate) -> SpectralBiomarkers {
    let theta_power = band_power(psd, THETA_BAND.0, THETA_BAND.1);
    let alpha_power = band_power(psd, ALPHA_BAND.0, ALPHA_BAND.1);
    let theta_alpha_ratio = if alpha_power > 0.0 {
        theta_power / alpha_power
    } else {
        0.0
    };

    log::info!("Theta/alpha ratio: {:.4}", theta_alpha_ratio);

    SpectralBiomarkers {
        delta_power: band_power(psd, DELTA_BAND.0, DELTA_BAND.1),
        theta_power,
        alpha_power,
        beta_power: band_power(psd, BETA_BAND.0, BETA_BAND.1),
        theta_alpha_ratio,
    }
}

fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos()))
        .collect()
}
