//! Heuristic risk arithmetic: penalty-based network score, per-stream
//! scores, and the fixed-weight fusion.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{FusionWeights, NetworkBiomarkers, ScoringConfig};

/// Unimodal network risk on the 0-99 percent scale.
///
/// Fixed penalties accrue for each biomarker below its healthy baseline,
/// plus a seeded jitter term standing in for classifier uncertainty.
/// Same biomarkers + same seed always produce the same score.
pub fn network_risk_percent(
    biomarkers: &NetworkBiomarkers,
    config: &ScoringConfig,
    seed: u64,
) -> u32 {
    let mut score = 0u32;

    if biomarkers.global_efficiency < config.baseline_efficiency {
        score += config.efficiency_penalty;
    }
    if biomarkers.average_clustering < config.baseline_clustering {
        score += config.clustering_penalty;
    }
    if biomarkers.hub_strength < config.hub_floor {
        score += config.hub_penalty;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let jitter = rng.gen_range(0..config.jitter_span);

    (score + jitter).min(99)
}

/// fMRI stream score: efficiency shortfall against the healthy reference,
/// clamped to [0, 1].
pub fn spatial_risk(global_efficiency: f64, config: &ScoringConfig) -> f64 {
    ((config.spatial_reference_efficiency - global_efficiency) * 2.0).clamp(0.0, 1.0)
}

/// EEG stream score: theta/alpha excess over the healthy reference,
/// clamped to [0, 1].
pub fn temporal_risk(theta_alpha_ratio: f64, config: &ScoringConfig) -> f64 {
    (theta_alpha_ratio - config.temporal_reference_ratio).clamp(0.0, 1.0)
}

/// Weighted combination of the two stream scores.
pub fn fuse(spatial: f64, temporal: f64, weights: &FusionWeights) -> f64 {
    weights.spatial * spatial + weights.temporal * temporal
}
