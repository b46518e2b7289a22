//! Pipeline orchestration: ingest -> connectivity -> metrics -> scoring.
//!
//! Each entry point takes a request describing the input files and
//! parameters and returns a fully populated report.

use uuid::Uuid;

use crate::connectome::{correlation_matrix, ConnectivityGraph};
use crate::error::{EngineError, Result};
use crate::ingest::{load_confounds, load_labels, Recording};
use crate::metrics::network_biomarkers;
use crate::preprocess::{regress_confounds, zscore};
use crate::scoring::{fuse, network_risk_percent, spatial_risk, temporal_risk};
use crate::spectral::{spectral_biomarkers, welch_psd};
use crate::types::*;

/// Run the unimodal network assessment.
pub fn run_network(request: &NetworkRequest) -> Result<NetworkReport> {
    request
        .scoring
        .validate()
        .map_err(EngineError::InvalidParameter)?;

    log::info!("Starting network analysis for {}", request.source.file_path);

    let recording = prepare_region_series(
        &request.source,
        request.labels_path.as_deref(),
        request.confounds_path.as_deref(),
    )?;

    let corr = correlation_matrix(&recording)?;
    let connectome =
        ConnectivityGraph::from_correlation(&corr, &recording.labels, request.graph.threshold)?;
    let biomarkers = network_biomarkers(&connectome, &request.graph.hub_patterns);

    let risk_percent = network_risk_percent(&biomarkers, &request.scoring, request.seed);
    log::info!("Network risk: {}%", risk_percent);

    Ok(NetworkReport {
        id: Uuid::new_v4().to_string(),
        file_path: request.source.file_path.clone(),
        labels: recording.labels.clone(),
        biomarkers,
        connectivity_matrix: connectome.weights,
        risk_percent,
        category: RiskCategory::from_percent(risk_percent as f64),
        seed: request.seed,
        created_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Run the EEG-only spectral assessment.
pub fn run_spectral(request: &SpectralRequest) -> Result<SpectralReport> {
    request
        .scoring
        .validate()
        .map_err(EngineError::InvalidParameter)?;

    log::info!("Starting spectral analysis for {}", request.source.file_path);

    let recording = load_stream(&request.source)?;
    let field = recording.global_field();
    let psd = welch_psd(&field, recording.sampling_rate, request.spectral.nperseg)?;
    let biomarkers = spectral_biomarkers(&psd);

    let risk = temporal_risk(biomarkers.theta_alpha_ratio, &request.scoring);

    Ok(SpectralReport {
        id: Uuid::new_v4().to_string(),
        file_path: request.source.file_path.clone(),
        biomarkers,
        psd_freqs: psd.freqs,
        psd_power: psd.power,
        temporal_risk: risk,
        created_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Run the full dual-stream diagnosis: fMRI connectome biomarkers, EEG
/// spectral biomarkers, and the weighted fusion of the two stream scores.
pub fn run_fusion(request: &FusionRequest) -> Result<FusionReport> {
    request
        .scoring
        .validate()
        .map_err(EngineError::InvalidParameter)?;

    log::info!(
        "Starting dual-stream diagnosis: fMRI={} EEG={}",
        request.fmri.file_path,
        request.eeg.file_path
    );

    // fMRI stream
    let fmri = prepare_region_series(
        &request.fmri,
        request.labels_path.as_deref(),
        request.confounds_path.as_deref(),
    )?;
    let corr = correlation_matrix(&fmri)?;
    let connectome =
        ConnectivityGraph::from_correlation(&corr, &fmri.labels, request.graph.threshold)?;
    let network = network_biomarkers(&connectome, &request.graph.hub_patterns);
    let spatial = spatial_risk(network.global_efficiency, &request.scoring);

    // EEG stream
    let eeg = load_stream(&request.eeg)?;
    let field = eeg.global_field();
    let psd = welch_psd(&field, eeg.sampling_rate, request.spectral.nperseg)?;
    let spectral = spectral_biomarkers(&psd);
    let temporal = temporal_risk(spectral.theta_alpha_ratio, &request.scoring);

    // Fusion
    let fused = fuse(spatial, temporal, &request.scoring.weights);
    log::info!(
        "Stream scores: spatial={:.4} temporal={:.4} fused={:.4}",
        spatial,
        temporal,
        fused
    );

    Ok(FusionReport {
        id: Uuid::new_v4().to_string(),
        fmri_path: request.fmri.file_path.clone(),
        eeg_path: request.eeg.file_path.clone(),
        labels: fmri.labels.clone(),
        network,
        spectral,
        connectivity_matrix: connectome.weights,
        psd_freqs: psd.freqs,
        psd_power: psd.power,
        spatial_risk: spatial,
        temporal_risk: temporal,
        fused_risk: fused,
        category: RiskCategory::from_percent(fused * 100.0),
        weights: request.scoring.weights,
        created_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Load one stream and apply channel selection and cropping.
fn load_stream(source: &SourceConfig) -> Result<Recording> {
    let mut recording = Recording::from_ascii(&source.file_path, source.sampling_rate)?;
    if let Some(ref channels) = source.channels {
        recording.select_channels(channels)?;
    }
    if let Some(range) = source.time_range {
        recording.crop(range)?;
    }
    Ok(recording)
}

/// Load the fMRI region series and run the preprocessing the connectome
/// expects: optional label override, confound regression, z-scoring.
fn prepare_region_series(
    source: &SourceConfig,
    labels_path: Option<&str>,
    confounds_path: Option<&str>,
) -> Result<Recording> {
    let mut recording = load_stream(source)?;

    if let Some(path) = labels_path {
        let labels = load_labels(path)?;
        if labels.len() != recording.n_channels() {
            return Err(EngineError::InvalidParameter(format!(
                "Label file has {} labels but recording has {} channels",
                labels.len(),
                recording.n_channels()
            )));
        }
        recording.labels = labels;
    }

    if let Some(path) = confounds_path {
        let confounds = load_confounds(path)?;
        regress_confounds(&mut recording, &confounds)?;
    }

    zscore(&mut recording);
    Ok(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_matrix(rows: &[Vec<f64>]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for row in rows {
            let line: Vec<String> = row.iter().map(|v| format!("{:.8}", v)).collect();
            writeln!(file, "{}", line.join(",")).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn correlated_series(n_samples: usize, n_regions: usize) -> Vec<Vec<f64>> {
        // All regions follow one slow oscillation with tiny phase offsets,
        // giving a densely connected graph
        (0..n_samples)
            .map(|t| {
                (0..n_regions)
                    .map(|r| (t as f64 * 0.21 + r as f64 * 0.01).sin())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_run_network_on_coherent_series() {
        let file = write_matrix(&correlated_series(300, 6));
        let request = NetworkRequest {
            source: SourceConfig {
                file_path: file.path().to_string_lossy().into_owned(),
                channels: None,
                time_range: None,
                sampling_rate: 0.5,
            },
            labels_path: None,
            confounds_path: None,
            graph: GraphParameters::default(),
            scoring: ScoringConfig::default(),
            seed: 0,
        };

        let report = run_network(&request).unwrap();
        assert_eq!(report.labels.len(), 6);
        assert_eq!(report.connectivity_matrix.len(), 6);
        // Near-identical series: dense graph, maximal integration
        assert!(report.biomarkers.global_efficiency > 0.9);
        assert!(report.biomarkers.density > 0.9);
        assert!(report.risk_percent <= 99);
    }

    #[test]
    fn test_run_network_is_reproducible() {
        let file = write_matrix(&correlated_series(200, 4));
        let request = NetworkRequest {
            source: SourceConfig {
                file_path: file.path().to_string_lossy().into_owned(),
                channels: None,
                time_range: None,
                sampling_rate: 0.5,
            },
            labels_path: None,
            confounds_path: None,
            graph: GraphParameters::default(),
            scoring: ScoringConfig::default(),
            seed: 123,
        };

        let a = run_network(&request).unwrap();
        let b = run_network(&request).unwrap();
        assert_eq!(a.risk_percent, b.risk_percent);
        assert_eq!(a.biomarkers.global_efficiency, b.biomarkers.global_efficiency);
    }

    #[test]
    fn test_run_network_missing_file() {
        let request = NetworkRequest {
            source: SourceConfig {
                file_path: "/nonexistent/series.csv".to_string(),
                channels: None,
                time_range: None,
                sampling_rate: 1.0,
            },
            labels_path: None,
            confounds_path: None,
            graph: GraphParameters::default(),
            scoring: ScoringConfig::default(),
            seed: 0,
        };
        assert!(matches!(
            run_network(&request),
            Err(EngineError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_run_spectral_theta_signal() {
        let sample_rate = 128.0;
        let rows: Vec<Vec<f64>> = (0..4096)
            .map(|i| {
                let t = i as f64 / sample_rate;
                vec![(2.0 * std::f64::consts::PI * 6.0 * t).sin()]
            })
            .collect();
        let file = write_matrix(&rows);

        let request = SpectralRequest {
            source: SourceConfig {
                file_path: file.path().to_string_lossy().into_owned(),
                channels: None,
                time_range: None,
                sampling_rate: sample_rate,
            },
            spectral: SpectralParameters::default(),
            scoring: ScoringConfig::default(),
        };

        let report = run_spectral(&request).unwrap();
        assert!(report.biomarkers.theta_alpha_ratio > 1.0);
        assert!(report.temporal_risk > 0.0);
        assert_eq!(report.psd_freqs.len(), report.psd_power.len());
    }

    #[test]
    fn test_run_fusion_end_to_end() {
        let fmri_file = write_matrix(&correlated_series(300, 5));
        let sample_rate = 128.0;
        let eeg_rows: Vec<Vec<f64>> = (0..4096)
            .map(|i| {
                let t = i as f64 / sample_rate;
                vec![
                    (2.0 * std::f64::consts::PI * 10.0 * t).sin(),
                    (2.0 * std::f64::consts::PI * 10.0 * t).cos(),
                ]
            })
            .collect();
        let eeg_file = write_matrix(&eeg_rows);

        let request = FusionRequest {
            fmri: SourceConfig {
                file_path: fmri_file.path().to_string_lossy().into_owned(),
                channels: None,
                time_range: None,
                sampling_rate: 0.5,
            },
            eeg: SourceConfig {
                file_path: eeg_file.path().to_string_lossy().into_owned(),
                channels: None,
                time_range: None,
                sampling_rate: sample_rate,
            },
            labels_path: None,
            confounds_path: None,
            graph: GraphParameters::default(),
            spectral: SpectralParameters::default(),
            scoring: ScoringConfig::default(),
        };

        let report = run_fusion(&request).unwrap();
        // Coherent fMRI graph: high efficiency, so no spatial risk.
        // Alpha-dominant EEG: low ratio, so no temporal risk.
        assert_eq!(report.spatial_risk, 0.0);
        assert_eq!(report.temporal_risk, 0.0);
        assert_eq!(report.fused_risk, 0.0);
        assert_eq!(report.category, RiskCategory::Low);

        let expected = 0.6 * report.spatial_risk + 0.4 * report.temporal_risk;
        assert!((report.fused_risk - expected).abs() < 1e-12);
    }

    #[test]
    fn test_run_fusion_rejects_invalid_weights() {
        let mut scoring = ScoringConfig::default();
        scoring.weights.spatial = 0.9; // sums to 1.3
        let request = FusionRequest {
            fmri: SourceConfig {
                file_path: "a.csv".to_string(),
                channels: None,
                time_range: None,
                sampling_rate: 1.0,
            },
            eeg: SourceConfig {
                file_path: "b.csv".to_string(),
                channels: None,
                time_range: None,
                sampling_rate: 1.0,
            },
            labels_path: None,
            confounds_path: None,
            graph: GraphParameters::default(),
            spectral: SpectralParameters::default(),
            scoring,
        };
        assert!(matches!(
            run_fusion(&request),
            Err(EngineError::InvalidParameter(_))
        ));
    }
}
