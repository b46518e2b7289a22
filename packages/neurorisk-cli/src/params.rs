use std::path::Path;

use neurorisk_rs::ingest::{is_supported_extension, SUPPORTED_EXTENSIONS};
use neurorisk_rs::{
    FusionRequest, GraphParameters, NetworkRequest, ScoringConfig, SourceConfig,
    SpectralParameters, SpectralRequest, TimeRange,
};

use crate::cli::{FuseArgs, NetworkArgs, SpectralArgs};

/// Validate a single file path: existence and supported extension.
pub fn validate_file(file_path: &str) -> Result<(), String> {
    if !Path::new(file_path).exists() {
        return Err(format!("Input file not found: {}", file_path));
    }

    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if !is_supported_extension(ext) {
        return Err(format!(
            "Unsupported file extension '{}'. Supported: {}",
            ext,
            SUPPORTED_EXTENSIONS.join(", ")
        ));
    }

    Ok(())
}

/// Validate the connectome edge threshold.
pub fn validate_threshold(threshold: f64) -> Result<(), String> {
    if !(0.0..1.0).contains(&threshold) {
        return Err(format!(
            "Correlation threshold must be in [0, 1) (got {})",
            threshold
        ));
    }
    Ok(())
}

/// Validate a sampling rate.
pub fn validate_sampling_rate(sampling_rate: f64) -> Result<(), String> {
    if sampling_rate <= 0.0 {
        return Err(format!(
            "Sampling rate must be positive (got {})",
            sampling_rate
        ));
    }
    Ok(())
}

/// Validate the Welch segment length.
pub fn validate_nperseg(nperseg: usize) -> Result<(), String> {
    if nperseg < 2 {
        return Err(format!(
            "Welch segment length must be at least 2 (got {})",
            nperseg
        ));
    }
    Ok(())
}

/// Load the scoring config from a JSON file, or fall back to defaults.
pub fn load_scoring_config(path: &Option<String>) -> Result<ScoringConfig, String> {
    match path {
        Some(path) => ScoringConfig::from_json_file(path).map_err(|e| e.to_string()),
        None => Ok(ScoringConfig::default()),
    }
}

/// Build a time range from optional start/end seconds.
/// Both must be given together.
pub fn time_range(start: Option<f64>, end: Option<f64>) -> Result<Option<TimeRange>, String> {
    match (start, end) {
        (Some(start), Some(end)) => {
            if end <= start {
                return Err(format!(
                    "End time ({}) must be after start time ({})",
                    end, start
                ));
            }
            Ok(Some(TimeRange { start, end }))
        }
        (None, None) => Ok(None),
        _ => Err("--start and --end must be given together".to_string()),
    }
}

fn build_source(
    file_path: &str,
    channels: &Option<Vec<usize>>,
    sampling_rate: f64,
    range: Option<TimeRange>,
) -> SourceConfig {
    SourceConfig {
        file_path: file_path.to_string(),
        channels: channels.clone(),
        time_range: range,
        sampling_rate,
    }
}

pub fn build_network_request(args: &NetworkArgs) -> Result<NetworkRequest, String> {
    validate_threshold(args.threshold)?;
    validate_sampling_rate(args.sr)?;
    let range = time_range(args.start, args.end)?;
    Ok(NetworkRequest {
        source: build_source(&args.file, &args.channels, args.sr, range),
        labels_path: args.labels.clone(),
        confounds_path: args.confounds.clone(),
        graph: GraphParameters {
            threshold: args.threshold,
            hub_patterns: args.hub_patterns.clone(),
        },
        scoring: load_scoring_config(&args.config)?,
        seed: args.seed,
    })
}

pub fn build_spectral_request(args: &SpectralArgs) -> Result<SpectralRequest, String> {
    validate_sampling_rate(args.sr)?;
    validate_nperseg(args.nperseg)?;
    let range = time_range(args.start, args.end)?;
    Ok(SpectralRequest {
        source: build_source(&args.file, &args.channels, args.sr, range),
        spectral: SpectralParameters {
            nperseg: args.nperseg,
        },
        scoring: load_scoring_config(&args.config)?,
    })
}

pub fn build_fusion_request(args: &FuseArgs) -> Result<FusionRequest, String> {
    validate_threshold(args.threshold)?;
    validate_sampling_rate(args.fmri_sr)?;
    validate_sampling_rate(args.eeg_sr)?;
    validate_nperseg(args.nperseg)?;
    let range = time_range(args.start, args.end)?;
    Ok(FusionRequest {
        fmri: build_source(&args.fmri, &args.fmri_channels, args.fmri_sr, range),
        eeg: build_source(&args.eeg, &args.eeg_channels, args.eeg_sr, range),
        labels_path: args.labels.clone(),
        confounds_path: args.confounds.clone(),
        graph: GraphParameters {
            threshold: args.threshold,
            hub_patterns: args.hub_patterns.clone(),
        },
        spectral: SpectralParameters {
            nperseg: args.nperseg,
        },
        scoring: load_scoring_config(&args.config)?,
    })
}
