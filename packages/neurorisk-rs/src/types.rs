use serde::{Deserialize, Serialize};

/// Time range for analysis (seconds)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

/// One input stream: a recording file plus how to read it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub file_path: String,
    #[serde(alias = "channel_list")]
    pub channels: Option<Vec<usize>>, // Channel indices (0-based)
    pub time_range: Option<TimeRange>,
    pub sampling_rate: f64,
}

/// Connectivity graph construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphParameters {
    /// Absolute correlation cutoff for keeping an edge
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Label substrings identifying the hub regions (posterior cingulate)
    #[serde(default = "default_hub_patterns")]
    pub hub_patterns: Vec<String>,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_hub_patterns() -> Vec<String> {
    vec!["Cing".to_string(), "PCC".to_string()]
}

impl Default for GraphParameters {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            hub_patterns: default_hub_patterns(),
        }
    }
}

/// Welch PSD estimation parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectralParameters {
    /// Samples per Welch segment (shrunk to the signal length when shorter)
    #[serde(default = "default_nperseg")]
    pub nperseg: usize,
}

fn default_nperseg() -> usize {
    2048
}

impl Default for SpectralParameters {
    fn default() -> Self {
        Self {
            nperseg: default_nperseg(),
        }
    }
}

/// Linear fusion weights for the two modality scores
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FusionWeights {
    pub spatial: f64,
    pub temporal: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            spatial: 0.6,
            temporal: 0.4,
        }
    }
}

/// Thresholds and weights for the heuristic risk arithmetic.
///
/// Every constant of the scoring step lives here so a config file can
/// override the clinical baselines without touching code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Healthy-baseline global efficiency
    pub baseline_efficiency: f64,
    /// Healthy-baseline average clustering
    pub baseline_clustering: f64,
    /// Hub strength below which the hub counts as disconnected
    pub hub_floor: f64,
    /// Penalty for efficiency loss (percent points)
    pub efficiency_penalty: u32,
    /// Penalty for clustering loss (percent points)
    pub clustering_penalty: u32,
    /// Penalty for hub disconnection (percent points)
    pub hub_penalty: u32,
    /// Exclusive upper bound of the seeded jitter term (percent points)
    pub jitter_span: u32,
    /// Reference efficiency for the spatial stream score
    pub spatial_reference_efficiency: f64,
    /// Reference theta/alpha ratio for the temporal stream score
    pub temporal_reference_ratio: f64,
    pub weights: FusionWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline_efficiency: 0.45,
            baseline_clustering: 0.60,
            hub_floor: 3.0,
            efficiency_penalty: 35,
            clustering_penalty: 25,
            hub_penalty: 30,
            jitter_span: 10,
            spatial_reference_efficiency: 0.5,
            temporal_reference_ratio: 0.5,
            weights: FusionWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Load a scoring config from a JSON file and validate it.
    /// Missing fields fall back to the defaults.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> crate::error::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::error::EngineError::FileNotFound(
                path.display().to_string(),
            ));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            crate::error::EngineError::ParseError(format!(
                "Scoring config {}: {}",
                path.display(),
                e
            ))
        })?;
        config
            .validate()
            .map_err(crate::error::EngineError::InvalidParameter)?;
        Ok(config)
    }

    /// Check that the config describes a usable scoring rule.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.weights.spatial < 0.0 || self.weights.temporal < 0.0 {
            return Err("Fusion weights must be non-negative".to_string());
        }
        let sum = self.weights.spatial + self.weights.temporal;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(format!("Fusion weights must sum to 1 (got {})", sum));
        }
        if self.jitter_span == 0 {
            return Err("Jitter span must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Complete unimodal (network-only) request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub source: SourceConfig,
    pub labels_path: Option<String>,
    pub confounds_path: Option<String>,
    #[serde(default)]
    pub graph: GraphParameters,
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// RNG seed for the jitter term; same seed + same input = same score
    #[serde(default)]
    pub seed: u64,
}

/// Complete EEG-only spectral request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralRequest {
    pub source: SourceConfig,
    #[serde(default)]
    pub spectral: SpectralParameters,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Complete dual-stream fusion request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionRequest {
    pub fmri: SourceConfig,
    pub eeg: SourceConfig,
    pub labels_path: Option<String>,
    pub confounds_path: Option<String>,
    #[serde(default)]
    pub graph: GraphParameters,
    #[serde(default)]
    pub spectral: SpectralParameters,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Graph-theoretic biomarkers of the functional connectome
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NetworkBiomarkers {
    pub global_efficiency: f64,
    pub average_clustering: f64,
    pub density: f64,
    pub hub_strength: f64,
}

/// Band powers and the theta/alpha ratio from the Welch PSD
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectralBiomarkers {
    pub delta_power: f64,
    pub theta_power: f64,
    pub alpha_power: f64,
    pub beta_power: f64,
    pub theta_alpha_ratio: f64,
}

/// Risk banding on the 0-100 percent scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Monitor,
    High,
}

impl RiskCategory {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 40.0 {
            Self::Low
        } else if percent < 70.0 {
            Self::Monitor
        } else {
            Self::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Monitor => "Monitor",
            Self::High => "High Risk",
        }
    }
}

/// Unimodal network risk report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkReport {
    pub id: String,
    pub file_path: String,
    pub labels: Vec<String>,
    pub biomarkers: NetworkBiomarkers,
    /// Thresholded adjacency source: |r| matrix, row-major [n × n]
    pub connectivity_matrix: Vec<Vec<f64>>,
    pub risk_percent: u32,
    pub category: RiskCategory,
    pub seed: u64,
    pub created_at: String,
}

/// EEG-only spectral report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralReport {
    pub id: String,
    pub file_path: String,
    pub biomarkers: SpectralBiomarkers,
    pub psd_freqs: Vec<f64>,
    pub psd_power: Vec<f64>,
    pub temporal_risk: f64,
    pub created_at: String,
}

/// Dual-stream fusion report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionReport {
    pub id: String,
    pub fmri_path: String,
    pub eeg_path: String,
    pub labels: Vec<String>,
    pub network: NetworkBiomarkers,
    pub spectral: SpectralBiomarkers,
    pub connectivity_matrix: Vec<Vec<f64>>,
    pub psd_freqs: Vec<f64>,
    pub psd_power: Vec<f64>,
    /// fMRI stream score in [0, 1]
    pub spatial_risk: f64,
    /// EEG stream score in [0, 1]
    pub temporal_risk: f64,
    /// Weighted combination in [0, 1]
    pub fused_risk: f64,
    pub category: RiskCategory,
    pub weights: FusionWeights,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_scoring_config_rejects_bad_weights() {
        let mut cfg = ScoringConfig::default();
        cfg.weights.spatial = 0.9;
        assert!(cfg.validate().is_err());

        cfg.weights = FusionWeights {
            spatial: -0.2,
            temporal: 1.2,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_risk_category_banding() {
        assert_eq!(RiskCategory::from_percent(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_percent(39.9), RiskCategory::Low);
        assert_eq!(RiskCategory::from_percent(40.0), RiskCategory::Monitor);
        assert_eq!(RiskCategory::from_percent(69.9), RiskCategory::Monitor);
        assert_eq!(RiskCategory::from_percent(70.0), RiskCategory::High);
        assert_eq!(RiskCategory::from_percent(99.0), RiskCategory::High);
    }

    #[test]
    fn test_graph_parameter_defaults() {
        let params = GraphParameters::default();
        assert_eq!(params.threshold, 0.5);
        assert!(params.hub_patterns.iter().any(|p| p == "Cing"));
        assert!(params.hub_patterns.iter().any(|p| p == "PCC"));
    }

    #[test]
    fn test_scoring_config_deserializes_partial_json() {
        let cfg: ScoringConfig = serde_json::from_str(r#"{"baseline_efficiency": 0.4}"#).unwrap();
        assert_eq!(cfg.baseline_efficiency, 0.4);
        assert_eq!(cfg.baseline_clustering, 0.60);
        assert_eq!(cfg.weights.spatial, 0.6);
    }

    #[test]
    fn test_scoring_config_from_json_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"hub_floor": 2.0}"#).unwrap();
        file.flush().unwrap();

        let cfg = ScoringConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.hub_floor, 2.0);
        assert_eq!(cfg.efficiency_penalty, 35);

        assert!(ScoringConfig::from_json_file("/nonexistent/config.json").is_err());
    }
}
