use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "neurorisk",
    version,
    about = "Dual-stream neuro-diagnostic risk assessment command-line tool",
    long_about = "Derive connectome and spectral biomarkers from fMRI region time series\n\
                  and EEG recordings (ASCII/CSV matrices, rows = samples), and fuse them\n\
                  into a heuristic risk score."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full dual-stream diagnosis (fMRI + EEG)
    Fuse(FuseArgs),
    /// Run the unimodal network assessment on one recording
    Network(NetworkArgs),
    /// Run the EEG-only spectral assessment
    Spectral(SpectralArgs),
    /// Validate a data file
    Validate(ValidateArgs),
    /// Show version, platform, and default parameters
    Info(InfoArgs),
}

#[derive(Args)]
pub struct FuseArgs {
    /// fMRI region time-series file (ASCII/CSV, rows = samples)
    #[arg(long)]
    pub fmri: String,

    /// EEG recording file (ASCII/CSV, rows = samples)
    #[arg(long)]
    pub eeg: String,

    /// Confound regressor file for the fMRI stream
    #[arg(long)]
    pub confounds: Option<String>,

    /// Region label file, one label per line
    #[arg(long)]
    pub labels: Option<String>,

    /// fMRI sampling rate in Hz (1/TR)
    #[arg(long, default_value_t = 0.5)]
    pub fmri_sr: f64,

    /// EEG sampling rate in Hz
    #[arg(long, default_value_t = 256.0)]
    pub eeg_sr: f64,

    /// 0-based fMRI channel indices (default: all)
    #[arg(long, num_args = 1..)]
    pub fmri_channels: Option<Vec<usize>>,

    /// 0-based EEG channel indices (default: all)
    #[arg(long, num_args = 1..)]
    pub eeg_channels: Option<Vec<usize>>,

    /// Start time in seconds (applies to both streams)
    #[arg(long)]
    pub start: Option<f64>,

    /// End time in seconds (applies to both streams)
    #[arg(long)]
    pub end: Option<f64>,

    /// Absolute correlation threshold for connectome edges
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    /// Label substrings identifying the hub regions
    #[arg(long, num_args = 1.., default_values_t = vec!["Cing".to_string(), "PCC".to_string()])]
    pub hub_patterns: Vec<String>,

    /// Samples per Welch segment
    #[arg(long, default_value_t = 2048)]
    pub nperseg: usize,

    /// Scoring config JSON file overriding baselines and weights
    #[arg(long, env = "NEURORISK_CONFIG")]
    pub config: Option<String>,

    /// Render the dashboard PNG to this path
    #[arg(long)]
    pub dashboard: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct NetworkArgs {
    /// Region time-series file (ASCII/CSV, rows = samples)
    #[arg(long)]
    pub file: String,

    /// 0-based channel indices (default: all)
    #[arg(long, num_args = 1..)]
    pub channels: Option<Vec<usize>>,

    /// Sampling rate in Hz (1/TR)
    #[arg(long, default_value_t = 0.5)]
    pub sr: f64,

    /// Start time in seconds
    #[arg(long)]
    pub start: Option<f64>,

    /// End time in seconds
    #[arg(long)]
    pub end: Option<f64>,

    /// Region label file, one label per line
    #[arg(long)]
    pub labels: Option<String>,

    /// Confound regressor file
    #[arg(long)]
    pub confounds: Option<String>,

    /// Absolute correlation threshold for connectome edges
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    /// Label substrings identifying the hub regions
    #[arg(long, num_args = 1.., default_values_t = vec!["Cing".to_string(), "PCC".to_string()])]
    pub hub_patterns: Vec<String>,

    /// RNG seed for the jitter term
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Scoring config JSON file overriding baselines and weights
    #[arg(long, env = "NEURORISK_CONFIG")]
    pub config: Option<String>,

    /// Render the dashboard PNG to this path
    #[arg(long)]
    pub dashboard: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct SpectralArgs {
    /// EEG recording file (ASCII/CSV, rows = samples)
    #[arg(long)]
    pub file: String,

    /// 0-based channel indices (default: all)
    #[arg(long, num_args = 1..)]
    pub channels: Option<Vec<usize>>,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = 256.0)]
    pub sr: f64,

    /// Start time in seconds
    #[arg(long)]
    pub start: Option<f64>,

    /// End time in seconds
    #[arg(long)]
    pub end: Option<f64>,

    /// Samples per Welch segment
    #[arg(long, default_value_t = 2048)]
    pub nperseg: usize,

    /// Scoring config JSON file overriding baselines and weights
    #[arg(long, env = "NEURORISK_CONFIG")]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input data file path
    #[arg(long)]
    pub file: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
