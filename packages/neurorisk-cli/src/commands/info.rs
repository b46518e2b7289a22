use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::output;

use neurorisk_rs::ingest::SUPPORTED_EXTENSIONS;
use neurorisk_rs::spectral::{ALPHA_BAND, THETA_BAND};
use neurorisk_rs::ScoringConfig;
use serde::Serialize;

#[derive(Serialize)]
struct InfoOutput {
    cli_version: String,
    platform: String,
    arch: String,
    supported_extensions: Vec<&'static str>,
    theta_band_hz: (f64, f64),
    alpha_band_hz: (f64, f64),
    defaults: ScoringConfig,
}

pub fn execute(args: InfoArgs) -> i32 {
    let info = InfoOutput {
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        supported_extensions: SUPPORTED_EXTENSIONS.to_vec(),
        theta_band_hz: THETA_BAND,
        alpha_band_hz: ALPHA_BAND,
        defaults: ScoringConfig::default(),
    };

    if args.json {
        match output::to_json(&info, false) {
            Ok(json) => {
                if let Err(e) = output::write_output(&json, None) {
                    eprintln!("Error: {}", e);
                    return exit_codes::EXECUTION_ERROR;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }
    } else {
        println!("neurorisk CLI v{}", info.cli_version);
        println!("Platform: {} ({})", info.platform, info.arch);
        println!();
        println!("Supported input: {}", info.supported_extensions.join(", "));
        println!(
            "Bands: theta {}-{} Hz, alpha {}-{} Hz",
            THETA_BAND.0, THETA_BAND.1, ALPHA_BAND.0, ALPHA_BAND.1
        );
        println!();
        println!("Default scoring:");
        println!(
            "  Baselines: efficiency {} / clustering {} / hub floor {}",
            info.defaults.baseline_efficiency,
            info.defaults.baseline_clustering,
            info.defaults.hub_floor
        );
        println!(
            "  Penalties: {} / {} / {} (jitter 0..{})",
            info.defaults.efficiency_penalty,
            info.defaults.clustering_penalty,
            info.defaults.hub_penalty,
            info.defaults.jitter_span
        );
        println!(
            "  Fusion weights: spatial {} / temporal {}",
            info.defaults.weights.spatial, info.defaults.weights.temporal
        );
    }

    exit_codes::SUCCESS
}
