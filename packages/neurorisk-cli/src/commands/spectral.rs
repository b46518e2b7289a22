use crate::cli::SpectralArgs;
use crate::exit_codes;
use crate::output;
use crate::params;

pub fn execute(args: SpectralArgs) -> i32 {
    if let Err(msg) = params::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let request = match params::build_spectral_request(&args) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("Running spectral assessment on {}...", args.file);
        eprintln!("  Sampling rate: {} Hz, Welch segment: {}", args.sr, args.nperseg);
    }

    let report = match neurorisk_rs::run_spectral(&request) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Spectral assessment failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("  Theta power:        {:.6e}", report.biomarkers.theta_power);
        eprintln!("  Alpha power:        {:.6e}", report.biomarkers.alpha_power);
        eprintln!("  Theta/alpha ratio:  {:.4}", report.biomarkers.theta_alpha_ratio);
        eprintln!("  Temporal risk:      {:.3}", report.temporal_risk);
    }

    match output::to_json(&report, args.compact) {
        Ok(json) => {
            if let Err(e) = output::write_output(&json, args.output.as_deref()) {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
            if !args.quiet {
                if let Some(ref path) = args.output {
                    eprintln!("Results written to {}", path);
                }
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            exit_codes::EXECUTION_ERROR
        }
    }
}
