use crate::cli::FuseArgs;
use crate::exit_codes;
use crate::output;
use crate::params;

use neurorisk_rs::dashboard::render_fusion_dashboard;

pub fn execute(args: FuseArgs) -> i32 {
    for file in [&args.fmri, &args.eeg] {
        if let Err(msg) = params::validate_file(file) {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    }

    let request = match params::build_fusion_request(&args) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("Running dual-stream diagnosis...");
        eprintln!("  fMRI: {} ({} Hz)", args.fmri, args.fmri_sr);
        eprintln!("  EEG:  {} ({} Hz)", args.eeg, args.eeg_sr);
        eprintln!("  Edge threshold: |r| > {}", args.threshold);
    }

    let report = match neurorisk_rs::run_fusion(&request) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Diagnosis failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("  Global efficiency:  {:.4}", report.network.global_efficiency);
        eprintln!("  Theta/alpha ratio:  {:.4}", report.spectral.theta_alpha_ratio);
        eprintln!(
            "  Risk: spatial={:.3} temporal={:.3} fused={:.1}% ({})",
            report.spatial_risk,
            report.temporal_risk,
            report.fused_risk * 100.0,
            report.category.label()
        );
    }

    if let Some(ref path) = args.dashboard {
        if let Err(e) = render_fusion_dashboard(&report, path) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
        if !args.quiet {
            eprintln!("Dashboard written to {}", path);
        }
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
