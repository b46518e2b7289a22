use crate::cli::NetworkArgs;
use crate::exit_codes;
use crate::output;
use crate::params;

use neurorisk_rs::dashboard::render_network_dashboard;

pub fn execute(args: NetworkArgs) -> i32 {
    if let Err(msg) = params::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let request = match params::build_network_request(&args) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("Running network assessment on {}...", args.file);
        eprintln!("  Edge threshold: |r| > {}", args.threshold);
        eprintln!("  Hub patterns: {:?}", args.hub_patterns);
    }

    let report = match neurorisk_rs::run_network(&request) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Network assessment failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("  Global efficiency:  {:.4}", report.biomarkers.global_efficiency);
        eprintln!("  Local clustering:   {:.4}", report.biomarkers.average_clustering);
        eprintln!("  Network density:    {:.4}", report.biomarkers.density);
        eprintln!("  Hub strength:       {:.2}", report.biomarkers.hub_strength);
        eprintln!(
            "  Risk: {}% ({})",
            report.risk_percent,
            report.category.label()
        );
    }

    if let Some(ref path) = args.dashboard {
        if let Err(e) = render_network_dashboard(&report, path) {
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
