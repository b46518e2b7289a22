use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;

use neurorisk_rs::ingest::{is_supported_extension, parse_ascii_matrix, SUPPORTED_EXTENSIONS};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ValidateOutput {
    file: String,
    exists: bool,
    readable: bool,
    supported: bool,
    parseable: bool,
    n_channels: Option<usize>,
    n_samples: Option<usize>,
    has_header: Option<bool>,
    size_bytes: Option<u64>,
    error: Option<String>,
}

pub fn execute(args: ValidateArgs) -> i32 {
    let path = Path::new(&args.file);

    let exists = path.exists();
    let readable = path.is_file() && std::fs::File::open(path).is_ok();

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let supported = is_supported_extension(extension);

    let size_bytes = if readable {
        std::fs::metadata(path).ok().map(|m| m.len())
    } else {
        None
    };

    let mut parseable = false;
    let mut n_channels = None;
    let mut n_samples = None;
    let mut has_header = None;
    let mut parse_error = None;

    if readable && supported {
        match std::fs::read(path) {
            Ok(bytes) => match parse_ascii_matrix(&bytes) {
                Ok((header, rows)) => {
                    parseable = true;
                    n_channels = rows.first().map(Vec::len);
                    n_samples = Some(rows.len());
                    has_header = Some(header.is_some());
                }
                Err(e) => parse_error = Some(e.to_string()),
            },
            Err(e) => parse_error = Some(e.to_string()),
        }
    }

    let error = if !exists {
        Some(format!("File not found: {}", args.file))
    } else if !readable {
        Some(format!("File is not readable: {}", args.file))
    } else if !supported {
        Some(format!(
            "Unsupported file extension '{}'. Supported: {}",
            extension,
            SUPPORTED_EXTENSIONS.join(", ")
        ))
    } else {
        parse_error
    };

    let result = ValidateOutput {
        file: args.file.clone(),
        exists,
        readable,
        supported,
        parseable,
        n_channels,
        n_samples,
        has_header,
        size_bytes,
        error: error.clone(),
    };

    if args.json {
        match output::to_json(&result, false) {
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
    } else if let Some(msg) = &error {
        println!("INVALID: {}", msg);
    } else {
        println!("OK: {}", args.file);
        println!(
            "  {} channels x {} samples{}",
            n_channels.unwrap_or(0),
            n_samples.unwrap_or(0),
            if has_header == Some(true) {
                " (labeled header)"
            } else {
                ""
            }
        );
    }

    if error.is_some() {
        exit_codes::INPUT_ERROR
    } else {
        exit_codes::SUCCESS
    }
}
