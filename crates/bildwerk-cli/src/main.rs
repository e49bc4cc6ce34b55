// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — command-line image normalizer.
//
// Entry point. Initialises logging on stderr, normalizes one image into a
// bounded JPEG, and reports the outcome on stdout and in the exit code.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "Usage: bildwerk <input_path> <output_path>";

/// How a single invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failed,
    Usage,
}

impl Outcome {
    fn message(&self) -> &'static str {
        match self {
            Outcome::Success => "Image processed successfully",
            Outcome::Failed => "Image processing failed",
            Outcome::Usage => USAGE,
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failed | Outcome::Usage => 1,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Skip the program name. Paths need not be valid UTF-8.
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let outcome = run(&args);
    println!("{}", outcome.message());
    ExitCode::from(outcome.exit_code())
}

/// Dispatch on the positional arguments (program name already removed).
fn run(args: &[OsString]) -> Outcome {
    let [input, output] = args else {
        tracing::debug!(count = args.len(), "Expected exactly two arguments");
        return Outcome::Usage;
    };

    tracing::info!(
        input = %Path::new(input).display(),
        output = %Path::new(output).display(),
        "Bildwerk starting"
    );
    if bildwerk_image::process_default(input, output) {
        Outcome::Success
    } else {
        Outcome::Failed
    }
}
