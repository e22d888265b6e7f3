//! mason - fast in-process incremental builds

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = mason_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
