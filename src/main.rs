//! cfgfile - Edit key/value configuration files from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = cfgfile::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
