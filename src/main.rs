use std::process::ExitCode;

use clap::Parser;
use rangeraptor::cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    match rangeraptor::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
