mod cli;
mod config;
pub mod modules;
pub mod utils;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::cli() {
        cli::CliRes::Ok => ExitCode::from(0),
        cli::CliRes::Err => ExitCode::from(1),
    }
}
