use std::process::ExitCode;

use billcycle::cli::{self, output, Cli};
use clap::Parser;

fn main() -> ExitCode {
    billcycle::init();
    let args = Cli::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(err);
            ExitCode::FAILURE
        }
    }
}
