mod cli;

use crate::cli::CliCommand;

fn main() {
    // Logging is initialized inside run_from_args, once --log-file is known.
    match CliCommand::run_from_args() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("reattempt error: {:#}", err);
            std::process::exit(1);
        }
    }
}
