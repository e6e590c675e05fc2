//! pressroom entry point
//!
//! Parses arguments and dispatches through `cli::run`; prints any error to
//! stderr as a fatal log line and exits with the error's code.

use pressroom::cli;
use pressroom::observability::Logger;

fn main() {
    if let Err(e) = cli::run() {
        let code = e.exit_code().to_string();
        let reason = e.to_string();
        Logger::fatal(
            "COMMAND_FAILED",
            &[("error", reason.as_str()), ("exit_code", code.as_str())],
        );
        std::process::exit(e.exit_code());
    }
}
