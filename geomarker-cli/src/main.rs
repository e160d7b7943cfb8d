//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use geomarker_cli::CliError;

#[tokio::main]
async fn main() {
    match geomarker_cli::run().await {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("geomarker: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
