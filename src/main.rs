use std::process::ExitCode;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use simian::{Config, Error};

fn main() -> ExitCode {
    let config: Config = Config::parse();

    let default_level = if config.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match simian::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Syntax(errors)) => {
            for error in errors {
                eprintln!("{}", error);
            }

            ExitCode::FAILURE
        },
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        },
    }
}
