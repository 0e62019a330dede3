use std::process::ExitCode;

use anyhow::Error;
use clap::Parser;
use log::LevelFilter;
use popie::cli::{Arguments, ExitStatus};
use popie::core::{discovery::DiscoveryError, parsers::python::ParseError};

fn main() -> ExitCode {
    let args = Arguments::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::builder()
        .filter_module("popie", level)
        .format_timestamp(None)
        .try_init();

    match popie::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {}", err);
            exit_status_for(&err).into()
        }
    }
}

/// Problems with the command line input exit with 64, everything else with 70.
fn exit_status_for(err: &Error) -> ExitStatus {
    if let Some(err) = err.downcast_ref::<DiscoveryError>() {
        return match err {
            DiscoveryError::MissingPath(_) | DiscoveryError::NoRoot(_) => ExitStatus::Input,
            DiscoveryError::MultipleRoots(..) => ExitStatus::Software,
        };
    }
    if err.downcast_ref::<ParseError>().is_some() {
        return ExitStatus::Input;
    }
    ExitStatus::Software
}
