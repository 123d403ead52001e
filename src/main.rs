//! optdeps CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use optdeps::cli::{Cli, CommandDispatcher};
use optdeps::config::LookupConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("optdeps=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("optdeps=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("optdeps starting with args: {:?}", cli);

    let config = match &cli.config {
        Some(path) => LookupConfig::from_env_and_file(path),
        None => Ok(LookupConfig::from_env()),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red(), e);
            return ExitCode::from(2);
        }
    };
    config.prepend(cli.paths.iter().cloned());

    let dispatcher = CommandDispatcher::new(config.into_source());
    let mut stdout = io::stdout().lock();

    match dispatcher.dispatch(&cli, &mut stdout) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red(), e);
            ExitCode::from(1)
        }
    }
}
