//! ci-webhook: CI build notifications over HTTP
//!
//! Entry point for the ci-webhook plugin.

use ci_webhook::config::{Cli, Command, Configuration, write_default_config};
use ci_webhook::context::{BuildContext, PluginInput};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    // Load build metadata and plugin parameters
    let input = match PluginInput::load(&cli.input_source()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Input error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };
    let (context, vargs) = input.into_parts();

    // Merge configuration sources
    let config = match Configuration::load(&cli, &vargs) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_application(&config, &context)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs the delivery on a single-threaded runtime.
///
/// Excluded from coverage - performs real network requests.
#[cfg(not(tarpaulin_include))]
fn run_application(config: &Configuration, context: &BuildContext) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config, context)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Error {e}");
            exit_code::runtime_error()
        }
    }
}
