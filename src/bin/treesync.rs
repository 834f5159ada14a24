//! treesync CLI Binary
//!
//! Validates the invocation, then runs one sync, a dry run, or periodic syncs.

use anyhow::Context;
use clap::Parser;
use std::process;
use treesync::cli::{load_settings, map_config_errors, Cli, RunContext, RunMode, RunOutcome};
use treesync::config::ConfigLoader;
use treesync::logging::init_logging;
use tracing::{debug, error, info};

/// Exit status for an invalid invocation
const EXIT_CONFIG: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", map_config_errors(&[e]));
            process::exit(EXIT_CONFIG);
        }
    };

    // Initialize logging early
    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_CONFIG);
    }

    info!("treesync starting");
    for path in ConfigLoader::config_files(cli.config.as_deref()) {
        debug!(config_path = %path.display(), "Loaded config file");
    }
    if cli.verbose {
        match settings.to_toml() {
            Ok(rendered) => debug!("Effective configuration:\n{}", rendered),
            Err(e) => debug!("Could not render configuration: {}", e),
        }
    }

    let context = match RunContext::new(&settings) {
        Ok(ctx) => ctx,
        Err(errors) => {
            error!(count = errors.len(), "Invalid invocation");
            eprintln!("{}", map_config_errors(&errors));
            process::exit(EXIT_CONFIG);
        }
    };

    match run(&context, RunMode::from_cli(&cli)) {
        Ok(outcome) => {
            println!("{}", outcome.message);
            if !outcome.success {
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(context: &RunContext, mode: RunMode) -> anyhow::Result<RunOutcome> {
    let sync = &context.resolved().sync;
    context.execute(mode).with_context(|| {
        format!(
            "failed to sync {} into {}",
            sync.source.display(),
            sync.replica.display()
        )
    })
}
