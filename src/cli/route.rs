//! CLI route: merges flags into settings, then dispatches to a single sync,
//! a dry run, or the periodic scheduler.

use crate::cli::output::{format_plan, format_report};
use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, ResolvedConfig, Settings};
use crate::error::{ConfigurationError, SyncError};
use crate::scheduler::Scheduler;
use crate::sync::Synchronizer;
use crate::tree::hasher;
use tracing::{info, warn};

/// What the invocation asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Once,
    DryRun,
    Periodic,
}

impl RunMode {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.dry_run {
            RunMode::DryRun
        } else if cli.once {
            RunMode::Once
        } else {
            RunMode::Periodic
        }
    }
}

/// Result of a run, ready for the terminal
#[derive(Debug)]
pub struct RunOutcome {
    pub message: String,
    pub success: bool,
}

/// Load settings from every config source and apply CLI overrides on top
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigurationError> {
    let settings = ConfigLoader::load(cli.config.as_deref())?;
    Ok(apply_overrides(cli, settings))
}

/// CLI flags take precedence over every config source
pub fn apply_overrides(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(ref source) = cli.source {
        settings.source = Some(source.clone());
    }
    if let Some(ref replica) = cli.replica {
        settings.replica = Some(replica.clone());
    }
    if let Some(ref log_file) = cli.log_file {
        settings.log_file = Some(log_file.clone());
    }
    if let Some(every) = cli.every {
        settings.schedule.frequency = every;
    }
    if let Some(unit) = cli.unit {
        settings.schedule.unit = unit;
    }
    if let Some(digest) = cli.digest {
        settings.hashing.algorithm = digest;
    }
    if cli.no_mirror {
        settings.mirror_log = false;
    }

    if cli.verbose {
        settings.logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        settings.logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        settings.logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_diagnostics_file {
        settings.logging.file = Some(file.clone());
    }
    settings
}

/// Validated invocation, ready to execute
pub struct RunContext {
    resolved: ResolvedConfig,
}

impl RunContext {
    pub fn new(settings: &Settings) -> Result<Self, Vec<ConfigurationError>> {
        let resolved = settings.resolve()?;
        Ok(Self { resolved })
    }

    pub fn resolved(&self) -> &ResolvedConfig {
        &self.resolved
    }

    pub fn execute(&self, mode: RunMode) -> Result<RunOutcome, SyncError> {
        let synchronizer = Synchronizer::new(self.resolved.sync.clone());
        match mode {
            RunMode::DryRun => {
                let diff = synchronizer.check_diff()?;
                Ok(RunOutcome {
                    message: format_plan(&diff),
                    success: true,
                })
            }
            RunMode::Once => {
                let report = synchronizer.sync()?;
                if report.is_noop() {
                    let (source, replica) = report.root_hashes;
                    info!(
                        source = %hasher::to_hex(&source),
                        replica = %hasher::to_hex(&replica),
                        "Root hashes"
                    );
                }
                Ok(RunOutcome {
                    success: !report.has_errors(),
                    message: format_report(&report),
                })
            }
            RunMode::Periodic => self.run_periodic(synchronizer),
        }
    }

    fn run_periodic(&self, synchronizer: Synchronizer) -> Result<RunOutcome, SyncError> {
        let schedule = self.resolved.schedule;
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| SyncError::Task(format!("Failed to start runtime: {}", e)))?;

        info!(%schedule, "Starting periodic sync");
        let scheduler = Scheduler::for_synchronizer(synchronizer, schedule);
        let stats = runtime.block_on(scheduler.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }));

        Ok(RunOutcome {
            message: format!(
                "Stopped after {} sync(s) ({} failed, {} skipped tick(s))",
                stats.completed_runs + stats.failed_runs,
                stats.failed_runs,
                stats.skipped_ticks
            ),
            success: true,
        })
    }
}
