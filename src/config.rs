//! Configuration System
//!
//! Layered configuration for a replication job: built-in defaults, the global
//! config file, an explicit config file, `TREESYNC__*` environment variables
//! and finally CLI flags. The merged `Settings` are resolved into a validated
//! `ResolvedConfig` before any sync runs.

use crate::error::ConfigurationError;
use crate::logging::LoggingConfig;
use crate::scheduler::{Schedule, TimeUnit};
use crate::tree::hasher::DigestAlgorithm;
use crate::tree::path::{canonicalize_path, canonicalize_with_missing_leaf, is_within};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure, as merged from every source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory to replicate from
    pub source: Option<PathBuf>,

    /// Directory kept identical to `source`
    pub replica: Option<PathBuf>,

    /// Append-only sync log
    pub log_file: Option<PathBuf>,

    /// Echo sync log lines to stdout
    #[serde(default = "default_true")]
    pub mirror_log: bool,

    #[serde(default)]
    pub schedule: ScheduleSettings,

    #[serde(default)]
    pub hashing: HashingSettings,

    /// Diagnostic logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    #[serde(default = "default_frequency")]
    pub frequency: i64,

    #[serde(default)]
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashingSettings {
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
}

fn default_true() -> bool {
    true
}

fn default_frequency() -> i64 {
    60
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            unit: TimeUnit::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            replica: None,
            log_file: None,
            schedule: ScheduleSettings::default(),
            hashing: HashingSettings::default(),
            mirror_log: default_true(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Validated settings for the sync engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub log_file: PathBuf,
    pub digest: DigestAlgorithm,
    pub mirror_log: bool,
}

/// Everything needed to run a replication job
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub sync: SyncConfig,
    pub schedule: Schedule,
}

impl Settings {
    /// Validate and resolve into a runnable configuration
    ///
    /// Every problem is reported, not only the first.
    pub fn resolve(&self) -> Result<ResolvedConfig, Vec<ConfigurationError>> {
        let mut errors = Vec::new();

        let source = check_directory("source", self.source.as_deref(), &mut errors);
        let replica = check_directory("replica", self.replica.as_deref(), &mut errors);
        let log_file = check_log_file(self.log_file.as_deref(), &mut errors);

        if let (Some(source), Some(replica)) = (&source, &replica) {
            if source == replica {
                errors.push(ConfigurationError::Invalid(
                    "source and replica must be different directories".to_string(),
                ));
            } else if is_within(replica, source) {
                errors.push(ConfigurationError::NestedPaths {
                    inner: "replica",
                    outer: "source",
                });
            } else if is_within(source, replica) {
                errors.push(ConfigurationError::NestedPaths {
                    inner: "source",
                    outer: "replica",
                });
            }
        }

        if let Some(log_file) = &log_file {
            for (outer, root) in [("source", &source), ("replica", &replica)] {
                if let Some(root) = root {
                    if is_within(log_file, root) {
                        errors.push(ConfigurationError::NestedPaths {
                            inner: "log file",
                            outer,
                        });
                    }
                }
            }
        }

        let schedule = match u64::try_from(self.schedule.frequency) {
            Ok(frequency) if frequency > 0 => Some(Schedule::new(frequency, self.schedule.unit)),
            _ => {
                errors.push(ConfigurationError::Invalid(format!(
                    "frequency must be a positive integer, got {}",
                    self.schedule.frequency
                )));
                None
            }
        };

        match (source, replica, log_file, schedule) {
            (Some(source), Some(replica), Some(log_file), Some(schedule)) if errors.is_empty() => {
                Ok(ResolvedConfig {
                    sync: SyncConfig {
                        source,
                        replica,
                        log_file,
                        digest: self.hashing.algorithm,
                        mirror_log: self.mirror_log,
                    },
                    schedule,
                })
            }
            _ => Err(errors),
        }
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> Result<String, ConfigurationError> {
        toml::to_string_pretty(self).map_err(|e| ConfigurationError::Invalid(e.to_string()))
    }
}

fn check_directory(
    what: &'static str,
    path: Option<&Path>,
    errors: &mut Vec<ConfigurationError>,
) -> Option<PathBuf> {
    let Some(path) = path else {
        errors.push(ConfigurationError::Missing(what));
        return None;
    };
    if !path.exists() {
        errors.push(ConfigurationError::NotFound {
            what,
            path: path.to_path_buf(),
        });
        return None;
    }
    if !path.is_dir() {
        errors.push(ConfigurationError::NotADirectory {
            what,
            path: path.to_path_buf(),
        });
        return None;
    }
    match canonicalize_path(path) {
        Ok(canonical) => Some(canonical),
        Err(e) => {
            errors.push(ConfigurationError::Invalid(format!(
                "cannot resolve {} {}: {}",
                what,
                path.display(),
                e
            )));
            None
        }
    }
}

fn check_log_file(path: Option<&Path>, errors: &mut Vec<ConfigurationError>) -> Option<PathBuf> {
    let Some(path) = path else {
        errors.push(ConfigurationError::Missing("log_file"));
        return None;
    };
    if path.is_dir() {
        errors.push(ConfigurationError::Invalid(format!(
            "log file {} is a directory",
            path.display()
        )));
        return None;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        errors.push(ConfigurationError::NotFound {
            what: "log file directory",
            path: parent.to_path_buf(),
        });
        return None;
    }
    match canonicalize_with_missing_leaf(path) {
        Ok(canonical) => Some(canonical),
        Err(e) => {
            errors.push(ConfigurationError::Invalid(format!(
                "cannot resolve log file {}: {}",
                path.display(),
                e
            )));
            None
        }
    }
}
