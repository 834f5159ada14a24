//! Config loader: assembles the layered sources into `Settings`.

use super::merge::merge_policy;
use super::sources::{environment, explicit_file, global_file};
use super::Settings;
use crate::error::ConfigurationError;
use std::path::{Path, PathBuf};

/// Loads `Settings` from defaults, files and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration
    ///
    /// Precedence (highest last): defaults, global file, `explicit` file,
    /// `TREESYNC__*` environment variables. CLI flags are applied by the caller.
    pub fn load(explicit: Option<&Path>) -> Result<Settings, ConfigurationError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            builder = explicit_file::add_to_builder(builder, path);
        }
        builder = environment::add_to_builder(builder);

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Config files `load` reads, lowest precedence first
    ///
    /// Loading runs before logging is set up, so callers report these once
    /// the subscriber is installed.
    pub fn config_files(explicit: Option<&Path>) -> Vec<PathBuf> {
        global_file::existing_path()
            .into_iter()
            .chain(explicit.map(Path::to_path_buf))
            .collect()
    }

    /// Load configuration from a single file plus defaults, ignoring the
    /// global file and the environment
    pub fn load_from_file(path: &Path) -> Result<Settings, ConfigurationError> {
        let builder = explicit_file::add_to_builder(merge_policy::builder_with_defaults()?, path);
        Ok(builder.build()?.try_deserialize()?)
    }
}
