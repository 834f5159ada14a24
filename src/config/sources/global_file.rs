//! Global config file source: $XDG_CONFIG_HOME/treesync/config.toml (or the platform equivalent)

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treesync").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Global config file path, if the file exists.
pub fn existing_path() -> Option<PathBuf> {
    global_config_path().filter(|path| path.exists())
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(global_path) = existing_path() {
        builder = builder.add_source(File::from(global_path).required(false));
    }
    Ok(builder)
}
