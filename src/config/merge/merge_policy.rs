//! Merge rules: defaults, override order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("mirror_log", true)?
        .set_default("schedule.frequency", 60)?
        .set_default("schedule.unit", "seconds")?
        .set_default("hashing.algorithm", "blake3")
}
