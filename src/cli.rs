//! CLI domain: parse, route and output only.
//! Sync behavior lives in the `sync` and `scheduler` modules.

mod output;
mod parse;
mod route;

pub use output::{format_plan, format_report, map_config_errors};
pub use parse::Cli;
pub use route::{apply_overrides, load_settings, RunContext, RunMode, RunOutcome};
