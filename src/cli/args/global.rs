//! Global CLI options shared across all commands
//!
//! Every option can be given as a flag or through its environment variable
//! (clap resolves flag over env). Anything left unset falls through to the
//! config file and then the built-in defaults in `Settings::from_layers`.

use clap::Args;
use std::path::PathBuf;

use crate::config::{Overrides, parse_toggle};

/// Global options, flattened into the top-level `Cli`.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Override config file location (default: ~/.config/fz/config.toml)
    #[arg(long, global = true, env = "FUZZY_CLONE_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Clone into the current working directory
    #[arg(
        long = "use-cwd",
        short = 'c',
        global = true,
        env = "USE_CWD",
        hide_env = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = toggle,
        value_name = "BOOL"
    )]
    pub use_cwd: Option<bool>,

    /// Clone into <root>/<name> instead of <root>/<origin>/<owner>/<name>
    #[arg(
        long,
        short = 'f',
        global = true,
        env = "FUZZY_CLONE_FLATTEN_DESTINATION",
        hide_env = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = toggle,
        value_name = "BOOL"
    )]
    pub flatten_destination: Option<bool>,

    /// Root directory for clones (default: ~/git)
    #[arg(long, global = true, env = "FUZZY_CLONE_ROOT", hide_env = true)]
    pub root: Option<PathBuf>,

    /// GitHub token used to list repositories
    #[arg(
        long,
        global = true,
        env = "FUZZY_CLONE_GITHUB_TOKEN",
        hide_env_values = true
    )]
    pub github_token: Option<String>,

    /// Only refresh the cache once the cooldown window has passed
    #[arg(
        long,
        global = true,
        env = "FUZZY_CLONE_CACHE_COOLDOWN",
        hide_env = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = toggle,
        value_name = "BOOL"
    )]
    pub cache_cooldown: Option<bool>,

    /// Seconds a single clone attempt may take before it is killed
    #[arg(
        long,
        global = true,
        env = "FUZZY_CLONE_CLONE_TIMEOUT",
        hide_env = true,
        value_name = "SECONDS"
    )]
    pub clone_timeout: Option<u64>,

    /// Override the cache directory
    #[arg(long, global = true, env = "FUZZY_CLONE_CACHE_DIR", hide = true)]
    pub cache_dir: Option<PathBuf>,

    /// Custom GitHub API base URL for development/testing
    #[arg(long, global = true, env = "FUZZY_CLONE_GITHUB_API", hide = true)]
    pub github_api: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "FUZZY_CLONE_DEBUG", hide_env = true)]
    pub debug: bool,
}

fn toggle(value: &str) -> Result<bool, String> {
    Ok(parse_toggle(value))
}

impl GlobalArgs {
    /// The flag/env layer of the configuration.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            use_cwd: self.use_cwd,
            flatten_destination: self.flatten_destination,
            root: self.root.clone(),
            github_token: self.github_token.clone(),
            cache_cooldown: self.cache_cooldown,
            cache_dir: self.cache_dir.clone(),
            github_api: self.github_api.clone(),
            clone_timeout_secs: self.clone_timeout,
        }
    }
}
