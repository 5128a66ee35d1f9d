//! CLI command definitions and handlers

use clap::{Parser, Subcommand, ValueEnum};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod config;
pub mod context;
pub mod doctor;
pub mod init;
pub mod progress;
pub mod select;

pub use args::GlobalArgs;
pub use context::CommandContext;

/// fuzzy-clone - pick one of your repositories and clone it somewhere predictable
///
/// Without a subcommand an interactive picker is shown. The chosen repository
/// is cloned if needed and its local path is printed on stdout.
#[derive(Parser, Debug)]
#[command(name = "fuzzy-clone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (defaults to the interactive picker)
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// Skip the background cache refresh after picking
    #[arg(long, env = "FUZZY_CLONE_NO_REFRESH", hide_env = true)]
    pub no_refresh: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the local repository cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Check configuration, credentials and required tools
    Doctor,

    /// Print a shell function that changes into the picked repository
    #[command(after_help = "\
Add to your shell config:
  zsh:    eval \"$(fuzzy-clone init zsh)\"
  fish:   fuzzy-clone init fish | source

Then run `fz` to pick, clone and cd in one step.")]
    Init {
        /// Shell to generate the integration for
        #[arg(value_enum)]
        shell: InitShell,
    },

    /// Inspect the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(after_help = "\
  bash:   fuzzy-clone completion bash > /etc/bash_completion.d/fuzzy-clone
  zsh:    fuzzy-clone completion zsh > \"${fpath[1]}/_fuzzy-clone\"
  fish:   fuzzy-clone completion fish > ~/.config/fish/completions/fuzzy-clone.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Fetch the repository list and replace the cache
    Update {
        /// Refresh even if the cooldown window has not passed
        #[arg(long)]
        force: bool,
    },

    /// Remove the cached repository list
    Clear,

    /// Show what is cached and when it was refreshed
    Status,

    /// Print the cache directory
    Path,
}

/// Config file subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print an annotated example config file
    Example,

    /// Print the config file location in use
    Path,
}

/// Shells with an `init` integration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitShell {
    Zsh,
    Fish,
}
