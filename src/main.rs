//! fuzzy-clone - fuzzy-find one of your repositories and clone it somewhere predictable

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod clone;
mod config;
mod error;
mod models;
mod provider;
mod select;

use cli::{CacheCommands, Cli, CommandContext, Commands, ConfigCommands};
use error::{Error, Result};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.debug);

    match run(cli).await {
        Ok(()) => {}
        // Nothing to report; the non-zero status keeps shell wrappers from cd-ing
        Err(Error::SelectionCancelled) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr. `RUST_LOG` still wins over the default filter.
fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => {
            let ctx = CommandContext::new(&cli.global)?;
            cli::select::run(&ctx, cli.no_refresh).await
        }
        Some(Commands::Cache(cache_cmd)) => {
            let ctx = CommandContext::new(&cli.global)?;
            match cache_cmd {
                CacheCommands::Update { force } => cli::cache::update(&ctx, force).await,
                CacheCommands::Clear => cli::cache::clear(&ctx),
                CacheCommands::Status => cli::cache::status(&ctx),
                CacheCommands::Path => cli::cache::path(&ctx),
            }
        }
        Some(Commands::Doctor) => cli::doctor::run(&cli.global).await,
        Some(Commands::Init { shell }) => {
            cli::init::run(shell);
            Ok(())
        }
        Some(Commands::Config(config_cmd)) => match config_cmd {
            ConfigCommands::Example => cli::config::example(),
            ConfigCommands::Path => cli::config::path(&cli.global),
        },
        Some(Commands::Completion { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "fuzzy-clone",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
