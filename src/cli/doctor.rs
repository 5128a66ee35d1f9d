//! Doctor command: report configuration, cache and tool status

use colored::Colorize;

use crate::cache::CacheStore;
use crate::clone::destination::DestinationMode;
use crate::clone::git::git_available;
use crate::cli::GlobalArgs;
use crate::config::{ConfigFile, Settings};
use crate::error::Result;
use crate::provider::token::gh_auth_token;

/// Print a checklist. Problems are reported, not returned as errors.
pub async fn run(global: &GlobalArgs) -> Result<()> {
    println!("{}\n", "fuzzy-clone Doctor".bold());

    let config_path = ConfigFile::resolve_path(global.config.as_deref())?;
    if config_path.exists() {
        println!(
            "{} Config file: {}",
            "✓".green(),
            config_path.display().to_string().cyan()
        );
    } else {
        println!(
            "{} Config file: {} {}",
            "○".dimmed(),
            config_path.display(),
            "(not found, using defaults)".dimmed()
        );
        println!("  → Run 'fuzzy-clone config example' for a starting point");
    }

    let settings = match Settings::load(&global.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            println!();
            return Ok(());
        }
    };

    match DestinationMode::from_settings(&settings) {
        DestinationMode::CurrentDir => {
            println!("{} Destination: current directory", "✓".green())
        }
        DestinationMode::Flattened { root } => println!(
            "{} Destination: {} {}",
            "✓".green(),
            root.display(),
            "(flattened)".dimmed()
        ),
        DestinationMode::Namespaced { root } => println!(
            "{} Destination: {}",
            "✓".green(),
            root.join("<origin>/<owner>/<name>").display()
        ),
    }

    report_cache(&settings);

    if git_available().await {
        println!("{} git found", "✓".green());
    } else {
        println!("{} git not found on PATH", "✗".red());
        println!("  → Install git; it is required to clone");
    }

    if settings.github_token.is_some() {
        println!("{} GitHub token configured", "✓".green());
    } else if gh_auth_token().await.is_some() {
        println!("{} GitHub token available from gh", "✓".green());
    } else {
        println!("{} No GitHub token found", "✗".red());
        println!("  → Set FUZZY_CLONE_GITHUB_TOKEN or run 'gh auth login'");
    }

    println!();
    Ok(())
}

fn report_cache(settings: &Settings) {
    let store = match &settings.cache_dir {
        Some(dir) => CacheStore::at(dir),
        None => match CacheStore::open() {
            Ok(store) => store,
            Err(e) => {
                println!("{} {}", "✗".red(), e);
                return;
            }
        },
    };

    match store.stats() {
        Ok(stats) if stats.total() > 0 => {
            let refreshed = stats
                .last_refreshed
                .map(|ts| {
                    ts.with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                })
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{} Cache: {} repositories {}",
                "✓".green(),
                stats.total(),
                format!("(refreshed {})", refreshed).dimmed()
            );
        }
        Ok(_) => {
            println!("{} Cache: empty", "○".dimmed());
            println!("  → The next run fetches your repositories");
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
        }
    }
}
