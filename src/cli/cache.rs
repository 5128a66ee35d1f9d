//! Cache management commands

use chrono::Utc;
use colored::Colorize;

use crate::cache::{CacheStore, refresh_due};
use crate::cli::CommandContext;
use crate::cli::progress;
use crate::error::Result;
use crate::models::Repository;
use crate::provider::RepositoryProvider;

/// Fetch everything from `provider` and replace the cache with it.
///
/// The freshness record is only written once the snapshot is in place, so a
/// failed fetch or write leaves the previous state untouched.
pub async fn refresh(
    store: &CacheStore,
    provider: &dyn RepositoryProvider,
) -> Result<Vec<Repository>> {
    let spinner = progress::spinner(format!(
        "Fetching repositories from {}, this may take a bit...",
        provider.origin()
    ));
    let fetched = provider.fetch_all().await;
    spinner.finish_and_clear();

    let repos = fetched?;
    store.update(&repos)?;
    store.record_freshness(Utc::now())?;
    log::info!("Cached {} repositories", repos.len());

    Ok(repos)
}

/// Fetch through the configured provider and store the result
pub async fn fetch_and_store(ctx: &CommandContext) -> Result<Vec<Repository>> {
    let provider = ctx.provider().await?;
    refresh(&ctx.cache, provider.as_ref()).await
}

/// Refresh the cache, honoring the cooldown unless `force` is set
pub async fn update(ctx: &CommandContext, force: bool) -> Result<()> {
    let settings = &ctx.settings;
    if !refresh_due(
        &ctx.cache,
        settings.cache_cooldown,
        settings.cooldown_window,
        force,
    ) {
        println!("Cache is still fresh, skipping update (use --force to refresh anyway)");
        return Ok(());
    }

    let repos = fetch_and_store(ctx).await?;
    println!("{} Cached {} repositories", "✓".green(), repos.len());
    Ok(())
}

/// Remove the cached repository list
pub fn clear(ctx: &CommandContext) -> Result<()> {
    if ctx.cache.clear()? {
        println!("Cleared repository cache");
    } else {
        println!("Cache was already empty");
    }
    Ok(())
}

/// Show cache status
pub fn status(ctx: &CommandContext) -> Result<()> {
    let stats = ctx.cache.stats()?;
    let settings = &ctx.settings;

    println!("Cache Status");
    println!("────────────────────────────────────────");
    println!("Location:        {}", stats.location.display());

    if stats.total() == 0 {
        println!("Repositories:    {}", "none cached".dimmed());
    } else {
        let breakdown = stats
            .per_origin
            .iter()
            .map(|(origin, count)| format!("{}: {}", origin, count))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Repositories:    {} ({})", stats.total(), breakdown);
    }

    if stats.unclonable > 0 {
        println!(
            "Unclonable:      {}",
            stats.unclonable.to_string().yellow()
        );
    }

    match stats.last_refreshed {
        Some(ts) => {
            let state = if ctx.cache.needs_refresh(settings.cooldown_window) {
                "stale".yellow()
            } else {
                "fresh".green()
            };
            println!(
                "Last refreshed:  {} ({})",
                ts.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                state
            );
        }
        None => println!("Last refreshed:  {}", "never".dimmed()),
    }

    if settings.cache_cooldown {
        println!(
            "Cooldown:        enabled ({} min)",
            settings.cooldown_window.as_secs() / 60
        );
    } else {
        println!("Cooldown:        disabled (refreshes on every run)");
    }

    Ok(())
}

/// Show cache path
pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", ctx.cache.dir().display());
    Ok(())
}
