//! Default command: pick a repository, clone it if needed, print its path

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::cache::refresh_due;
use crate::cli::CommandContext;
use crate::cli::cache::fetch_and_store;
use crate::clone::{self, CloneOrchestrator, GitCli, GitRunner};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::select::{FuzzySelector, Selector, labels};

/// Run the interactive picker and print the destination on stdout
pub async fn run(ctx: &CommandContext, no_refresh: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let git = GitCli::new(ctx.settings.clone_timeout);
    let dest = pick_and_clone(
        ctx,
        FuzzySelector,
        git,
        &cwd,
        no_refresh,
        spawn_background_refresh,
    )
    .await?;

    println!("{}", dest.display());
    Ok(())
}

/// Load repositories (cache first), let `selector` pick one and make sure
/// it is cloned. Returns the local path.
///
/// `refresh` runs at most once, only when the cache was hit and a refresh
/// is due.
pub async fn pick_and_clone<S, G, R>(
    ctx: &CommandContext,
    selector: S,
    git: G,
    cwd: &Path,
    no_refresh: bool,
    refresh: R,
) -> Result<PathBuf>
where
    S: Selector,
    G: GitRunner,
    R: FnOnce(&Settings),
{
    let repos = match ctx.cache.get()? {
        Some(repos) => {
            let settings = &ctx.settings;
            if !no_refresh
                && refresh_due(
                    &ctx.cache,
                    settings.cache_cooldown,
                    settings.cooldown_window,
                    false,
                )
            {
                refresh(settings);
            }
            repos
        }
        None => {
            log::debug!("Cache is empty, fetching repositories before picking");
            fetch_and_store(ctx).await?
        }
    };

    if repos.is_empty() {
        return Err(Error::Other(
            "No repositories found for this account".to_string(),
        ));
    }

    let items = labels(&repos);
    let picked = tokio::task::spawn_blocking(move || selector.pick(&items))
        .await
        .map_err(|e| Error::Other(format!("picker task failed: {}", e)))??;

    let Some(index) = picked else {
        return Err(Error::SelectionCancelled);
    };
    let repo = repos
        .get(index)
        .ok_or_else(|| Error::Other(format!("picker returned unknown index {}", index)))?;

    let dest = clone::resolve(repo, &ctx.settings, cwd)?;
    log::debug!("Resolved {} to {}", repo.label(), dest.display());

    let orchestrator = CloneOrchestrator::new(git);
    Ok(orchestrator.ensure_cloned(repo, &dest).await?)
}

/// Start a detached `cache update` so the next run sees fresh data.
///
/// Failures only get logged; the picked path has already been decided.
fn spawn_background_refresh(settings: &Settings) {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            log::debug!("Cannot locate own executable for background refresh: {}", e);
            return;
        }
    };

    match background_refresh_command(settings, &exe).spawn() {
        Ok(child) => log::debug!("Started background cache refresh (pid {})", child.id()),
        Err(e) => log::debug!("Failed to start background cache refresh: {}", e),
    }
}

/// `<exe> cache update` carrying the settings a child would not find on
/// its own: the config file, cooldown flag and any env-only overrides.
fn background_refresh_command(settings: &Settings, exe: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(exe);
    cmd.arg("--config")
        .arg(&settings.config_path)
        .arg(format!("--cache-cooldown={}", settings.cache_cooldown))
        .args(["cache", "update"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if let Some(token) = &settings.github_token {
        cmd.env("FUZZY_CLONE_GITHUB_TOKEN", token);
    }
    if let Some(dir) = &settings.cache_dir {
        cmd.env("FUZZY_CLONE_CACHE_DIR", dir);
    }
    if let Some(api) = &settings.github_api {
        cmd.env("FUZZY_CLONE_GITHUB_API", api);
    }
    cmd
}
