//! Configuration management for fuzzy-clone
//!
//! Settings are resolved once at startup from four layers, highest first:
//! CLI flag, environment variable, TOML config file, built-in default.
//! clap handles the first two (see `cli::args::GlobalArgs`); this module
//! merges the result with the file and the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::DEFAULT_COOLDOWN;
use crate::error::{ConfigError, Result};

/// Default time allowed for a single `git clone` attempt
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Annotated example printed by `fuzzy-clone config example`
pub const EXAMPLE_CONFIG: &str = r#"# fuzzy-clone configuration
# Every value can also be set with a flag or an environment variable; those win over this file.

# use_cwd clones the selected repository into the current working directory
# use_cwd = false

# flatten_destination places the repository directly under root:
#   ~/git/fuzzy-clone
# instead of the namespaced path:
#   ~/git/github.com/kjuulh/fuzzy-clone
# flatten_destination = false

# root is where repositories are cloned to. Defaults to $FUZZY_CLONE_ROOT or ~/git
# root = "/home/kjuulh/git"

# [github]
# Token used to list your repositories. Without it the GitHub CLI (`gh auth token`) is asked.
# token = "my-token"

# [cache]
# The cache is refreshed in the background on every run. With cooldown enabled it is only
# refreshed once cooldown_minutes have passed since the last successful update.
# cooldown = false
# cooldown_minutes = 60
"#;

/// Contents of the TOML config file. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub use_cwd: Option<bool>,
    pub flatten_destination: Option<bool>,
    pub root: Option<String>,
    pub github: GitHubSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSection {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub cooldown: Option<Toggle>,
    pub cooldown_minutes: Option<u64>,
}

/// A boolean that may also be written as a string; only `"true"` (and the
/// usual truthy spellings) turn it on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Bool(bool),
    Text(String),
}

impl Toggle {
    pub fn enabled(&self) -> bool {
        match self {
            Toggle::Bool(b) => *b,
            Toggle::Text(s) => parse_toggle(s),
        }
    }
}

/// Interpret a flag or environment string as a boolean.
///
/// Anything other than a truthy spelling is `false` rather than an error.
pub fn parse_toggle(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl ConfigFile {
    /// Default config file path (`~/.config/fz/config.toml`)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".config").join("fz").join("config.toml"))
    }

    /// Resolve a config path override, falling back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(p.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load the config file. A missing file yields the empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(config)
    }
}

/// Values supplied on the command line or through the environment.
///
/// `None` means "not given", so the file layer may fill it in.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub use_cwd: Option<bool>,
    pub flatten_destination: Option<bool>,
    pub root: Option<PathBuf>,
    pub github_token: Option<String>,
    pub cache_cooldown: Option<bool>,
    pub cache_dir: Option<PathBuf>,
    pub github_api: Option<String>,
    pub clone_timeout_secs: Option<u64>,
}

/// Built-in defaults that depend on the environment
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    /// Used when no root is configured, normally `~/git`
    pub root: PathBuf,
    /// Secondary token variable (`GITHUB_ACCESS_TOKEN`). Ranks with the
    /// environment layer, above the config file.
    pub github_access_token: Option<String>,
}

impl Defaults {
    /// Read the defaults from the process environment
    pub fn from_env() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join("git"))
            .unwrap_or_else(|| PathBuf::from("git"));
        let github_access_token = std::env::var("GITHUB_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Self {
            root,
            github_access_token,
        }
    }
}

/// Fully resolved, immutable settings passed to every component
#[derive(Debug, Clone)]
pub struct Settings {
    /// Clone into `<cwd>/<name>` instead of under root
    pub use_cwd: bool,
    /// Clone into `<root>/<name>` instead of `<root>/<origin>/<owner>/<name>`
    pub flatten_destination: bool,
    /// Root directory for clones
    pub root: PathBuf,
    /// Token for the repository provider, if one was configured
    pub github_token: Option<String>,
    /// Only refresh the cache after `cooldown_window` has passed
    pub cache_cooldown: bool,
    pub cooldown_window: Duration,
    /// Override for the cache directory
    pub cache_dir: Option<PathBuf>,
    /// Override for the GitHub API base URL
    pub github_api: Option<String>,
    /// Upper bound for one clone attempt
    pub clone_timeout: Duration,
    /// Config file that was consulted (it may not exist)
    pub config_path: PathBuf,
}

impl Settings {
    /// Resolve settings from overrides, the config file and the environment
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config_path = ConfigFile::resolve_path(overrides.config.as_deref())?;
        let file = ConfigFile::load_from(&config_path)?;
        Ok(Self::from_layers(
            overrides,
            file,
            Defaults::from_env(),
            config_path,
        ))
    }

    /// Merge the layers. Pure, so precedence can be tested directly.
    pub fn from_layers(
        overrides: &Overrides,
        file: ConfigFile,
        defaults: Defaults,
        config_path: PathBuf,
    ) -> Self {
        let root = overrides
            .root
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                file.root
                    .filter(|r| !r.trim().is_empty())
                    .map(|r| expand_home(&r))
            })
            .unwrap_or(defaults.root);

        // Both token variables belong to the env layer, so they outrank the file
        let non_empty = |t: &String| !t.trim().is_empty();
        let github_token = overrides
            .github_token
            .clone()
            .filter(non_empty)
            .or(defaults.github_access_token.filter(non_empty))
            .or(file.github.token.filter(non_empty));

        let cooldown_window = file
            .cache
            .cooldown_minutes
            .map(|m| Duration::from_secs(m.saturating_mul(60)))
            .unwrap_or(DEFAULT_COOLDOWN);

        Self {
            use_cwd: overrides.use_cwd.or(file.use_cwd).unwrap_or(false),
            flatten_destination: overrides
                .flatten_destination
                .or(file.flatten_destination)
                .unwrap_or(false),
            root,
            github_token,
            cache_cooldown: overrides
                .cache_cooldown
                .or(file.cache.cooldown.as_ref().map(Toggle::enabled))
                .unwrap_or(false),
            cooldown_window,
            cache_dir: overrides.cache_dir.clone(),
            github_api: overrides.github_api.clone(),
            clone_timeout: overrides
                .clone_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CLONE_TIMEOUT),
            config_path,
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn defaults() -> Defaults {
        Defaults {
            root: PathBuf::from("/home/u/git"),
            github_access_token: None,
        }
    }

    fn resolve(overrides: &Overrides, file: ConfigFile) -> Settings {
        Settings::from_layers(overrides, file, defaults(), PathBuf::from("config.toml"))
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let settings = resolve(&Overrides::default(), ConfigFile::default());

        assert!(!settings.use_cwd);
        assert!(!settings.flatten_destination);
        assert_eq!(settings.root, PathBuf::from("/home/u/git"));
        assert!(settings.github_token.is_none());
        assert!(!settings.cache_cooldown);
        assert_eq!(settings.cooldown_window, DEFAULT_COOLDOWN);
        assert_eq!(settings.clone_timeout, DEFAULT_CLONE_TIMEOUT);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            use_cwd = true
            flatten_destination = true
            root = "/srv/code"

            [github]
            token = "file-token"

            [cache]
            cooldown = true
            cooldown_minutes = 5
            "#,
        )
        .unwrap();

        let settings = resolve(&Overrides::default(), file);

        assert!(settings.use_cwd);
        assert!(settings.flatten_destination);
        assert_eq!(settings.root, PathBuf::from("/srv/code"));
        assert_eq!(settings.github_token.as_deref(), Some("file-token"));
        assert!(settings.cache_cooldown);
        assert_eq!(settings.cooldown_window, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = ConfigFile {
            use_cwd: Some(true),
            flatten_destination: Some(true),
            root: Some("/srv/code".to_string()),
            github: GitHubSection {
                token: Some("file-token".to_string()),
            },
            cache: CacheSection {
                cooldown: Some(Toggle::Bool(true)),
                cooldown_minutes: None,
            },
        };
        let overrides = Overrides {
            use_cwd: Some(false),
            flatten_destination: Some(false),
            root: Some(PathBuf::from("/flag/root")),
            github_token: Some("flag-token".to_string()),
            cache_cooldown: Some(false),
            ..Default::default()
        };

        let settings = resolve(&overrides, file);

        assert!(!settings.use_cwd);
        assert!(!settings.flatten_destination);
        assert_eq!(settings.root, PathBuf::from("/flag/root"));
        assert_eq!(settings.github_token.as_deref(), Some("flag-token"));
        assert!(!settings.cache_cooldown);
    }

    #[test]
    fn test_empty_root_falls_through() {
        let file = ConfigFile {
            root: Some("  ".to_string()),
            ..Default::default()
        };
        let overrides = Overrides {
            root: Some(PathBuf::new()),
            ..Default::default()
        };

        let settings = resolve(&overrides, file);
        assert_eq!(settings.root, PathBuf::from("/home/u/git"));
    }

    #[test]
    fn test_secondary_token_variable_beats_file() {
        let defaults = Defaults {
            root: PathBuf::from("/home/u/git"),
            github_access_token: Some("env-token".to_string()),
        };
        let file = ConfigFile {
            github: GitHubSection {
                token: Some("file-token".to_string()),
            },
            ..Default::default()
        };

        let settings = Settings::from_layers(
            &Overrides::default(),
            file.clone(),
            defaults.clone(),
            PathBuf::new(),
        );
        assert_eq!(settings.github_token.as_deref(), Some("env-token"));

        let overrides = Overrides {
            github_token: Some("flag-token".to_string()),
            ..Default::default()
        };
        let settings = Settings::from_layers(&overrides, file.clone(), defaults, PathBuf::new());
        assert_eq!(settings.github_token.as_deref(), Some("flag-token"));

        let settings =
            Settings::from_layers(&Overrides::default(), file, Defaults::default(), PathBuf::new());
        assert_eq!(settings.github_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_blank_token_falls_through() {
        let overrides = Overrides {
            github_token: Some("  ".to_string()),
            ..Default::default()
        };
        let file = ConfigFile {
            github: GitHubSection {
                token: Some("file-token".to_string()),
            },
            ..Default::default()
        };

        let settings = resolve(&overrides, file);
        assert_eq!(settings.github_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_cooldown_string_values() {
        let file: ConfigFile = toml::from_str("[cache]\ncooldown = \"true\"\n").unwrap();
        assert!(resolve(&Overrides::default(), file).cache_cooldown);

        let file: ConfigFile = toml::from_str("[cache]\ncooldown = \"later\"\n").unwrap();
        assert!(!resolve(&Overrides::default(), file).cache_cooldown);
    }

    #[test]
    fn test_parse_toggle() {
        assert!(parse_toggle("true"));
        assert!(parse_toggle("TRUE"));
        assert!(parse_toggle(" 1 "));
        assert!(!parse_toggle("false"));
        assert!(!parse_toggle("other"));
        assert!(!parse_toggle(""));
    }

    #[test]
    fn test_load_missing_file_is_empty_config() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("missing.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "root = [unterminated").unwrap();

        match ConfigFile::load_from(&path) {
            Err(crate::error::Error::Config(ConfigError::Parse { .. })) => (),
            other => panic!("Expected ConfigError::Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_example_config_parses() {
        let config: ConfigFile = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.use_cwd.is_none());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/git"), home.join("git"));
        }
    }
}
