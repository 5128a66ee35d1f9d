//! Clonable repository value type

use std::fmt;
use std::str::FromStr;

/// The external system a repository belongs to.
///
/// Serialized as the host name, which is also the top-level key in the
/// cache file and the middle segment of a namespaced destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Origin {
    GitHub,
}

impl Origin {
    /// Host-style identifier, e.g. `github.com`
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::GitHub => "github.com",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github.com" => Ok(Origin::GitHub),
            other => Err(format!("unknown origin '{}'", other)),
        }
    }
}

/// A repository that can be selected and cloned.
///
/// At least one transport URL is needed to clone; entries with neither are
/// kept (they may still be listed) but every clone attempt fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Source system
    pub origin: Origin,

    /// Unique name within the origin, e.g. `owner/name`
    pub full_name: String,

    /// SSH transport URL, tried first
    pub ssh_url: Option<String>,

    /// HTTPS transport URL, used as the fallback
    pub https_url: Option<String>,
}

impl Repository {
    pub fn new(origin: Origin, full_name: impl Into<String>) -> Self {
        Self {
            origin,
            full_name: full_name.into(),
            ssh_url: None,
            https_url: None,
        }
    }

    pub fn with_ssh_url(mut self, url: impl Into<String>) -> Self {
        self.ssh_url = Some(url.into());
        self
    }

    pub fn with_https_url(mut self, url: impl Into<String>) -> Self {
        self.https_url = Some(url.into());
        self
    }

    /// `<origin>/<full_name>`
    pub fn label(&self) -> String {
        format!("{}/{}", self.origin, self.full_name)
    }

    /// Final non-empty `/`-separated segment of `full_name`.
    pub fn base_name(&self) -> Option<&str> {
        self.full_name.rsplit('/').find(|segment| !segment.is_empty())
    }

    pub fn is_clonable(&self) -> bool {
        self.ssh_url.is_some() || self.https_url.is_some()
    }
}
