//! Interactive repository picker

use std::collections::HashSet;

use dialoguer::FuzzySelect;
use dialoguer::theme::ColorfulTheme;

use crate::error::Result;
use crate::models::Repository;

/// Number of candidates shown at once
const VISIBLE_ROWS: usize = 20;

/// Pick one of N labeled items. `Ok(None)` means the user cancelled.
pub trait Selector: Send + 'static {
    fn pick(&self, labels: &[String]) -> Result<Option<usize>>;
}

/// Fuzzy finder rendered on stderr so stdout stays free for the result
#[derive(Debug, Default, Clone, Copy)]
pub struct FuzzySelector;

impl Selector for FuzzySelector {
    fn pick(&self, labels: &[String]) -> Result<Option<usize>> {
        let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Repository")
            .items(labels)
            .default(0)
            .max_length(VISIBLE_ROWS)
            .interact_opt()?;

        Ok(selection)
    }
}

/// Labels for the picker.
///
/// With a single origin the `<origin>/` prefix is noise and is dropped.
pub fn labels(repos: &[Repository]) -> Vec<String> {
    let origins: HashSet<_> = repos.iter().map(|r| r.origin).collect();
    if origins.len() == 1 {
        repos.iter().map(|r| r.full_name.clone()).collect()
    } else {
        repos.iter().map(Repository::label).collect()
    }
}
