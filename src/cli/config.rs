//! Config file commands

use crate::cli::GlobalArgs;
use crate::config::{ConfigFile, EXAMPLE_CONFIG};
use crate::error::Result;

/// Print the annotated example config
pub fn example() -> Result<()> {
    print!("{}", EXAMPLE_CONFIG);
    Ok(())
}

/// Print the config file location that would be read
pub fn path(global: &GlobalArgs) -> Result<()> {
    let path = ConfigFile::resolve_path(global.config.as_deref())?;
    println!("{}", path.display());
    Ok(())
}
