//! Config Command
//!
//! Usage:
//!   sprintzero config show [-g] [-f toml|json]
//!   sprintzero config path
//!   sprintzero config init [-g] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{Result, SprintError};

/// Show the effective configuration, or the raw global file with `global`
pub fn show(global: bool, explicit: Option<&Path>, format: &str) -> Result<()> {
    let as_json = match format.to_lowercase().as_str() {
        "json" => true,
        "toml" | "text" => false,
        other => {
            return Err(SprintError::InvalidInput(format!(
                "Invalid format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    if global {
        let out = Output::new();
        match ConfigLoader::global_config_path() {
            Some(path) if path.exists() => {
                println!("# Global Config: {}\n", path.display());
                println!("{}", std::fs::read_to_string(&path)?);
            }
            Some(_) => {
                out.warning("No global config found.");
                out.info("Run 'sprintzero config init --global' to create one.");
            }
            None => out.error("Cannot determine global config directory."),
        }
        return Ok(());
    }

    let config = ConfigLoader::resolve(explicit)?;
    println!("{}", ConfigLoader::render_config(&config, as_json)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a commented default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(&std::env::current_dir()?, force)?
    };
    Output::new().success(&format!("Config ready at {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_rejects_unknown_format() {
        let err = show(false, None, "yaml").unwrap_err();
        assert!(matches!(err, SprintError::InvalidInput(_)));
    }
}
