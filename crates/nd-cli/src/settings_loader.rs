//! Settings file loading for the CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};

use nd_core::Settings;

/// Load settings from an explicit path, or from the default location when
/// none is given.
pub fn load(path: Option<&PathBuf>) -> Result<Settings> {
    let settings_path = match path {
        Some(path) => path.clone(),
        None => default_path()?,
    };

    if !settings_path.exists() {
        anyhow::bail!(
            "No settings found at {}. Create a TOML file with at least:\n\n\
             keywords = [\"quantum computing\"]\n\n\
             [[branches]]\n\
             name = \"Main Office\"\n\
             field = \"hpc\"\n",
            settings_path.display()
        );
    }

    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read settings file: {}", settings_path.display()))?;
    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", settings_path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", settings_path.display()))?;
    Ok(settings)
}

pub fn default_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("newsdesk").join("settings.toml"))
}
