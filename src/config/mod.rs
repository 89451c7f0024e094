mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from the default location or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_path = Path::new("./posterforge.toml");
    if default_path.exists() {
        return load_config(default_path);
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if !(0.0..=1.0).contains(&config.matching.threshold) {
        anyhow::bail!(
            "matching.threshold must be within [0, 1], got {}",
            config.matching.threshold
        );
    }

    if config.matching.review_candidates == 0 {
        anyhow::bail!("matching.review_candidates must be at least 1");
    }

    if config.output.document.is_empty() {
        anyhow::bail!("output.document cannot be empty");
    }

    Ok(())
}
