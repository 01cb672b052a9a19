use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::scoring::{ResultsConfig, SeriesConfig};

pub fn default_config() -> Config {
    Config {
        results: Some(ResultsConfig::default()),
        series: SeriesConfig::default(),
    }
}

/// Write the default config to `path`.
///
/// An existing file is left alone unless `overwrite` is set. Returns whether
/// a file was written.
pub fn write_default_config(path: &Path, overwrite: bool) -> Result<bool> {
    if path.exists() && !overwrite {
        return Ok(false);
    }

    let yaml = serde_saphyr::to_string(&default_config())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    info!(path = %path.display(), "Created a new default results config");
    Ok(true)
}
