//! Locating and writing folio.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_app::config::CONFIG_FILE_NAME;
use folio_app::SiteConfig;

/// Load the site config from a file, or from `folio.toml` in a directory
pub fn load(path: &Path) -> Result<SiteConfig> {
    let config = if path.is_dir() {
        SiteConfig::load_from_dir(path)
    } else {
        SiteConfig::load_from_path(path)
    };
    config.with_context(|| format!("Failed to load site config from {}", path.display()))
}

/// Write the default config into `dir`, refusing to overwrite unless `force`
pub fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    SiteConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
