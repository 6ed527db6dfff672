mod types;

pub use types::*;

use anyhow::{Context, Result};
use clipforge_av::Toolchain;
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

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./clipforge.toml",
        "~/.config/clipforge/config.toml",
        "/etc/clipforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Resolve ffmpeg and ffprobe, preferring the configured paths.
pub fn toolchain(config: &Config) -> Result<Toolchain> {
    Toolchain::discover(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
    .context("ffmpeg and ffprobe are required")
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.normalize.fps == 0 {
        anyhow::bail!("normalize.fps cannot be 0");
    }
    if config.normalize.height == 0 {
        anyhow::bail!("normalize.height cannot be 0");
    }
    if config.normalize.width == Some(0) {
        anyhow::bail!("normalize.width cannot be 0, leave it unset to derive it");
    }

    if config.storage.root.as_os_str().is_empty() {
        anyhow::bail!("storage.root cannot be empty");
    }
    if config.storage.bucket_prefix.contains('/') {
        anyhow::bail!(
            "storage.bucket_prefix cannot contain '/': {:?}",
            config.storage.bucket_prefix
        );
    }

    if let Some(ref dir) = config.workdir.path {
        if dir.exists() && !dir.is_dir() {
            anyhow::bail!("workdir.path is not a directory: {:?}", dir);
        }
    }

    for path in [&config.tools.ffmpeg_path, &config.tools.ffprobe_path]
        .into_iter()
        .flatten()
    {
        if !path.exists() {
            tracing::warn!("Configured tool path does not exist: {:?}", path);
        }
    }

    Ok(())
}
