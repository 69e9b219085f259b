use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Initial state of the two filter toggles (optional section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Show image resources when a session opens.
    pub show_images: bool,
    /// Show file-link resources when a session opens.
    pub show_files: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            show_images: true,
            show_files: true,
        }
    }
}

/// Global configuration loaded from `~/.config/pagegrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagegrabConfig {
    /// Directory downloads and manifests are saved to (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Ask for a destination before each download.
    pub save_as: bool,
    /// User-Agent sent with page and resource requests.
    pub user_agent: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Redirects followed before a request fails.
    pub max_redirections: u32,
    #[serde(default)]
    pub filters: FilterConfig,
}

impl Default for PagegrabConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            save_as: true,
            user_agent: format!("pagegrab/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 15,
            timeout_secs: 300,
            max_redirections: 10,
            filters: FilterConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pagegrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PagegrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PagegrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PagegrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}
