use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::request::RequestOptions;
use crate::scheduler::{
    BatchConfig, DEFAULT_MAX_CONCURRENT, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};

/// Configuration loaded from `~/.config/parafetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Maximum number of requests in flight at once.
    pub max_concurrent: usize,
    /// Per-request connect and total timeout in milliseconds.
    pub timeout_ms: u64,
    /// Upper bound for one blocking wait on the transport, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Headers sent with every request unless the request overrides them.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Options applied to every request unless the request overrides them.
    #[serde(default)]
    pub options: RequestOptions,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            headers: HashMap::new(),
            options: RequestOptions::default(),
        }
    }
}

impl FileConfig {
    /// Build the runtime batch configuration. Zero values are ignored and the
    /// built-in defaults kept, the same as the runtime setters.
    pub fn into_batch_config(self) -> BatchConfig {
        let mut cfg = BatchConfig::default();
        if !cfg.set_max_concurrent(self.max_concurrent) {
            tracing::warn!("config: max_concurrent must be positive, using {}", cfg.max_concurrent());
        }
        if !cfg.set_timeout_ms(self.timeout_ms) {
            tracing::warn!("config: timeout_ms must be positive, using {:?}", cfg.timeout());
        }
        if !cfg.set_poll_interval(Duration::from_millis(self.poll_interval_ms)) {
            tracing::warn!(
                "config: poll_interval_ms must be positive, using {:?}",
                cfg.poll_interval()
            );
        }
        cfg.set_shared_headers(self.headers);
        cfg.set_shared_options(self.options);
        cfg
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("parafetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FileConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<FileConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: FileConfig = toml::from_str(&data)?;
    Ok(cfg)
}
