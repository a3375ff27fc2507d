use serde::Deserialize;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::preview::DEFAULT_THUMBNAIL_SIZE;

/// Optional config file, looked up in the working directory
pub const CONFIG_FILE: &str = "caption-vault.toml";

/// Overrides `storage_dir` when set
pub const STORAGE_DIR_ENV: &str = "CAPTION_VAULT_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Read(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where images and the caption record live
    pub storage_dir: PathBuf,
    /// Edge length of the capture preview
    pub thumbnail_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("stored_images"),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl Config {
    /// Defaults, then `caption-vault.toml`, then the environment.
    ///
    /// A broken config file is logged and ignored rather than fatal.
    pub fn load() -> Self {
        let mut config = match Self::from_file(Path::new(CONFIG_FILE)) {
            Ok(Some(config)) => {
                info!("loaded {}", CONFIG_FILE);
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("ignoring {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        };

        if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV).filter(|d| !d.is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }

        config
    }

    /// Parse a config file; a missing file is `Ok(None)`
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(toml::from_str(&contents)?))
    }
}
