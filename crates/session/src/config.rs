use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use l10n_format::{parse_locale, CatalogError, Locale};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_LOCALE_CODE: &str = "en-US";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read registry config {0}: {1}")]
    Read(PathBuf, io::Error),
    #[error("failed to parse registry config {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Startup settings for a [`crate::SessionRegistry`].
///
/// ```json
/// { "default_locale": "en-US", "catalog_dirs": ["langs", "/opt/app/langs"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub default_locale: String,
    pub catalog_dirs: Vec<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE_CODE.to_string(),
            catalog_dirs: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Reads a JSON config file. Relative catalog directories are resolved
    /// against the directory holding the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        let mut config: Self = serde_json::from_str(&contents)
            .map_err(|err| ConfigError::Parse(path.to_path_buf(), err))?;
        if let Some(base) = path.parent() {
            for dir in &mut config.catalog_dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
        Ok(config)
    }

    pub fn default_locale(&self) -> Result<Locale, ConfigError> {
        Ok(parse_locale(&self.default_locale)?)
    }
}
