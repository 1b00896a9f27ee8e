//! Site configuration from folio.toml

use crate::compose::ComposeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Build settings from folio.toml
///
/// Every field is optional so that a partial file, or no file at all, is
/// valid. Command line flags override these values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL or path of the portfolio JSON document
    pub data_source: Option<String>,

    /// Directory the generated pages are written to
    pub output_dir: Option<PathBuf>,

    /// File holding analytics session state
    pub session_file: Option<PathBuf>,

    /// How malformed sections are handled
    pub mode: Option<ComposeMode>,

    /// Inline local images as base64 data URLs
    #[serde(default)]
    pub embed_images: bool,
}

impl SiteConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the folio.toml file
    ///
    /// # Returns
    /// * `Ok(SiteConfig)` - Successfully loaded configuration
    /// * `Err(SiteConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SiteConfigError> {
        let content = fs::read_to_string(&path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `folio.toml` from `dir` when it exists, else the defaults
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Result<Self, SiteConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.exists() {
            log::info!("Using site configuration {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No {} found; using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    ///
    /// # Parameters
    /// * `path` - Path where the folio.toml file should be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(SiteConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SiteConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Configuration written by `folio init`
    pub fn starter() -> Self {
        Self {
            data_source: Some("portfolio.json".to_string()),
            output_dir: Some(PathBuf::from("public")),
            session_file: Some(PathBuf::from(".folio-session.toml")),
            mode: Some(ComposeMode::Lenient),
            embed_images: false,
        }
    }
}

/// Errors that can occur when loading or saving site configuration
#[derive(Error, Debug)]
pub enum SiteConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
