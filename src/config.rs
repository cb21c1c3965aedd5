//! Configuration file support
//!
//! Settings are read from TOML. Lookup order:
//!
//! 1. `--config <path>` given on the command line
//! 2. `./bordercrop.toml`
//! 3. `<config dir>/bordercrop/config.toml`
//!
//! Values given on the command line override the file.
//!
//! ```toml
//! tolerance = 0.05
//! base_color = "255,255,255"
//! suffix = "-c"
//! jpeg_quality = 90
//! threads = 4
//! closeness_map = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::crop::{Argb, CropError, CropOptions, DEFAULT_TOLERANCE};

/// Local config file name
pub const LOCAL_CONFIG_FILE: &str = "bordercrop.toml";

/// Default suffix inserted between file stem and extension
pub const DEFAULT_SUFFIX: &str = "-c";

/// Default JPEG quality (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid base color: {0}")]
    InvalidBaseColor(#[from] CropError),
}

/// Settings as stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fraction of the maximum color distance counted as background
    pub tolerance: f64,
    /// Explicit background color as `r,g,b` or `a,r,g,b`
    pub base_color: Option<String>,
    /// Suffix for batch output names
    pub suffix: String,
    /// JPEG output quality
    pub jpeg_quality: u8,
    /// Worker threads (default: number of CPUs)
    pub threads: Option<usize>,
    /// Write a closeness map next to every cropped image
    pub closeness_map: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            base_color: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            threads: None,
            closeness_map: false,
        }
    }
}

impl Config {
    /// Load from the first config file found, or defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Candidate config file locations in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("bordercrop").join("config.toml"));
        }
        paths
    }

    /// Merge with command line values, which take precedence
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Result<BatchConfig, ConfigError> {
        let base_color = match cli.base_color.as_ref().or(self.base_color.as_ref()) {
            Some(text) => Some(text.parse::<Argb>()?),
            None => None,
        };

        Ok(BatchConfig {
            crop: CropOptions {
                tolerance: cli.tolerance.unwrap_or(self.tolerance),
                base_color,
            },
            suffix: cli.suffix.clone().unwrap_or_else(|| self.suffix.clone()),
            jpeg_quality: cli.jpeg_quality.unwrap_or(self.jpeg_quality).clamp(1, 100),
            threads: cli.threads.or(self.threads),
            closeness_map: cli.closeness_map.unwrap_or(self.closeness_map),
        })
    }
}

/// Values explicitly given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub tolerance: Option<f64>,
    pub base_color: Option<String>,
    pub suffix: Option<String>,
    pub jpeg_quality: Option<u8>,
    pub threads: Option<usize>,
    pub closeness_map: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Effective settings for a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub crop: CropOptions,
    pub suffix: String,
    pub jpeg_quality: u8,
    pub threads: Option<usize>,
    pub closeness_map: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            crop: CropOptions::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            threads: None,
            closeness_map: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.suffix, "-c");
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.base_color.is_none());
        assert!(!config.closeness_map);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let config = Config::from_toml("tolerance = 0.05\nbase_color = \"255,255,255\"\n").unwrap();
        assert_eq!(config.tolerance, 0.05);
        assert_eq!(config.base_color.as_deref(), Some("255,255,255"));
        assert_eq!(config.suffix, DEFAULT_SUFFIX);
    }

    #[test]
    fn test_config_from_toml_invalid() {
        assert!(matches!(
            Config::from_toml("tolerance = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "suffix = \"-cropped\"\njpeg_quality = 75").unwrap();
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.suffix, "-cropped");
        assert_eq!(config.jpeg_quality, 75);
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/bordercrop.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_merge_cli_takes_precedence() {
        let config = Config {
            tolerance: 0.2,
            base_color: Some("0,0,0".to_string()),
            threads: Some(2),
            ..Default::default()
        };
        let overrides = CliOverrides {
            tolerance: Some(0.01),
            base_color: Some("128,1,2,3".to_string()),
            jpeg_quality: Some(150),
            ..Default::default()
        };
        let merged = config.merge_with_cli(&overrides).unwrap();
        assert_eq!(merged.crop.tolerance, 0.01);
        assert_eq!(merged.crop.base_color, Some(Argb::new(128, 1, 2, 3)));
        assert_eq!(merged.jpeg_quality, 100);
        assert_eq!(merged.threads, Some(2));
        assert_eq!(merged.suffix, DEFAULT_SUFFIX);
    }

    #[test]
    fn test_merge_uses_file_values() {
        let config = Config {
            base_color: Some("10,20,30".to_string()),
            closeness_map: true,
            ..Default::default()
        };
        let merged = config.merge_with_cli(&CliOverrides::new()).unwrap();
        assert_eq!(merged.crop.base_color, Some(Argb::rgb(10, 20, 30)));
        assert!(merged.closeness_map);
    }

    #[test]
    fn test_merge_rejects_bad_color() {
        let config = Config {
            base_color: Some("1,2".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.merge_with_cli(&CliOverrides::new()),
            Err(ConfigError::InvalidBaseColor(_))
        ));
    }
}
