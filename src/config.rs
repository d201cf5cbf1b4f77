use crate::display::DisplayType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("usage: shop_display <scenario.yml> [config.yml] [log_dir]")]
    Usage,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Display behaviour, handed to factories and controllers at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Numeric display type id, see [`DisplayType::from_id`].
    pub display_type: u8,
    /// Keep or derive a visible name on marker items; `false` clears it.
    pub use_custom_name: bool,
    /// Per-axis distance a marker may drift before it counts as moved.
    pub move_tolerance: f64,
    /// Chunks around the display chunk searched for duplicates.
    pub dedup_radius: u8,
    /// Watcher passes between duplicate scans; 0 scans on every pass.
    pub dedup_interval: u32,
    pub flag_cache_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            display_type: 0,
            use_custom_name: true,
            move_tolerance: 0.001,
            dedup_radius: 1,
            dedup_interval: 10,
            flag_cache_size: 256,
        }
    }
}

impl DisplayConfig {
    pub fn display_type(&self) -> DisplayType {
        DisplayType::from_id(self.display_type)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
pub struct AppConfig {
    pub scenario: PathBuf,
    pub display: DisplayConfig,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        if args.len() < 2 {
            return Err(ConfigError::Usage);
        }

        let scenario = Path::new(&args[1]).to_path_buf();
        let display = match args.get(2) {
            Some(path) => DisplayConfig::load(Path::new(path))?,
            None => DisplayConfig::default(),
        };
        let log_dir = match args.get(3) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::var("SHOP_DISPLAY_LOG_DIR")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("log")),
        };
        Ok(Self {
            scenario,
            display,
            log_dir,
        })
    }
}
