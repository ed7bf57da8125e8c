//! Settings Module
//! Input locations, chart sizes and logging level, with an optional JSON override.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "sales_charts.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Run settings. Every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub orders_path: PathBuf,
    pub products_path: PathBuf,
    pub top_products_path: PathBuf,
    /// Where rendered charts are written before display.
    pub output_dir: Option<PathBuf>,
    pub open_charts: bool,
    pub log_level: String,
    pub infer_schema_length: usize,
    pub heatmap_size: (u32, u32),
    pub top_products_size: (u32, u32),
    pub bubble_size: (u32, u32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orders_path: PathBuf::from("orders.csv"),
            products_path: PathBuf::from("products.csv"),
            top_products_path: PathBuf::from("top_five_products_each_category.csv"),
            output_dir: None,
            open_charts: true,
            log_level: "info".to_string(),
            infer_schema_length: 10000,
            heatmap_size: (1800, 600),
            top_products_size: (1200, 600),
            bubble_size: (1200, 600),
        }
    }
}

impl Settings {
    /// Load settings from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolved chart output directory.
    pub fn chart_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("sales_charts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.orders_path, PathBuf::from("orders.csv"));
        assert_eq!(settings.heatmap_size, (1800, 600));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "orders_path": "data/o.csv", "open_charts": false, "bubble_size": [800, 400] }"#,
        )
        .unwrap();

        let settings = Settings::load_or_default(&path).unwrap();
        assert_eq!(settings.orders_path, PathBuf::from("data/o.csv"));
        assert!(!settings.open_charts);
        assert_eq!(settings.bubble_size, (800, 400));
        assert_eq!(settings.products_path, PathBuf::from("products.csv"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "orders": "o.csv" }"#).unwrap();

        let err = Settings::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn chart_dir_prefers_configured_directory() {
        let settings = Settings {
            output_dir: Some(PathBuf::from("out")),
            ..Settings::default()
        };
        assert_eq!(settings.chart_dir(), PathBuf::from("out"));
        assert!(Settings::default().chart_dir().ends_with("sales_charts"));
    }
}
