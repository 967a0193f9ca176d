//! Configuration management for bookmeta using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;

/// Default folder scanned for PDFs when nothing else is configured.
pub const DEFAULT_INPUT_DIR: &str = "pdfs";

/// Default folder the exports are written to.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Text acquisition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Leading pages inspected for embedded text.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Leading pages OCRed when no page had embedded text.
    #[serde(default = "default_ocr_max_pages")]
    pub ocr_max_pages: u32,
    /// Rasterization resolution for OCR.
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,
    #[serde(default = "default_primary_language")]
    pub ocr_primary_language: String,
    /// Combined with the primary language for the first OCR pass.
    #[serde(default = "default_secondary_language")]
    pub ocr_secondary_language: Option<String>,
    /// The language model is consulted only when the body text has more
    /// non-whitespace characters than this.
    #[serde(default = "default_min_body_chars")]
    pub min_body_chars: usize,
    #[serde(default = "default_true")]
    pub ocr_enabled: bool,
}

fn default_max_pages() -> u32 {
    5
}

fn default_ocr_max_pages() -> u32 {
    3
}

fn default_ocr_dpi() -> u32 {
    200
}

fn default_primary_language() -> String {
    "eng".to_string()
}

fn default_secondary_language() -> Option<String> {
    Some("hin".to_string())
}

fn default_min_body_chars() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            ocr_max_pages: default_ocr_max_pages(),
            ocr_dpi: default_ocr_dpi(),
            ocr_primary_language: default_primary_language(),
            ocr_secondary_language: default_secondary_language(),
            min_body_chars: default_min_body_chars(),
            ocr_enabled: true,
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Folder containing the PDFs to process.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "input")]
    pub input_dir: Option<String>,
    /// Folder the CSV and JSON exports are written to.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "output")]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Language model settings for structured extraction.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults (with env overrides) when no file is found or
    /// the discovered file cannot be parsed.
    pub async fn load() -> Self {
        match prefer::load("bookmeta").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => {
                tracing::debug!("No bookmeta config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// The format is chosen by extension: TOML, YAML, or JSON otherwise.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Input folder, resolved against the config file or the CWD.
    pub fn input_path(&self) -> PathBuf {
        self.resolve_configured(self.input_dir.as_deref().unwrap_or(DEFAULT_INPUT_DIR))
    }

    /// Output folder, resolved against the config file or the CWD.
    pub fn output_path(&self) -> PathBuf {
        self.resolve_configured(self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    fn resolve_configured(&self, path_str: &str) -> PathBuf {
        let base_dir = self
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        self.resolve_path(path_str, &base_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.ocr_max_pages, 3);
        assert_eq!(config.ocr_dpi, 200);
        assert_eq!(config.ocr_primary_language, "eng");
        assert_eq!(config.ocr_secondary_language.as_deref(), Some("hin"));
        assert_eq!(config.min_body_chars, 100);
        assert!(config.ocr_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::parse(
            "input_dir = \"~/books\"\n[extraction]\nmax_pages = 2\n",
            "toml",
        )
        .unwrap();
        assert_eq!(config.input_dir.as_deref(), Some("~/books"));
        assert_eq!(config.extraction.max_pages, 2);
        assert_eq!(config.extraction.ocr_max_pages, 3);
    }

    #[test]
    fn test_yaml_and_json() {
        let yaml = Config::parse("output_dir: out\nextraction:\n  ocr_enabled: false\n", "yml")
            .unwrap();
        assert_eq!(yaml.output_dir.as_deref(), Some("out"));
        assert!(!yaml.extraction.ocr_enabled);

        let json = Config::parse(r#"{"extraction": {"ocr_dpi": 300}}"#, "json").unwrap();
        assert_eq!(json.extraction.ocr_dpi, 300);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let err = Config::parse("max_pages = [", "toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[tokio::test]
    async fn test_load_from_path_resolves_relative_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmeta.toml");
        std::fs::write(&path, "input_dir = \"scans\"\noutput_dir = \"/tmp/out\"\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.input_path(), dir.path().join("scans"));
        assert_eq!(config.output_path(), PathBuf::from("/tmp/out"));
    }

    #[tokio::test]
    async fn test_load_from_missing_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/bookmeta.toml")).await;
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_resolve_path_expands_tilde() {
        let config = Config::default();
        let resolved = config.resolve_path("~/pdfs", Path::new("/base"));
        assert!(!resolved.to_string_lossy().starts_with('~'));
        assert_eq!(
            config.resolve_path("rel", Path::new("/base")),
            PathBuf::from("/base/rel")
        );
    }
}
