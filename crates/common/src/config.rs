//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::aspect::AspectMode;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where exported posters are written.
    pub output_dir: PathBuf,

    /// Template overrides. Bundled templates are used when unset.
    pub templates: TemplatePaths,

    /// Default export settings.
    pub export: ExportDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Optional template image files, one per aspect mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    /// Overlay for landscape (4:3) posters.
    pub landscape: Option<PathBuf>,

    /// Overlay for portrait (3:4) posters.
    pub portrait: Option<PathBuf>,
}

/// Default export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Aspect mode used when none is given ("landscape" or "portrait").
    pub default_aspect_mode: AspectMode,

    /// Pause between consecutive posters of a batch, in milliseconds.
    pub batch_delay_ms: u64,

    /// What a batch does when one poster fails
    /// ("skip_and_continue" or "abort").
    pub failure_policy: BatchFailurePolicy,
}

/// What a batch does when one poster cannot be produced or delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Log the failure, record it in the report, continue with the next item.
    #[default]
    #[serde(alias = "skip")]
    SkipAndContinue,
    /// Stop the batch and return the error.
    Abort,
}

impl FromStr for BatchFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "skip_and_continue" | "skip" => Ok(Self::SkipAndContinue),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "Unknown failure policy: {other}. Use: skip, abort"
            )),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "poster_render=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs_default_exports(),
            templates: TemplatePaths::default(),
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            default_aspect_mode: AspectMode::Landscape,
            batch_delay_ms: 300,
            failure_policy: BatchFailurePolicy::SkipAndContinue,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("poster-studio").join("config.json")
}

/// Default export directory.
fn dirs_default_exports() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("poster-studio").join("exports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.export.default_aspect_mode, AspectMode::Landscape);
        assert_eq!(config.export.batch_delay_ms, 300);
        assert_eq!(
            config.export.failure_policy,
            BatchFailurePolicy::SkipAndContinue
        );
        assert!(config.templates.landscape.is_none());
        assert!(config.output_dir.ends_with("poster-studio/exports"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"export":{"batch_delay_ms":50}}"#).unwrap();
        assert_eq!(parsed.export.batch_delay_ms, 50);
        assert_eq!(parsed.export.default_aspect_mode, AspectMode::Landscape);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("poster_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.export.default_aspect_mode = AspectMode::Portrait;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.export.default_aspect_mode, AspectMode::Portrait);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_export_values_are_rejected() {
        for json in [
            r#"{"export":{"failure_policy":"retry"}}"#,
            r#"{"export":{"default_aspect_mode":"square"}}"#,
        ] {
            assert!(serde_json::from_str::<AppConfig>(json).is_err(), "{json}");
        }

        let parsed: AppConfig = serde_json::from_str(
            r#"{"export":{"default_aspect_mode":"portrait","failure_policy":"abort"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.export.default_aspect_mode, AspectMode::Portrait);
        assert_eq!(parsed.export.failure_policy, BatchFailurePolicy::Abort);
    }

    #[test]
    fn test_bad_policy_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("poster_test_config_bad_policy");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"export":{"batch_delay_ms":10,"failure_policy":"retry"}}"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.export.batch_delay_ms, 300);
        assert_eq!(
            loaded.export.failure_policy,
            BatchFailurePolicy::SkipAndContinue
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "skip".parse::<BatchFailurePolicy>(),
            Ok(BatchFailurePolicy::SkipAndContinue)
        );
        assert_eq!(
            "skip-and-continue".parse::<BatchFailurePolicy>(),
            Ok(BatchFailurePolicy::SkipAndContinue)
        );
        assert_eq!(
            "Abort".parse::<BatchFailurePolicy>(),
            Ok(BatchFailurePolicy::Abort)
        );
        assert!("retry".parse::<BatchFailurePolicy>().is_err());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&BatchFailurePolicy::SkipAndContinue).unwrap();
        assert_eq!(json, "\"skip_and_continue\"");
        let skip: BatchFailurePolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(skip, BatchFailurePolicy::SkipAndContinue);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("poster_test_config_bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.export.batch_delay_ms, 300);

        std::fs::remove_dir_all(&dir).ok();
    }
}
