//! Application configuration, loaded from a TOML file.
//!
//! Every section and key is optional; missing values take the defaults
//! below. A missing file is not an error.
//!
//! ```toml
//! [api]
//! base_url = "https://cms.example.com"
//! request_timeout_secs = 10
//!
//! [editor]
//! history_limit = 50
//! debounce_ms = 100
//!
//! [logging]
//! level = "info"
//! directory = "/var/log/mediagallery"
//!
//! [preferences]
//! path = "/home/me/.local/share/mediagallery/preferences.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Read { path: String, message: String },
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    pub api: ApiConfig,
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
    pub preferences: PreferencesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            editor: EditorConfig::default(),
            logging: LoggingConfig::default(),
            preferences: PreferencesConfig::default(),
        }
    }
}

/// `[api]`: CMS endpoint and transport settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ApiConfig {
    /// Origin of the CMS, without a trailing slash.
    pub base_url: String,
    /// Client-side timeout for every request. No retries are attempted.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `[editor]`: edit session tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EditorConfig {
    /// Entries kept per undo track; `0` keeps everything.
    pub history_limit: usize,
    /// Quiet period before a cache refresh during drags.
    pub debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: crate::editor::history::DEFAULT_HISTORY_LIMIT,
            debounce_ms: 100,
        }
    }
}

impl EditorConfig {
    /// `None` means unbounded.
    pub fn history_limit(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Log directory; defaults to the OS data dir.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// `[preferences]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PreferencesConfig {
    /// Preference store file; defaults to the OS data dir.
    pub path: Option<PathBuf>,
}

/// Default config location:
///   Linux    ~/.config/mediagallery/config.toml
///   macOS    ~/Library/Application Support/mediagallery/config.toml
///   Windows  %APPDATA%\mediagallery\config.toml
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("mediagallery")
        .join("config.toml")
}

/// Parse a TOML string into an [`AppConfig`], running validation.
pub fn parse(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Load and validate the config at `path`. A missing file yields defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    let url = cfg.api.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "api.base_url must start with http:// or https://, got '{url}'"
        )));
    }

    if cfg.api.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "api.request_timeout_secs must be greater than zero".to_string(),
        ));
    }

    if cfg.logging.level.trim().is_empty() {
        return Err(ConfigError::Invalid("logging.level must not be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse("").expect("empty config is valid");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.api.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.editor.history_limit(), Some(50));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(
            r#"
[api]
base_url = "https://cms.example.com"

[editor]
history_limit = 0
"#,
        )
        .expect("valid config");
        assert_eq!(cfg.api.base_url, "https://cms.example.com");
        assert_eq!(cfg.api.request_timeout_secs, 10);
        assert_eq!(cfg.editor.history_limit(), None);
        assert_eq!(cfg.editor.debounce(), Duration::from_millis(100));
    }

    #[test]
    fn invalid_toml_returns_parse_error() {
        let result = parse("this is not valid toml ::::");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let result = parse("[api]\nbase_url = \"ftp://cms\"");
        let err = result.expect_err("ftp is not allowed");
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = parse("[api]\nrequest_timeout_secs = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").expect("write config");
        let cfg = load(&path).expect("load");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn load_directory_is_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
