//! TOML-based configuration for the translation tooling.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\InputLeap\i18n.toml`
//! - Linux:    `~/.config/inputleap/i18n.toml`
//! - macOS:    `~/Library/Application Support/InputLeap/i18n.toml`
//!
//! # What is TOML? (for beginners)
//!
//! TOML (Tom's Obvious Minimal Language) is a configuration file format designed
//! to be easy to read and write.  It looks similar to INI files but with more
//! data types.  Example:
//!
//! ```toml
//! [general]
//! language = "cs-CZ"
//! log_level = "info"
//!
//! [catalogs]
//! directory = "res/lang"
//! file_prefix = "gui_"
//! untyped_status = "finished"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so an empty or
//! missing file is a valid configuration.

use std::path::{Path, PathBuf};

use leap_i18n_core::{LoadOptions, LocaleError, LocaleTag, TranslationStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalogs: CatalogConfig,
}

/// Language choice and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Requested UI language, e.g. `"cs-CZ"`.  Empty means the system locale.
    #[serde(default)]
    pub language: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the catalogs live and how they are read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Directory holding `gui_<tag>.ts` files and `Languages.xml`.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// File name prefix before the language tag.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Name of the language list inside `directory`.
    #[serde(default = "default_languages_file")]
    pub languages_file: String,
    /// Status of translations written without a `type` attribute.
    #[serde(default = "default_untyped_status")]
    pub untyped_status: TranslationStatus,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_directory() -> PathBuf {
    PathBuf::from("res").join("lang")
}
fn default_file_prefix() -> String {
    "gui_".to_string()
}
fn default_languages_file() -> String {
    "Languages.xml".to_string()
}
fn default_untyped_status() -> TranslationStatus {
    TranslationStatus::Finished
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: String::new(),
            log_level: default_log_level(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: default_file_prefix(),
            languages_file: default_languages_file(),
            untyped_status: default_untyped_status(),
        }
    }
}

impl GeneralConfig {
    /// The configured language, or `None` when the system locale applies.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] when `language` is set but malformed.
    pub fn requested_language(&self) -> Result<Option<LocaleTag>, LocaleError> {
        match self.language.trim() {
            "" => Ok(None),
            tag => LocaleTag::parse(tag).map(Some),
        }
    }
}

impl CatalogConfig {
    /// Loader options derived from this section.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().with_untyped_status(self.untyped_status)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("i18n.toml"))
}

/// Loads `AppConfig` from the platform config file, returning the defaults
/// if the file does not yet exist.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning the defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory including the `InputLeap`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("InputLeap"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("inputleap"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("InputLeap")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
