//! # leap-i18n
//!
//! Runtime side of the InputLeap GUI translations: the active-catalog
//! [`Translator`](application::translator::Translator), catalog reports, the
//! `res/lang` directory source, configuration, and system-locale detection.
//!
//! The catalog model itself lives in [`leap_i18n_core`].

pub mod application;
pub mod infrastructure;

pub use application::report::{CatalogReport, PlaceholderMismatch};
pub use application::translator::{load_catalog_set, CatalogSource, SourceError, Translator};
pub use infrastructure::catalog_dir::DirectoryCatalogSource;
pub use infrastructure::storage::config::{AppConfig, CatalogConfig, ConfigError, GeneralConfig};
pub use infrastructure::system_locale::system_locale;
