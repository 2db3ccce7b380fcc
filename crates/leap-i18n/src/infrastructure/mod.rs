//! Infrastructure layer.
//!
//! Contains the OS-facing adapters: the catalog directory, configuration
//! storage, and system-locale detection.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `leap_i18n_core`, but MUST NOT be imported by the `application` layer.

pub mod catalog_dir;
pub mod storage;
pub mod system_locale;
