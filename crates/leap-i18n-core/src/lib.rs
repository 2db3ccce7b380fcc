//! # leap-i18n-core
//!
//! Translation catalogs for the InputLeap GUI: the catalog model, the
//! resolver, positional placeholder formatting, locale negotiation, and
//! readers for the Qt Linguist `.ts` files the GUI ships.
//!
//! This crate does no file-system access of its own; callers hand it bytes
//! or a reader.  The `leap-i18n` crate adds the active-catalog handle, the
//! catalog directory, configuration, and the command-line tool.
//!
//! # How a string gets translated (for beginners)
//!
//! Every GUI string is identified by a **context** (usually the dialog class,
//! e.g. `AboutDialog`) and its **English source text**.  A catalog for one
//! language maps that pair to a translation.  Three steps turn a call site
//! into display text:
//!
//! 1. **Pick a catalog** for the user's locale ([`negotiate`]): exact tag,
//!    then same language, then no catalog at all (English).
//! 2. **Resolve** the pair ([`Catalog::resolve`]): only finished, non-empty
//!    translations are shown; everything else falls back to the English
//!    source text, so the GUI never shows an empty label.
//! 3. **Format** the result ([`format()`]): `%1`, `%2`, … are replaced by
//!    arguments, in whatever order the translation puts them.
//!
//! ```rust
//! use leap_i18n_core::{format, parse_catalog, LoadOptions};
//!
//! let ts = r#"<TS language="cs-CZ"><context><name>MainWindow</name>
//!   <message>
//!     <source>InputLeap terminated unexpectedly with an exit code of %1.</source>
//!     <translation type="finished">Neočekávané ukončení InputLeap. Běh skončil s kódem %1.</translation>
//!   </message>
//! </context></TS>"#;
//!
//! let catalog = parse_catalog(ts.as_bytes(), &LoadOptions::default()).unwrap();
//! let text = catalog.resolve(
//!     "MainWindow",
//!     "InputLeap terminated unexpectedly with an exit code of %1.",
//! );
//! assert_eq!(format(text, &["3"]), "Neočekávané ukončení InputLeap. Běh skončil s kódem 3.");
//! ```

pub mod domain;
pub mod format;
pub mod resource;

// Re-export the most-used types at the crate root so callers can write
// `leap_i18n_core::Catalog` instead of `leap_i18n_core::domain::catalog::Catalog`.
pub use domain::catalog::{
    Catalog, CatalogBuilder, CatalogStats, LocationHint, MessageEntry, MessageKey,
    TranslationStatus,
};
pub use domain::catalog_set::CatalogSet;
pub use domain::locale::{negotiate, LocaleError, LocaleMatch, LocaleTag, SOURCE_LANGUAGE};
pub use domain::message::Message;
pub use format::{format, placeholders};
pub use resource::error::{CatalogParseError, Position};
pub use resource::languages::{parse_language_list, read_language_list, LanguageInfo};
pub use resource::ts::{parse_catalog, read_catalog, LoadOptions};
