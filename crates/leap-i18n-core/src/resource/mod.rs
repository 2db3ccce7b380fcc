//! Readers for the translation resource files shipped with the GUI.
//!
//! - [`ts`] reads Qt Linguist `.ts` catalogs into a [`crate::Catalog`].
//! - [`languages`] reads `Languages.xml`, the language picker entries.
//!
//! Both sit on [`tree`], a strict element-tree reader, and report problems as
//! [`error::CatalogParseError`] with a line and column.

pub mod error;
pub mod languages;
pub mod ts;
pub mod tree;
