//! Reader for Qt Linguist `.ts` translation files.
//!
//! # File layout (for beginners)
//!
//! ```text
//! <TS version="2.1" language="cs-CZ" sourcelanguage="en">
//!   <context>
//!     <name>AboutDialog</name>                  ← context name
//!     <message>
//!       <location filename="res/AboutDialog.ui" line="38"/>
//!       <source>About InputLeap</source>        ← English text (lookup key)
//!       <translation type="unfinished"></translation>
//!     </message>
//!   </context>
//! </TS>
//! ```
//!
//! The `type` attribute of `<translation>` drives the status:
//!
//! | `type`                  | status                                   |
//! |-------------------------|------------------------------------------|
//! | absent                  | [`LoadOptions::untyped_status`] (Finished) |
//! | `unfinished`            | Unfinished                               |
//! | `obsolete`, `vanished`  | Obsolete                                 |
//! | `finished`              | Finished                                 |
//!
//! Qt Linguist only writes `type` for entries that are *not* done, so a
//! translation without it is a reviewed one.  The Hungarian catalog is
//! written entirely that way.

use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, info};

use crate::domain::catalog::{Catalog, CatalogBuilder, LocationHint, MessageEntry, TranslationStatus};
use crate::domain::locale::LocaleTag;
use crate::resource::error::CatalogParseError;
use crate::resource::tree::{read_document, Element};

/// Knobs for reading a `.ts` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Tag used when the file has no `language` attribute.
    pub default_language: Option<LocaleTag>,
    /// Status given to a `<translation>` that has no `type` attribute.
    pub untyped_status: TranslationStatus,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_language: None,
            untyped_status: TranslationStatus::Finished,
        }
    }
}

impl LoadOptions {
    pub fn with_default_language(mut self, tag: LocaleTag) -> Self {
        self.default_language = Some(tag);
        self
    }

    pub fn with_untyped_status(mut self, status: TranslationStatus) -> Self {
        self.untyped_status = status;
        self
    }
}

/// Parses a complete `.ts` document held in memory.
///
/// # Errors
///
/// Returns the first [`CatalogParseError`] encountered; nothing is returned
/// for a partially valid file.
///
/// # Example
///
/// ```rust
/// use leap_i18n_core::resource::ts::{parse_catalog, LoadOptions};
///
/// let ts = br#"<TS language="hr-HR"><context><name>AboutDialog</name>
///   <message><source>Unknown</source><translation>Nepoznato</translation></message>
/// </context></TS>"#;
/// let catalog = parse_catalog(ts, &LoadOptions::default()).unwrap();
/// assert_eq!(catalog.resolve("AboutDialog", "Unknown"), "Nepoznato");
/// ```
pub fn parse_catalog(bytes: &[u8], options: &LoadOptions) -> Result<Catalog, CatalogParseError> {
    read_catalog(bytes, options)
}

/// Parses a `.ts` document from any reader.
pub fn read_catalog<R: Read>(source: R, options: &LoadOptions) -> Result<Catalog, CatalogParseError> {
    let root = read_document(source)?;
    if root.name != "TS" {
        return Err(CatalogParseError::UnexpectedRoot {
            expected: "TS",
            found: root.name,
            position: root.position,
        });
    }

    let language = match tag_attribute(&root, "language")? {
        Some(tag) => tag,
        None => options
            .default_language
            .clone()
            .ok_or(CatalogParseError::MissingAttribute {
                element: "TS",
                attribute: "language",
                position: root.position,
            })?,
    };

    let mut builder = Catalog::builder(language);
    if let Some(source_language) = tag_attribute(&root, "sourcelanguage")? {
        builder.source_language(source_language);
    }
    if let Some(version) = root.attribute("version") {
        builder.format_version(version);
    }

    let mut root_locations = LocationState::default();
    for child in root.elements() {
        match child.name.as_str() {
            "context" => read_context(child, options, &mut builder)?,
            "message" => read_message(child, "", options, &mut root_locations, &mut builder)?,
            other => debug!("skipping <{other}> at {}", child.position),
        }
    }

    let catalog = builder.build();
    info!(
        "loaded {} catalog: {} messages in {} contexts",
        catalog.language_tag(),
        catalog.len(),
        catalog.contexts().len()
    );
    Ok(catalog)
}

/// Reads an optional locale-tag attribute; an empty value counts as absent.
fn tag_attribute(element: &Element, attribute: &'static str) -> Result<Option<LocaleTag>, CatalogParseError> {
    match element.attribute(attribute).map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => LocaleTag::parse(value)
            .map(Some)
            .map_err(|_| CatalogParseError::InvalidAttribute {
                element: "TS",
                attribute,
                value: value.to_string(),
                position: element.position,
            }),
    }
}

fn read_context(
    context: &Element,
    options: &LoadOptions,
    builder: &mut CatalogBuilder,
) -> Result<(), CatalogParseError> {
    let name = context
        .child("name")
        .ok_or(CatalogParseError::MissingElement {
            parent: "context",
            element: "name",
            position: context.position,
        })?
        .text()?;
    builder.begin_context(&name);

    let mut locations = LocationState::default();
    for message in context.elements().filter(|e| e.name == "message") {
        read_message(message, &name, options, &mut locations, builder)?;
    }
    Ok(())
}

fn read_message(
    message: &Element,
    context: &str,
    options: &LoadOptions,
    locations: &mut LocationState,
    builder: &mut CatalogBuilder,
) -> Result<(), CatalogParseError> {
    let source_text = message
        .child("source")
        .ok_or(CatalogParseError::MissingElement {
            parent: "message",
            element: "source",
            position: message.position,
        })?
        .text()?;

    let (translation_text, status) = match message.child("translation") {
        Some(translation) => (translation_text(translation)?, translation_status(translation, options)?),
        None => (String::new(), TranslationStatus::Unfinished),
    };

    let mut entry = MessageEntry::new(context, source_text, translation_text, status);
    entry.id = message.attribute("id").map(str::to_string);
    entry.old_source_text = optional_text(message, "oldsource")?;
    entry.comment = optional_text(message, "comment")?;
    entry.extra_comment = optional_text(message, "extracomment")?;
    entry.translator_comment = optional_text(message, "translatorcomment")?;
    for location in message.elements().filter(|e| e.name == "location") {
        entry.locations.push(locations.resolve(location)?);
    }

    builder.push(entry);
    Ok(())
}

fn translation_status(
    translation: &Element,
    options: &LoadOptions,
) -> Result<TranslationStatus, CatalogParseError> {
    match translation.attribute("type") {
        None => Ok(options.untyped_status),
        Some("unfinished") => Ok(TranslationStatus::Unfinished),
        Some("obsolete") | Some("vanished") => Ok(TranslationStatus::Obsolete),
        Some("finished") => Ok(TranslationStatus::Finished),
        Some(other) => Err(CatalogParseError::InvalidAttribute {
            element: "translation",
            attribute: "type",
            value: other.to_string(),
            position: translation.position,
        }),
    }
}

/// Translation text; plural and length-variant forms contribute their first
/// form only.
fn translation_text(translation: &Element) -> Result<String, CatalogParseError> {
    let variant = translation
        .child("numerusform")
        .or_else(|| translation.child("lengthvariant"));
    match variant {
        Some(first) => first.text(),
        None => translation.text(),
    }
}

fn optional_text(message: &Element, name: &str) -> Result<Option<String>, CatalogParseError> {
    message.child(name).map(Element::text).transpose()
}

// ── Location hints ────────────────────────────────────────────────────────────

/// Tracks the previous `<location>` within one context so relative hints
/// (`line="+3"`, missing `filename`) can be made absolute.
#[derive(Debug, Default)]
struct LocationState {
    current_file: Option<String>,
    last_line: HashMap<String, i64>,
}

impl LocationState {
    fn resolve(&mut self, location: &Element) -> Result<LocationHint, CatalogParseError> {
        if let Some(file) = location.attribute("filename") {
            self.current_file = Some(file.to_string());
        }
        let file_key = self.current_file.clone().unwrap_or_default();

        let line = match location.attribute("line") {
            None => None,
            Some(raw) => {
                let invalid = || CatalogParseError::InvalidAttribute {
                    element: "location",
                    attribute: "line",
                    value: raw.to_string(),
                    position: location.position,
                };
                let absolute = if raw.starts_with('+') || raw.starts_with('-') {
                    let delta: i64 = raw.parse().map_err(|_| invalid())?;
                    self.last_line
                        .get(&file_key)
                        .copied()
                        .unwrap_or(0)
                        .checked_add(delta)
                        .ok_or_else(invalid)?
                } else {
                    raw.parse().map_err(|_| invalid())?
                };
                let line = u32::try_from(absolute).map_err(|_| invalid())?;
                self.last_line.insert(file_key, absolute);
                Some(line)
            }
        };

        Ok(LocationHint {
            file: self.current_file.clone(),
            line,
        })
    }
}
