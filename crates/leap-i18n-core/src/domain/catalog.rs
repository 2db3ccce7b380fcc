//! The translation catalog: every message of one target language, indexed by
//! `(context, source_text)`.
//!
//! # Resolution rule (for beginners)
//!
//! Translators rarely finish a catalog.  Many entries in every shipped
//! language are still marked `unfinished` with an empty translation, and a
//! few are `obsolete` leftovers kept only so the translation tool can offer
//! them as suggestions.  The GUI must never show an empty label because of
//! that, so [`Catalog::resolve`] follows one rule:
//!
//! ```text
//! entry found, status Finished, translation non-empty  →  translation
//! anything else                                        →  English source text
//! ```
//!
//! Obsolete entries are stored (reports count them) but never indexed, so a
//! lookup cannot reach them.
//!
//! # Lifecycle
//!
//! A catalog is assembled once through [`CatalogBuilder`] and never mutated
//! afterwards.  Switching language builds a whole new catalog and swaps it in;
//! there is no partial update.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::locale::LocaleTag;
use crate::domain::message::Message;

/// Translation state of a message entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// Reviewed translation, shown to users when non-empty.
    Finished,
    /// Work in progress; never shown.
    Unfinished,
    /// Source string no longer exists in the GUI; never looked up.
    Obsolete,
}

/// One diagnostic `(file, line)` pointer to where a message is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationHint {
    /// Source file relative to the GUI project, e.g. `res/AboutDialog.ui`.
    pub file: Option<String>,
    /// 1-based line in `file`.
    pub line: Option<u32>,
}

/// A single `(context, source_text) → translation` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    /// Logical UI group, usually the dialog class name.
    pub context: String,
    /// English text exactly as authored; half of the lookup key.
    pub source_text: String,
    /// Localized replacement; may be empty.
    pub translation_text: String,
    pub status: TranslationStatus,
    /// Previous source text the translation was made against.
    pub old_source_text: Option<String>,
    /// Disambiguation note written by the developer.
    pub comment: Option<String>,
    /// Extra note for translators.
    pub extra_comment: Option<String>,
    /// Note left by the translator.
    pub translator_comment: Option<String>,
    /// Qt id-based message identifier.
    pub id: Option<String>,
    pub locations: Vec<LocationHint>,
}

impl MessageEntry {
    /// Creates an entry with no diagnostic metadata.
    pub fn new(
        context: impl Into<String>,
        source_text: impl Into<String>,
        translation_text: impl Into<String>,
        status: TranslationStatus,
    ) -> Self {
        Self {
            context: context.into(),
            source_text: source_text.into(),
            translation_text: translation_text.into(),
            status,
            old_source_text: None,
            comment: None,
            extra_comment: None,
            translator_comment: None,
            id: None,
            locations: Vec::new(),
        }
    }

    /// The translation, if it may be shown to users.
    pub fn usable_translation(&self) -> Option<&str> {
        (self.status == TranslationStatus::Finished && !self.translation_text.is_empty())
            .then_some(self.translation_text.as_str())
    }
}

/// A `(context, source_text)` pair that appeared more than once in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MessageKey {
    pub context: String,
    pub source_text: String,
}

/// Entry counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Finished entries with a non-empty translation.
    pub finished: usize,
    /// Entries marked finished whose translation is empty.
    pub empty_finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
}

impl CatalogStats {
    /// Entries that are still part of the GUI (everything but obsolete).
    pub fn active(&self) -> usize {
        self.finished + self.empty_finished + self.unfinished
    }
}

/// Immutable set of localized strings for one target language.
///
/// `Catalog` is `Send + Sync`; share it across threads behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use leap_i18n_core::{Catalog, LocaleTag, MessageEntry, TranslationStatus};
///
/// let mut builder = Catalog::builder(LocaleTag::parse("cs-CZ").unwrap());
/// builder.push(MessageEntry::new("AboutDialog", "Unknown", "Neznámá", TranslationStatus::Finished));
/// builder.push(MessageEntry::new("AboutDialog", "Version:", "", TranslationStatus::Unfinished));
/// let catalog = builder.build();
///
/// assert_eq!(catalog.resolve("AboutDialog", "Unknown"), "Neznámá");
/// assert_eq!(catalog.resolve("AboutDialog", "Version:"), "Version:");
/// assert_eq!(catalog.resolve("MainWindow", "&Start"), "&Start");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    language_tag: LocaleTag,
    source_language_tag: LocaleTag,
    format_version: Option<String>,
    entries: Vec<MessageEntry>,
    /// context → source text → position in `entries`.
    index: HashMap<String, HashMap<String, usize>>,
    ids: HashMap<String, usize>,
    contexts: Vec<String>,
    merged_contexts: Vec<String>,
    duplicate_keys: Vec<MessageKey>,
}

impl Catalog {
    /// Starts building a catalog for `language_tag`.
    pub fn builder(language_tag: LocaleTag) -> CatalogBuilder {
        CatalogBuilder::new(language_tag)
    }

    /// An empty catalog in which every lookup falls back to source text.
    pub fn source_only(source_language_tag: LocaleTag) -> Self {
        let mut builder = CatalogBuilder::new(source_language_tag.clone());
        builder.source_language(source_language_tag);
        builder.build()
    }

    pub fn language_tag(&self) -> &LocaleTag {
        &self.language_tag
    }

    pub fn source_language_tag(&self) -> &LocaleTag {
        &self.source_language_tag
    }

    /// The `version` attribute of the resource file, if any.
    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }

    /// Returns the entry for a key, excluding obsolete entries.
    pub fn lookup(&self, context: &str, source_text: &str) -> Option<&MessageEntry> {
        let position = *self.index.get(context)?.get(source_text)?;
        self.entries.get(position)
    }

    /// Returns the entry carrying a Qt message id, excluding obsolete entries.
    pub fn lookup_id(&self, id: &str) -> Option<&MessageEntry> {
        self.ids.get(id).and_then(|&position| self.entries.get(position))
    }

    /// Resolves `(context, source_text)` to the text to display.
    ///
    /// Returns the translation when the entry exists, is finished, and is
    /// non-empty; returns `source_text` unchanged otherwise.  Never fails.
    pub fn resolve<'a>(&'a self, context: &str, source_text: &'a str) -> &'a str {
        self.lookup(context, source_text)
            .and_then(MessageEntry::usable_translation)
            .unwrap_or(source_text)
    }

    /// Resolves a declared [`Message`].
    pub fn translate(&self, message: &Message) -> &str {
        self.resolve(message.context(), message.source())
    }

    /// All entries in file order, obsolete and duplicate ones included.
    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context names in first-seen order, each listed once.
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Context names whose messages were spread over more than one block.
    pub fn merged_contexts(&self) -> &[String] {
        &self.merged_contexts
    }

    /// Keys that appeared more than once; the first occurrence is used.
    pub fn duplicate_keys(&self) -> &[MessageKey] {
        &self.duplicate_keys
    }

    /// Counts entries by status.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for entry in &self.entries {
            match entry.status {
                TranslationStatus::Finished if entry.translation_text.is_empty() => {
                    stats.empty_finished += 1;
                }
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Obsolete => stats.obsolete += 1,
            }
        }
        stats
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Accumulates entries into a [`Catalog`].
///
/// Context blocks sharing a name are merged: the key is `(context,
/// source_text)`, so two `ScreenSettingsDialog` blocks simply contribute to
/// the same namespace.  When the same key appears twice the first
/// non-obsolete entry wins and the repeat is recorded in
/// [`Catalog::duplicate_keys`].
#[derive(Debug)]
pub struct CatalogBuilder {
    language_tag: LocaleTag,
    source_language_tag: LocaleTag,
    format_version: Option<String>,
    entries: Vec<MessageEntry>,
    index: HashMap<String, HashMap<String, usize>>,
    ids: HashMap<String, usize>,
    contexts: Vec<String>,
    seen_contexts: HashSet<String>,
    merged_contexts: Vec<String>,
    duplicate_keys: Vec<MessageKey>,
}

impl CatalogBuilder {
    fn new(language_tag: LocaleTag) -> Self {
        Self {
            language_tag,
            source_language_tag: LocaleTag::source(),
            format_version: None,
            entries: Vec::new(),
            index: HashMap::new(),
            ids: HashMap::new(),
            contexts: Vec::new(),
            seen_contexts: HashSet::new(),
            merged_contexts: Vec::new(),
            duplicate_keys: Vec::new(),
        }
    }

    /// Overrides the authoring language (defaults to `en`).
    pub fn source_language(&mut self, tag: LocaleTag) -> &mut Self {
        self.source_language_tag = tag;
        self
    }

    pub fn format_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.format_version = Some(version.into());
        self
    }

    /// Opens a context block.  Reopening a name already seen marks it merged.
    pub fn begin_context(&mut self, name: &str) -> &mut Self {
        if self.seen_contexts.insert(name.to_string()) {
            self.contexts.push(name.to_string());
        } else if !self.merged_contexts.iter().any(|c| c == name) {
            debug!("merging repeated context block {name:?}");
            self.merged_contexts.push(name.to_string());
        }
        self
    }

    /// Adds an entry.
    pub fn push(&mut self, entry: MessageEntry) -> &mut Self {
        if self.seen_contexts.insert(entry.context.clone()) {
            self.contexts.push(entry.context.clone());
        }

        let position = self.entries.len();
        if entry.status != TranslationStatus::Obsolete {
            let sources = self.index.entry(entry.context.clone()).or_default();
            if sources.contains_key(&entry.source_text) {
                warn!(
                    "duplicate message {:?}/{:?} in {} catalog; keeping the first",
                    entry.context, entry.source_text, self.language_tag
                );
                self.duplicate_keys.push(MessageKey {
                    context: entry.context.clone(),
                    source_text: entry.source_text.clone(),
                });
            } else {
                sources.insert(entry.source_text.clone(), position);
                if let Some(id) = &entry.id {
                    self.ids.entry(id.clone()).or_insert(position);
                }
            }
        }

        self.entries.push(entry);
        self
    }

    /// Freezes the accumulated entries into a catalog.
    pub fn build(self) -> Catalog {
        Catalog {
            language_tag: self.language_tag,
            source_language_tag: self.source_language_tag,
            format_version: self.format_version,
            entries: self.entries,
            index: self.index,
            ids: self.ids,
            contexts: self.contexts,
            merged_contexts: self.merged_contexts,
            duplicate_keys: self.duplicate_keys,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
