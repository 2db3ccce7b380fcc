//! Translator: the active catalog and the language-switch use case.
//!
//! The GUI resolves every label through one active catalog.  Switching
//! language must never leave it half-updated: a reader either sees the old
//! catalog in full or the new one in full.
//!
//! # How the swap works (for beginners)
//!
//! The active catalog lives in an `RwLock<Arc<Catalog>>`.  A switch first
//! loads and validates the new catalog *outside* the lock, which can take a
//! while, and only then takes the write lock for the instant it needs to
//! replace one `Arc` pointer.  Readers clone the `Arc` (a reference-count
//! bump) and keep using their snapshot even if a switch happens meanwhile.
//!
//! ```text
//! switch_language("cs-CZ")
//!   ├─ negotiate against source.available()
//!   ├─ source.load(cs-CZ)        ← may fail: active catalog untouched
//!   └─ write lock: active = Arc::new(catalog)
//! ```
//!
//! Catalogs come from a [`CatalogSource`]; the infrastructure layer provides
//! one backed by a directory of `.ts` files.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use leap_i18n_core::{
    format, negotiate, Catalog, CatalogParseError, CatalogSet, LocaleMatch, LocaleTag, Message,
};
use thiserror::Error;
use tracing::{info, warn};

/// Error type for catalog sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A catalog file could not be read.
    #[error("I/O error reading catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog file was read but is not a valid `.ts` document.
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CatalogParseError,
    },

    /// No catalog exists for the tag.
    #[error("no catalog for language {0}")]
    NotFound(LocaleTag),
}

/// Provides catalogs by language tag.
///
/// Implementations live in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    /// Tags for which a catalog can be loaded.
    fn available(&self) -> Result<Vec<LocaleTag>, SourceError>;

    /// Loads the complete catalog for `tag`.
    fn load(&self, tag: &LocaleTag) -> Result<Catalog, SourceError>;
}

/// Owns the active catalog and switches it on request.
pub struct Translator {
    source: Arc<dyn CatalogSource>,
    active: RwLock<Arc<Catalog>>,
}

impl Translator {
    /// Creates a translator that shows English source text until a
    /// language is selected.
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            active: RwLock::new(Arc::new(Catalog::source_only(LocaleTag::source()))),
        }
    }

    /// Negotiates `requested` against the available catalogs, loads the
    /// chosen one, and makes it active.
    ///
    /// When no catalog matches, the source-text catalog becomes active and
    /// [`LocaleMatch::Source`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot list or load catalogs.
    /// The previously active catalog stays active in that case.
    pub fn switch_language(&self, requested: &LocaleTag) -> Result<LocaleMatch, SourceError> {
        let available = self.source.available()?;
        let chosen = negotiate(requested, &available);

        let catalog = match chosen.tag() {
            Some(tag) => self.source.load(tag).map_err(|e| {
                warn!("keeping {} catalog: {e}", self.active_tag());
                e
            })?,
            None => Catalog::source_only(LocaleTag::source()),
        };

        match &chosen {
            LocaleMatch::Exact(tag) => info!("switching language to {tag}"),
            LocaleMatch::Language(tag) => info!("switching language to {tag} (requested {requested})"),
            LocaleMatch::Source => info!("no catalog for {requested}; showing source text"),
        }
        self.install(catalog);
        Ok(chosen)
    }

    /// Replaces the active catalog, returning the previous one.
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *active, Arc::new(catalog))
    }

    /// A snapshot of the active catalog.
    pub fn active(&self) -> Arc<Catalog> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Language tag of the active catalog.
    pub fn active_tag(&self) -> LocaleTag {
        self.active().language_tag().clone()
    }

    /// Resolves `(context, source_text)` against the active catalog.
    pub fn tr(&self, context: &str, source_text: &str) -> String {
        self.active().resolve(context, source_text).to_string()
    }

    /// Resolves a declared [`Message`] against the active catalog.
    pub fn translate(&self, message: &Message) -> String {
        self.tr(message.context(), message.source())
    }

    /// Resolves and then substitutes `%1`, `%2`, … with `args`.
    pub fn tr_args<S: AsRef<str>>(&self, context: &str, source_text: &str, args: &[S]) -> String {
        let catalog = self.active();
        format(catalog.resolve(context, source_text), args)
    }
}

/// Loads every available catalog into a [`CatalogSet`], keyed by the tag
/// the source lists it under.
///
/// # Errors
///
/// Fails on the first catalog that cannot be loaded.
pub fn load_catalog_set(source: &dyn CatalogSource) -> Result<CatalogSet, SourceError> {
    let mut set = CatalogSet::new();
    for tag in source.available()? {
        let catalog = source.load(&tag)?;
        set.insert_as(tag, Arc::new(catalog));
    }
    Ok(set)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use leap_i18n_core::{MessageEntry, Position, TranslationStatus};
    use mockall::predicate::eq;

    fn tag(s: &str) -> LocaleTag {
        LocaleTag::parse(s).unwrap()
    }

    fn catalog(language: &str, entries: &[(&str, &str, &str)]) -> Catalog {
        let mut builder = Catalog::builder(tag(language));
        for (context, source, translation) in entries {
            builder.push(MessageEntry::new(
                *context,
                *source,
                *translation,
                TranslationStatus::Finished,
            ));
        }
        builder.build()
    }

    fn croatian() -> Catalog {
        catalog(
            "hr-HR",
            &[
                ("AboutDialog", "Unknown", "Nepoznato"),
                ("ScreenSettingsDialog", "Screen Settings", "Postavke zaslona"),
            ],
        )
    }

    fn czech() -> Catalog {
        catalog("cs-CZ", &[("AboutDialog", "Unknown", "Neznámá")])
    }

    fn mock_source(available: &[&str]) -> MockCatalogSource {
        let tags: Vec<LocaleTag> = available.iter().map(|s| tag(s)).collect();
        let mut source = MockCatalogSource::new();
        source.expect_available().returning(move || Ok(tags.clone()));
        source
    }

    #[test]
    fn test_new_translator_shows_source_text() {
        let translator = Translator::new(Arc::new(MockCatalogSource::new()));
        assert_eq!(translator.active_tag(), LocaleTag::source());
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Unknown");
    }

    #[test]
    fn test_switch_language_loads_exact_catalog() {
        // Arrange
        let mut source = mock_source(&["cs-CZ", "hr-HR"]);
        source
            .expect_load()
            .with(eq(tag("hr-HR")))
            .times(1)
            .returning(|_| Ok(croatian()));
        let translator = Translator::new(Arc::new(source));

        // Act
        let chosen = translator.switch_language(&tag("hr_HR")).unwrap();

        // Assert
        assert_eq!(chosen, LocaleMatch::Exact(tag("hr-HR")));
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Nepoznato");
    }

    #[test]
    fn test_switch_replaces_whole_catalog() {
        // Arrange
        let mut source = mock_source(&["cs-CZ", "hr-HR"]);
        source.expect_load().with(eq(tag("hr-HR"))).returning(|_| Ok(croatian()));
        source.expect_load().with(eq(tag("cs-CZ"))).returning(|_| Ok(czech()));
        let translator = Translator::new(Arc::new(source));
        translator.switch_language(&tag("hr-HR")).unwrap();

        // Act
        translator.switch_language(&tag("cs-CZ")).unwrap();

        // Assert: no Croatian text survives for keys Czech lacks.
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Neznámá");
        assert_eq!(
            translator.tr("ScreenSettingsDialog", "Screen Settings"),
            "Screen Settings"
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_catalog() {
        // Arrange
        let mut source = mock_source(&["cs-CZ", "hr-HR"]);
        source.expect_load().with(eq(tag("hr-HR"))).returning(|_| Ok(croatian()));
        source.expect_load().with(eq(tag("cs-CZ"))).returning(|_| {
            Err(SourceError::Parse {
                path: PathBuf::from("gui_cs-CZ.ts"),
                source: CatalogParseError::Xml {
                    position: Position::new(12, 5),
                    message: "unexpected end of stream".to_string(),
                },
            })
        });
        let translator = Translator::new(Arc::new(source));
        translator.switch_language(&tag("hr-HR")).unwrap();

        // Act
        let result = translator.switch_language(&tag("cs-CZ"));

        // Assert
        assert!(matches!(result, Err(SourceError::Parse { .. })));
        assert_eq!(translator.active_tag(), tag("hr-HR"));
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Nepoznato");
    }

    #[test]
    fn test_language_only_request_selects_regional_catalog() {
        let mut source = mock_source(&["cs-CZ", "pt-PT"]);
        source
            .expect_load()
            .with(eq(tag("pt-PT")))
            .returning(|_| Ok(catalog("pt-PT", &[("AboutDialog", "Unknown", "Desconhecido")])));
        let translator = Translator::new(Arc::new(source));

        let chosen = translator.switch_language(&tag("pt")).unwrap();

        assert_eq!(chosen, LocaleMatch::Language(tag("pt-PT")));
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Desconhecido");
    }

    #[test]
    fn test_unmatched_language_falls_back_to_source_without_loading() {
        let mut source = mock_source(&["cs-CZ"]);
        source.expect_load().never();
        let translator = Translator::new(Arc::new(source));
        translator.install(czech());

        let chosen = translator.switch_language(&tag("de-DE")).unwrap();

        assert_eq!(chosen, LocaleMatch::Source);
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Unknown");
    }

    #[test]
    fn test_tr_args_formats_resolved_text() {
        let translator = Translator::new(Arc::new(MockCatalogSource::new()));
        translator.install(catalog(
            "cs-CZ",
            &[("MainWindow", "Version %1 from %2", "Verze %1 z %2")],
        ));

        assert_eq!(
            translator.tr_args("MainWindow", "Version %1 from %2", &["2.4", "2024"]),
            "Verze 2.4 z 2024"
        );
        assert_eq!(
            translator.tr_args("MainWindow", "Missing %1 and %2", &["x"]),
            "Missing x and %2"
        );
    }

    #[test]
    fn test_translate_declared_message() {
        const UNKNOWN: Message = Message::new("AboutDialog", "Unknown");
        let translator = Translator::new(Arc::new(MockCatalogSource::new()));
        translator.install(czech());
        assert_eq!(translator.translate(&UNKNOWN), "Neznámá");
    }

    #[test]
    fn test_snapshot_survives_switch() {
        let translator = Translator::new(Arc::new(MockCatalogSource::new()));
        translator.install(croatian());
        let snapshot = translator.active();

        let previous = translator.install(czech());

        assert!(Arc::ptr_eq(&snapshot, &previous));
        assert_eq!(snapshot.resolve("AboutDialog", "Unknown"), "Nepoznato");
        assert_eq!(translator.tr("AboutDialog", "Unknown"), "Neznámá");
    }

    #[test]
    fn test_concurrent_readers_see_whole_catalogs() {
        // Arrange
        let translator = Arc::new(Translator::new(Arc::new(MockCatalogSource::new())));
        translator.install(croatian());

        // Act: readers check that both keys come from the same language.
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let translator = Arc::clone(&translator);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = translator.active();
                        let unknown = snapshot.resolve("AboutDialog", "Unknown");
                        let settings = snapshot.resolve("ScreenSettingsDialog", "Screen Settings");
                        let consistent = (unknown == "Nepoznato" && settings == "Postavke zaslona")
                            || (unknown == "Neznámá" && settings == "Screen Settings");
                        assert!(consistent, "mixed catalog: {unknown} / {settings}");
                    }
                })
            })
            .collect();
        for i in 0..200 {
            translator.install(if i % 2 == 0 { czech() } else { croatian() });
        }

        // Assert
        for reader in readers {
            reader.join().expect("reader thread panicked");
        }
    }

    #[test]
    fn test_load_catalog_set_keys_by_source_tag() {
        // Arrange: the Hungarian file declares "hu" but is listed as hu-HU.
        let mut source = mock_source(&["hu-HU", "hr-HR"]);
        source
            .expect_load()
            .with(eq(tag("hu-HU")))
            .returning(|_| Ok(catalog("hu", &[("AboutDialog", "Unknown", "Ismeretlen")])));
        source.expect_load().with(eq(tag("hr-HR"))).returning(|_| Ok(croatian()));

        // Act
        let set = load_catalog_set(&source).unwrap();

        // Assert
        let tags: Vec<&str> = set.tags().map(LocaleTag::as_str).collect();
        assert_eq!(tags, ["hr-HR", "hu-HU"]);
        assert_eq!(set.resolve("AboutDialog", "Unknown", &tag("hu")), "Ismeretlen");
    }

    #[test]
    fn test_load_catalog_set_propagates_missing_catalog() {
        let mut source = mock_source(&["cs-CZ"]);
        source
            .expect_load()
            .returning(|t| Err(SourceError::NotFound(t.clone())));

        let result = load_catalog_set(&source);

        assert!(matches!(result, Err(SourceError::NotFound(t)) if t == tag("cs-CZ")));
    }
}
