//! A collection of loaded catalogs keyed by language tag.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::catalog::Catalog;
use crate::domain::locale::{negotiate, LocaleMatch, LocaleTag};

/// Every catalog available to the process, one per language tag.
///
/// Catalogs are held behind `Arc` so a [`CatalogSet`] and an active-catalog
/// handle can share them without copying.  Tags are kept in a `BTreeMap` so
/// iteration and negotiation are deterministic.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    catalogs: BTreeMap<LocaleTag, Arc<Catalog>>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog under its own language tag, returning any catalog it
    /// replaced.
    pub fn insert(&mut self, catalog: Catalog) -> Option<Arc<Catalog>> {
        self.insert_as(catalog.language_tag().clone(), Arc::new(catalog))
    }

    /// Adds a catalog under an explicit tag (e.g. the tag from its file name).
    pub fn insert_as(&mut self, tag: LocaleTag, catalog: Arc<Catalog>) -> Option<Arc<Catalog>> {
        self.catalogs.insert(tag, catalog)
    }

    pub fn get(&self, tag: &LocaleTag) -> Option<&Arc<Catalog>> {
        self.catalogs.get(tag)
    }

    /// Loaded tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &LocaleTag> {
        self.catalogs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleTag, &Arc<Catalog>)> {
        self.catalogs.iter()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Negotiates `requested` against the loaded tags.
    pub fn select(&self, requested: &LocaleTag) -> LocaleMatch {
        negotiate(requested, self.catalogs.keys())
    }

    /// The catalog chosen for `requested`, or `None` when source text applies.
    pub fn catalog_for(&self, requested: &LocaleTag) -> Option<&Arc<Catalog>> {
        self.select(requested).tag().and_then(|tag| self.catalogs.get(tag))
    }

    /// Resolves `(context, source_text)` for a requested locale.
    ///
    /// Picks the catalog with region → language → source fallback, then
    /// applies [`Catalog::resolve`].  Never fails.
    pub fn resolve<'a>(&'a self, context: &str, source_text: &'a str, locale: &LocaleTag) -> &'a str {
        match self.catalog_for(locale) {
            Some(catalog) => catalog.resolve(context, source_text),
            None => source_text,
        }
    }
}

impl FromIterator<Catalog> for CatalogSet {
    fn from_iter<T: IntoIterator<Item = Catalog>>(iter: T) -> Self {
        let mut set = Self::new();
        for catalog in iter {
            set.insert(catalog);
        }
        set
    }
}
