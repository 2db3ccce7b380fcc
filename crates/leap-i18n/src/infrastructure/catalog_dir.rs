//! Catalog source backed by a directory of `gui_<tag>.ts` files.
//!
//! This is the layout the GUI ships in `res/lang/`:
//!
//! ```text
//! res/lang/
//!   Languages.xml
//!   gui_cs-CZ.ts
//!   gui_hr-HR.ts
//!   gui_hu-HU.ts
//!   gui_pt-PT.ts
//! ```
//!
//! Catalogs are listed under the tag in their file name.  That tag can differ
//! from the one declared inside the file (`gui_hu-HU.ts` declares `hu`); the
//! file name is what the GUI's language picker refers to, so it wins for
//! selection.

use std::path::{Path, PathBuf};

use leap_i18n_core::{parse_catalog, parse_language_list, Catalog, LanguageInfo, LoadOptions, LocaleTag};
use tracing::{debug, info};

use crate::application::translator::{CatalogSource, SourceError};
use crate::infrastructure::storage::config::CatalogConfig;

/// Reads catalogs from a directory on demand.
#[derive(Debug, Clone)]
pub struct DirectoryCatalogSource {
    directory: PathBuf,
    file_prefix: String,
    languages_file: String,
    options: LoadOptions,
}

impl DirectoryCatalogSource {
    /// A source with the shipped naming scheme (`gui_<tag>.ts`).
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::from_config(&CatalogConfig {
            directory: directory.into(),
            ..CatalogConfig::default()
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            file_prefix: config.file_prefix.clone(),
            languages_file: config.languages_file.clone(),
            options: config.load_options(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Catalog files in the directory with the tag from each file name,
    /// sorted by tag.  Files that do not follow the naming scheme are skipped.
    pub fn catalog_files(&self) -> Result<Vec<(LocaleTag, PathBuf)>, SourceError> {
        let io_error = |source: std::io::Error| SourceError::Io {
            path: self.directory.clone(),
            source,
        };

        let mut files = Vec::new();
        for dir_entry in std::fs::read_dir(&self.directory).map_err(io_error)? {
            let path = dir_entry.map_err(io_error)?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(raw_tag) = name
                .strip_prefix(self.file_prefix.as_str())
                .and_then(|rest| rest.strip_suffix(".ts"))
            else {
                continue;
            };
            match LocaleTag::parse(raw_tag) {
                Ok(tag) => files.push((tag, path)),
                Err(e) => debug!("skipping {}: {e}", path.display()),
            }
        }
        files.sort();
        Ok(files)
    }

    /// Reads the language picker entries from `Languages.xml`.
    pub fn language_names(&self) -> Result<Vec<LanguageInfo>, SourceError> {
        let path = self.directory.join(&self.languages_file);
        let bytes = std::fs::read(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        parse_language_list(&bytes).map_err(|source| SourceError::Parse { path, source })
    }
}

impl CatalogSource for DirectoryCatalogSource {
    fn available(&self) -> Result<Vec<LocaleTag>, SourceError> {
        Ok(self.catalog_files()?.into_iter().map(|(tag, _)| tag).collect())
    }

    fn load(&self, tag: &LocaleTag) -> Result<Catalog, SourceError> {
        let path = self
            .catalog_files()?
            .into_iter()
            .find_map(|(file_tag, path)| (&file_tag == tag).then_some(path))
            .ok_or_else(|| SourceError::NotFound(tag.clone()))?;

        let bytes = std::fs::read(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let options = self.options.clone().with_default_language(tag.clone());
        let catalog = parse_catalog(&bytes, &options).map_err(|source| SourceError::Parse {
            path: path.clone(),
            source,
        })?;

        info!("read {} from {}", tag, path.display());
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const HR_HR: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS><TS language="hr-HR" sourcelanguage="en" version="2.0">
<context><name>AboutDialog</name>
<message><source>Unknown</source><translation type="finished">Nepoznato</translation></message>
</context></TS>"#;

    const NO_LANGUAGE: &str = r#"<TS version="2.1"><context><name>AboutDialog</name>
<message><source>Unknown</source><translation>Ismeretlen</translation></message>
</context></TS>"#;

    /// Creates a unique temp directory populated with `files`.
    fn catalog_dir(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("leap_i18n_dir_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        dir
    }

    fn tag(s: &str) -> LocaleTag {
        LocaleTag::parse(s).unwrap()
    }

    #[test]
    fn test_available_lists_tags_from_file_names() {
        // Arrange
        let dir = catalog_dir(&[
            ("gui_pt-PT.ts", HR_HR),
            ("gui_hr-HR.ts", HR_HR),
            ("gui_bogus!.ts", HR_HR),
            ("Languages.xml", "<languages/>"),
            ("README.md", "not a catalog"),
        ]);
        let source = DirectoryCatalogSource::new(&dir);

        // Act
        let tags = source.available().unwrap();

        // Assert
        assert_eq!(tags, [tag("hr-HR"), tag("pt-PT")]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_reads_and_parses_catalog() {
        let dir = catalog_dir(&[("gui_hr-HR.ts", HR_HR)]);
        let source = DirectoryCatalogSource::new(&dir);

        let catalog = source.load(&tag("hr-HR")).unwrap();

        assert_eq!(catalog.resolve("AboutDialog", "Unknown"), "Nepoznato");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_uses_file_tag_when_language_attribute_missing() {
        let dir = catalog_dir(&[("gui_hu-HU.ts", NO_LANGUAGE)]);
        let source = DirectoryCatalogSource::new(&dir);

        let catalog = source.load(&tag("hu-HU")).unwrap();

        assert_eq!(catalog.language_tag(), &tag("hu-HU"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_unknown_tag_is_not_found() {
        let dir = catalog_dir(&[("gui_hr-HR.ts", HR_HR)]);
        let source = DirectoryCatalogSource::new(&dir);

        let result = source.load(&tag("cs-CZ"));

        assert!(matches!(result, Err(SourceError::NotFound(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_malformed_file_reports_path_and_position() {
        let dir = catalog_dir(&[("gui_cs-CZ.ts", "<TS language=\"cs-CZ\">\n<context>\n")]);
        let source = DirectoryCatalogSource::new(&dir);

        let err = source.load(&tag("cs-CZ")).unwrap_err();

        match err {
            SourceError::Parse { path, source: parse_error } => {
                assert!(path.ends_with("gui_cs-CZ.ts"));
                assert!(parse_error.position().line >= 2);
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let source = DirectoryCatalogSource::new(
            std::env::temp_dir().join(format!("leap_i18n_missing_{}", Uuid::new_v4())),
        );
        assert!(matches!(source.available(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn test_language_names_reads_languages_xml() {
        let dir = catalog_dir(&[(
            "Languages.xml",
            r#"<languages><language ietfCode="hr-HR" name="Hrvatski"/></languages>"#,
        )]);
        let source = DirectoryCatalogSource::new(&dir);

        let names = source.language_names().unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names[0].ietf_code, tag("hr-HR"));
        assert_eq!(names[0].name, "Hrvatski");
        std::fs::remove_dir_all(&dir).ok();
    }
}
