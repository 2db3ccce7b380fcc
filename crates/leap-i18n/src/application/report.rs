//! Catalog health reports.
//!
//! Translators and release managers want the same numbers Qt's `lrelease`
//! prints, plus the problems that silently degrade the GUI: duplicate keys
//! (only the first is ever shown) and finished translations whose `%N`
//! placeholders differ from the English source (an argument goes missing or
//! a literal `%3` shows up on screen).

use std::collections::BTreeSet;

use leap_i18n_core::{placeholders, Catalog, LocaleTag, MessageKey, TranslationStatus};
use serde::Serialize;

/// A finished translation whose placeholders differ from its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderMismatch {
    pub context: String,
    pub source_text: String,
    /// Indices used by the source text.
    pub expected: Vec<u8>,
    /// Indices used by the translation.
    pub found: Vec<u8>,
}

/// Summary of one catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    pub language: LocaleTag,
    pub format_version: Option<String>,
    pub contexts: usize,
    /// Messages still used by the GUI (obsolete ones excluded).
    pub total: usize,
    pub finished: usize,
    /// Marked finished but with an empty translation.
    pub empty_finished: usize,
    pub unfinished: usize,
    /// Unfinished entries that nonetheless carry a draft translation.
    pub unfinished_drafts: usize,
    pub obsolete: usize,
    /// Share of `total` shown translated, 0–100.
    pub percent_translated: f64,
    pub merged_contexts: Vec<String>,
    pub duplicate_keys: Vec<MessageKey>,
    pub placeholder_mismatches: Vec<PlaceholderMismatch>,
}

impl CatalogReport {
    /// Builds the report for `catalog`.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let stats = catalog.stats();
        let total = stats.active();
        let unfinished_drafts = catalog
            .entries()
            .filter(|e| e.status == TranslationStatus::Unfinished && !e.translation_text.is_empty())
            .count();

        let placeholder_mismatches = catalog
            .entries()
            .filter_map(|entry| {
                let translation = entry.usable_translation()?;
                let expected: BTreeSet<u8> = placeholders(&entry.source_text);
                let found = placeholders(translation);
                (expected != found).then(|| PlaceholderMismatch {
                    context: entry.context.clone(),
                    source_text: entry.source_text.clone(),
                    expected: expected.into_iter().collect(),
                    found: found.into_iter().collect(),
                })
            })
            .collect();

        let percent_translated = if total == 0 {
            0.0
        } else {
            stats.finished as f64 * 100.0 / total as f64
        };

        Self {
            language: catalog.language_tag().clone(),
            format_version: catalog.format_version().map(str::to_string),
            contexts: catalog.contexts().len(),
            total,
            finished: stats.finished,
            empty_finished: stats.empty_finished,
            unfinished: stats.unfinished,
            unfinished_drafts,
            obsolete: stats.obsolete,
            percent_translated,
            merged_contexts: catalog.merged_contexts().to_vec(),
            duplicate_keys: catalog.duplicate_keys().to_vec(),
            placeholder_mismatches,
        }
    }

    /// `true` when nothing in the catalog hides or garbles a translation.
    pub fn is_clean(&self) -> bool {
        self.duplicate_keys.is_empty() && self.placeholder_mismatches.is_empty()
    }

    /// One-paragraph summary in the wording `lrelease` uses.
    pub fn summary(&self) -> String {
        let generated = self.finished + self.unfinished_drafts;
        let untranslated = self.total - generated;
        let mut out = format!(
            "{}: Generated {generated} translation(s) ({} finished and {} unfinished), {:.1}% translated",
            self.language, self.finished, self.unfinished_drafts, self.percent_translated
        );
        if untranslated > 0 {
            out.push_str(&format!("\n    Ignored {untranslated} untranslated source text(s)"));
        }
        if self.obsolete > 0 {
            out.push_str(&format!("\n    Kept {} obsolete message(s)", self.obsolete));
        }
        for context in &self.merged_contexts {
            out.push_str(&format!("\n    Merged repeated context {context}"));
        }
        for key in &self.duplicate_keys {
            out.push_str(&format!(
                "\n    Duplicate message {}/{:?}",
                key.context, key.source_text
            ));
        }
        for mismatch in &self.placeholder_mismatches {
            out.push_str(&format!(
                "\n    Placeholder mismatch in {}/{:?}: expected {:?}, found {:?}",
                mismatch.context, mismatch.source_text, mismatch.expected, mismatch.found
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leap_i18n_core::MessageEntry;

    fn report_for(entries: Vec<MessageEntry>) -> CatalogReport {
        let mut builder = Catalog::builder(LocaleTag::parse("cs-CZ").unwrap());
        builder.format_version("2.0");
        for entry in entries {
            builder.push(entry);
        }
        CatalogReport::from_catalog(&builder.build())
    }

    fn entry(source: &str, translation: &str, status: TranslationStatus) -> MessageEntry {
        MessageEntry::new("MainWindow", source, translation, status)
    }

    #[test]
    fn test_report_counts_statuses() {
        // Arrange / Act
        let report = report_for(vec![
            entry("&Start", "&Spustit", TranslationStatus::Finished),
            entry("&Stop", "&Zastavit", TranslationStatus::Finished),
            entry("&Apply", "Použít", TranslationStatus::Unfinished),
            entry("&Quit", "", TranslationStatus::Unfinished),
            entry("Old", "Staré", TranslationStatus::Obsolete),
        ]);

        // Assert
        assert_eq!(report.total, 4);
        assert_eq!(report.finished, 2);
        assert_eq!(report.unfinished, 2);
        assert_eq!(report.unfinished_drafts, 1);
        assert_eq!(report.obsolete, 1);
        assert!((report.percent_translated - 50.0).abs() < f64::EPSILON);
        assert!(report.is_clean());
    }

    #[test]
    fn test_summary_uses_lrelease_wording() {
        let report = report_for(vec![
            entry("&Start", "&Spustit", TranslationStatus::Finished),
            entry("&Apply", "Použít", TranslationStatus::Unfinished),
            entry("&Quit", "", TranslationStatus::Unfinished),
        ]);

        let summary = report.summary();

        assert!(summary.starts_with("cs-CZ: Generated 2 translation(s) (1 finished and 1 unfinished)"));
        assert!(summary.contains("Ignored 1 untranslated source text(s)"));
    }

    #[test]
    fn test_placeholder_mismatch_is_reported() {
        let report = report_for(vec![
            entry("Version %1 from %2", "Verze %2 z %1", TranslationStatus::Finished),
            entry("exit code %1", "kód ukončení", TranslationStatus::Finished),
            entry("ignored %1", "", TranslationStatus::Unfinished),
        ]);

        assert_eq!(
            report.placeholder_mismatches,
            [PlaceholderMismatch {
                context: "MainWindow".to_string(),
                source_text: "exit code %1".to_string(),
                expected: vec![1],
                found: vec![],
            }]
        );
        assert!(!report.is_clean());
        assert!(report.summary().contains("Placeholder mismatch in MainWindow/\"exit code %1\""));
    }

    #[test]
    fn test_duplicate_key_makes_report_unclean() {
        let report = report_for(vec![
            entry("&Start", "&Spustit", TranslationStatus::Finished),
            entry("&Start", "Start", TranslationStatus::Finished),
        ]);
        assert_eq!(report.duplicate_keys.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = report_for(vec![entry("&Start", "&Spustit", TranslationStatus::Finished)]);

        let json: serde_json::Value = serde_json::to_value(&report).expect("serialize");

        assert_eq!(json["language"], "cs-CZ");
        assert_eq!(json["format_version"], "2.0");
        assert_eq!(json["finished"], 1);
        assert_eq!(json["duplicate_keys"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_catalog_reports_zero_percent() {
        let report = report_for(Vec::new());
        assert_eq!(report.total, 0);
        assert_eq!(report.percent_translated, 0.0);
        assert!(!report.summary().contains("Ignored"));
    }
}
