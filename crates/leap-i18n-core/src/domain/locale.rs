//! Locale tags and the region → language → source fallback used to pick a
//! catalog for a requested locale.
//!
//! # How locale fallback works (for beginners)
//!
//! The GUI ships catalogs for specific regions (`cs-CZ`, `hr-HR`, `pt-PT`)
//! and occasionally for a bare language (the Hungarian file declares itself
//! as just `hu`).  A user's request rarely matches a catalog byte-for-byte:
//! the system locale arrives as `pt_PT.UTF-8`, a settings file may say `pt`,
//! and a Brazilian user asks for `pt-BR`.  [`negotiate`] resolves such a
//! request in three tiers:
//!
//! ```text
//! requested "pt-BR"
//!   1. exact        pt-BR           (none loaded)
//!   2. language     pt, then pt-*   → pt-PT
//!   3. source       no catalog      → English source text everywhere
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag of the language the GUI strings are authored in.
pub const SOURCE_LANGUAGE: &str = "en";

/// Errors produced while parsing a locale tag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The input contained no tag at all.
    #[error("locale tag is empty")]
    Empty,

    /// The primary language subtag is not 2–8 ASCII letters.
    #[error("invalid language subtag in locale tag {0:?}")]
    InvalidLanguage(String),

    /// A subtag after the language is empty, too long, or not alphanumeric.
    #[error("invalid subtag {subtag:?} in locale tag {tag:?}")]
    InvalidSubtag { tag: String, subtag: String },
}

/// A normalized BCP 47-style locale tag such as `cs-CZ` or `hu`.
///
/// Parsing accepts both `-` and `_` separators and drops POSIX encoding and
/// modifier suffixes, so `cs_CZ.UTF-8@euro`, `CS-cz` and `cs-CZ` all produce
/// the same tag.  Casing is normalized: language lowercase, script
/// titlecase, region uppercase.
///
/// # Example
///
/// ```rust
/// use leap_i18n_core::LocaleTag;
///
/// let tag: LocaleTag = "pt_PT.UTF-8".parse().unwrap();
/// assert_eq!(tag.as_str(), "pt-PT");
/// assert_eq!(tag.language(), "pt");
/// assert_eq!(tag.region(), Some("PT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag {
    tag: String,
    language_len: usize,
}

impl LocaleTag {
    /// Parses and normalizes a locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] when the input is empty or a subtag is
    /// malformed.  The POSIX pseudo-locales `C` and `POSIX` are rejected as
    /// an invalid language because they name no language at all.
    pub fn parse(input: &str) -> Result<Self, LocaleError> {
        // `cs_CZ.UTF-8@euro` → `cs_CZ`
        let trimmed = input.trim();
        let bare = trimmed
            .split(|c| c == '.' || c == '@')
            .next()
            .unwrap_or_default();
        if bare.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut subtags = bare.split(|c| c == '-' || c == '_');
        let language = subtags.next().unwrap_or_default();
        if !(2..=8).contains(&language.len())
            || !language.bytes().all(|b| b.is_ascii_alphabetic())
            || language.eq_ignore_ascii_case("posix")
        {
            return Err(LocaleError::InvalidLanguage(trimmed.to_string()));
        }

        let mut tag = language.to_ascii_lowercase();
        let language_len = tag.len();
        let mut seen_region = false;

        for subtag in subtags {
            if subtag.is_empty()
                || subtag.len() > 8
                || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(LocaleError::InvalidSubtag {
                    tag: trimmed.to_string(),
                    subtag: subtag.to_string(),
                });
            }
            tag.push('-');
            if is_region(subtag) && !seen_region {
                seen_region = true;
                tag.push_str(&subtag.to_ascii_uppercase());
            } else if subtag.len() == 4 && subtag.bytes().all(|b| b.is_ascii_alphabetic()) {
                // Script subtag, e.g. `Latn`.
                let (first, rest) = subtag.split_at(1);
                tag.push_str(&first.to_ascii_uppercase());
                tag.push_str(&rest.to_ascii_lowercase());
            } else {
                tag.push_str(&subtag.to_ascii_lowercase());
            }
        }

        Ok(Self { tag, language_len })
    }

    /// The tag of the authoring language (`en`).
    pub fn source() -> Self {
        Self {
            tag: SOURCE_LANGUAGE.to_string(),
            language_len: SOURCE_LANGUAGE.len(),
        }
    }

    /// The full normalized tag.
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The primary language subtag (`pt` for `pt-PT`).
    pub fn language(&self) -> &str {
        &self.tag[..self.language_len]
    }

    /// The region subtag, if the tag has one.
    pub fn region(&self) -> Option<&str> {
        self.tag[self.language_len..]
            .split('-')
            .find(|s| is_region(s))
    }

    /// Returns `true` when the tag is a bare language with no further subtags.
    pub fn is_language_only(&self) -> bool {
        self.tag.len() == self.language_len
    }

    /// The tag reduced to its language subtag (`pt-PT` → `pt`).
    pub fn language_only(&self) -> Self {
        Self {
            tag: self.language().to_string(),
            language_len: self.language_len,
        }
    }

    /// Returns `true` when both tags share the same primary language.
    pub fn same_language(&self, other: &LocaleTag) -> bool {
        self.language() == other.language()
    }
}

/// Region subtags are two letters (`CZ`) or three digits (`419`).
fn is_region(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.bytes().all(|b| b.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit()))
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for LocaleTag {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.tag
    }
}

// ── Negotiation ───────────────────────────────────────────────────────────────

/// Outcome of matching a requested locale against the available catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleMatch {
    /// A catalog with exactly the requested tag exists.
    Exact(LocaleTag),
    /// No exact match; a catalog for the same language was chosen.
    Language(LocaleTag),
    /// No catalog fits; the English source text is shown.
    Source,
}

impl LocaleMatch {
    /// The tag of the catalog to load, or `None` for the source language.
    pub fn tag(&self) -> Option<&LocaleTag> {
        match self {
            Self::Exact(tag) | Self::Language(tag) => Some(tag),
            Self::Source => None,
        }
    }
}

/// Picks the catalog for `requested` out of `available`.
///
/// Tiers, first hit wins:
///
/// 1. a catalog tagged exactly `requested`;
/// 2. a catalog tagged with the bare language (`pt` for `pt-BR`), otherwise
///    the first catalog in tag order sharing the language (`pt-PT` for `pt`);
/// 3. [`LocaleMatch::Source`].
///
/// The result does not depend on the iteration order of `available`.
///
/// # Example
///
/// ```rust
/// use leap_i18n_core::{negotiate, LocaleMatch, LocaleTag};
///
/// let loaded = vec![LocaleTag::parse("pt-PT").unwrap()];
/// let picked = negotiate(&LocaleTag::parse("pt").unwrap(), &loaded);
/// assert_eq!(picked, LocaleMatch::Language(LocaleTag::parse("pt-PT").unwrap()));
/// ```
pub fn negotiate<'a, I>(requested: &LocaleTag, available: I) -> LocaleMatch
where
    I: IntoIterator<Item = &'a LocaleTag>,
{
    let mut same_language: Vec<&LocaleTag> = Vec::new();
    for tag in available {
        if tag == requested {
            return LocaleMatch::Exact(tag.clone());
        }
        if tag.same_language(requested) {
            same_language.push(tag);
        }
    }

    if let Some(bare) = same_language.iter().find(|t| t.is_language_only()) {
        return LocaleMatch::Language((*bare).clone());
    }

    same_language
        .into_iter()
        .min()
        .map_or(LocaleMatch::Source, |tag| LocaleMatch::Language(tag.clone()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
