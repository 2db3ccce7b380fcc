//! Reader for `Languages.xml`, the list of languages offered in the GUI's
//! language picker.
//!
//! ```text
//! <languages>
//!     <language ietfCode="cs-CZ" name="Čeština" />
//! </languages>
//! ```

use std::io::Read;

use crate::domain::locale::LocaleTag;
use crate::resource::error::CatalogParseError;
use crate::resource::tree::{read_document, Element};

/// One selectable language: its tag and its name written in that language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub ietf_code: LocaleTag,
    pub name: String,
}

/// Parses a language list held in memory.
pub fn parse_language_list(bytes: &[u8]) -> Result<Vec<LanguageInfo>, CatalogParseError> {
    read_language_list(bytes)
}

/// Parses a language list from any reader, keeping file order.
pub fn read_language_list<R: Read>(source: R) -> Result<Vec<LanguageInfo>, CatalogParseError> {
    let root = read_document(source)?;
    if root.name != "languages" {
        return Err(CatalogParseError::UnexpectedRoot {
            expected: "languages",
            found: root.name,
            position: root.position,
        });
    }

    root.elements()
        .filter(|e| e.name == "language")
        .map(read_language)
        .collect()
}

fn read_language(element: &Element) -> Result<LanguageInfo, CatalogParseError> {
    let required = |attribute: &'static str| {
        element
            .attribute(attribute)
            .ok_or(CatalogParseError::MissingAttribute {
                element: "language",
                attribute,
                position: element.position,
            })
    };

    let code = required("ietfCode")?;
    let ietf_code = LocaleTag::parse(code).map_err(|_| CatalogParseError::InvalidAttribute {
        element: "language",
        attribute: "ietfCode",
        value: code.to_string(),
        position: element.position,
    })?;

    Ok(LanguageInfo {
        ietf_code,
        name: required("name")?.to_string(),
    })
}
