//! Detection of the user's locale from the environment.
//!
//! The GUI follows the system locale when no language is configured.  On
//! POSIX systems the locale comes from `LC_ALL`, then `LC_MESSAGES`, then
//! `LANG`; the first one that is set and non-empty decides, even when it
//! names no language (`C`, `POSIX`).

use leap_i18n_core::LocaleTag;
use tracing::debug;

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// The locale named by the process environment, if any.
pub fn system_locale() -> Option<LocaleTag> {
    locale_from_vars(|name| std::env::var(name).ok())
}

/// Resolves the locale from an environment lookup function.
pub fn locale_from_vars<F>(lookup: F) -> Option<LocaleTag>
where
    F: Fn(&str) -> Option<String>,
{
    let (name, value) = LOCALE_VARS.iter().find_map(|&name| {
        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (name, value))
    })?;

    match LocaleTag::parse(&value) {
        Ok(tag) => Some(tag),
        Err(e) => {
            debug!("{name}={value:?} names no language: {e}");
            None
        }
    }
}
