//! Positional placeholder substitution (`%1`, `%2`, …).
//!
//! # Why positional placeholders? (for beginners)
//!
//! Word order differs between languages.  The English message
//!
//! ```text
//! Your version of InputLeap is out of date. Version <b>%1</b> is now available to <a href="%2">download</a>.
//! ```
//!
//! is translated to Czech with `%2` appearing *before* `%1`.  Because each
//! placeholder names its argument by number rather than by position in the
//! sentence, the same argument list works for every language.
//!
//! # Rules
//!
//! - `%N` with `N` in `1..=99` refers to `args[N - 1]`.  Two digits are read
//!   greedily, so `%10` is argument ten, never argument one followed by `0`.
//! - The same index may occur several times; every occurrence gets the value.
//! - A placeholder without a matching argument is left in the output as
//!   written and reported at `debug` level.
//! - `%0`, a trailing `%`, and `%` followed by a non-digit are literal text.
//! - Substitution is a single pass: an argument containing `%1` is copied
//!   verbatim and never expanded again.

use std::collections::BTreeSet;

use tracing::debug;

/// A `%N` occurrence found while scanning.
struct Placeholder {
    /// Byte offset of the `%`.
    start: usize,
    /// Byte offset one past the last digit.
    end: usize,
    index: u8,
}

/// Scans `text` for placeholders in order of appearance.
fn scan(text: &str) -> impl Iterator<Item = Placeholder> + '_ {
    let bytes = text.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() {
            let start = pos;
            pos += 1;
            if bytes[start] != b'%' {
                continue;
            }
            let mut end = start + 1;
            let mut index: u8 = 0;
            while end < bytes.len() && end - start <= 2 && bytes[end].is_ascii_digit() {
                index = index * 10 + (bytes[end] - b'0');
                end += 1;
            }
            if end == start + 1 || index == 0 {
                // `%`, `%x`, `%0`: literal.
                continue;
            }
            pos = end;
            return Some(Placeholder { start, end, index });
        }
        None
    })
}

/// Substitutes positional arguments into `text`.
///
/// # Example
///
/// ```rust
/// use leap_i18n_core::format;
///
/// let czech = "Verze <b>%2</b> je dostupná, starší verze <b>%1</b>.";
/// assert_eq!(
///     format(czech, &["2.3.0", "2.4.0"]),
///     "Verze <b>2.4.0</b> je dostupná, starší verze <b>2.3.0</b>.",
/// );
/// assert_eq!(format("%1 + %1 = %3", &["2"]), "2 + 2 = %3");
/// ```
pub fn format<S: AsRef<str>>(text: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for placeholder in scan(text) {
        let Some(arg) = args.get(usize::from(placeholder.index) - 1) else {
            debug!(
                "no argument for %{} in {text:?} ({} given); leaving it as written",
                placeholder.index,
                args.len()
            );
            continue;
        };
        out.push_str(&text[copied..placeholder.start]);
        out.push_str(arg.as_ref());
        copied = placeholder.end;
    }
    out.push_str(&text[copied..]);
    out
}

/// The set of placeholder indices referenced by `text`.
///
/// Used to spot translations that dropped or invented a placeholder.
pub fn placeholders(text: &str) -> BTreeSet<u8> {
    scan(text).map(|p| p.index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ARGS: [&str; 0] = [];

    #[test]
    fn test_format_substitutes_in_order() {
        assert_eq!(format("Failed to download plugin '%1' to: %2", &["ns", "/tmp"]), "Failed to download plugin 'ns' to: /tmp");
    }

    #[test]
    fn test_format_reordered_placeholders() {
        assert_eq!(format("%2 then %1", &["a", "b"]), "b then a");
    }

    #[test]
    fn test_format_repeated_index_gets_same_value() {
        assert_eq!(format("%1 + %1", &["x"]), "x + x");
    }

    #[test]
    fn test_format_missing_argument_left_literal() {
        // Arrange
        let text = "exit code %1, signal %2";

        // Act
        let out = format(text, &["3"]);

        // Assert
        assert_eq!(out, "exit code 3, signal %2");
    }

    #[test]
    fn test_format_without_args_returns_text_unchanged() {
        let text = "InputLeap terminated unexpectedly with an exit code of %1.";
        assert_eq!(format(text, &NO_ARGS), text);
    }

    #[test]
    fn test_format_two_digit_index_is_greedy() {
        let args: Vec<String> = (1..=10).map(|i| format!("a{i}")).collect();
        assert_eq!(format("%10|%1", &args), "a10|a1");
        // With a single argument `%10` refers to the missing tenth one.
        assert_eq!(format("%10", &["a1"]), "%10");
    }

    #[test]
    fn test_format_three_digits_reads_only_two() {
        let args: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
        assert_eq!(format("%123", &args), "123");
    }

    #[test]
    fn test_format_literal_percent_forms() {
        assert_eq!(format("100% done", &["x"]), "100% done");
        assert_eq!(format("trailing %", &["x"]), "trailing %");
        assert_eq!(format("%0 stays", &["x"]), "%0 stays");
        assert_eq!(format("%%1", &["x"]), "%x");
    }

    #[test]
    fn test_format_does_not_rescan_substituted_values() {
        assert_eq!(format("%1 %2", &["%2", "b"]), "%2 b");
    }

    #[test]
    fn test_format_preserves_multibyte_text() {
        assert_eq!(format("Verze: %1 – hotovo", &["2.4"]), "Verze: 2.4 – hotovo");
    }

    #[test]
    fn test_placeholders_collects_unique_indices() {
        let found = placeholders("<b>%2</b> %1 %1 %0 %");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), [1, 2]);
        assert!(placeholders("no placeholders").is_empty());
    }
}
