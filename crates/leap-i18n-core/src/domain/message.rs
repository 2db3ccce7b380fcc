//! Compile-time message identifiers.

/// A translatable string as declared at its call site.
///
/// Looking strings up by their English text is fragile: editing the source
/// string orphans every translation of it.  Declaring each string once as a
/// `const` gives call sites a stable symbolic name while the English text
/// stays the lookup key and the display fallback.
///
/// # Example
///
/// ```rust
/// use leap_i18n_core::Message;
///
/// const SCREEN_NAME_EMPTY: Message =
///     Message::new("ScreenSettingsDialog", "Screen name is empty");
///
/// assert_eq!(SCREEN_NAME_EMPTY.context(), "ScreenSettingsDialog");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message {
    context: &'static str,
    source: &'static str,
}

impl Message {
    /// Declares a message in `context` with English `source` text.
    pub const fn new(context: &'static str, source: &'static str) -> Self {
        Self { context, source }
    }

    /// The UI context (usually the dialog or widget class name).
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// The English source text.
    pub const fn source(&self) -> &'static str {
        self.source
    }
}
