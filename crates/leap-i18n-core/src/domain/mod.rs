//! Domain types for the InputLeap translation catalogs.
//!
//! Nothing in here touches the file system or parses XML.  The types describe
//! what a catalog *is* and how a lookup is answered; reading catalogs from
//! `.ts` files lives in [`crate::resource`].
//!
//! # Why keep the domain pure? (for beginners)
//!
//! The resolution rules (finished-only, source fallback, locale tiers) are
//! the part of this project that must never regress.  Keeping them free of
//! I/O means every rule is tested with a few in-memory entries, no fixtures
//! and no temp directories needed.

/// The catalog model and the resolver.
pub mod catalog;

/// A tag-keyed collection of catalogs with locale fallback.
pub mod catalog_set;

/// Locale tags and catalog negotiation.
pub mod locale;

/// `const`-declared message identifiers.
pub mod message;
