//! Application layer: use cases built on the catalog domain.
//!
//! - [`translator`] keeps the active catalog and switches language.
//! - [`report`] summarizes catalog completeness and problems.

pub mod report;
pub mod translator;
