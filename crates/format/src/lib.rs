//! Locale-bound message formatting for per-caller sessions.
//!
//! A [`Catalog`] maps source templates to per-locale translations, and a
//! [`Printer`] binds one locale to a shared catalog. Rendering first looks the
//! template up in the catalog and then runs a printf-style substitution over
//! the supplied [`Arg`] values.

mod arg;
pub mod catalog;
pub mod printer;
pub mod printf;

pub use arg::Arg;
pub use catalog::{
    default_locale, parse_locale, Catalog, CatalogError, LocaleCatalogStats, LocaleSummary,
};
pub use icu_locid::Locale;
pub use printer::Printer;
pub use printf::sprintf;

/// Number of placeholder markers in `template`: every raw `%` counts once,
/// including both halves of a `%%` escape.
pub fn placeholder_count(template: &str) -> usize {
    template.matches('%').count()
}
