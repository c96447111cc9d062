//! Per-caller localization sessions.
//!
//! A [`SessionRegistry`] binds opaque caller identities (connection ids, user
//! ids, …) to a [`PrinterSession`] carrying that caller's locale. Lookups never
//! fail: identities without a session get a fresh fallback bound to the
//! registry's default locale. Every session can format plain printf-style
//! messages or pick among plural templates with a [`RuleSet`].

pub mod config;
pub mod registry;
pub mod session;

pub use config::{ConfigError, RegistryConfig};
pub use l10n_format::{args, parse_locale, Arg, Catalog, Locale};
pub use l10n_plural::{parse_rules, Rule, RuleError, RuleSet};
pub use registry::SessionRegistry;
pub use session::{PrintError, PrinterSession};
