use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use l10n_format::{default_locale, Arg, Catalog, Locale, Printer};
use l10n_plural::RuleSet;
use tracing::{debug, trace};

use crate::config::{ConfigError, RegistryConfig};
use crate::session::{PrintError, PrinterSession};

/// Concurrent map from caller identity to [`PrinterSession`].
///
/// Each operation takes the lock once, so individual calls are atomic with
/// respect to each other. Sequences of calls (check, then register) are not;
/// callers that need that must coordinate themselves.
/// （以呼叫端識別碼對應工作階段的並行登錄表。）
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<PrinterSession>>>,
    catalog: Arc<Catalog>,
    default_locale: Locale,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::new()))
    }
}

impl SessionRegistry {
    /// Creates an empty registry whose fallback sessions use `en-US`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_default_locale(catalog, default_locale())
    }

    pub fn with_default_locale(catalog: Arc<Catalog>, default_locale: Locale) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            catalog,
            default_locale,
        }
    }

    /// Builds a registry from configuration, loading every configured catalog directory.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let locale = config.default_locale()?;
        let catalog = Catalog::load_from_dirs(&config.catalog_dirs)?;
        Ok(Self::with_default_locale(Arc::new(catalog), locale))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Binds `id` to a new session for `locale`, replacing any existing binding.
    pub fn register(&self, id: impl Into<String>, locale: Locale) -> Arc<PrinterSession> {
        let id = id.into();
        let session = Arc::new(self.session_for(locale));
        debug!(id = %id, locale = %session.locale(), "registering printer session");
        let previous = self.write().insert(id, Arc::clone(&session));
        if let Some(previous) = previous {
            trace!(locale = %previous.locale(), "replaced existing session");
        }
        session
    }

    /// Removes the binding for `id`. Sessions already handed out stay usable.
    pub fn delete(&self, id: &str) {
        if self.write().remove(id).is_some() {
            debug!(id, "deleted printer session");
        }
    }

    /// Returns the session for `id`, or a fresh default-locale session that is
    /// not stored in the registry.
    pub fn lookup(&self, id: &str) -> Arc<PrinterSession> {
        if let Some(session) = self.read().get(id) {
            return Arc::clone(session);
        }
        trace!(id, "no session registered, using fallback");
        Arc::new(self.session_for(self.default_locale.clone()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn sprintf(&self, id: &str, template: &str, args: &[Arg]) -> String {
        self.lookup(id).sprintf(template, args)
    }

    pub fn printf(&self, id: &str, template: &str, args: &[Arg]) -> io::Result<usize> {
        self.lookup(id).printf(template, args)
    }

    pub fn fprintf<W>(
        &self,
        id: &str,
        writer: &mut W,
        template: &str,
        args: &[Arg],
    ) -> io::Result<usize>
    where
        W: Write + ?Sized,
    {
        self.lookup(id).fprintf(writer, template, args)
    }

    pub fn sprintf_plural(
        &self,
        id: &str,
        template: &str,
        args: &[Arg],
        rules: &RuleSet,
    ) -> Result<String, PrintError> {
        self.lookup(id).sprintf_plural(template, args, rules)
    }

    pub fn printf_plural(
        &self,
        id: &str,
        template: &str,
        args: &[Arg],
        rules: &RuleSet,
    ) -> Result<usize, PrintError> {
        self.lookup(id).printf_plural(template, args, rules)
    }

    pub fn fprintf_plural<W>(
        &self,
        id: &str,
        writer: &mut W,
        template: &str,
        args: &[Arg],
        rules: &RuleSet,
    ) -> Result<usize, PrintError>
    where
        W: Write + ?Sized,
    {
        self.lookup(id)
            .fprintf_plural(writer, template, args, rules)
    }

    fn session_for(&self, locale: Locale) -> PrinterSession {
        PrinterSession::new(Printer::new(locale, Arc::clone(&self.catalog)))
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<PrinterSession>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<PrinterSession>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l10n_format::parse_locale;

    fn tag(value: &str) -> Locale {
        parse_locale(value).expect("valid locale")
    }

    #[test]
    fn miss_returns_unregistered_fallback() {
        let registry = SessionRegistry::default();
        let session = registry.lookup("nobody");
        assert_eq!(session.locale(), &default_locale());
        assert!(!registry.contains("nobody"));
        assert!(registry.is_empty());

        let again = registry.lookup("nobody");
        assert!(!Arc::ptr_eq(&session, &again));
    }

    #[test]
    fn register_then_lookup_returns_same_session() {
        let registry = SessionRegistry::default();
        let registered = registry.register("conn-1", tag("fr"));
        let found = registry.lookup("conn-1");
        assert!(Arc::ptr_eq(&registered, &found));
        assert_eq!(found.locale(), &tag("fr"));
    }

    #[test]
    fn reregister_replaces_binding() {
        let registry = SessionRegistry::default();
        registry.register("user", tag("fr"));
        registry.register("user", tag("de"));
        assert_eq!(registry.lookup("user").locale(), &tag("de"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn delete_keeps_handed_out_sessions_alive() {
        let registry = SessionRegistry::default();
        let held = registry.register("", tag("ja"));
        registry.delete("");
        registry.delete("");
        assert!(!registry.contains(""));
        assert_eq!(held.locale(), &tag("ja"));
        assert_eq!(registry.lookup("").locale(), &default_locale());
    }

    #[test]
    fn custom_default_locale_drives_fallback() {
        let registry = SessionRegistry::with_default_locale(Arc::new(Catalog::new()), tag("pt-BR"));
        assert_eq!(registry.lookup("x").locale(), &tag("pt-BR"));
    }

    #[test]
    fn identities_are_sorted() {
        let registry = SessionRegistry::default();
        registry.register("b", tag("en"));
        registry.register("a", tag("en"));
        assert_eq!(registry.identities(), ["a", "b"]);
    }
}
