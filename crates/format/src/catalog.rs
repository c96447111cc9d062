use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use icu_locid::subtags::Variants;
use icu_locid::{locale, LanguageIdentifier, Locale, ParserError as LocaleParserError};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Locale used when a caller has no session of its own.
pub fn default_locale() -> Locale {
    locale!("en-US")
}

/// Parses a BCP-47 style tag such as `zh-Hans` or `en-US`.
/// （解析語系標籤。）
pub fn parse_locale(tag: &str) -> Result<Locale, CatalogError> {
    Locale::from_str(tag).map_err(|error| CatalogError::InvalidLocaleIdentifier {
        locale: tag.to_string(),
        error,
    })
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to enumerate catalog directory {0}: {1}")]
    ReadDir(PathBuf, io::Error),
    #[error("failed to read catalog file {0}: {1}")]
    ReadFile(PathBuf, io::Error),
    #[error("failed to parse catalog file {0}: {1}")]
    ParseFile(PathBuf, serde_json::Error),
    #[error("duplicate locale code {0}")]
    DuplicateLocale(String),
    #[error("locale identifier '{locale}' is invalid: {error}")]
    InvalidLocaleIdentifier {
        locale: String,
        error: LocaleParserError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSummary {
    pub code: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCatalogStats {
    pub code: String,
    pub display_name: String,
    pub total_entries: usize,
}

#[derive(Debug, Clone)]
struct LocaleMessages {
    id: LanguageIdentifier,
    summary: LocaleSummary,
    messages: HashMap<String, String>,
}

/// Translations keyed by source template, grouped per locale.
///
/// A catalog is assembled up front (from code or from JSON packs) and then
/// shared read-only between printers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locales: Vec<LocaleMessages>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    locale: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    strings: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` pack found in `path`.
    /// （從指定目錄載入所有 JSON 語言包。）
    pub fn load_from_dir(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::load_from_dirs(std::iter::once(path))
    }

    /// Loads packs from several directories in order. Missing directories are skipped.
    pub fn load_from_dirs<I, P>(paths: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut catalog = Self::new();
        for path in paths {
            catalog.load_directory(path.as_ref())?;
        }
        Ok(catalog)
    }

    /// Registers `translation` for `key` under `locale`, replacing any previous value.
    pub fn set_string(
        &mut self,
        locale: &Locale,
        key: impl Into<String>,
        translation: impl Into<String>,
    ) {
        let slot = self.slot_mut(&locale.id);
        slot.messages.insert(key.into(), translation.into());
    }

    /// Builder form of [`Catalog::set_string`].
    pub fn with_string(
        mut self,
        locale: &Locale,
        key: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        self.set_string(locale, key, translation);
        self
    }

    /// Looks `key` up for `locale`, widening from the full tag to language+script
    /// and finally to the bare language.
    pub fn translate(&self, locale: &Locale, key: &str) -> Option<&str> {
        fallback_chain(&locale.id).into_iter().find_map(|id| {
            self.locales
                .iter()
                .find(|entry| entry.id == id)
                .and_then(|entry| entry.messages.get(key))
                .map(String::as_str)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn locale_summaries(&self) -> Vec<LocaleSummary> {
        self.locales
            .iter()
            .map(|entry| entry.summary.clone())
            .collect()
    }

    pub fn catalog_stats(&self) -> Vec<LocaleCatalogStats> {
        self.locales
            .iter()
            .map(|entry| LocaleCatalogStats {
                code: entry.summary.code.clone(),
                display_name: entry.summary.display_name.clone(),
                total_entries: entry.messages.len(),
            })
            .collect()
    }

    /// Keys present in `reference` but absent from `code`, sorted.
    /// Returns `None` when either locale is unknown.
    pub fn missing_keys(&self, reference: &str, code: &str) -> Option<Vec<String>> {
        let reference = self.find_code(reference)?;
        let target = self.find_code(code)?;
        let mut missing: Vec<String> = reference
            .messages
            .keys()
            .filter(|key| !target.messages.contains_key(*key))
            .cloned()
            .collect();
        missing.sort();
        Some(missing)
    }

    /// Iterates `(key, translation)` pairs for one locale code, sorted by key.
    pub fn entries(&self, code: &str) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .find_code(code)
            .map(|entry| {
                entry
                    .messages
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort();
        entries
    }

    fn find_code(&self, code: &str) -> Option<&LocaleMessages> {
        self.locales.iter().find(|entry| entry.summary.code == code)
    }

    fn slot_mut(&mut self, id: &LanguageIdentifier) -> &mut LocaleMessages {
        let index = match self.locales.iter().position(|entry| &entry.id == id) {
            Some(index) => index,
            None => {
                let code = id.to_string();
                self.locales.push(LocaleMessages {
                    id: id.clone(),
                    summary: LocaleSummary {
                        display_name: code.clone(),
                        code,
                    },
                    messages: HashMap::new(),
                });
                self.locales.len() - 1
            }
        };
        &mut self.locales[index]
    }

    fn load_directory(&mut self, dir: &Path) -> Result<(), CatalogError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "catalog directory missing, skipping");
                return Ok(());
            }
            Err(err) => return Err(CatalogError::ReadDir(dir.to_path_buf(), err)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| CatalogError::ReadDir(dir.to_path_buf(), err))?;
            let path = entry.path();
            let metadata = entry
                .metadata()
                .map_err(|err| CatalogError::ReadFile(path.clone(), err))?;
            if metadata.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
            {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let contents = fs::read_to_string(&path)
                .map_err(|err| CatalogError::ReadFile(path.clone(), err))?;
            let file: CatalogFile = serde_json::from_str(&contents)
                .map_err(|err| CatalogError::ParseFile(path.clone(), err))?;
            let locale = parse_locale(&file.locale)?;
            if self.locales.iter().any(|entry| entry.id == locale.id) {
                return Err(CatalogError::DuplicateLocale(file.locale));
            }
            debug!(
                path = %path.display(),
                locale = %file.locale,
                entries = file.strings.len(),
                "loaded catalog pack"
            );
            let display_name = file.display_name.unwrap_or_else(|| file.locale.clone());
            self.locales.push(LocaleMessages {
                id: locale.id,
                summary: LocaleSummary {
                    code: file.locale,
                    display_name,
                },
                messages: file.strings.into_iter().collect(),
            });
        }
        Ok(())
    }
}

fn fallback_chain(id: &LanguageIdentifier) -> Vec<LanguageIdentifier> {
    let mut chain = vec![id.clone()];

    let mut script_only = id.clone();
    script_only.region = None;
    script_only.variants = Variants::new();
    if !chain.contains(&script_only) {
        chain.push(script_only);
    }

    let mut language_only = id.clone();
    language_only.script = None;
    language_only.region = None;
    language_only.variants = Variants::new();
    if !chain.contains(&language_only) {
        chain.push(language_only);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(value: &str) -> Locale {
        parse_locale(value).expect("valid locale")
    }

    #[test]
    fn translate_widens_to_language_and_script() {
        let catalog = Catalog::new().with_string(&tag("zh-Hans"), "cat", "猫");
        assert_eq!(catalog.translate(&tag("zh-Hans-CN"), "cat"), Some("猫"));
        assert_eq!(catalog.translate(&tag("zh-Hans"), "cat"), Some("猫"));
        assert_eq!(catalog.translate(&tag("zh-Hant"), "cat"), None);
    }

    #[test]
    fn set_string_replaces_existing_translation() {
        let mut catalog = Catalog::new();
        catalog.set_string(&tag("fr"), "hello", "salut");
        catalog.set_string(&tag("fr"), "hello", "bonjour");
        assert_eq!(catalog.translate(&tag("fr-FR"), "hello"), Some("bonjour"));
        assert_eq!(catalog.catalog_stats()[0].total_entries, 1);
    }

    #[test]
    fn invalid_locale_tag_is_rejected() {
        let error = parse_locale("not a tag").unwrap_err();
        assert!(matches!(error, CatalogError::InvalidLocaleIdentifier { locale, .. } if locale == "not a tag"));
    }

    #[test]
    fn missing_keys_compares_against_reference() {
        let catalog = Catalog::new()
            .with_string(&tag("en"), "a", "A")
            .with_string(&tag("en"), "b", "B")
            .with_string(&tag("de"), "a", "A");
        assert_eq!(catalog.missing_keys("en", "de"), Some(vec!["b".to_string()]));
        assert_eq!(catalog.missing_keys("en", "xx"), None);
    }
}
