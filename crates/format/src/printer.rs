use std::io::{self, Write};
use std::sync::Arc;

use icu_locid::Locale;

use crate::printf::sprintf;
use crate::{Arg, Catalog};

/// Locale-bound formatter: translates a template through the catalog, then
/// substitutes arguments into it.
/// （綁定單一語系的格式化器。）
#[derive(Debug, Clone)]
pub struct Printer {
    locale: Locale,
    catalog: Arc<Catalog>,
}

impl Printer {
    pub fn new(locale: Locale, catalog: Arc<Catalog>) -> Self {
        Self { locale, catalog }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns the catalog translation of `template`, or `template` itself.
    pub fn translate<'a>(&'a self, template: &'a str) -> &'a str {
        self.catalog
            .translate(&self.locale, template)
            .unwrap_or(template)
    }

    pub fn format(&self, template: &str, args: &[Arg]) -> String {
        sprintf(self.translate(template), args)
    }

    /// Writes the formatted message and returns the number of bytes written.
    pub fn format_to<W>(&self, writer: &mut W, template: &str, args: &[Arg]) -> io::Result<usize>
    where
        W: Write + ?Sized,
    {
        let rendered = self.format(template, args);
        writer.write_all(rendered.as_bytes())?;
        Ok(rendered.len())
    }
}
