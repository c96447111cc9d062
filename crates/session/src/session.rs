use std::io::{self, Write};

use l10n_format::{Arg, Locale, Printer};
use l10n_plural::{resolve, RuleError, RuleSet};
use thiserror::Error;

/// Failure of a plural-aware print call.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A formatter bound to one locale for one caller.
///
/// Sessions are immutable; changing a caller's locale means registering a new
/// session under the same identity.
/// （綁定單一語系的呼叫端工作階段。）
#[derive(Debug, Clone)]
pub struct PrinterSession {
    printer: Printer,
}

impl PrinterSession {
    pub fn new(printer: Printer) -> Self {
        Self { printer }
    }

    pub fn locale(&self) -> &Locale {
        self.printer.locale()
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    pub fn sprintf(&self, template: &str, args: &[Arg]) -> String {
        self.printer.format(template, args)
    }

    /// Writes to stdout and returns the number of bytes written.
    pub fn printf(&self, template: &str, args: &[Arg]) -> io::Result<usize> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.fprintf(&mut handle, template, args)
    }

    pub fn fprintf<W>(&self, writer: &mut W, template: &str, args: &[Arg]) -> io::Result<usize>
    where
        W: Write + ?Sized,
    {
        self.printer.format_to(writer, template, args)
    }

    /// Like [`PrinterSession::sprintf`], with the template chosen by `rules`.
    pub fn sprintf_plural(
        &self,
        template: &str,
        args: &[Arg],
        rules: &RuleSet,
    ) -> Result<String, PrintError> {
        let resolved = resolve(template, args, Some(rules))?;
        Ok(self.printer.format(resolved.template, resolved.args))
    }

    pub fn printf_plural(
        &self,
        template: &str,
        args: &[Arg],
        rules: &RuleSet,
    ) -> Result<usize, PrintError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.fprintf_plural(&mut handle, template, args, rules)
    }

    pub fn fprintf_plural<W>(
        &self,
        writer: &mut W,
        template: &str,
        args: &[Arg],
        rules: &RuleSet,
    ) -> Result<usize, PrintError>
    where
        W: Write + ?Sized,
    {
        let resolved = resolve(template, args, Some(rules))?;
        Ok(self
            .printer
            .format_to(writer, resolved.template, resolved.args)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use l10n_format::{args, default_locale, Catalog};
    use l10n_plural::parse_rules;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn english() -> PrinterSession {
        PrinterSession::new(Printer::new(default_locale(), Arc::new(Catalog::new())))
    }

    #[test]
    fn plural_variant_selects_template() {
        let rules = parse_rules(["[1]=1", "one file", "[1]>1", "%d files"]);
        let session = english();
        assert_eq!(
            session.sprintf_plural("files", &args![1], &rules).unwrap(),
            "one file"
        );
        assert_eq!(
            session.sprintf_plural("files", &args![3], &rules).unwrap(),
            "3 files"
        );
    }

    #[test]
    fn write_failures_propagate_verbatim() {
        let session = english();
        let error = session
            .fprintf(&mut FailingWriter, "%d", &args![1])
            .unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);

        let rules = parse_rules(["[1]>0", "%d"]);
        match session.fprintf_plural(&mut FailingWriter, "x", &args![1], &rules) {
            Err(PrintError::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rule_errors_surface_before_writing() {
        let session = english();
        let rules = parse_rules(["[2]>0", "%d"]);
        let mut buffer = Vec::new();
        let result = session.fprintf_plural(&mut buffer, "x", &args![1], &rules);
        assert!(matches!(
            result,
            Err(PrintError::Rule(RuleError::PositionOutOfRange { position: 2, .. }))
        ));
        assert!(buffer.is_empty());
    }
}
