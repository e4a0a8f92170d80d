//! Diagnostics: in-band compile problems reported alongside otherwise
//! successful output, as opposed to [`crate::error::CompilerError`] which
//! aborts before any output exists.

use crate::source::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    Lexical,
    Semantic,
    Type,
    Import,
    Namespace,
    Constraint,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(
        level: DiagnosticLevel,
        kind: DiagnosticKind,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
            span,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, DiagnosticLevel::Error | DiagnosticLevel::Fatal)
    }

    pub fn format(&self) -> String {
        let loc = self
            .span
            .as_ref()
            .map(|s| format!("{} ", s.start))
            .unwrap_or_default();
        let mut s = format!("{loc}{:?}: {}", self.level, self.message);
        if let Some(hint) = &self.hint {
            s.push_str(&format!(" (hint: {hint})"));
        }
        s
    }
}

/// Accumulates diagnostics for a single compilation. Abort/continue policy
/// lives in the caller: `Fatal`/`Internal` diagnostics should stop fragment
/// processing, everything else just accumulates.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error | DiagnosticLevel::Fatal => self.error_count += 1,
            DiagnosticLevel::Warning => self.warning_count += 1,
            DiagnosticLevel::Info => {}
        }
        self.diagnostics.push(diag);
    }

    pub fn info(&mut self, message: impl Into<String>, span: Option<SourceSpan>) {
        self.add(Diagnostic::new(
            DiagnosticLevel::Info,
            DiagnosticKind::Semantic,
            message,
            span,
        ));
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Option<SourceSpan>) {
        self.add(Diagnostic::new(
            DiagnosticLevel::Warning,
            DiagnosticKind::Semantic,
            message,
            span,
        ));
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Option<SourceSpan>) {
        self.add(Diagnostic::new(DiagnosticLevel::Error, kind, message, span));
    }

    pub fn fatal(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Option<SourceSpan>) {
        self.add(Diagnostic::new(DiagnosticLevel::Fatal, kind, message, span));
    }

    pub fn lexical_error(&mut self, message: impl Into<String>, span: Option<SourceSpan>) {
        self.error(DiagnosticKind::Lexical, message, span);
    }

    pub fn syntax_error(&mut self, message: impl Into<String>, span: Option<SourceSpan>) {
        self.error(DiagnosticKind::Syntax, message, span);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
    }

    pub fn extend(&mut self, other: DiagnosticCollector) {
        for diag in other.diagnostics {
            self.add(diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_errors_and_warnings_separately() {
        let mut c = DiagnosticCollector::new();
        c.warning("careful", None);
        c.lexical_error("bad brace", None);
        assert_eq!(c.warning_count(), 1);
        assert_eq!(c.error_count(), 1);
        assert!(c.has_errors());
    }

    #[test]
    fn info_does_not_count_as_error_or_warning() {
        let mut c = DiagnosticCollector::new();
        c.info("note", None);
        assert_eq!(c.error_count(), 0);
        assert_eq!(c.warning_count(), 0);
        assert!(!c.has_errors());
    }

    #[test]
    fn with_hint_is_chainable() {
        let d = Diagnostic::new(DiagnosticLevel::Warning, DiagnosticKind::Syntax, "oops", None)
            .with_hint("try adding a semicolon");
        assert_eq!(d.hint.as_deref(), Some("try adding a semicolon"));
    }

    #[test]
    fn extend_merges_counts() {
        let mut a = DiagnosticCollector::new();
        a.warning("w1", None);
        let mut b = DiagnosticCollector::new();
        b.lexical_error("e1", None);
        a.extend(b);
        assert_eq!(a.warning_count(), 1);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.diagnostics().len(), 2);
    }
}
