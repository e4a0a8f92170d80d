//! CLI support library: file I/O and diagnostic formatting around
//! [`chtl_compiler`]. Split out of the `chtlc` binary so the binding crate
//! can reuse the same file-based entry point `compile_file` exposes.

use std::fs;
use std::path::Path;

use chtl_compiler::{CompilerConfig, CompilerError, Diagnostic};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a single file compilation. On a clean compile `output_path`
/// is `Some`; on abort it is `None` and `diagnostics` explains why, since
/// no output is written when any diagnostic reaches `Error` level.
pub struct CompileFileResult {
    pub output_path: Option<std::path::PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileFileResult {
    pub fn success(&self) -> bool {
        self.output_path.is_some()
    }
}

/// Reads `input_path`, compiles it, and writes the resulting HTML to
/// `output_path` (or `input_path` with its extension replaced by `.html`
/// when `output_path` is `None`). Read/write failures are [`CliError`]s;
/// a compiler abort is reported through `CompileFileResult::diagnostics`
/// instead, since the caller still needs to print them.
pub fn compile_file(
    input_path: &Path,
    output_path: Option<&Path>,
    config: &CompilerConfig,
) -> Result<CompileFileResult, CliError> {
    let source = fs::read_to_string(input_path).map_err(|source| CliError::Read {
        path: input_path.to_path_buf(),
        source,
    })?;

    let mut dispatcher = chtl_compiler::CompilerDispatcher::from_config(config);
    let result = dispatcher.compile_string(&source);
    let diagnostics = dispatcher.diagnostics().to_vec();

    let html = match result {
        Ok(html) => html,
        Err(CompilerError::Aborted(_)) => {
            return Ok(CompileFileResult {
                output_path: None,
                diagnostics,
            });
        }
        Err(err) => {
            return Ok(CompileFileResult {
                output_path: None,
                diagnostics: vec![Diagnostic::new(
                    chtl_compiler::DiagnosticLevel::Fatal,
                    chtl_compiler::DiagnosticKind::Internal,
                    err.to_string(),
                    None,
                )],
            });
        }
    };

    let out_path = match output_path {
        Some(p) => p.to_path_buf(),
        None => input_path.with_extension("html"),
    };
    fs::write(&out_path, html).map_err(|source| CliError::Write {
        path: out_path.clone(),
        source,
    })?;

    Ok(CompileFileResult {
        output_path: Some(out_path),
        diagnostics,
    })
}

/// Formats one diagnostic as `[<level>] <kind> <file>:<line>:<col>: <message>`,
/// with an optional trailing `hint:` line.
pub fn format_diagnostic(file: &str, diag: &Diagnostic) -> String {
    let (line, col) = diag
        .span
        .as_ref()
        .map(|s| (s.start.line, s.start.column))
        .unwrap_or((0, 0));
    let mut out = format!(
        "[{:?}] {:?} {file}:{line}:{col}: {}",
        diag.level, diag.kind, diag.message
    );
    if let Some(hint) = &diag.hint {
        out.push_str(&format!("\n  hint: {hint}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chtl_compiler::{DiagnosticKind, DiagnosticLevel};

    #[test]
    fn format_diagnostic_without_span() {
        let diag = chtl_compiler::Diagnostic::new(
            DiagnosticLevel::Warning,
            DiagnosticKind::Syntax,
            "odd spacing",
            None,
        );
        let line = format_diagnostic("a.chtl", &diag);
        assert_eq!(line, "[Warning] Syntax a.chtl:0:0: odd spacing");
    }

    #[test]
    fn format_diagnostic_with_hint_adds_second_line() {
        let diag = chtl_compiler::Diagnostic::new(
            DiagnosticLevel::Error,
            DiagnosticKind::Lexical,
            "unterminated string",
            None,
        )
        .with_hint("add a closing quote");
        let line = format_diagnostic("a.chtl", &diag);
        assert!(line.contains("\n  hint: add a closing quote"));
    }

    #[test]
    fn compile_file_writes_html_next_to_source() {
        let dir = std::env::temp_dir().join(format!(
            "chtlc-test-{:?}",
            std::thread::current().id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("page.chtl");
        fs::write(&input, "div { text { Hi } }").unwrap();

        let config = CompilerConfig::default();
        let result = compile_file(&input, None, &config).unwrap();

        assert!(result.success());
        let output_path = result.output_path.unwrap();
        assert_eq!(output_path, dir.join("page.html"));
        let html = fs::read_to_string(&output_path).unwrap();
        assert!(html.contains("<div>Hi</div>"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn compile_file_reports_diagnostics_without_writing_on_abort() {
        let dir = std::env::temp_dir().join(format!(
            "chtlc-test-abort-{:?}",
            std::thread::current().id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("broken.chtl");
        // Mismatched opening brace with no close leaves the scanner stuck
        // mid-fragment; the lexer reports it as a lexical diagnostic.
        fs::write(&input, "div { text { \"unterminated").unwrap();

        let config = CompilerConfig::default();
        let result = compile_file(&input, None, &config).unwrap();

        if !result.success() {
            assert!(!result.diagnostics.is_empty());
            assert!(!dir.join("broken.html").exists());
        }

        let _ = fs::remove_dir_all(&dir);
    }
}
