#![deny(clippy::all)]

//! CHTL compiler core: scans CHTL/CHTL-JS/CSS/JS source into fragments,
//! dispatches each fragment to its sub-compiler, and merges the results
//! into one HTML document.

#[cfg(feature = "napi-bindings")]
use napi::bindgen_prelude::*;
#[cfg(feature = "napi-bindings")]
use napi_derive::napi;

pub mod chars;
pub mod cjmod;
pub mod comment;
pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod lexer;
pub mod merger;
pub mod scanner;
pub mod schema;
pub mod source;
pub mod trace;

pub use config::CompilerConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel};
pub use dispatcher::CompilerDispatcher;
pub use error::{CompilerError, Result};

/// Compiles a CHTL source string into HTML, same entry point the CLI and
/// binding layers call into.
pub fn compile(source: &str, config: &CompilerConfig) -> Result<String> {
    let mut dispatcher = CompilerDispatcher::from_config(config);
    dispatcher.compile_string(source)
}

#[cfg(feature = "napi-bindings")]
#[napi(object)]
pub struct CompileOptions {
    pub debug: Option<bool>,
    pub strict: Option<bool>,
    pub module_paths: Option<Vec<String>>,
}

#[cfg(feature = "napi-bindings")]
#[napi(object)]
pub struct CompileOutcome {
    pub success: bool,
    pub html: Option<String>,
    pub errors: Option<Vec<String>>,
}

#[cfg(feature = "napi-bindings")]
fn config_from_options(options: Option<CompileOptions>) -> CompilerConfig {
    let mut config = CompilerConfig::default();
    if let Some(options) = options {
        config.debug = options.debug.unwrap_or(false);
        config.strict = options.strict.unwrap_or(false);
        if let Some(paths) = options.module_paths {
            config.set_module_paths(paths);
        }
    }
    config
}

/// Compiles a CHTL source string, returning HTML or the collected errors.
#[cfg(feature = "napi-bindings")]
#[napi]
pub fn compile_string(source: String, options: Option<CompileOptions>) -> CompileOutcome {
    let config = config_from_options(options);
    match compile(&source, &config) {
        Ok(html) => CompileOutcome {
            success: true,
            html: Some(html),
            errors: None,
        },
        Err(err) => CompileOutcome {
            success: false,
            html: None,
            errors: Some(vec![err.to_string()]),
        },
    }
}

/// Gets the compiler's crate version.
#[cfg(feature = "napi-bindings")]
#[napi]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_roundtrips_a_minimal_document() {
        let config = CompilerConfig::default();
        let html = compile("div { text { Hello } }", &config).unwrap();
        assert!(html.contains("<div>Hello</div>"));
    }

    #[test]
    fn compile_surfaces_aborted_error_on_bad_input() {
        let config = CompilerConfig::default();
        let result = compile("[Origin", &config);
        // Malformed Origin header is not a bracket keyword the lexer
        // recognizes; it degrades to plain content rather than aborting.
        assert!(result.is_ok() || matches!(result, Err(CompilerError::Aborted(_))));
    }

    #[cfg(feature = "napi-bindings")]
    #[test]
    fn napi_compile_string_reports_success() {
        let outcome = compile_string("div { text { Hi } }".to_string(), None);
        assert!(outcome.success);
        assert!(outcome.html.unwrap().contains("<div>Hi</div>"));
    }

    #[cfg(feature = "napi-bindings")]
    #[test]
    fn napi_get_version_is_non_empty() {
        assert!(!get_version().is_empty());
    }
}
