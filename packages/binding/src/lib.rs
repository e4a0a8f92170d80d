#![deny(clippy::all)]

//! Thin NAPI-RS surface exposing `chtl_compiler_cli::compile_file` and
//! `chtl_compiler::compile` to Node.js: a dedicated cdylib depending on
//! both the library and CLI-support crates, with no caching layer of its
//! own since neither has a resolution stage worth caching.

use napi_derive::napi;

use chtl_compiler::CompilerConfig;

#[napi(object)]
pub struct CompileOptions {
    pub debug: Option<bool>,
    pub strict: Option<bool>,
    pub module_paths: Option<Vec<String>>,
}

#[napi(object)]
pub struct CompileOutcome {
    pub success: bool,
    pub html: Option<String>,
    pub diagnostics: Vec<String>,
}

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

/// Compiles a CHTL source string in memory.
#[napi]
pub fn compile_string(source: String, options: Option<CompileOptions>) -> CompileOutcome {
    let config = config_from_options(options);
    let mut dispatcher = chtl_compiler::CompilerDispatcher::from_config(&config);
    let result = dispatcher.compile_string(&source);
    let diagnostics = dispatcher
        .diagnostics()
        .iter()
        .map(|d| chtl_compiler_cli::format_diagnostic("<string>", d))
        .collect();

    match result {
        Ok(html) => CompileOutcome {
            success: true,
            html: Some(html),
            diagnostics,
        },
        Err(err) => CompileOutcome {
            success: false,
            html: None,
            diagnostics: vec![err.to_string()],
        },
    }
}

/// Reads `input_path`, compiles it, and writes the resulting HTML next to
/// it (or to `output_path` when given).
#[napi]
pub fn compile_file(
    input_path: String,
    output_path: Option<String>,
    options: Option<CompileOptions>,
) -> CompileOutcome {
    let config = config_from_options(options);
    let input = std::path::PathBuf::from(input_path);
    let output = output_path.map(std::path::PathBuf::from);

    match chtl_compiler_cli::compile_file(&input, output.as_deref(), &config) {
        Ok(result) => {
            let diagnostics = result
                .diagnostics
                .iter()
                .map(|d| chtl_compiler_cli::format_diagnostic(&input.display().to_string(), d))
                .collect();
            CompileOutcome {
                success: result.success(),
                html: result
                    .output_path
                    .and_then(|p| std::fs::read_to_string(p).ok()),
                diagnostics,
            }
        }
        Err(err) => CompileOutcome {
            success: false,
            html: None,
            diagnostics: vec![err.to_string()],
        },
    }
}

#[napi]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
