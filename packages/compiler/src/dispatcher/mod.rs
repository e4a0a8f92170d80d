//! The compiler dispatcher: scans a document, routes each fragment to its
//! sub-compiler, and merges the results into one HTML document.

pub mod chtl_js_sub;
pub mod chtl_sub;
pub mod css_sub;
pub mod js_sub;

use chtl_js_sub::ChtlJsSubCompiler;
use chtl_sub::{ChtlSubCompiler, PendingBlock};
use css_sub::CssSubCompiler;
use js_sub::JsSubCompiler;

use crate::comment::{CommentGenerator, CommentKind, CommentParser};
use crate::config::CompilerConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind};
use crate::error::{CompilerError, Result as CrateResult};
use crate::merger::ResultMerger;
use crate::scanner::fragment::{CodeFragment, FragmentKind};
use crate::scanner::UnifiedScanner;
use crate::source::SourceBuffer;
use crate::trace::TraceSink;

/// Result of running a single sub-compiler over one fragment or a batch.
#[derive(Debug, Clone, Default)]
pub struct CompileResult {
    pub success: bool,
    pub output: String,
    pub error_message: String,
}

impl CompileResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error_message: String::new(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error_message: message.into(),
        }
    }
}

/// Sub-compiler contract every fragment-kind-specific compiler implements.
pub trait SubCompiler {
    fn compile(&mut self, fragment: &CodeFragment) -> CompileResult;
    fn compile_fragments(&mut self, fragments: &[CodeFragment]) -> CompileResult;
    fn reset(&mut self);
    fn name(&self) -> &'static str;
    fn set_debug(&mut self, debug: bool);
}

/// Orchestrates one compilation: scan → dispatch → merge.
pub struct CompilerDispatcher {
    chtl: ChtlSubCompiler,
    chtl_js: ChtlJsSubCompiler,
    css: CssSubCompiler,
    js: JsSubCompiler,
    module_paths: Vec<String>,
    debug_mode: bool,
    errors: Vec<String>,
    trace: TraceSink,
    last_diagnostics: Vec<Diagnostic>,
}

impl Default for CompilerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerDispatcher {
    pub fn new() -> Self {
        Self {
            chtl: ChtlSubCompiler::new(),
            chtl_js: ChtlJsSubCompiler::new(),
            css: CssSubCompiler::new(),
            js: JsSubCompiler::new(),
            module_paths: Vec::new(),
            debug_mode: false,
            errors: Vec::new(),
            trace: TraceSink::new(false),
            last_diagnostics: Vec::new(),
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        let mut d = Self::new();
        d.set_debug_mode(config.debug);
        d.set_module_paths(config.module_paths.clone());
        d
    }

    pub fn set_module_paths(&mut self, paths: Vec<String>) {
        self.module_paths = paths;
    }

    pub fn add_module_path(&mut self, path: impl Into<String>) {
        self.module_paths.push(path.into());
    }

    pub fn set_debug_mode(&mut self, debug: bool) {
        self.debug_mode = debug;
        self.trace = TraceSink::new(debug);
        self.chtl.set_debug(debug);
        self.chtl_js.set_debug(debug);
        self.css.set_debug(debug);
        self.js.set_debug(debug);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Every diagnostic emitted by the most recent [`Self::compile_string`]
    /// call, in emission order. Intended to be printed one per line by a
    /// caller regardless of whether compilation ultimately aborted.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.last_diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.trace.trace(format!("error: {message}"));
        self.errors.push(message);
    }

    /// Compiles CHTL source into a finished HTML document.
    pub fn compile_string(&mut self, source: &str) -> CrateResult<String> {
        self.chtl.reset();
        self.chtl_js.reset();
        self.clear_errors();

        let buffer = SourceBuffer::new("<input>", source);
        let overrides = crate::config::ConfigOverrides::default();
        let mut scanner = UnifiedScanner::new(&buffer, &overrides);
        let fragments = scanner.scan();
        let scan_diagnostics = scanner.into_diagnostics();

        let mut diagnostics = DiagnosticCollector::new();
        diagnostics.extend(scan_diagnostics);

        let mut css_accumulator: Vec<String> = Vec::new();
        let mut js_accumulator: Vec<String> = Vec::new();

        for fragment in &fragments {
            if diagnostics.diagnostics().iter().any(|d| {
                matches!(d.level, crate::diagnostics::DiagnosticLevel::Fatal)
            }) {
                break;
            }
            self.dispatch_fragment(fragment, &mut diagnostics, &mut css_accumulator, &mut js_accumulator);
        }

        for css in self.chtl.collected_css() {
            css_accumulator.push(css.clone());
        }

        let error_count = diagnostics.error_count();
        self.last_diagnostics = diagnostics.diagnostics().to_vec();

        if error_count > 0 {
            return Err(CompilerError::Aborted(error_count));
        }

        let html_body = self.chtl.render_html();
        let css_combined = css_accumulator.join("\n");
        let js_combined = js_accumulator.join("\n");

        Ok(ResultMerger::merge(&html_body, &css_combined, &js_combined))
    }

    fn dispatch_fragment(
        &mut self,
        fragment: &CodeFragment,
        diagnostics: &mut DiagnosticCollector,
        css_accumulator: &mut Vec<String>,
        js_accumulator: &mut Vec<String>,
    ) {
        match fragment.kind {
            FragmentKind::Chtl | FragmentKind::Text => {
                self.chtl.compile(fragment);
            }
            FragmentKind::Html => {
                self.chtl.push_raw(&fragment.content);
            }
            FragmentKind::Comment => {
                self.process_comment(fragment);
            }
            FragmentKind::Css => {
                if self.chtl.pending_block() == Some(PendingBlock::Style) {
                    self.chtl.attach_css(&fragment.content);
                } else {
                    let result = self.css.compile(fragment);
                    if !result.output.is_empty() {
                        css_accumulator.push(result.output);
                    }
                }
            }
            FragmentKind::JavaScript => {
                let result = self.js.compile(fragment);
                if !result.output.is_empty() {
                    js_accumulator.push(result.output);
                }
            }
            FragmentKind::ChtlJs => {
                let result = self.chtl_js.compile(fragment);
                if !result.output.is_empty() {
                    js_accumulator.push(result.output);
                }
            }
            FragmentKind::Unknown => {
                diagnostics.error(
                    DiagnosticKind::Internal,
                    "unrecognized fragment kind",
                    Some(fragment.span.clone()),
                );
            }
        }
    }

    /// Generator comments are re-emitted inline into the HTML stream;
    /// every other comment kind is dropped.
    fn process_comment(&mut self, fragment: &CodeFragment) {
        let nodes = CommentParser::extract(&fragment.content, FragmentKind::Comment);
        for node in nodes {
            if node.kind == CommentKind::Generator {
                if let Some(text) = CommentGenerator::emit(&node, FragmentKind::Chtl) {
                    self.chtl.push_raw(&text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_plain_element_scenario_s1() {
        let mut dispatcher = CompilerDispatcher::new();
        let html = dispatcher.compile_string("div { text { Hello } }").unwrap();
        assert!(html.contains("<div>Hello</div>"));
    }

    #[test]
    fn compiles_local_style_block_scenario_s2() {
        let mut dispatcher = CompilerDispatcher::new();
        let html = dispatcher
            .compile_string("div { style { color: red; } text { Hi } }")
            .unwrap();
        assert!(html.contains("<div class=\"chtl-div-1\">Hi</div>"));
        assert!(html.contains("<style>"));
        assert!(html.contains(".chtl-div-1 { color: red; }"));
    }

    #[test]
    fn compiles_origin_passthrough_scenario_s4() {
        let mut dispatcher = CompilerDispatcher::new();
        let html = dispatcher
            .compile_string("[Origin] @Html { <!-- raw --> <b>raw</b> }")
            .unwrap();
        assert!(html.contains("<!-- raw -->"));
        assert!(html.contains("<b>raw</b>"));
    }

    #[test]
    fn compiles_generator_comment_scenario_s5() {
        let mut dispatcher = CompilerDispatcher::new();
        let html = dispatcher
            .compile_string("-- This marks the header\nheader { text { Hi } }")
            .unwrap();
        assert!(html.contains("<!-- This marks the header -->"));
        assert!(html.contains("<header>Hi</header>"));
    }

    #[test]
    fn diagnostics_are_retained_after_compile() {
        let mut dispatcher = CompilerDispatcher::new();
        let _ = dispatcher.compile_string("div { text { Hello } }");
        // A clean compile still runs the scanner's diagnostic pass; no
        // errors are expected, but the accessor must not panic or stay
        // stale from a previous call.
        assert!(dispatcher.diagnostics().iter().all(|d| !d.is_error()));
    }

    #[test]
    fn unbalanced_braces_abort_compilation_scenario_s6() {
        let mut dispatcher = CompilerDispatcher::new();
        let result = dispatcher.compile_string("div { style { color: red;");
        assert!(result.is_err());
        assert!(dispatcher.diagnostics().iter().any(|d| d.is_error()
            && d.kind == DiagnosticKind::Lexical));
    }

    #[test]
    fn non_generator_comments_are_dropped() {
        let mut dispatcher = CompilerDispatcher::new();
        let html = dispatcher
            .compile_string("// not kept\ndiv { text { Hi } }")
            .unwrap();
        assert!(!html.contains("not kept"));
        assert!(html.contains("<div>Hi</div>"));
    }
}
