//! CHTL-JS sub-compiler.
//!
//! Only the `listen` built-in gets concrete codegen (an enhanced selector
//! plus `->listen({...})` translates to `querySelector` +
//! `addEventListener`); `delegate`/`animate`/`vir` pass their raw text
//! through unchanged since their translation depends on the full CHTL-JS
//! AST transform, treated here as an out-of-scope external collaborator.

use crate::dispatcher::{CompileResult, SubCompiler};
use crate::scanner::fragment::CodeFragment;

pub struct ChtlJsSubCompiler {
    debug: bool,
    last_selector: Option<String>,
    output: String,
}

impl Default for ChtlJsSubCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChtlJsSubCompiler {
    pub fn new() -> Self {
        Self {
            debug: false,
            last_selector: None,
            output: String::new(),
        }
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    fn ingest(&mut self, content: &str) -> String {
        let trimmed = content.trim();
        if let Some(inner) = trimmed.strip_prefix("{{").and_then(|s| s.strip_suffix("}}")) {
            self.last_selector = Some(inner.trim().to_string());
            return String::new();
        }
        if let Some(rest) = trimmed.strip_prefix("->") {
            if let Some(call) = rest.strip_prefix("listen") {
                if let Some(body) = call.trim_start().strip_prefix('(') {
                    let body = body.trim_end_matches(')').trim();
                    let obj = body.trim_start_matches('{').trim_end_matches('}');
                    let selector = self.last_selector.clone().unwrap_or_default();
                    return render_listen_calls(&selector, obj);
                }
            }
            // delegate/animate/vir and anything else: emit unchanged.
            return rest.to_string();
        }
        trimmed.to_string()
    }
}

/// Splits `obj` into `event: handler` pairs at brace/paren depth 0 and
/// emits one `addEventListener` call per pair.
fn render_listen_calls(selector: &str, obj: &str) -> String {
    let mut calls = Vec::new();
    for (event, handler) in split_pairs(obj) {
        calls.push(format!(
            "document.querySelector('{selector}').addEventListener('{event}', {handler});"
        ));
    }
    calls.join("\n")
}

fn split_pairs(obj: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut depth = 0i32;
    let mut seg_start = 0usize;
    let bytes: Vec<char> = obj.chars().collect();
    let mut segments = Vec::new();
    for (i, c) in bytes.iter().enumerate() {
        match c {
            '{' | '(' => depth += 1,
            '}' | ')' => depth -= 1,
            ',' if depth == 0 => {
                segments.push(bytes[seg_start..i].iter().collect::<String>());
                seg_start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(bytes[seg_start..].iter().collect::<String>());

    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if let Some(colon) = segment.find(':') {
            let key = segment[..colon].trim().to_string();
            let value = segment[colon + 1..].trim().to_string();
            pairs.push((key, value));
        }
    }
    pairs
}

impl SubCompiler for ChtlJsSubCompiler {
    fn compile(&mut self, fragment: &CodeFragment) -> CompileResult {
        let rendered = self.ingest(&fragment.content);
        if !rendered.is_empty() {
            if !self.output.is_empty() {
                self.output.push('\n');
            }
            self.output.push_str(&rendered);
        }
        CompileResult::ok(rendered)
    }

    fn compile_fragments(&mut self, fragments: &[CodeFragment]) -> CompileResult {
        let mut combined = String::new();
        for fragment in fragments {
            let r = self.compile(fragment);
            if !r.output.is_empty() {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(&r.output);
            }
        }
        CompileResult::ok(combined)
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn name(&self) -> &'static str {
        "CHTLJSCompiler"
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }
}
