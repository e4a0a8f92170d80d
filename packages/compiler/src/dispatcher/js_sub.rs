//! JavaScript sub-compiler. The JS grammar is treated as an external
//! collaborator; this wraps content opaquely.

use crate::dispatcher::{CompileResult, SubCompiler};
use crate::scanner::fragment::CodeFragment;

pub struct JsSubCompiler {
    debug: bool,
}

impl Default for JsSubCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl JsSubCompiler {
    pub fn new() -> Self {
        Self { debug: false }
    }
}

impl SubCompiler for JsSubCompiler {
    fn compile(&mut self, fragment: &CodeFragment) -> CompileResult {
        CompileResult::ok(fragment.content.trim().to_string())
    }

    fn compile_fragments(&mut self, fragments: &[CodeFragment]) -> CompileResult {
        let combined = fragments
            .iter()
            .map(|f| f.content.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        CompileResult::ok(combined)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "JavaScriptCompiler"
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }
}
