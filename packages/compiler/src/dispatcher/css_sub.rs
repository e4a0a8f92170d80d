//! CSS sub-compiler. CSS3 grammar is treated as an external collaborator;
//! this wraps content opaquely, trimming the whitespace the scanner
//! leaves around a block's boundary brace.

use crate::dispatcher::{CompileResult, SubCompiler};
use crate::scanner::fragment::CodeFragment;

pub struct CssSubCompiler {
    debug: bool,
}

impl Default for CssSubCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl CssSubCompiler {
    pub fn new() -> Self {
        Self { debug: false }
    }
}

impl SubCompiler for CssSubCompiler {
    fn compile(&mut self, fragment: &CodeFragment) -> CompileResult {
        CompileResult::ok(fragment.content.trim().to_string())
    }

    fn compile_fragments(&mut self, fragments: &[CodeFragment]) -> CompileResult {
        let combined = fragments
            .iter()
            .map(|f| f.content.trim())
            .collect::<Vec<_>>()
            .join("\n");
        CompileResult::ok(combined)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "CSSCompiler"
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }
}
