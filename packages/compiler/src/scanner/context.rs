//! Scanner state: a stacked lexical state machine plus a balanced-bracket
//! tracker. A mismatched closing brace leaves the stack untouched and
//! reports failure rather than desyncing or panicking.

use crate::source::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    Normal,
    InChtlElement,
    InStyleBlock,
    InScriptBlock,
    InLocalStyle,
    InLocalScript,
    InTemplate,
    InCustom,
    InConfiguration,
    InNamespace,
    InImport,
    InOrigin,
    InTextNode,
    InStringLiteral,
    InComment,
    InMultilineComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceKind {
    Curly,
    Square,
    Paren,
}

#[derive(Debug, Clone)]
pub struct BraceFrame {
    pub kind: BraceKind,
    pub span: SourceSpan,
}

/// Stacked lexical state + bracket-balance tracker consulted by the
/// [`crate::scanner::UnifiedScanner`] at every decision point.
#[derive(Debug)]
pub struct ScannerContext {
    state_stack: Vec<ScannerState>,
    brace_stack: Vec<BraceFrame>,
    curly_count: i64,
    square_count: i64,
    paren_count: i64,
    line: usize,
    column: usize,
    current_element_name: Option<String>,
    current_block_type: Option<String>,
    string_delimiter: Option<char>,
}

impl Default for ScannerContext {
    fn default() -> Self {
        Self {
            state_stack: vec![ScannerState::Normal],
            brace_stack: Vec::new(),
            curly_count: 0,
            square_count: 0,
            paren_count: 0,
            line: 1,
            column: 1,
            current_element_name: None,
            current_block_type: None,
            string_delimiter: None,
        }
    }
}

impl ScannerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_state(&mut self, state: ScannerState) {
        self.state_stack.push(state);
    }

    /// No-op when only the bottom `Normal` state remains.
    pub fn pop_state(&mut self) -> Option<ScannerState> {
        if self.state_stack.len() <= 1 {
            return None;
        }
        self.state_stack.pop()
    }

    pub fn current_state(&self) -> ScannerState {
        *self.state_stack.last().expect("state stack never empties")
    }

    /// True if `state` occurs anywhere on the stack, not just at the top.
    pub fn is_in_state(&self, state: ScannerState) -> bool {
        self.state_stack.contains(&state)
    }

    pub fn state_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Pushes a brace frame and increments its counter. Always succeeds.
    pub fn push_brace(&mut self, kind: BraceKind, span: SourceSpan) {
        match kind {
            BraceKind::Curly => self.curly_count += 1,
            BraceKind::Square => self.square_count += 1,
            BraceKind::Paren => self.paren_count += 1,
        }
        self.brace_stack.push(BraceFrame { kind, span });
    }

    /// Pops iff the top frame's kind matches `expected`. On mismatch (or an
    /// empty stack) the stack and counters are left untouched and `false`
    /// is returned — the caller is expected to emit a `Lexical` diagnostic.
    pub fn pop_brace(&mut self, expected: BraceKind) -> bool {
        match self.brace_stack.last() {
            Some(frame) if frame.kind == expected => {
                match expected {
                    BraceKind::Curly => self.curly_count -= 1,
                    BraceKind::Square => self.square_count -= 1,
                    BraceKind::Paren => self.paren_count -= 1,
                }
                self.brace_stack.pop();
                true
            }
            _ => false,
        }
    }

    pub fn brace_depth(&self) -> usize {
        self.brace_stack.len()
    }

    /// Frames still open at the point this is called, outermost first.
    /// Non-empty exactly when [`Self::is_balanced`] is `false`.
    pub fn open_braces(&self) -> &[BraceFrame] {
        &self.brace_stack
    }

    pub fn is_balanced(&self) -> bool {
        self.brace_stack.is_empty()
            && self.curly_count == 0
            && self.square_count == 0
            && self.paren_count == 0
    }

    pub fn update_position(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    pub fn current_line(&self) -> usize {
        self.line
    }

    pub fn current_column(&self) -> usize {
        self.column
    }

    pub fn set_current_element_name(&mut self, name: Option<String>) {
        self.current_element_name = name;
    }

    pub fn current_element_name(&self) -> Option<&str> {
        self.current_element_name.as_deref()
    }

    pub fn set_current_block_type(&mut self, block_type: Option<String>) {
        self.current_block_type = block_type;
    }

    pub fn current_block_type(&self) -> Option<&str> {
        self.current_block_type.as_deref()
    }

    pub fn set_string_delimiter(&mut self, delim: Option<char>) {
        self.string_delimiter = delim;
    }

    pub fn string_delimiter(&self) -> Option<char> {
        self.string_delimiter
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn in_chtl_ctx(&self) -> bool {
        matches!(
            self.current_state(),
            ScannerState::InChtlElement
                | ScannerState::InTemplate
                | ScannerState::InCustom
                | ScannerState::InConfiguration
                | ScannerState::InNamespace
                | ScannerState::InImport
                | ScannerState::InTextNode
        )
    }

    pub fn in_chtl_js_ctx(&self) -> bool {
        matches!(self.current_state(), ScannerState::InLocalScript)
    }

    pub fn in_css_ctx(&self) -> bool {
        matches!(
            self.current_state(),
            ScannerState::InStyleBlock | ScannerState::InLocalStyle
        )
    }

    pub fn in_js_ctx(&self) -> bool {
        self.current_state() == ScannerState::InScriptBlock
            && !self.is_in_state(ScannerState::InChtlElement)
    }

    pub fn in_html_ctx(&self) -> bool {
        self.current_state() == ScannerState::Normal
            && !self.in_chtl_ctx()
            && !self.in_chtl_js_ctx()
            && !self.in_css_ctx()
            && !self.in_js_ctx()
    }
}
