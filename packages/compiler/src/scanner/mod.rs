//! Unified scanner: slices mixed CHTL/CHTL-JS/CSS/JS source into typed
//! [`fragment::CodeFragment`]s.
//!
//! Runs an identify → extract → post-process loop over a plain
//! `Vec<(usize, char)>` cursor, since lookahead never needs to outlive a
//! single `scan_next` call.
//!
//! Structural CHTL parsing (elements, templates, customs, imports) is an
//! out-of-scope collaborator; this scanner only recognizes the textual
//! cues it needs to route fragments correctly: comment prefixes,
//! `[Origin]` blocks, local `style { … }` / `script { … }` block headers,
//! and CHTL-JS markers inside a script body. A CHTL element's closing `}`
//! that terminates one of those blocks is handed back as its own
//! single-character `Chtl` fragment rather than absorbed silently, so
//! every fragment's span still covers its slice of the source with no
//! gaps, without modelling full element nesting.

pub mod context;
pub mod fragment;
pub mod origin;

pub use context::{BraceFrame, BraceKind, ScannerContext, ScannerState};
pub use fragment::{CodeFragment, FragmentKind};
pub use origin::{OriginBlock, OriginEmbedDetector};

use crate::chars;
use crate::comment::CommentParser;
use crate::config::ConfigOverrides;
use crate::diagnostics::DiagnosticCollector;
use crate::lexer::{CHTLLexer, ChtlJsLexer};
use crate::source::SourceBuffer;

pub struct UnifiedScanner<'a> {
    buffer: &'a SourceBuffer,
    overrides: &'a ConfigOverrides,
    chars: Vec<(usize, char)>,
    pos: usize,
    context: ScannerContext,
    origin_blocks: Vec<OriginBlock>,
    diagnostics: DiagnosticCollector,
}

impl<'a> UnifiedScanner<'a> {
    pub fn new(buffer: &'a SourceBuffer, overrides: &'a ConfigOverrides) -> Self {
        let origin_blocks = OriginEmbedDetector::detect(buffer.content());
        Self {
            buffer,
            overrides,
            chars: buffer.content().char_indices().collect(),
            pos: 0,
            context: ScannerContext::new(),
            origin_blocks,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    pub fn into_diagnostics(self) -> DiagnosticCollector {
        self.diagnostics
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }

    pub fn scan(&mut self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        while let Some(frag) = self.scan_next() {
            fragments.push(frag);
        }
        self.report_unbalanced_braces();
        merge_adjacent_fragments(fragments)
    }

    /// Reaching EOF with open brace frames means a block never closed;
    /// each one gets its own `Lexical` diagnostic anchored at the opening
    /// brace, outermost first, so compilation reports the failure instead
    /// of silently accepting truncated input.
    fn report_unbalanced_braces(&mut self) {
        let opens: Vec<BraceFrame> = self.context.open_braces().to_vec();
        for frame in opens {
            let opener = match frame.kind {
                BraceKind::Curly => "{",
                BraceKind::Square => "[",
                BraceKind::Paren => "(",
            };
            self.diagnostics.lexical_error(
                format!(
                    "unbalanced `{opener}` opened at {}",
                    frame.span.start
                ),
                Some(frame.span),
            );
        }
    }

    fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn current_byte(&self) -> usize {
        self.chars.get(self.pos).map(|(b, _)| *b).unwrap_or(self.byte_len())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if let Some(c) = ch {
            self.context.update_position(c);
            self.pos += 1;
        }
        ch
    }

    fn content(&self) -> &str {
        self.buffer.content()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if chars::is_whitespace(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn matches_at(&self, s: &str) -> bool {
        self.content()[self.current_byte()..].starts_with(s)
    }

    /// `word` recognized only as a standalone identifier (not a prefix of a
    /// longer identifier).
    fn matches_word(&self, word: &str) -> bool {
        if !self.matches_at(word) {
            return false;
        }
        let after = self.current_byte() + word.len();
        !self
            .content()
            .get(after..)
            .and_then(|rest| rest.chars().next())
            .map(chars::is_identifier_part)
            .unwrap_or(false)
    }

    fn origin_block_at(&self, offset: usize) -> Option<&OriginBlock> {
        self.origin_blocks.iter().find(|b| b.outer_start == offset)
    }

    pub fn scan_next(&mut self) -> Option<CodeFragment> {
        self.skip_whitespace();
        if self.is_at_end() {
            return None;
        }

        let start = self.current_byte();

        if let Some(block) = self.origin_block_at(start).cloned() {
            return Some(self.extract_origin_fragment(block));
        }

        if self.matches_at("//") || self.matches_at("/*") || self.matches_at("--") {
            return Some(self.extract_comment_fragment());
        }

        if self.context.in_css_ctx() && self.peek() == Some('}') {
            return Some(self.extract_closing_brace());
        }

        if (self.context.in_js_ctx() || self.context.in_chtl_js_ctx()) && self.peek() == Some('}')
        {
            return Some(self.extract_closing_brace());
        }

        if self.context.in_js_ctx() || self.context.in_chtl_js_ctx() {
            if self.matches_at("{{") {
                return Some(self.extract_chtl_js_selector());
            }
            if self.matches_word("vir") {
                return Some(self.extract_chtl_js_vir());
            }
            if self.matches_at("->") {
                return Some(self.extract_chtl_js_arrow());
            }
        }

        if self.context.in_css_ctx() {
            return Some(self.extract_css_fragment());
        }

        if self.context.in_js_ctx() || self.context.in_chtl_js_ctx() {
            return Some(self.extract_javascript_fragment());
        }

        Some(self.extract_chtl_fragment())
    }

    fn extract_origin_fragment(&mut self, block: OriginBlock) -> CodeFragment {
        while self.current_byte() < block.outer_end && !self.is_at_end() {
            self.advance();
        }
        let kind = match block.origin_type.as_str() {
            "@Html" => FragmentKind::Html,
            "@Style" | "@CSS" => FragmentKind::Css,
            "@JavaScript" | "@JS" => FragmentKind::JavaScript,
            _ => FragmentKind::Chtl,
        };
        if block.is_reference {
            return CodeFragment::new(kind, "", self.buffer.span(block.outer_start, block.outer_end));
        }
        CodeFragment::new(
            kind,
            &self.content()[block.inner_start..block.inner_end],
            self.buffer.span(block.inner_start, block.inner_end),
        )
    }

    fn extract_comment_fragment(&mut self) -> CodeFragment {
        let start = self.current_byte();
        if self.matches_at("/*") {
            self.advance();
            self.advance();
            let mut terminated = false;
            while !self.is_at_end() {
                if self.matches_at("*/") {
                    self.advance();
                    self.advance();
                    terminated = true;
                    break;
                }
                self.advance();
            }
            if !terminated {
                self.diagnostics.lexical_error(
                    "unterminated multi-line comment",
                    Some(self.buffer.span(start, self.current_byte())),
                );
            }
        } else {
            // "//" or "--" generator comment, both end at newline.
            self.advance();
            self.advance();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::Comment,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    /// Consumes a single `}` that closes the current local style/script
    /// block, restoring the enclosing context.
    fn extract_closing_brace(&mut self) -> CodeFragment {
        let start = self.current_byte();
        self.advance();
        let end = self.current_byte();
        if !self.context.pop_brace(BraceKind::Curly) {
            self.diagnostics.lexical_error(
                "unmatched closing brace",
                Some(self.buffer.span(start, end)),
            );
        }
        self.context.pop_state();
        CodeFragment::new(
            FragmentKind::Chtl,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn extract_css_fragment(&mut self) -> CodeFragment {
        let start = self.current_byte();
        let entry_depth = self.context.brace_depth();
        loop {
            if self.is_at_end() {
                break;
            }
            if self.peek() == Some('}') && self.context.brace_depth() == entry_depth {
                break;
            }
            match self.peek() {
                Some('{') => {
                    let s = self.current_byte();
                    self.advance();
                    self.context.push_brace(BraceKind::Curly, self.buffer.span(s, s + 1));
                }
                Some('}') => {
                    let s = self.current_byte();
                    self.advance();
                    if !self.context.pop_brace(BraceKind::Curly) {
                        self.diagnostics.lexical_error(
                            "unmatched closing brace in style block",
                            Some(self.buffer.span(s, s + 1)),
                        );
                    }
                }
                Some(q) if chars::is_quote(q) => self.consume_string_literal(q),
                Some('/') if self.peek_at(1) == Some('*') => self.consume_block_comment(),
                _ => {
                    self.advance();
                }
            }
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::Css,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn extract_javascript_fragment(&mut self) -> CodeFragment {
        let start = self.current_byte();
        let entry_depth = self.context.brace_depth();
        loop {
            if self.is_at_end() {
                break;
            }
            if self.peek() == Some('}') && self.context.brace_depth() == entry_depth {
                break;
            }
            if self.matches_at("{{") || self.matches_word("vir") || self.matches_at("->") {
                break;
            }
            match self.peek() {
                Some('{') => {
                    let s = self.current_byte();
                    self.advance();
                    self.context.push_brace(BraceKind::Curly, self.buffer.span(s, s + 1));
                }
                Some('}') => {
                    let s = self.current_byte();
                    self.advance();
                    if !self.context.pop_brace(BraceKind::Curly) {
                        self.diagnostics.lexical_error(
                            "unmatched closing brace in script block",
                            Some(self.buffer.span(s, s + 1)),
                        );
                    }
                }
                Some(q) if chars::is_quote(q) => self.consume_string_literal(q),
                Some('/') if self.peek_at(1) == Some('/') => self.consume_line_comment(),
                Some('/') if self.peek_at(1) == Some('*') => self.consume_block_comment(),
                _ => {
                    self.advance();
                }
            }
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::JavaScript,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn extract_chtl_js_selector(&mut self) -> CodeFragment {
        let start = self.current_byte();
        self.advance();
        self.advance();
        let mut depth = 1i32;
        loop {
            if self.is_at_end() {
                self.diagnostics.lexical_error(
                    "unterminated enhanced selector",
                    Some(self.buffer.span(start, self.current_byte())),
                );
                break;
            }
            if self.matches_at("}}") && depth == 1 {
                self.advance();
                self.advance();
                break;
            }
            match self.peek() {
                Some('{') => {
                    depth += 1;
                    self.advance();
                }
                Some('}') => {
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::ChtlJs,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn extract_chtl_js_vir(&mut self) -> CodeFragment {
        let start = self.current_byte();
        while let Some(c) = self.peek() {
            if c == ';' {
                self.advance();
                break;
            }
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::ChtlJs,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn extract_chtl_js_arrow(&mut self) -> CodeFragment {
        let start = self.current_byte();
        self.advance();
        self.advance();
        while self.peek().map(chars::is_identifier_part).unwrap_or(false) {
            self.advance();
        }
        if self.peek() == Some('(') {
            let mut depth = 0i32;
            loop {
                match self.peek() {
                    Some('(') => {
                        depth += 1;
                        self.advance();
                    }
                    Some(')') => {
                        depth -= 1;
                        self.advance();
                        if depth == 0 {
                            break;
                        }
                    }
                    None => break,
                    _ => {
                        self.advance();
                    }
                }
            }
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::ChtlJs,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn extract_chtl_fragment(&mut self) -> CodeFragment {
        let start = self.current_byte();
        loop {
            if self.is_at_end() {
                break;
            }
            if self.current_byte() != start
                && (self.matches_at("//") || self.matches_at("/*") || self.matches_at("--"))
            {
                break;
            }
            if self.current_byte() != start && self.origin_block_at(self.current_byte()).is_some() {
                break;
            }

            if self.matches_word("style") || self.matches_word("script") {
                let is_style = self.matches_word("style");
                let word = if is_style { "style" } else { "script" };
                for _ in 0..word.len() {
                    self.advance();
                }
                self.skip_whitespace();
                if self.peek() == Some('{') {
                    let brace_pos = self.current_byte();
                    self.advance();
                    self.context
                        .push_brace(BraceKind::Curly, self.buffer.span(brace_pos, brace_pos + 1));
                    let is_local = self.context.is_in_state(ScannerState::InChtlElement);
                    let new_state = match (is_style, is_local) {
                        (true, true) => ScannerState::InLocalStyle,
                        (true, false) => ScannerState::InStyleBlock,
                        (false, true) => ScannerState::InLocalScript,
                        (false, false) => ScannerState::InScriptBlock,
                    };
                    self.context.push_state(new_state);
                    break;
                }
                // Not a block header (e.g. a bare "style"/"script" word used
                // as an identifier elsewhere) — keep scanning as plain Chtl.
                continue;
            }

            match self.peek() {
                Some(q) if chars::is_quote(q) => self.consume_string_literal(q),
                _ => {
                    self.advance();
                }
            }
        }
        let end = self.current_byte();
        CodeFragment::new(
            FragmentKind::Chtl,
            &self.content()[start..end],
            self.buffer.span(start, end),
        )
    }

    fn consume_string_literal(&mut self, quote: char) {
        self.advance();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.advance();
                self.advance();
                continue;
            }
            if c == quote {
                self.advance();
                break;
            }
            self.advance();
        }
    }

    fn consume_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn consume_block_comment(&mut self) {
        self.advance();
        self.advance();
        while !self.is_at_end() && !self.matches_at("*/") {
            self.advance();
        }
        if self.matches_at("*/") {
            self.advance();
            self.advance();
        }
    }

    /// Populates `fragment.tokens` for `Chtl`/`ChtlJs` fragments by handing
    /// the content to the matching lexer. CSS/JS fragments are left
    /// untouched — their sub-compilers tokenize internally.
    pub fn tokenize_fragment(&self, fragment: &mut CodeFragment) {
        let base_offset = fragment.span.start.offset;
        match fragment.kind {
            FragmentKind::Chtl => {
                let lexer = CHTLLexer::new(self.buffer, base_offset, &fragment.content, self.overrides, false);
                let (tokens, _diags) = lexer.tokenize();
                fragment.tokens = Some(tokens);
            }
            FragmentKind::ChtlJs => {
                let lexer = ChtlJsLexer::new(self.buffer, base_offset, &fragment.content);
                let (tokens, _diags) = lexer.tokenize();
                fragment.tokens = Some(tokens);
            }
            _ => {}
        }
    }

    /// Extracts comments from a fragment's content, respecting origin
    /// interiors and string literals.
    pub fn extract_comments(&self, fragment: &CodeFragment) -> Vec<crate::comment::CommentNode> {
        CommentParser::extract(&fragment.content, fragment.kind)
    }
}

/// Coalesces consecutive `Text`/`Html` fragments with contiguous spans
/// into one, so a run of plain content the earlier passes had to split at
/// every block boundary doesn't reach the dispatcher as a pile of
/// degenerate single-character fragments.
fn merge_adjacent_fragments(fragments: Vec<CodeFragment>) -> Vec<CodeFragment> {
    let mut out: Vec<CodeFragment> = Vec::with_capacity(fragments.len());
    for frag in fragments {
        let mergeable = matches!(frag.kind, FragmentKind::Text | FragmentKind::Html);
        if mergeable {
            if let Some(last) = out.last_mut() {
                if last.kind == frag.kind && last.span.end.offset == frag.span.start.offset {
                    last.content.push_str(&frag.content);
                    last.span.end = frag.span.end;
                    continue;
                }
            }
        }
        out.push(frag);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> Vec<CodeFragment> {
        let buf = SourceBuffer::new("t.chtl", src);
        let overrides = ConfigOverrides::default();
        let mut scanner = UnifiedScanner::new(&buf, &overrides);
        scanner.scan()
    }

    #[test]
    fn plain_chtl_is_one_fragment() {
        let frags = scan("div { text { hello } }");
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].kind, FragmentKind::Chtl);
    }

    #[test]
    fn merge_adjacent_fragments_coalesces_contiguous_text() {
        let buf = SourceBuffer::new("t.chtl", "abcdef");
        let frags = vec![
            CodeFragment::new(FragmentKind::Text, "abc", buf.span(0, 3)),
            CodeFragment::new(FragmentKind::Text, "def", buf.span(3, 6)),
        ];
        let merged = merge_adjacent_fragments(frags);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].content, "abcdef");
        assert_eq!(merged[0].span.end.offset, 6);
    }

    #[test]
    fn merge_adjacent_fragments_leaves_non_contiguous_apart() {
        let buf = SourceBuffer::new("t.chtl", "abc{x}def");
        let frags = vec![
            CodeFragment::new(FragmentKind::Text, "abc", buf.span(0, 3)),
            CodeFragment::new(FragmentKind::Chtl, "{x}", buf.span(3, 6)),
            CodeFragment::new(FragmentKind::Text, "def", buf.span(6, 9)),
        ];
        let merged = merge_adjacent_fragments(frags);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn splits_local_style_block_into_css() {
        let frags = scan("div { style { color: red; } }");
        let kinds: Vec<_> = frags.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&FragmentKind::Css));
        let css = frags.iter().find(|f| f.kind == FragmentKind::Css).unwrap();
        assert_eq!(css.content.trim(), "color: red;");
    }

    #[test]
    fn splits_script_block_into_javascript() {
        let frags = scan("div { script { let x = 1; } }");
        let js = frags.iter().find(|f| f.kind == FragmentKind::JavaScript).unwrap();
        assert_eq!(js.content.trim(), "let x = 1;");
    }

    #[test]
    fn recognizes_chtl_js_selector_inside_script() {
        let frags = scan("div { script { {{.box}}.textContent = 'x'; } }");
        assert!(frags.iter().any(|f| f.kind == FragmentKind::ChtlJs));
    }

    #[test]
    fn recognizes_vir_inside_script() {
        let frags = scan("div { script { vir obj = something; } }");
        let vir = frags
            .iter()
            .find(|f| f.kind == FragmentKind::ChtlJs && f.content.starts_with("vir"))
            .unwrap();
        assert!(vir.content.ends_with(';'));
    }

    #[test]
    fn recognizes_arrow_access_inside_script() {
        let frags = scan("div { script { obj->method(1, 2); } }");
        assert!(frags
            .iter()
            .any(|f| f.kind == FragmentKind::ChtlJs && f.content.starts_with("->method(1, 2)")));
    }

    #[test]
    fn single_line_comment_is_its_own_fragment() {
        let frags = scan("div {}\n// note\ndiv {}");
        assert!(frags.iter().any(|f| f.kind == FragmentKind::Comment));
    }

    #[test]
    fn origin_html_block_becomes_html_fragment() {
        let frags = scan("[Origin] @Html { <p>raw</p> }");
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].kind, FragmentKind::Html);
    }

    #[test]
    fn closing_brace_of_style_block_is_its_own_chtl_fragment() {
        let frags = scan("div { style { color: red; } }");
        let last_chtl_count = frags.iter().filter(|f| f.kind == FragmentKind::Chtl && f.content == "}").count();
        assert!(last_chtl_count >= 1);
    }

    #[test]
    fn span_fidelity_holds_for_every_fragment() {
        let src = "div { style { color: red; } script { let y = 2; } }";
        let buf = SourceBuffer::new("t.chtl", src);
        let overrides = ConfigOverrides::default();
        let mut scanner = UnifiedScanner::new(&buf, &overrides);
        for frag in scanner.scan() {
            assert_eq!(
                frag.content,
                src[frag.span.start.offset..frag.span.end.offset]
            );
        }
    }

    #[test]
    fn unbalanced_brace_reports_lexical_diagnostic() {
        let buf = SourceBuffer::new("t.chtl", "div { style { color: red;");
        let overrides = ConfigOverrides::default();
        let mut scanner = UnifiedScanner::new(&buf, &overrides);
        let _ = scanner.scan();
        assert!(!scanner.context.is_balanced());
        assert!(scanner.diagnostics().has_errors());
        assert_eq!(scanner.diagnostics().error_count(), 1);
    }
}
