//! CHTL-JS lexer: JS tokens plus the CHTL-JS-specific categories
//! (selector/vir/arrow tokens). Plain JS keywords pass through as generic
//! identifiers; the downstream JS compiler owns JS semantics.

use crate::chars;
use crate::diagnostics::DiagnosticCollector;
use crate::lexer::token::{Token, TokenKind, TokenValue};
use crate::source::{SourceBuffer, SourceSpan};

const BUILTIN_FUNCTIONS: &[&str] = &["listen", "delegate", "animate"];

pub struct ChtlJsLexer<'a> {
    buffer: &'a SourceBuffer,
    text: &'a str,
    chars: Vec<(usize, char)>,
    base_offset: usize,
    pos: usize,
    in_selector: bool,
}

impl<'a> ChtlJsLexer<'a> {
    pub fn new(buffer: &'a SourceBuffer, base_offset: usize, text: &'a str) -> Self {
        Self {
            buffer,
            text,
            chars: text.char_indices().collect(),
            base_offset,
            pos: 0,
            in_selector: false,
        }
    }

    pub fn tokenize(mut self) -> (Vec<Token>, DiagnosticCollector) {
        let mut tokens = Vec::new();
        let mut diagnostics = DiagnosticCollector::new();
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            match self.scan_token(&mut diagnostics) {
                Some(tok) => tokens.push(tok),
                None => break,
            }
        }
        let eof_off = self.byte_len();
        tokens.push(Token::new(
            TokenKind::Eof,
            TokenValue::None,
            self.span(eof_off, eof_off),
            "",
        ));
        (tokens, diagnostics)
    }

    fn byte_len(&self) -> usize {
        self.text.len()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|(_, c)| *c)
    }

    fn current_byte(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|(b, _)| *b)
            .unwrap_or(self.byte_len())
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn span(&self, local_start: usize, local_end: usize) -> SourceSpan {
        self.buffer
            .span(self.base_offset + local_start, self.base_offset + local_end)
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

    fn scan_token(&mut self, diagnostics: &mut DiagnosticCollector) -> Option<Token> {
        let start = self.current_byte();

        if self.in_selector {
            if self.peek() == Some('}') && self.peek_at(1) == Some('}') {
                self.advance();
                self.advance();
                self.in_selector = false;
                return Some(self.simple_token(start, TokenKind::SelectorEnd));
            }
            return Some(self.scan_selector_sub_token(start));
        }

        if self.peek() == Some('{') && self.peek_at(1) == Some('{') {
            self.advance();
            self.advance();
            self.in_selector = true;
            return Some(self.simple_token(start, TokenKind::SelectorStart));
        }

        if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
            self.advance();
            self.advance();
            return Some(self.simple_token(start, TokenKind::VirArrow));
        }

        let ch = self.advance()?;

        match ch {
            c if chars::is_quote(c) => Some(self.scan_js_string(start, c, diagnostics)),
            c if chars::is_digit(c) => Some(self.scan_js_number(start)),
            '/' if self.peek() == Some('/') => Some(self.scan_js_comment_single(start)),
            '/' if self.peek() == Some('*') => Some(self.scan_js_comment_multi(start, diagnostics)),
            c if chars::is_identifier_start(c) => Some(self.scan_js_identifier(start)),
            c if is_js_operator_char(c) => Some(self.scan_js_operator(start, c)),
            c => Some(self.simple_token_with_raw(start, TokenKind::JsPunctuation(c))),
        }
    }

    fn simple_token(&self, start: usize, kind: TokenKind) -> Token {
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(kind, TokenValue::None, self.span(start, end), raw)
    }

    fn simple_token_with_raw(&self, start: usize, kind: TokenKind) -> Token {
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(kind, TokenValue::Str(raw.clone()), self.span(start, end), raw)
    }

    fn scan_selector_sub_token(&mut self, start: usize) -> Token {
        let kind = match self.peek() {
            Some('.') => {
                self.advance();
                self.consume_ident();
                TokenKind::SelectorClass
            }
            Some('#') => {
                self.advance();
                self.consume_ident();
                TokenKind::SelectorId
            }
            Some('[') => {
                self.advance();
                while self.peek().map(|c| c != ']').unwrap_or(false) {
                    self.advance();
                }
                if self.peek() == Some(']') {
                    self.advance();
                }
                TokenKind::SelectorIndex
            }
            _ => {
                self.consume_ident();
                TokenKind::SelectorTag
            }
        };
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(kind, TokenValue::Str(raw.clone()), self.span(start, end), raw)
    }

    fn consume_ident(&mut self) {
        while self
            .peek()
            .map(|c| chars::is_identifier_part(c) || c == '-')
            .unwrap_or(false)
        {
            self.advance();
        }
    }

    fn scan_js_identifier(&mut self, start: usize) -> Token {
        while self
            .peek()
            .map(|c| chars::is_identifier_part(c))
            .unwrap_or(false)
        {
            self.advance();
        }
        let end = self.current_byte();
        let name = self.text[start..end].to_string();

        if name == "vir" {
            return Token::new(
                TokenKind::VirKeyword,
                TokenValue::Str(name.clone()),
                self.span(start, end),
                name,
            );
        }
        if BUILTIN_FUNCTIONS.contains(&name.as_str()) {
            return Token::new(
                TokenKind::BuiltinFunction(name.clone()),
                TokenValue::Str(name.clone()),
                self.span(start, end),
                name,
            );
        }
        // Every other JS keyword (var, let, const, function, if, ...) is a plain
        // identifier — the downstream JS grammar owns JS semantics.
        Token::new(
            TokenKind::Identifier,
            TokenValue::Str(name.clone()),
            self.span(start, end),
            name,
        )
    }

    fn scan_js_string(&mut self, start: usize, quote: char, diagnostics: &mut DiagnosticCollector) -> Token {
        let mut value = String::new();
        let mut terminated = false;
        while let Some(c) = self.advance() {
            if c == '\\' {
                if let Some(next) = self.advance() {
                    value.push(next);
                }
                continue;
            }
            if c == quote {
                terminated = true;
                break;
            }
            value.push(c);
        }
        if !terminated {
            diagnostics.lexical_error(
                "unterminated JS string literal",
                Some(self.span(start, self.current_byte())),
            );
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(
            TokenKind::StringLiteral,
            TokenValue::Str(value),
            self.span(start, end),
            raw,
        )
    }

    fn scan_js_number(&mut self, start: usize) -> Token {
        while self.peek().map(chars::is_digit).unwrap_or(false) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_at(1).map(chars::is_digit).unwrap_or(false) {
            self.advance();
            while self.peek().map(chars::is_digit).unwrap_or(false) {
                self.advance();
            }
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        let num: f64 = raw.parse().unwrap_or(0.0);
        Token::new(
            TokenKind::NumberLiteral,
            TokenValue::Num(num),
            self.span(start, end),
            raw,
        )
    }

    fn scan_js_operator(&mut self, start: usize, first: char) -> Token {
        // Greedily extend common two-character operators; anything longer is
        // left to the (out-of-scope) downstream JS grammar.
        let two_char = matches!(
            (first, self.peek()),
            ('=', Some('=')) | ('!', Some('=')) | ('<', Some('=')) | ('>', Some('='))
                | ('&', Some('&')) | ('|', Some('|')) | ('+', Some('+')) | ('-', Some('-'))
        );
        if two_char {
            self.advance();
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(
            TokenKind::JsOperator(raw.clone()),
            TokenValue::None,
            self.span(start, end),
            raw,
        )
    }

    fn scan_js_comment_single(&mut self, start: usize) -> Token {
        self.advance();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(
            TokenKind::CommentSingleLine,
            TokenValue::Str(raw.clone()),
            self.span(start, end),
            raw,
        )
    }

    fn scan_js_comment_multi(&mut self, start: usize, diagnostics: &mut DiagnosticCollector) -> Token {
        self.advance();
        let mut terminated = false;
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                terminated = true;
                break;
            }
        }
        if !terminated {
            diagnostics.lexical_error(
                "unterminated multi-line comment",
                Some(self.span(start, self.current_byte())),
            );
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(
            TokenKind::CommentMultiLine,
            TokenValue::Str(raw.clone()),
            self.span(start, end),
            raw,
        )
    }
}

fn is_js_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | '~' | '?'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        let buf = SourceBuffer::new("t.chtl", src);
        let lexer = ChtlJsLexer::new(&buf, 0, src);
        let (tokens, _diags) = lexer.tokenize();
        tokens
    }

    #[test]
    fn selector_class_is_recognized() {
        let tokens = lex("{{.box}}");
        assert_eq!(tokens[0].kind, TokenKind::SelectorStart);
        assert_eq!(tokens[1].kind, TokenKind::SelectorClass);
        assert_eq!(tokens[2].kind, TokenKind::SelectorEnd);
    }

    #[test]
    fn selector_id_and_index_are_recognized() {
        let tokens = lex("{{#app}}");
        assert_eq!(tokens[1].kind, TokenKind::SelectorId);

        let tokens = lex("{{li[0]}}");
        assert_eq!(tokens[1].kind, TokenKind::SelectorTag);
        assert_eq!(tokens[2].kind, TokenKind::SelectorIndex);
    }

    #[test]
    fn vir_arrow_is_its_own_token() {
        let tokens = lex("obj->method");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::VirArrow));
    }

    #[test]
    fn vir_keyword_recognized() {
        let tokens = lex("vir x = {}");
        assert_eq!(tokens[0].kind, TokenKind::VirKeyword);
    }

    #[test]
    fn builtin_functions_recognized() {
        for name in ["listen", "delegate", "animate"] {
            let tokens = lex(name);
            assert!(matches!(&tokens[0].kind, TokenKind::BuiltinFunction(f) if f == name));
        }
    }

    #[test]
    fn plain_js_keywords_are_generic_identifiers() {
        for kw in ["var", "let", "const", "function", "if", "return"] {
            let tokens = lex(kw);
            assert_eq!(tokens[0].kind, TokenKind::Identifier);
        }
    }

    #[test]
    fn string_and_number_literals() {
        let tokens = lex(r#"'hi' 42"#);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[1].kind, TokenKind::NumberLiteral);
    }
}
