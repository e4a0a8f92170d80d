//! CHTL lexer: the minimum-unit tokenizer over a CHTL fragment
//! (bracket-keyword and type-identifier tables, a `scan_*` method per
//! token category).

use crate::chars;
use crate::config::ConfigOverrides;
use crate::diagnostics::DiagnosticCollector;
use crate::lexer::token::{Token, TokenKind, TokenValue};
use crate::schema;
use crate::source::SourceBuffer;

const CHTL_KEYWORDS: &[&str] = &[
    "text", "style", "script", "inherit", "delete", "insert", "after", "before", "replace",
    "from", "as", "except", "vir", "animate", "listen", "delegate",
];

pub struct CHTLLexer<'a> {
    buffer: &'a SourceBuffer,
    text: &'a str,
    chars: Vec<(usize, char)>,
    base_offset: usize,
    pos: usize,
    overrides: &'a ConfigOverrides,
    /// True while scanning a CSS-declaration-shaped position inside a local
    /// `style { … }` block, so bare identifiers are checked against the
    /// seeded CSS-property table before falling back to a generic identifier.
    css_declaration_context: bool,
}

impl<'a> CHTLLexer<'a> {
    pub fn new(
        buffer: &'a SourceBuffer,
        base_offset: usize,
        text: &'a str,
        overrides: &'a ConfigOverrides,
        css_declaration_context: bool,
    ) -> Self {
        Self {
            buffer,
            text,
            chars: text.char_indices().collect(),
            base_offset,
            pos: 0,
            overrides,
            css_declaration_context,
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

    fn span(&self, local_start: usize, local_end: usize) -> crate::source::SourceSpan {
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
        let ch = self.advance()?;

        let kind_and_value = match ch {
            '{' if self.peek() == Some('{') => {
                self.advance();
                Some((TokenKind::DoubleLBrace, TokenValue::None))
            }
            '}' if self.peek() == Some('}') => {
                self.advance();
                Some((TokenKind::DoubleRBrace, TokenValue::None))
            }
            '{' => Some((TokenKind::LBrace, TokenValue::None)),
            '}' => Some((TokenKind::RBrace, TokenValue::None)),
            '(' => Some((TokenKind::LParen, TokenValue::None)),
            ')' => Some((TokenKind::RParen, TokenValue::None)),
            '[' => return Some(self.scan_bracket_keyword(start, diagnostics)),
            ']' => Some((TokenKind::RBracket, TokenValue::None)),
            ';' => Some((TokenKind::Semicolon, TokenValue::None)),
            ':' => Some((TokenKind::Colon, TokenValue::None)),
            '=' => Some((TokenKind::Equals, TokenValue::None)),
            ',' => Some((TokenKind::Comma, TokenValue::None)),
            '.' => Some((TokenKind::Dot, TokenValue::None)),
            '@' => return Some(self.scan_type_identifier(start)),
            '-' if self.peek() == Some('>') => {
                self.advance();
                Some((TokenKind::Arrow, TokenValue::None))
            }
            '-' if self.peek() == Some('-') => {
                self.advance();
                return Some(self.scan_generator_comment(start));
            }
            '/' if self.peek() == Some('/') => {
                self.advance();
                return Some(self.scan_single_line_comment(start));
            }
            '/' if self.peek() == Some('*') => {
                self.advance();
                return Some(self.scan_multi_line_comment(start, diagnostics));
            }
            c if chars::is_quote(c) => return Some(self.scan_string(start, c, diagnostics)),
            c if chars::is_digit(c) => return Some(self.scan_number(start)),
            c if chars::is_identifier_start(c) => return Some(self.scan_identifier(start)),
            _ => return Some(self.scan_unquoted_literal(start)),
        };

        kind_and_value.map(|(kind, value)| {
            let end = self.current_byte();
            let raw = self.text[start..end].to_string();
            Token::new(kind, value, self.span(start, end), raw)
        })
    }

    fn scan_bracket_keyword(&mut self, start: usize, diagnostics: &mut DiagnosticCollector) -> Token {
        if self.peek().map(chars::is_ascii_letter).unwrap_or(false) {
            let ident_start = self.current_byte();
            while self.peek().map(chars::is_ascii_letter).unwrap_or(false) {
                self.advance();
            }
            let name = self.text[ident_start..self.current_byte()].to_string();
            if self.peek() == Some(']') {
                self.advance();
            } else {
                diagnostics.lexical_error(
                    format!("unterminated bracket keyword '[{name}'"),
                    Some(self.span(start, self.current_byte())),
                );
            }
            let end = self.current_byte();
            let raw = self.text[start..end].to_string();
            Token::new(
                TokenKind::BracketKeyword(name),
                TokenValue::None,
                self.span(start, end),
                raw,
            )
        } else {
            let end = self.current_byte();
            Token::new(
                TokenKind::LBracket,
                TokenValue::None,
                self.span(start, end),
                &self.text[start..end],
            )
        }
    }

    fn scan_type_identifier(&mut self, start: usize) -> Token {
        while self
            .peek()
            .map(|c| chars::is_identifier_part(c))
            .unwrap_or(false)
        {
            self.advance();
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        let spelling = &self.text[start..end];
        let canonical = self
            .overrides
            .resolve_type(spelling)
            .map(str::to_string)
            .unwrap_or_else(|| raw.clone());
        Token::new(
            TokenKind::TypeIdentifier(canonical),
            TokenValue::None,
            self.span(start, end),
            raw,
        )
    }

    fn scan_string(&mut self, start: usize, quote: char, diagnostics: &mut DiagnosticCollector) -> Token {
        let mut value = String::new();
        let mut terminated = false;
        while let Some(c) = self.advance() {
            if c == '\\' {
                if let Some(next) = self.advance() {
                    value.push(unescape(next));
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
                "unterminated string literal",
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

    fn scan_number(&mut self, start: usize) -> Token {
        while self.peek().map(chars::is_digit).unwrap_or(false) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_at(1).map(chars::is_digit).unwrap_or(false) {
            self.advance();
            while self.peek().map(chars::is_digit).unwrap_or(false) {
                self.advance();
            }
        }
        let digits_end = self.current_byte();
        // Optional unit suffix (e.g. "10px", "1.5em"): re-classify as StringLiteral.
        let unit_start = self.current_byte();
        while self
            .peek()
            .map(chars::is_ascii_letter)
            .unwrap_or(false)
            || self.peek() == Some('%')
        {
            self.advance();
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        if end > unit_start {
            Token::new(
                TokenKind::StringLiteral,
                TokenValue::Str(raw.clone()),
                self.span(start, end),
                raw,
            )
        } else {
            let num: f64 = self.text[start..digits_end].parse().unwrap_or(0.0);
            Token::new(
                TokenKind::NumberLiteral,
                TokenValue::Num(num),
                self.span(start, end),
                raw,
            )
        }
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while self
            .peek()
            .map(|c| chars::is_identifier_part(c) || c == '-')
            .unwrap_or(false)
        {
            self.advance();
        }
        let end = self.current_byte();
        let name = self.text[start..end].to_string();

        // Compound keyword "at top" / "at bottom".
        if name == "at" {
            let save = self.pos;
            self.skip_whitespace();
            let word_start = self.current_byte();
            while self
                .peek()
                .map(chars::is_ascii_letter)
                .unwrap_or(false)
            {
                self.advance();
            }
            let word = &self.text[word_start..self.current_byte()];
            if word == "top" || word == "bottom" {
                let end = self.current_byte();
                let raw = self.text[start..end].to_string();
                return Token::new(
                    TokenKind::Keyword(format!("at {word}")),
                    TokenValue::None,
                    self.span(start, end),
                    raw,
                );
            }
            self.pos = save;
        }

        if let Some(canonical) = self.overrides.resolve_keyword(&name) {
            if CHTL_KEYWORDS.contains(&canonical) {
                return Token::new(
                    TokenKind::Keyword(canonical.to_string()),
                    TokenValue::None,
                    self.span(start, end),
                    name,
                );
            }
        }

        if self.css_declaration_context && schema::is_css_property(&name) {
            return Token::new(
                TokenKind::CssPropertyIdentifier,
                TokenValue::Str(name.clone()),
                self.span(start, end),
                name,
            );
        }

        if schema::is_html_element(&name) {
            return Token::new(
                TokenKind::HtmlElementIdentifier,
                TokenValue::Str(name.clone()),
                self.span(start, end),
                name,
            );
        }

        Token::new(
            TokenKind::Identifier,
            TokenValue::Str(name.clone()),
            self.span(start, end),
            name,
        )
    }

    fn scan_unquoted_literal(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if matches!(c, ';' | '}' | '\n' | ',' | ')') {
                break;
            }
            self.advance();
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(
            TokenKind::UnquotedLiteral,
            TokenValue::Str(raw.trim().to_string()),
            self.span(start, end),
            raw,
        )
    }

    fn scan_single_line_comment(&mut self, start: usize) -> Token {
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

    fn scan_generator_comment(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let end = self.current_byte();
        let raw = self.text[start..end].to_string();
        Token::new(
            TokenKind::CommentGenerator,
            TokenValue::Str(raw.clone()),
            self.span(start, end),
            raw,
        )
    }

    fn scan_multi_line_comment(&mut self, start: usize, diagnostics: &mut DiagnosticCollector) -> Token {
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

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
