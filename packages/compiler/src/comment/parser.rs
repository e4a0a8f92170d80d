//! Comment extraction: format-specific single-line, multi-line, HTML, and
//! generator-comment scans, each filtered against string-literal ranges
//! and `[Origin]` embed bodies so a comment marker inside either is left
//! untouched.

use crate::scanner::fragment::FragmentKind;
use crate::scanner::origin::OriginBlock;
use crate::scanner::OriginEmbedDetector;
use crate::source::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    SingleLine,
    MultiLine,
    Html,
    Generator,
    Css,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub kind: CommentKind,
    /// Text with delimiters stripped (e.g. `"hello"` for `// hello`).
    pub text: String,
    pub start: usize,
    pub end: usize,
}

pub struct CommentParser;

impl CommentParser {
    /// Extracts every comment in `code`, skipping occurrences inside a
    /// string literal or an `[Origin]` body. `container_kind` disambiguates
    /// `/* … */` as `MultiLine` (default) vs `Css` (inside a CSS fragment).
    pub fn extract(code: &str, container_kind: FragmentKind) -> Vec<CommentNode> {
        let origin_blocks = OriginEmbedDetector::detect(code);
        let string_ranges = string_literal_ranges(code);

        let single_line = Self::parse_single_line(code, &string_ranges, &origin_blocks);
        let multi_line = Self::parse_multi_line(code, &string_ranges, &origin_blocks, container_kind);
        let html = Self::parse_html(code, &string_ranges, &origin_blocks);

        let mut claimed: Vec<(usize, usize)> = single_line
            .iter()
            .chain(multi_line.iter())
            .chain(html.iter())
            .map(|n| (n.start, n.end))
            .collect();
        claimed.extend_from_slice(&string_ranges);

        let mut nodes = Vec::new();
        nodes.extend(single_line);
        nodes.extend(multi_line);
        nodes.extend(html);
        nodes.extend(Self::parse_generator(code, &claimed, &origin_blocks));

        nodes.sort_by_key(|n| n.start);
        nodes
    }

    fn parse_single_line(
        code: &str,
        strings: &[(usize, usize)],
        origins: &[OriginBlock],
    ) -> Vec<CommentNode> {
        let mut out = Vec::new();
        let bytes = code.as_bytes();
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == b'/' && bytes[i + 1] == b'/' {
                if !excluded(strings, origins, i) {
                    let start = i;
                    let mut j = i + 2;
                    while j < bytes.len() && bytes[j] != b'\n' {
                        j += 1;
                    }
                    out.push(CommentNode {
                        kind: CommentKind::SingleLine,
                        text: code[start + 2..j].trim().to_string(),
                        start,
                        end: j,
                    });
                    i = j;
                    continue;
                }
            }
            i += 1;
        }
        out
    }

    fn parse_multi_line(
        code: &str,
        strings: &[(usize, usize)],
        origins: &[OriginBlock],
        container_kind: FragmentKind,
    ) -> Vec<CommentNode> {
        let mut out = Vec::new();
        let bytes = code.as_bytes();
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == b'/' && bytes[i + 1] == b'*' {
                if !excluded(strings, origins, i) {
                    let start = i;
                    let mut j = i + 2;
                    while j + 1 < bytes.len() && !(bytes[j] == b'*' && bytes[j + 1] == b'/') {
                        j += 1;
                    }
                    let end = (j + 2).min(bytes.len());
                    let inner_end = j.min(bytes.len());
                    let kind = if container_kind == FragmentKind::Css {
                        CommentKind::Css
                    } else {
                        CommentKind::MultiLine
                    };
                    out.push(CommentNode {
                        kind,
                        text: code[start + 2..inner_end].trim().to_string(),
                        start,
                        end,
                    });
                    i = end;
                    continue;
                }
            }
            i += 1;
        }
        out
    }

    fn parse_html(
        code: &str,
        strings: &[(usize, usize)],
        origins: &[OriginBlock],
    ) -> Vec<CommentNode> {
        let mut out = Vec::new();
        let mut i = 0;
        while let Some(rel) = code[i..].find("<!--") {
            let start = i + rel;
            if !excluded(strings, origins, start) {
                if let Some(end_rel) = code[start + 4..].find("-->") {
                    let inner_end = start + 4 + end_rel;
                    let end = inner_end + 3;
                    out.push(CommentNode {
                        kind: CommentKind::Html,
                        text: code[start + 4..inner_end].trim().to_string(),
                        start,
                        end,
                    });
                    i = end;
                    continue;
                }
            }
            i = start + 4;
        }
        out
    }

    /// `claimed` carries both string-literal ranges and the spans already
    /// consumed by the single-line/multi-line/html scans, so a `--` inside
    /// `<!-- … -->` or trailing a `/* … */` is never double-counted.
    fn parse_generator(
        code: &str,
        claimed: &[(usize, usize)],
        origins: &[OriginBlock],
    ) -> Vec<CommentNode> {
        let mut out = Vec::new();
        let bytes = code.as_bytes();
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == b'-' && bytes[i + 1] == b'-' && starts_comment_token(bytes, i) {
                if !excluded(claimed, origins, i) {
                    let start = i;
                    let mut j = i + 2;
                    while j < bytes.len() && bytes[j] != b'\n' {
                        j += 1;
                    }
                    out.push(CommentNode {
                        kind: CommentKind::Generator,
                        text: code[start + 2..j].trim().to_string(),
                        start,
                        end: j,
                    });
                    i = j;
                    continue;
                }
            }
            i += 1;
        }
        out
    }

    pub fn span_in(buffer: &crate::source::SourceBuffer, node: &CommentNode) -> SourceSpan {
        buffer.span(node.start, node.end)
    }
}

fn excluded(strings: &[(usize, usize)], origins: &[OriginBlock], offset: usize) -> bool {
    strings.iter().any(|(s, e)| offset >= *s && offset < *e)
        || OriginEmbedDetector::is_inside_origin_embed(origins, offset)
}

/// A generator comment's `--` must open the token: only whitespace may
/// separate it from the start of the line (or of `code`). This keeps a
/// stray `--` in the middle of other text, e.g. the closing half of
/// `<!-- … -->`, from being mistaken for one.
fn starts_comment_token(bytes: &[u8], offset: usize) -> bool {
    let mut k = offset;
    while k > 0 {
        k -= 1;
        match bytes[k] {
            b'\n' => return true,
            b' ' | b'\t' | b'\r' => continue,
            _ => return false,
        }
    }
    true
}

fn string_literal_ranges(code: &str) -> Vec<(usize, usize)> {
    let bytes = code.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'"' | b'\'' | b'`') {
            let quote = bytes[i];
            let start = i;
            i += 1;
            while i < bytes.len() {
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i] == quote {
                    i += 1;
                    break;
                }
                i += 1;
            }
            ranges.push((start, i));
        } else {
            i += 1;
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_line_comment() {
        let nodes = CommentParser::extract("div {} // note\n", FragmentKind::Chtl);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, CommentKind::SingleLine);
        assert_eq!(nodes[0].text, "note");
    }

    #[test]
    fn extracts_generator_comment_distinct_from_single_line() {
        let nodes = CommentParser::extract("-- keep me\n", FragmentKind::Chtl);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, CommentKind::Generator);
    }

    #[test]
    fn extracts_multiline_as_css_inside_css_fragment() {
        let nodes = CommentParser::extract("/* border fix */", FragmentKind::Css);
        assert_eq!(nodes[0].kind, CommentKind::Css);
    }

    #[test]
    fn skips_comment_markers_inside_strings() {
        let nodes = CommentParser::extract(r#"text { "// not a comment" }"#, FragmentKind::Chtl);
        assert!(nodes.is_empty());
    }

    #[test]
    fn skips_comments_inside_origin_bodies() {
        let src = "[Origin] @Html { <!-- keep verbatim --> }";
        let nodes = CommentParser::extract(src, FragmentKind::Chtl);
        assert!(nodes.is_empty());
    }

    #[test]
    fn extracts_html_comment() {
        let nodes = CommentParser::extract("<!-- hi -->", FragmentKind::Html);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, CommentKind::Html);
        assert_eq!(nodes[0].text, "hi");
    }

    #[test]
    fn html_comment_opener_is_not_also_a_generator_comment() {
        // The `--` inside `<!--` must not be mistaken for a generator comment.
        let nodes = CommentParser::extract("<!-- hi -->", FragmentKind::Html);
        assert_eq!(nodes.len(), 1);
        assert!(!nodes.iter().any(|n| n.kind == CommentKind::Generator));
    }

    #[test]
    fn dashes_inside_multiline_comment_are_not_also_a_generator_comment() {
        let nodes = CommentParser::extract("/* see foo-- bar */", FragmentKind::Chtl);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, CommentKind::MultiLine);
    }

    #[test]
    fn generator_comment_must_open_its_line() {
        let nodes = CommentParser::extract("text { Hi } -- trailing\n", FragmentKind::Chtl);
        assert!(!nodes.iter().any(|n| n.kind == CommentKind::Generator));
    }
}
