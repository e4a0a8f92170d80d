//! `[Origin]` raw-passthrough block detection.
//!
//! Detection is two-pass (definitions, then references) and filtered by
//! "not inside a string or comment"; a definition's body is found by a
//! hand-written balanced-brace scan rather than a regex, because a regex
//! cannot count nesting depth.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginBlock {
    pub outer_start: usize,
    pub outer_end: usize,
    pub inner_start: usize,
    pub inner_end: usize,
    pub origin_type: String,
    pub name: Option<String>,
    pub is_reference: bool,
}

impl OriginBlock {
    pub fn is_inside_inner(&self, offset: usize) -> bool {
        !self.is_reference && offset >= self.inner_start && offset < self.inner_end
    }
}

static DEFINITION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Origin\]\s*(@[A-Za-z_][A-Za-z0-9_]*)\s*([A-Za-z_][A-Za-z0-9_]*)?\s*\{").unwrap()
});

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[Origin\]\s*(@[A-Za-z_][A-Za-z0-9_]*)\s*([A-Za-z_][A-Za-z0-9_]*)?\s*;").unwrap()
});

pub fn is_valid_origin_type(ty: &str) -> bool {
    ty.starts_with('@')
        && ty.len() > 1
        && ty[1..]
            .chars()
            .enumerate()
            .all(|(i, c)| if i == 0 { c.is_alphabetic() || c == '_' } else { c.is_alphanumeric() || c == '_' })
}

pub struct OriginEmbedDetector;

impl OriginEmbedDetector {
    /// Scans `source` for every `[Origin]` definition and reference, in
    /// start-offset order, skipping occurrences that fall inside a string
    /// literal or a `//`/`/*…*/` comment.
    pub fn detect(source: &str) -> Vec<OriginBlock> {
        let excluded = mask_strings_and_comments(source);
        let mut blocks = Vec::new();

        for caps in DEFINITION_HEADER.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            if in_excluded(&excluded, whole.start()) {
                continue;
            }
            let brace_pos = whole.end() - 1;
            if let Some(body_end) = find_matching_brace(source, brace_pos) {
                let origin_type = caps.get(1).unwrap().as_str().to_string();
                let name = caps.get(2).map(|m| m.as_str().to_string());
                blocks.push(OriginBlock {
                    outer_start: whole.start(),
                    outer_end: body_end + 1,
                    inner_start: brace_pos + 1,
                    inner_end: body_end,
                    origin_type,
                    name,
                    is_reference: false,
                });
            }
        }

        for caps in REFERENCE.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            if in_excluded(&excluded, whole.start()) {
                continue;
            }
            // Skip references whose span is already covered by a definition match
            // (a definition's header also satisfies `[Origin] @Type name` as a prefix
            // of the reference pattern only when no `{` follows, so overlap is rare,
            // but guard anyway).
            if blocks
                .iter()
                .any(|b| !b.is_reference && whole.start() >= b.outer_start && whole.start() < b.outer_end)
            {
                continue;
            }
            let origin_type = caps.get(1).unwrap().as_str().to_string();
            let name = caps.get(2).map(|m| m.as_str().to_string());
            blocks.push(OriginBlock {
                outer_start: whole.start(),
                outer_end: whole.end(),
                inner_start: whole.end(),
                inner_end: whole.end(),
                origin_type,
                name,
                is_reference: true,
            });
        }

        blocks.sort_by_key(|b| b.outer_start);
        blocks
    }

    pub fn is_inside_origin_embed(blocks: &[OriginBlock], offset: usize) -> bool {
        blocks.iter().any(|b| b.is_inside_inner(offset))
    }

    pub fn extract_content<'a>(source: &'a str, block: &OriginBlock) -> &'a str {
        &source[block.inner_start..block.inner_end]
    }
}

/// A lightweight pre-pass over raw text (no `ScannerContext` involved)
/// identifying byte ranges that are inside a quoted string or a comment,
/// so `[Origin]` detection can skip occurrences mentioned in documentation
/// or string literals instead of being real blocks.
fn mask_strings_and_comments(source: &str) -> Vec<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
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
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                ranges.push((start, i));
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                ranges.push((start, i));
            }
            _ => i += 1,
        }
    }
    ranges
}

fn in_excluded(ranges: &[(usize, usize)], offset: usize) -> bool {
    ranges.iter().any(|(s, e)| offset >= *s && offset < *e)
}

/// Hand-written balanced-brace scan for an origin body: `open` is the index
/// of the opening `{`. Respects string/comment contents so braces inside
/// them don't affect depth. Returns the index of the matching `}`.
fn find_matching_brace(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' | b'\'' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' {
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        break;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_simple_definition() {
        let src = "[Origin] @Html { <p>hi</p> }";
        let blocks = OriginEmbedDetector::detect(src);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].origin_type, "@Html");
        assert!(!blocks[0].is_reference);
        assert_eq!(
            OriginEmbedDetector::extract_content(src, &blocks[0]),
            " <p>hi</p> "
        );
    }

    #[test]
    fn detects_named_definition_with_nested_braces() {
        let src = "[Origin] @Style myStyle { .a { color: red; } }";
        let blocks = OriginEmbedDetector::detect(src);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name.as_deref(), Some("myStyle"));
        let content = OriginEmbedDetector::extract_content(src, &blocks[0]);
        assert!(content.contains(".a { color: red; }"));
    }

    #[test]
    fn detects_reference_with_empty_inner_span() {
        let src = "[Origin] @Html myBlock;";
        let blocks = OriginEmbedDetector::detect(src);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_reference);
        assert_eq!(blocks[0].inner_start, blocks[0].inner_end);
    }

    #[test]
    fn ignores_origin_mentioned_inside_string_literal() {
        let src = r#"text { "not a [Origin] @Html block" }"#;
        let blocks = OriginEmbedDetector::detect(src);
        assert!(blocks.is_empty());
    }

    #[test]
    fn ignores_origin_mentioned_inside_comment() {
        let src = "// [Origin] @Html {}\ndiv {}";
        let blocks = OriginEmbedDetector::detect(src);
        assert!(blocks.is_empty());
    }

    #[test]
    fn is_inside_origin_embed_checks_inner_span_only() {
        let src = "[Origin] @Html { body }";
        let blocks = OriginEmbedDetector::detect(src);
        assert!(OriginEmbedDetector::is_inside_origin_embed(&blocks, 18));
        assert!(!OriginEmbedDetector::is_inside_origin_embed(&blocks, 0));
    }

    #[test]
    fn valid_origin_type_check() {
        assert!(is_valid_origin_type("@Html"));
        assert!(is_valid_origin_type("@My_Type1"));
        assert!(!is_valid_origin_type("@"));
        assert!(!is_valid_origin_type("Html"));
    }
}
