//! Comment re-emission in the syntax of a target fragment kind.

use crate::comment::parser::{CommentKind, CommentNode};
use crate::scanner::fragment::FragmentKind;

pub struct CommentGenerator;

impl CommentGenerator {
    /// Re-emits `node` in the syntax appropriate for `target`, or `None`
    /// when that (source kind, target kind) pair is intentionally dropped
    /// (a non-generator comment never reaching JS/ChtlJs output, or a
    /// `Generator` comment targeting anything but HTML-bound output).
    pub fn emit(node: &CommentNode, target: FragmentKind) -> Option<String> {
        match (node.kind, target) {
            (CommentKind::Generator, FragmentKind::Chtl | FragmentKind::Html) => {
                Some(format!("<!-- {} -->", escape_html_comment(&node.text)))
            }
            (CommentKind::Generator, _) => None,

            (CommentKind::SingleLine, FragmentKind::Css) => Some(format!("/* {} */", node.text)),
            (CommentKind::SingleLine, FragmentKind::Html) => {
                Some(format!("<!-- {} -->", escape_html_comment(&node.text)))
            }
            (CommentKind::SingleLine, FragmentKind::JavaScript | FragmentKind::ChtlJs) => {
                Some(format!("// {}", node.text))
            }
            (CommentKind::SingleLine, _) => Some(format!("// {}", node.text)),

            (CommentKind::MultiLine, FragmentKind::Html) => {
                Some(format!("<!-- {} -->", escape_html_comment(&node.text)))
            }
            (CommentKind::MultiLine, _) => Some(format!("/* {} */", node.text)),

            (CommentKind::Html, FragmentKind::Html) => {
                Some(format!("<!-- {} -->", escape_html_comment(&node.text)))
            }
            (CommentKind::Html, _) => Some(format!("/* {} */", node.text)),

            (CommentKind::Css, FragmentKind::Css) => Some(format!("/* {} */", node.text)),
            (CommentKind::Css, _) => Some(format!("/* {} */", node.text)),
        }
    }
}

fn escape_html_comment(text: &str) -> String {
    text.replace("-->", "--&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: CommentKind, text: &str) -> CommentNode {
        CommentNode {
            kind,
            text: text.to_string(),
            start: 0,
            end: 0,
        }
    }

    #[test]
    fn generator_comment_survives_into_html() {
        let n = node(CommentKind::Generator, "keep me");
        assert_eq!(
            CommentGenerator::emit(&n, FragmentKind::Html),
            Some("<!-- keep me -->".to_string())
        );
    }

    #[test]
    fn generator_comment_dropped_for_js() {
        let n = node(CommentKind::Generator, "keep me");
        assert_eq!(CommentGenerator::emit(&n, FragmentKind::JavaScript), None);
    }

    #[test]
    fn single_line_becomes_css_block_comment() {
        let n = node(CommentKind::SingleLine, "fix this");
        assert_eq!(
            CommentGenerator::emit(&n, FragmentKind::Css),
            Some("/* fix this */".to_string())
        );
    }

    #[test]
    fn html_comment_escapes_closing_sequence() {
        let n = node(CommentKind::Html, "careful --> here");
        let emitted = CommentGenerator::emit(&n, FragmentKind::Html).unwrap();
        assert!(!emitted[4..emitted.len() - 4].contains("-->"));
    }
}
