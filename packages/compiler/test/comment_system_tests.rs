//! Integration coverage tying `CommentParser` and `CommentGenerator`
//! together, plus the end-to-end guarantee that a Generator comment is the
//! only comment kind that survives into compiled HTML output.

use chtl_compiler::comment::{CommentGenerator, CommentParser};
use chtl_compiler::scanner::fragment::FragmentKind;
use chtl_compiler::CompilerDispatcher;

#[test]
fn round_trip_single_line_comment_into_js_syntax() {
    let nodes = CommentParser::extract("// keep track of this\n", FragmentKind::Chtl);
    assert_eq!(nodes.len(), 1);
    let emitted = CommentGenerator::emit(&nodes[0], FragmentKind::JavaScript).unwrap();
    assert_eq!(emitted, "// keep track of this");
}

#[test]
fn generator_comment_is_the_only_kind_reaching_final_html() {
    let mut dispatcher = CompilerDispatcher::new();
    let src = "// regular comment\n-- rendered note\ndiv { text { Hi } }";
    let html = dispatcher.compile_string(src).unwrap();
    assert!(html.contains("<!-- rendered note -->"));
    assert!(!html.contains("regular comment"));
}

#[test]
fn dashes_inside_a_multiline_comment_do_not_leak_into_html() {
    let mut dispatcher = CompilerDispatcher::new();
    let src = "/* see foo-- bar */\ndiv { text { Hi } }";
    let html = dispatcher.compile_string(src).unwrap();
    assert!(!html.contains("foo"));
    assert!(!html.contains("bar"));
    assert!(html.contains("<div>Hi</div>"));
}
