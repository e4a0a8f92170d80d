//! Integration coverage for `UnifiedScanner` end to end, over the public
//! crate surface rather than scanner internals.

use chtl_compiler::config::ConfigOverrides;
use chtl_compiler::scanner::fragment::FragmentKind;
use chtl_compiler::scanner::UnifiedScanner;
use chtl_compiler::source::SourceBuffer;

fn scan(src: &str) -> Vec<chtl_compiler::scanner::fragment::CodeFragment> {
    let buffer = SourceBuffer::new("t.chtl", src);
    let overrides = ConfigOverrides::default();
    let mut scanner = UnifiedScanner::new(&buffer, &overrides);
    scanner.scan()
}

#[test]
fn fragments_cover_the_whole_source_without_gaps() {
    let src = "div { style { color: red; } text { Hi } }";
    let fragments = scan(src);
    let mut cursor = 0;
    for fragment in &fragments {
        assert_eq!(fragment.span.start.offset, cursor, "fragment starts where previous one ended");
        cursor = fragment.span.end.offset;
    }
    assert_eq!(cursor, src.len());
}

#[test]
fn script_block_is_scanned_as_chtl_js() {
    let src = "div { script { {{.box}}->listen({ click: f }); } }";
    let fragments = scan(src);
    assert!(fragments.iter().any(|f| f.kind == FragmentKind::ChtlJs));
}

#[test]
fn origin_html_block_is_scanned_as_opaque_html() {
    let src = "[Origin] @Html { <b>raw</b> }";
    let fragments = scan(src);
    assert!(fragments.iter().any(|f| f.kind == FragmentKind::Html));
}

#[test]
fn unclosed_block_at_eof_reports_lexical_diagnostic() {
    let buffer = SourceBuffer::new("t.chtl", "div { style { color: red;");
    let overrides = ConfigOverrides::default();
    let mut scanner = UnifiedScanner::new(&buffer, &overrides);
    let _ = scanner.scan();
    let diagnostics = scanner.into_diagnostics();
    assert!(diagnostics.has_errors());
}
