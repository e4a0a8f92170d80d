//! Integration coverage for `ResultMerger` as driven by a full
//! `CompilerDispatcher::compile_string` pass, not just its own unit tests.

use chtl_compiler::CompilerDispatcher;

#[test]
fn css_and_js_from_local_blocks_land_in_an_explicit_head_and_body() {
    let mut dispatcher = CompilerDispatcher::new();
    let src = "[Origin] @Html { <html><head></head><body></body></html> }\n\
               div { style { color: red; } script { {{.box}}->listen({ click: f }); } text { Hi } }";
    let html = dispatcher.compile_string(src).unwrap();

    let head_close = html.find("</head>").unwrap();
    let style_open = html.find("<style>").unwrap();
    assert!(style_open < head_close);

    let body_close = html.find("</body>").unwrap();
    let script_open = html.find("<script>").unwrap();
    assert!(script_open < body_close);
}

#[test]
fn css_prepends_when_document_has_no_head_tag() {
    let mut dispatcher = CompilerDispatcher::new();
    let html = dispatcher
        .compile_string("div { style { color: blue; } text { Hi } }")
        .unwrap();
    assert!(html.starts_with("<style>"));
}
