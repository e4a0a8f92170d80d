//! Integration coverage for `CompilerDispatcher::compile_string` driving
//! the whole scan → dispatch → merge pipeline through the public API.

use chtl_compiler::CompilerDispatcher;

#[test]
fn chtl_js_listen_translates_to_add_event_listener() {
    let mut dispatcher = CompilerDispatcher::new();
    let html = dispatcher
        .compile_string("div { script { {{.box}}->listen({ click: handleClick }); } }")
        .unwrap();
    assert!(html.contains("querySelector"));
    assert!(html.contains("addEventListener"));
}

#[test]
fn reset_between_compilations_does_not_leak_state() {
    let mut dispatcher = CompilerDispatcher::new();
    let first = dispatcher.compile_string("div { text { First } }").unwrap();
    let second = dispatcher.compile_string("p { text { Second } }").unwrap();

    assert!(first.contains("<div>First</div>"));
    assert!(!second.contains("First"));
    assert!(second.contains("<p>Second</p>"));
}

#[test]
fn debug_mode_can_be_toggled_without_affecting_output() {
    let mut dispatcher = CompilerDispatcher::new();
    dispatcher.set_debug_mode(true);
    let html = dispatcher.compile_string("div { text { Hi } }").unwrap();
    assert!(html.contains("<div>Hi</div>"));
}
