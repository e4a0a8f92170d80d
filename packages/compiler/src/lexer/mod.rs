//! CHTL and CHTL-JS lexers.

pub mod chtl;
pub mod chtl_js;
pub mod token;

pub use chtl::CHTLLexer;
pub use chtl_js::ChtlJsLexer;
pub use token::{Token, TokenKind, TokenValue};
