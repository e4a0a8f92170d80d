//! Context-aware comment system: extraction from any fragment kind,
//! filtered by string/origin-interior exclusion, and re-emission in the
//! syntax appropriate to a target fragment kind.

pub mod generator;
pub mod parser;

pub use generator::CommentGenerator;
pub use parser::{CommentKind, CommentNode, CommentParser};
