//! `CodeFragment`: the scanner's output unit, stored in a flat arena
//! indexed by [`FragmentId`] rather than an owned parent/child tree; the
//! `parent`/`children` relationship is a weak association, never
//! ownership.

use crate::lexer::token::Token;
use crate::source::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Chtl,
    ChtlJs,
    Css,
    JavaScript,
    Html,
    Text,
    Comment,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct CodeFragment {
    pub kind: FragmentKind,
    pub content: String,
    pub span: SourceSpan,
    pub parent: Option<FragmentId>,
    pub children: Vec<FragmentId>,
    pub tokens: Option<Vec<Token>>,
}

impl CodeFragment {
    pub fn new(kind: FragmentKind, content: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            content: content.into(),
            span,
            parent: None,
            children: Vec::new(),
            tokens: None,
        }
    }

    /// Debug dump wire form: one line summarizing kind, span, and a
    /// truncated content preview.
    pub fn debug_dump(&self) -> String {
        let trimmed: String = self.content.chars().take(40).collect();
        format!(
            "Fragment[Type: {:?}, Lines: {}-{}, Content: \"{}\"]",
            self.kind, self.span.start.line, self.span.end.line, trimmed
        )
    }
}

/// Owns every fragment created during one compilation. Fragments reference
/// each other only by [`FragmentId`]; nothing here implies ownership beyond
/// the arena itself.
#[derive(Debug, Default)]
pub struct FragmentArena {
    fragments: Vec<CodeFragment>,
}

impl FragmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fragment: CodeFragment) -> FragmentId {
        let id = FragmentId(self.fragments.len());
        self.fragments.push(fragment);
        id
    }

    pub fn get(&self, id: FragmentId) -> &CodeFragment {
        &self.fragments[id.0]
    }

    pub fn get_mut(&mut self, id: FragmentId) -> &mut CodeFragment {
        &mut self.fragments[id.0]
    }

    pub fn add_child(&mut self, parent: FragmentId, child: FragmentId) {
        self.fragments[child.0].parent = Some(parent);
        self.fragments[parent.0].children.push(child);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FragmentId, &CodeFragment)> {
        self.fragments
            .iter()
            .enumerate()
            .map(|(i, f)| (FragmentId(i), f))
    }
}
