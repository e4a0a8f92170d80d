//! Source buffers and spans.
//!
//! Line/column lookup is a binary search over a precomputed line-start
//! table, so repeated span construction over a large file stays cheap.

use std::fmt;
use std::sync::Arc;

/// An immutable source file: its name and full text, plus a line-start
/// index built once at construction time.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    name: Arc<str>,
    content: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceBuffer {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content: String = content.into();
        let line_starts = compute_line_starts(&content);
        Self {
            name: Arc::from(name.into()),
            content: Arc::from(content),
            line_starts: Arc::from(line_starts),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// 1-based line, 0-based column for a byte offset into `content()`.
    pub fn location_for(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.content.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let column = self.content[line_start..offset].chars().count();
        SourceLocation {
            file: self.name.clone(),
            offset,
            line: line_idx + 1,
            column,
        }
    }

    pub fn span(&self, start: usize, end: usize) -> SourceSpan {
        SourceSpan {
            start: self.location_for(start),
            end: self.location_for(end),
        }
    }

    /// A few lines of surrounding text for diagnostic rendering, centered on `offset`.
    pub fn context_around(&self, offset: usize, max_lines: usize) -> Option<String> {
        if self.content.is_empty() {
            return None;
        }
        let loc = self.location_for(offset);
        let first = loc.line.saturating_sub(max_lines / 2).max(1);
        let last = (first + max_lines).min(self.line_starts.len());
        let start = self.line_starts[first - 1];
        let end = self
            .line_starts
            .get(last)
            .copied()
            .unwrap_or(self.content.len());
        Some(self.content[start..end].to_string())
    }
}

fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// A single point in a [`SourceBuffer`]: file name, byte offset, 1-based
/// line and 0-based column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A half-open `[start, end)` range between two locations in the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}:{}", self.start, self.end.line, self.end.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_for_tracks_lines_and_columns() {
        let buf = SourceBuffer::new("x.chtl", "abc\ndef\nghi");
        let loc = buf.location_for(5);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
    }

    #[test]
    fn location_for_first_line() {
        let buf = SourceBuffer::new("x.chtl", "hello");
        let loc = buf.location_for(2);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 2);
    }

    #[test]
    fn span_covers_both_ends() {
        let buf = SourceBuffer::new("x.chtl", "div { color: red; }");
        let span = buf.span(0, 3);
        assert_eq!(span.start.column, 0);
        assert_eq!(span.end.column, 3);
    }

    #[test]
    fn context_around_returns_line() {
        let buf = SourceBuffer::new("x.chtl", "one\ntwo\nthree");
        let ctx = buf.context_around(5, 3).unwrap();
        assert!(ctx.contains("two"));
    }
}
