//! CHTL sub-compiler: a minimal element/text tree builder.
//!
//! Full CHTL semantics — templates, customs, inheritance, imports,
//! namespaces, `delete`/`insert`/`replace` — are an out-of-scope AST
//! transform treated as an opaque external collaborator. What's
//! implemented here is the minimum needed to turn `tag { … }` nesting and
//! `text { … }` leaves into an HTML tree and to know which element a
//! local `style { … }` block's generated class belongs to.

use std::collections::HashMap;

use crate::chars;
use crate::dispatcher::{CompileResult, SubCompiler};
use crate::scanner::fragment::CodeFragment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingBlock {
    Style,
    Script,
}

#[derive(Debug, Clone)]
enum HtmlNode {
    Element {
        tag: String,
        class_name: Option<String>,
        children: Vec<usize>,
    },
    Text(String),
    Raw(String),
}

pub struct ChtlSubCompiler {
    debug: bool,
    nodes: Vec<HtmlNode>,
    stack: Vec<usize>,
    pending_block: Option<PendingBlock>,
    class_counters: HashMap<String, u32>,
    collected_css: Vec<String>,
}

impl Default for ChtlSubCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChtlSubCompiler {
    pub fn new() -> Self {
        Self {
            debug: false,
            nodes: vec![HtmlNode::Element {
                tag: "#root".to_string(),
                class_name: None,
                children: Vec::new(),
            }],
            stack: vec![0],
            pending_block: None,
            class_counters: HashMap::new(),
            collected_css: Vec::new(),
        }
    }

    pub fn pending_block(&self) -> Option<PendingBlock> {
        self.pending_block
    }

    pub fn clear_pending_block(&mut self) {
        self.pending_block = None;
    }

    fn current(&self) -> usize {
        *self.stack.last().expect("root never pops")
    }

    fn push_child(&mut self, node: HtmlNode) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(node);
        let parent = self.current();
        if let HtmlNode::Element { children, .. } = &mut self.nodes[parent] {
            children.push(idx);
        }
        idx
    }

    /// Attaches a generated class to the currently open element and records
    /// the corresponding CSS rule.
    pub fn attach_css(&mut self, css_text: &str) {
        let current = self.current();
        let (tag, existing) = match &self.nodes[current] {
            HtmlNode::Element { tag, class_name, .. } => (tag.clone(), class_name.clone()),
            _ => return,
        };
        let class_name = existing.unwrap_or_else(|| {
            let n = self.class_counters.entry(tag.clone()).or_insert(0);
            *n += 1;
            format!("chtl-{}-{}", tag, n)
        });
        if let HtmlNode::Element { class_name: slot, .. } = &mut self.nodes[current] {
            *slot = Some(class_name.clone());
        }
        self.collected_css
            .push(format!(".{} {{ {} }}", class_name, css_text.trim()));
    }

    pub fn collected_css(&self) -> &[String] {
        &self.collected_css
    }

    pub fn push_raw(&mut self, content: &str) {
        self.push_child(HtmlNode::Raw(content.to_string()));
    }

    pub fn render_html(&self) -> String {
        let mut out = String::new();
        if let HtmlNode::Element { children, .. } = &self.nodes[0] {
            for &child in children {
                self.render_node(child, &mut out);
            }
        }
        out
    }

    fn render_node(&self, idx: usize, out: &mut String) {
        match &self.nodes[idx] {
            HtmlNode::Element { tag, class_name, children } => {
                out.push('<');
                out.push_str(tag);
                if let Some(c) = class_name {
                    out.push_str(&format!(" class=\"{c}\""));
                }
                out.push('>');
                for &child in children {
                    self.render_node(child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
            HtmlNode::Text(t) => out.push_str(t),
            HtmlNode::Raw(r) => out.push_str(r),
        }
    }

    /// Mini recursive-descent step over one `Chtl` fragment's content.
    /// Returns the pending style/script marker, if the fragment ended on
    /// one (mirrors `UnifiedScanner::extract_chtl_fragment`'s own stop
    /// condition — a `style {`/`script {` header is always the tail of the
    /// fragment it appears in).
    fn ingest(&mut self, content: &str) {
        if self.pending_block.is_some() && content.trim() == "}" {
            // Closes the local style/script block, not an element.
            self.pending_block = None;
            return;
        }
        let chars: Vec<char> = content.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            while i < chars.len() && chars::is_whitespace(chars[i]) {
                i += 1;
            }
            if i >= chars.len() {
                break;
            }

            if chars[i] == '}' {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
                i += 1;
                continue;
            }

            if !chars::is_identifier_start(chars[i]) {
                i += 1;
                continue;
            }

            let word_start = i;
            while i < chars.len() && chars::is_identifier_part(chars[i]) {
                i += 1;
            }
            let word: String = chars[word_start..i].iter().collect();
            let mut j = i;
            while j < chars.len() && chars::is_whitespace(chars[j]) {
                j += 1;
            }
            let followed_by_brace = chars.get(j) == Some(&'{');

            match word.as_str() {
                "style" if followed_by_brace => {
                    self.pending_block = Some(PendingBlock::Style);
                    i = j + 1;
                    break;
                }
                "script" if followed_by_brace => {
                    self.pending_block = Some(PendingBlock::Script);
                    i = j + 1;
                    break;
                }
                "text" if followed_by_brace => {
                    let mut k = j + 1;
                    let mut depth = 1i32;
                    let body_start = k;
                    while k < chars.len() && depth > 0 {
                        match chars[k] {
                            '{' => depth += 1,
                            '}' => depth -= 1,
                            _ => {}
                        }
                        if depth > 0 {
                            k += 1;
                        }
                    }
                    let text: String = chars[body_start..k].iter().collect();
                    self.push_child(HtmlNode::Text(text.trim().to_string()));
                    i = (k + 1).min(chars.len());
                }
                _ if followed_by_brace => {
                    let node = HtmlNode::Element {
                        tag: word,
                        class_name: None,
                        children: Vec::new(),
                    };
                    let idx = self.push_child(node);
                    self.stack.push(idx);
                    i = j + 1;
                }
                _ => {
                    // Bare identifier with no following block — out-of-scope
                    // attribute/property syntax; skip it.
                }
            }
        }
    }
}

impl SubCompiler for ChtlSubCompiler {
    fn compile(&mut self, fragment: &CodeFragment) -> CompileResult {
        self.ingest(&fragment.content);
        CompileResult::ok(String::new())
    }

    fn compile_fragments(&mut self, fragments: &[CodeFragment]) -> CompileResult {
        for fragment in fragments {
            self.ingest(&fragment.content);
        }
        CompileResult::ok(String::new())
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn name(&self) -> &'static str {
        "CHTLCompiler"
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::UnifiedScanner;
    use crate::config::ConfigOverrides;
    use crate::source::SourceBuffer;

    #[test]
    fn plain_element_and_text_render() {
        let buf = SourceBuffer::new("t.chtl", "div { text { Hello } }");
        let overrides = ConfigOverrides::default();
        let mut scanner = UnifiedScanner::new(&buf, &overrides);
        let fragments = scanner.scan();
        let mut chtl = ChtlSubCompiler::new();
        for f in &fragments {
            chtl.compile(f);
        }
        assert_eq!(chtl.render_html(), "<div>Hello</div>");
    }

    #[test]
    fn style_block_attaches_generated_class() {
        let buf = SourceBuffer::new("t.chtl", "div { style { color: red; } text { Hi } }");
        let overrides = ConfigOverrides::default();
        let mut scanner = UnifiedScanner::new(&buf, &overrides);
        let fragments = scanner.scan();
        let mut chtl = ChtlSubCompiler::new();
        for f in &fragments {
            if f.kind == crate::scanner::fragment::FragmentKind::Css {
                chtl.attach_css(&f.content);
            } else {
                chtl.compile(f);
            }
        }
        assert_eq!(chtl.render_html(), "<div class=\"chtl-div-1\">Hi</div>");
        assert_eq!(chtl.collected_css(), &[".chtl-div-1 { color: red; }".to_string()]);
    }
}
