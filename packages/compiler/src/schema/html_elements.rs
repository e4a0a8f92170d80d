//! Seeded HTML element name table, process-wide and read-only after
//! first use: a flat set rather than an inheritance-encoded schema, since
//! this crate only needs "is this a known element name", not DOM
//! property typing.

use std::collections::HashSet;

use once_cell::sync::Lazy;

pub static HTML_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "html", "head", "body", "title", "meta", "link", "style", "script", "header", "nav",
        "main", "section", "article", "aside", "footer", "h1", "h2", "h3", "h4", "h5", "h6",
        "div", "p", "hr", "pre", "blockquote", "ol", "ul", "li", "dl", "dt", "dd", "figure",
        "figcaption", "a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "data",
        "time", "code", "var", "samp", "kbd", "sub", "sup", "i", "b", "u", "mark", "ruby", "rt",
        "rp", "bdi", "bdo", "span", "br", "wbr", "img", "iframe", "embed", "object", "param",
        "video", "audio", "source", "track", "map", "area", "svg", "math", "table", "caption",
        "colgroup", "col", "tbody", "thead", "tfoot", "tr", "td", "th", "form", "label", "input",
        "button", "select", "datalist", "optgroup", "option", "textarea", "output", "progress",
        "meter", "fieldset", "legend", "details", "summary", "dialog", "menu", "slot", "template",
    ]
    .into_iter()
    .collect()
});

pub fn is_html_element(name: &str) -> bool {
    HTML_ELEMENTS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_elements() {
        assert!(is_html_element("div"));
        assert!(is_html_element("span"));
        assert!(is_html_element("h1"));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(!is_html_element("frobnicate"));
        assert!(!is_html_element(""));
    }
}
