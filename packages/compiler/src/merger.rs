//! `ResultMerger`: splices accumulated CSS/JS into an HTML body. Purely
//! textual; no DOM parsing.

pub struct ResultMerger;

impl ResultMerger {
    /// Splices `css_combined` before the first `</head>` (or prepends it if
    /// absent) and `js_combined` before `</body>` (or appends it if
    /// absent).
    pub fn merge(html_body: &str, css_combined: &str, js_combined: &str) -> String {
        let mut out = html_body.to_string();

        if !css_combined.is_empty() {
            let style_block = format!("<style>\n{css_combined}\n</style>\n");
            out = match find_tag_case_insensitive(&out, "</head>") {
                Some(pos) => splice(&out, pos, &style_block),
                None => format!("{style_block}{out}"),
            };
        }

        if !js_combined.is_empty() {
            let script_block = format!("<script>\n{js_combined}\n</script>\n");
            out = match find_tag_case_insensitive(&out, "</body>") {
                Some(pos) => splice(&out, pos, &script_block),
                None => format!("{out}{script_block}"),
            };
        }

        out
    }
}

fn find_tag_case_insensitive(haystack: &str, tag: &str) -> Option<usize> {
    let lower_haystack = haystack.to_ascii_lowercase();
    let lower_tag = tag.to_ascii_lowercase();
    lower_haystack.find(&lower_tag)
}

fn splice(text: &str, at: usize, insertion: &str) -> String {
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..at]);
    out.push_str(insertion);
    out.push_str(&text[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splices_css_before_head_close() {
        let html = "<html><head></head><body></body></html>";
        let out = ResultMerger::merge(html, "body { color: red; }", "");
        assert!(out.contains("<style>\nbody { color: red; }\n</style>\n</head>"));
    }

    #[test]
    fn splices_js_before_body_close() {
        let html = "<html><head></head><body></body></html>";
        let out = ResultMerger::merge(html, "", "console.log(1);");
        assert!(out.contains("<script>\nconsole.log(1);\n</script>\n</body>"));
    }

    #[test]
    fn prepends_css_when_no_head_tag() {
        let out = ResultMerger::merge("<div>hi</div>", "a{}", "");
        assert!(out.starts_with("<style>"));
    }

    #[test]
    fn appends_js_when_no_body_tag() {
        let out = ResultMerger::merge("<div>hi</div>", "", "f();");
        assert!(out.trim_end().ends_with("</script>"));
    }

    #[test]
    fn head_match_is_case_insensitive() {
        let out = ResultMerger::merge("<HTML><HEAD></HEAD></HTML>", "a{}", "");
        assert!(out.contains("<style>"));
    }

    #[test]
    fn no_css_or_js_leaves_body_untouched() {
        let out = ResultMerger::merge("<div>hi</div>", "", "");
        assert_eq!(out, "<div>hi</div>");
    }
}
