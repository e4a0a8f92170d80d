//! Seeded CSS3 property name table, same `Lazy<HashSet<..>>` idiom as
//! [`super::html_elements`].

use std::collections::HashSet;

use once_cell::sync::Lazy;

pub static CSS_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Box model / layout
        "display", "position", "top", "right", "bottom", "left", "float", "clear", "z-index",
        "box-sizing", "width", "height", "min-width", "min-height", "max-width", "max-height",
        "margin", "margin-top", "margin-right", "margin-bottom", "margin-left", "padding",
        "padding-top", "padding-right", "padding-bottom", "padding-left", "overflow",
        "overflow-x", "overflow-y", "visibility", "clip-path",
        // Border / background
        "border", "border-top", "border-right", "border-bottom", "border-left", "border-width",
        "border-style", "border-color", "border-radius", "background", "background-color",
        "background-image", "background-position", "background-repeat", "background-size",
        "background-attachment", "box-shadow", "outline", "outline-offset",
        // Text / font
        "color", "font", "font-family", "font-size", "font-weight", "font-style",
        "line-height", "letter-spacing", "word-spacing", "text-align", "text-decoration",
        "text-transform", "text-indent", "text-overflow", "white-space", "vertical-align",
        "direction", "writing-mode",
        // Flex
        "flex", "flex-direction", "flex-wrap", "flex-flow", "flex-grow", "flex-shrink",
        "flex-basis", "justify-content", "align-items", "align-self", "align-content", "order",
        "gap", "row-gap", "column-gap",
        // Grid
        "grid", "grid-template-columns", "grid-template-rows", "grid-template-areas",
        "grid-column", "grid-row", "grid-area", "grid-gap", "grid-auto-flow",
        "grid-auto-columns", "grid-auto-rows",
        // Transition / animation
        "transition", "transition-property", "transition-duration", "transition-timing-function",
        "transition-delay", "animation", "animation-name", "animation-duration",
        "animation-timing-function", "animation-delay", "animation-iteration-count",
        "animation-direction", "animation-fill-mode", "animation-play-state",
        "transform", "transform-origin", "perspective",
        // Misc
        "opacity", "cursor", "pointer-events", "user-select", "content", "filter",
        "backdrop-filter", "resize", "object-fit", "object-position", "will-change",
        "list-style", "list-style-type",
    ]
    .into_iter()
    .collect()
});

pub fn is_css_property(name: &str) -> bool {
    CSS_PROPERTIES.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_properties() {
        assert!(is_css_property("color"));
        assert!(is_css_property("display"));
        assert!(is_css_property("grid-template-columns"));
    }

    #[test]
    fn rejects_unknown_properties() {
        assert!(!is_css_property("not-a-real-property"));
    }
}
