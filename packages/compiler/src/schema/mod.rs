//! Schema module: seeded, process-wide name tables consulted by the
//! lexers and scanner for element/property recognition.

pub mod css_properties;
pub mod html_elements;

pub use css_properties::{is_css_property, CSS_PROPERTIES};
pub use html_elements::{is_html_element, HTML_ELEMENTS};
