//! Entity handling for text taken from, or going back into, markup.
//!
//! License: MIT OR APACHE 2.0

use log::warn;
use quick_xml::escape::{escape as xml_escape, resolve_html5_entity, unescape_with};
use std::borrow::Cow;

/// Resolves XML, HTML5 and numeric character references.
///
/// Input with an unknown or malformed reference is returned as written.
pub fn unescape(text: &str) -> Cow<'_, str> {
    match unescape_with(text, resolve_html5_entity) {
        Ok(unescaped) => unescaped,
        Err(e) => {
            warn!("Leaving markup entities unresolved: {}", e);
            Cow::Borrowed(text)
        }
    }
}

/// Escapes `&`, `<`, `>`, `'` and `"`.
pub fn escape(text: &str) -> Cow<'_, str> {
    xml_escape(text)
}
