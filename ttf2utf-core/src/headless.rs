// ttf2utf-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot conversions with the embedded default map.
//!
//! The converter behind these helpers is built on first use and shared by all
//! later calls.

use once_cell::sync::OnceCell;

use crate::config::IDENTITY_FONT;
use crate::converter::{FontConverter, MarkupOptions};
use crate::errors::Result;

static DEFAULT_CONVERTER: OnceCell<FontConverter> = OnceCell::new();

/// The converter over the embedded default map.
pub fn default_converter() -> Result<&'static FontConverter> {
    DEFAULT_CONVERTER.get_or_try_init(FontConverter::with_default_rules)
}

/// Converts `text` written in `font` to Unicode.
///
/// # Arguments
///
/// * `text` - The text to convert, as plain text.
/// * `font` - The legacy font the text was typed in, or `"Unicode"`.
pub fn headless_to_unicode(text: &str, font: &str) -> Result<String> {
    default_converter()?.convert(text, font, IDENTITY_FONT, MarkupOptions::plain())
}

/// Converts `text` written in `font` (a legacy font or `"Unicode"`) to Preeti.
pub fn headless_to_preeti(text: &str, font: &str) -> Result<String> {
    default_converter()?.to_legacy(text, font, MarkupOptions::plain())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Ttf2UtfError;

    #[test]
    fn headless_to_unicode_uses_default_map() {
        assert_eq!(headless_to_unicode("g]kfn", "Preeti").unwrap(), "नेपाल");
    }

    #[test]
    fn headless_to_preeti_from_unicode() {
        assert_eq!(headless_to_preeti("नेपाल", "Unicode").unwrap(), "g]kfn");
    }

    #[test]
    fn headless_reports_unknown_font() {
        assert!(matches!(
            headless_to_unicode("abc", "Helvetica"),
            Err(Ttf2UtfError::NoMapForOrigin(_))
        ));
    }

    #[test]
    fn converter_is_shared() {
        let first = default_converter().unwrap();
        let second = default_converter().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
