// ttf2utf-core/src/converter.rs
//! The `FontConverter` facade.
//!
//! A converter owns a compiled rule registry (for legacy to Unicode) and the set
//! of reverse transcoders (for Unicode to legacy). Legacy to legacy conversion
//! goes through Unicode. Converters are immutable once built and can be shared
//! between threads.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use crate::config::{is_identity_font, merge_definitions, MapDefinition, PREETI_FONT};
use crate::engine::LegacyTranscoder;
use crate::engines::forward::ForwardMapper;
use crate::engines::preeti::PreetiTranscoder;
use crate::errors::{Result, Ttf2UtfError};
use crate::markup;
use crate::rules::compiler::{get_or_compile_registry, RuleRegistry};

/// Entity handling around a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Resolve XML/HTML entities in the input before converting.
    pub unescape_input: bool,
    /// Escape `& < > ' "` in the converted output.
    pub escape_output: bool,
}

impl MarkupOptions {
    /// Plain text: no entity handling.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Text taken from and written back into markup.
    pub fn markup() -> Self {
        Self {
            unescape_input: true,
            escape_output: true,
        }
    }
}

#[derive(Debug)]
pub struct FontConverter {
    registry: Arc<RuleRegistry>,
    forward: ForwardMapper,
    transcoders: Vec<Box<dyn LegacyTranscoder>>,
}

impl FontConverter {
    /// Builds a converter from a mapping definition, compiling it (or reusing a
    /// cached compilation of an identical definition).
    pub fn new(definition: &MapDefinition) -> Result<Self> {
        let registry = get_or_compile_registry(definition)?;
        Ok(Self::from_registry(registry))
    }

    /// Builds a converter over an already compiled registry, with the built-in
    /// reverse transcoders.
    pub fn from_registry(registry: Arc<RuleRegistry>) -> Self {
        Self {
            forward: ForwardMapper::new(Arc::clone(&registry)),
            registry,
            transcoders: vec![Box::new(PreetiTranscoder::new())],
        }
    }

    /// A converter over the embedded default mapping definition.
    pub fn with_default_rules() -> Result<Self> {
        Self::new(&MapDefinition::load_default()?)
    }

    /// A converter over a user mapping file merged on top of the embedded default.
    pub fn from_map_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let user = MapDefinition::load_from_file(path)?;
        let merged = merge_definitions(MapDefinition::load_default()?, Some(user));
        Self::new(&merged)
    }

    /// Registers an additional reverse transcoder. The first transcoder registered
    /// for a target is the one used.
    pub fn with_transcoder(mut self, transcoder: Box<dyn LegacyTranscoder>) -> Self {
        debug!("Registering transcoder for '{}'.", transcoder.target_font());
        self.transcoders.push(transcoder);
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Every font usable as an origin: the registered legacy fonts and `"Unicode"`.
    pub fn supported_fonts(&self) -> Vec<String> {
        self.registry.supported_fonts()
    }

    pub fn is_supported(&self, font: &str) -> bool {
        self.registry.is_supported(font)
    }

    /// Names of the legacy fonts that can be produced.
    pub fn legacy_targets(&self) -> Vec<&str> {
        self.transcoders.iter().map(|t| t.target_font()).collect()
    }

    /// True if `font` can be produced: `"Unicode"` or a font with a transcoder.
    pub fn is_target(&self, font: &str) -> bool {
        is_identity_font(font) || self.transcoder_for(font).is_some()
    }

    fn transcoder_for(&self, target_font: &str) -> Option<&dyn LegacyTranscoder> {
        self.transcoders
            .iter()
            .find(|t| t.handles(target_font))
            .map(|t| t.as_ref())
    }

    /// Converts `text` written in `origin_font` to Unicode.
    pub fn to_unicode(&self, text: &str, origin_font: &str, markup: MarkupOptions) -> Result<String> {
        with_markup(text, markup, |input| self.forward.map_to_unicode(input, origin_font))
    }

    /// Converts `text` written in `origin_font` to Preeti.
    pub fn to_legacy(&self, text: &str, origin_font: &str, markup: MarkupOptions) -> Result<String> {
        self.to_legacy_target(text, origin_font, PREETI_FONT, markup)
    }

    /// Converts `text` written in `origin_font` to the legacy `target_font`.
    ///
    /// Text already in the target font is returned as is. Otherwise legacy input
    /// is first mapped to Unicode, then transcoded.
    pub fn to_legacy_target(
        &self,
        text: &str,
        origin_font: &str,
        target_font: &str,
        markup: MarkupOptions,
    ) -> Result<String> {
        let transcoder = self
            .transcoder_for(target_font)
            .ok_or_else(|| Ttf2UtfError::UnsupportedTarget(target_font.to_string()))?;

        with_markup(text, markup, |input| {
            if origin_font.eq_ignore_ascii_case(target_font) {
                return Ok(input.to_string());
            }
            let unicode = if is_identity_font(origin_font) {
                Cow::Borrowed(input)
            } else {
                Cow::Owned(self.forward.map_to_unicode(input, origin_font)?)
            };
            Ok(transcoder.transcode(&unicode))
        })
    }

    /// Converts between any supported origin and any producible target,
    /// including `"Unicode"`.
    pub fn convert(&self, text: &str, origin_font: &str, target_font: &str, markup: MarkupOptions) -> Result<String> {
        if is_identity_font(target_font) {
            self.to_unicode(text, origin_font, markup)
        } else {
            self.to_legacy_target(text, origin_font, target_font, markup)
        }
    }
}

fn with_markup<F>(text: &str, markup: MarkupOptions, convert: F) -> Result<String>
where
    F: FnOnce(&str) -> Result<String>,
{
    let input = if markup.unescape_input {
        markup::unescape(text)
    } else {
        Cow::Borrowed(text)
    };
    let converted = convert(&input)?;
    if markup.escape_output {
        Ok(markup::escape(&converted).into_owned())
    } else {
        Ok(converted)
    }
}

impl Default for FontConverter {
    /// An empty registry: only Unicode input is accepted.
    fn default() -> Self {
        Self::from_registry(Arc::new(RuleRegistry::default()))
    }
}

/// Logs the font inventory of a converter.
pub fn log_inventory(converter: &FontConverter) {
    info!(
        "Converter ready: {} origin font(s) [{}], target(s) [{}].",
        converter.registry().len(),
        converter.registry().legacy_fonts().collect::<Vec<_>>().join(", "),
        converter.legacy_targets().join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleDefinition;

    fn toy_converter() -> FontConverter {
        let mut def = MapDefinition::default();
        let mut rules = RuleDefinition::default();
        rules.character_map.insert("s".to_string(), "क".to_string());
        rules.character_map.insert("f".to_string(), "ा".to_string());
        def.fonts.insert("Toy".to_string(), rules);
        FontConverter::new(&def).unwrap()
    }

    #[test]
    fn identity_conversion_is_unchanged() {
        let c = toy_converter();
        assert_eq!(c.to_unicode("क ख", "unicode", MarkupOptions::plain()).unwrap(), "क ख");
        assert_eq!(c.to_legacy("sf", "preeti", MarkupOptions::plain()).unwrap(), "sf");
    }

    #[test]
    fn legacy_goes_through_unicode() {
        let c = toy_converter();
        assert_eq!(c.to_unicode("sf", "Toy", MarkupOptions::plain()).unwrap(), "का");
        assert_eq!(c.to_legacy("sf", "Toy", MarkupOptions::plain()).unwrap(), "sf");
        assert_eq!(c.convert("sf", "Toy", "Unicode", MarkupOptions::plain()).unwrap(), "का");
    }

    #[test]
    fn unknown_target_is_rejected_before_conversion() {
        let c = toy_converter();
        let err = c.to_legacy_target("sf", "Nope", "Kantipur", MarkupOptions::plain()).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::UnsupportedTarget(ref t) if t == "Kantipur"));
    }

    #[test]
    fn unknown_origin_is_rejected() {
        let c = toy_converter();
        let err = c.to_legacy("sf", "Helvetica", MarkupOptions::plain()).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::NoMapForOrigin(_)));
    }

    #[test]
    fn markup_round_trip() {
        let c = toy_converter();
        let out = c.to_unicode("s&amp;f", "Toy", MarkupOptions::markup()).unwrap();
        assert_eq!(out, "क&amp;ा");
        let unescaped_only = MarkupOptions {
            unescape_input: true,
            escape_output: false,
        };
        assert_eq!(c.to_unicode("s&lt;", "Toy", unescaped_only).unwrap(), "क<");
    }

    #[test]
    fn introspection() {
        let c = toy_converter();
        assert_eq!(c.supported_fonts(), vec!["Toy".to_string(), "Unicode".to_string()]);
        assert!(c.is_supported("unicode"));
        assert!(!c.is_supported("Preeti"));
        assert_eq!(c.legacy_targets(), vec!["Preeti"]);
        assert!(c.is_target("PREETI"));
        assert!(c.is_target("Unicode"));
        assert!(!c.is_target("Toy"));
    }
}
