// ttf2utf-core/src/engine.rs
//! Defines the `LegacyTranscoder` trait.
//!
//! Forward conversion is data-driven and works for any font with a rule set,
//! but the reverse direction is an algorithm specific to each legacy layout.
//! Every such algorithm implements this trait so the converter can look
//! transcoders up by target font name and more layouts can be added without
//! touching the facade.
//!
//! License: MIT OR APACHE 2.0

use std::fmt::Debug;

/// Converts Unicode Devanagari into one legacy visual encoding.
pub trait LegacyTranscoder: Send + Sync + Debug {
    /// Name of the legacy font this transcoder produces (e.g. `"Preeti"`).
    fn target_font(&self) -> &str;

    /// Converts phonemically ordered Unicode text into the legacy byte layout.
    ///
    /// Characters without a legacy glyph pass through unchanged; this never fails.
    fn transcode(&self, unicode_text: &str) -> String;

    /// True if `font` names this transcoder's target (case-insensitive).
    fn handles(&self, font: &str) -> bool {
        self.target_font().eq_ignore_ascii_case(font)
    }
}
