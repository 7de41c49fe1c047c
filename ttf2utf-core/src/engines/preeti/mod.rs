// ttf2utf-core/src/engines/preeti/mod.rs
//! Unicode to Preeti transcoder.
//!
//! Preeti is a visual-order font: the short-i matra is typed before its
//! consonant, the reph after the cluster it crowns, and conjuncts use dedicated
//! half-form glyphs. Transcoding runs in two passes over the Unicode text:
//!
//! 1. [`normalize`] collapses half-form and rakar clusters into placeholder glyphs.
//! 2. [`emit`] walks the result, reorders matras and reph, maps every character
//!    to its glyph(s) and folds the remaining multi-glyph sequences into ligatures.
//!
//! License: MIT OR APACHE 2.0

pub mod emit;
pub mod normalize;
pub mod tables;

use log::debug;

use crate::config::PREETI_FONT;
use crate::engine::LegacyTranscoder;
use tables::{PreetiTables, PREETI_TABLES};

/// The Preeti reverse transcoder. Stateless and cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct PreetiTranscoder {
    tables: &'static PreetiTables,
}

impl PreetiTranscoder {
    pub fn new() -> Self {
        Self { tables: &PREETI_TABLES }
    }

    /// Converts Unicode Devanagari to Preeti glyph text. Never fails.
    pub fn from_unicode(&self, unicode_text: &str) -> String {
        let normalized = self.normalize(unicode_text);
        self.emit(&normalized)
    }

    /// Runs only the normalisation pass.
    pub fn normalize(&self, unicode_text: &str) -> String {
        normalize::normalize(unicode_text, self.tables)
    }

    /// Runs only the emission pass over already normalised text.
    pub fn emit(&self, normalized: &str) -> String {
        emit::emit(normalized, self.tables)
    }
}

impl Default for PreetiTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyTranscoder for PreetiTranscoder {
    fn target_font(&self) -> &str {
        PREETI_FONT
    }

    fn transcode(&self, unicode_text: &str) -> String {
        debug!("Transcoding {} byte(s) of Unicode to Preeti.", unicode_text.len());
        self.from_unicode(unicode_text)
    }
}
