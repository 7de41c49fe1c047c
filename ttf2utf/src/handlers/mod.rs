// ttf2utf/src/handlers/mod.rs
//! File-level collaborators of the converter.
//!
//! A handler knows one file format: how to pull the text runs out of it, which
//! font each run is declared in, and how to write the converted file back. All
//! text conversion goes through `FontConverter`.

use clap::ValueEnum;
use std::path::Path;
use ttf2utf_core::{AUTO_FONT, IDENTITY_FONT, Ttf2UtfError};

pub mod docx;
pub mod txt;

pub use docx::{DocxHandler, DocxOptions, DocxReport, UnicodeFontPolicy};
pub use txt::TxtHandler;

/// The parts of a word-processing document that can be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum DocxComponent {
    /// Paragraphs in the document body.
    BodyParagraph,
    /// Paragraphs inside tables.
    Table,
    /// Paragraphs inside text boxes and shapes.
    Shape,
}

impl DocxComponent {
    pub const ALL: [DocxComponent; 3] = [DocxComponent::BodyParagraph, DocxComponent::Table, DocxComponent::Shape];
}

/// What to convert and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRequest {
    /// Origin font, or `"auto"` to use each run's declared font.
    pub from_font: String,
    /// Target font: `"Unicode"` or a legacy font with a transcoder.
    pub to_font: String,
    /// Document parts to touch. Ignored by formats without structure.
    pub components: Vec<DocxComponent>,
    /// Extra Unicode font names trusted to hold Devanagari.
    pub known_unicode_fonts: Vec<String>,
}

impl MappingRequest {
    pub fn new(from_font: impl Into<String>, to_font: impl Into<String>) -> Self {
        Self {
            from_font: from_font.into(),
            to_font: to_font.into(),
            components: DocxComponent::ALL.to_vec(),
            known_unicode_fonts: Vec::new(),
        }
    }

    /// Auto-detect origin fonts, converting to Unicode.
    pub fn auto() -> Self {
        Self::new(AUTO_FONT, IDENTITY_FONT)
    }

    pub fn with_components(mut self, components: Vec<DocxComponent>) -> Self {
        self.components = components;
        self
    }

    pub fn with_known_unicode_fonts(mut self, fonts: Vec<String>) -> Self {
        self.known_unicode_fonts = fonts;
        self
    }

    pub fn is_auto(&self) -> bool {
        self.from_font.eq_ignore_ascii_case(AUTO_FONT)
    }

    pub fn wants(&self, component: DocxComponent) -> bool {
        self.components.contains(&component)
    }
}

/// A converter for one file format.
pub trait DocumentHandler {
    /// Converts `input` as described by `request` and writes the result to `output`.
    ///
    /// Nothing is written when conversion fails.
    fn map_fonts(&self, input: &Path, output: &Path, request: &MappingRequest) -> Result<(), Ttf2UtfError>;

    /// Supported fonts declared in `input`, in order of first use.
    fn detect_used_fonts(&self, input: &Path) -> Result<Vec<String>, Ttf2UtfError>;
}
