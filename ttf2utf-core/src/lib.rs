// ttf2utf-core/src/lib.rs
//! # ttf2utf Core Library
//!
//! `ttf2utf-core` converts Devanagari text between legacy visual-order fonts
//! (Preeti, Kantipur and friends) and Unicode. It contains no I/O beyond loading
//! mapping files; documents and the command line live in the `ttf2utf` crate.
//!
//! ## Modules
//!
//! * `config`: The serde model of mapping definitions, with loading, merging and validation.
//! * `rules`: Compiles mapping definitions into cached, immutable rule registries.
//! * `engines`: The forward rule mapper and the reverse transcoders.
//! * `engine`: Defines the `LegacyTranscoder` trait implemented by each reverse transcoder.
//! * `converter`: The `FontConverter` facade used by every caller.
//! * `markup`: Entity unescaping and escaping for text that lives in markup.
//! * `headless`: One-shot helpers over the embedded default map.
//! * `errors`: The `Ttf2UtfError` type.
//!
//! ## Public API
//!
//! **Mapping definitions**
//!
//! * [`MapDefinition`]: Rule sets keyed by origin font name.
//! * [`MapDefinition::load_from_file`]: Loads a JSON or YAML mapping file.
//! * [`MapDefinition::load_default`]: Loads the embedded mapping definition.
//! * [`merge_definitions`]: Lays a user definition over the default one.
//!
//! **Conversion**
//!
//! * [`FontConverter`]: `to_unicode`, `to_legacy`, `to_legacy_target` and `convert`.
//! * [`MarkupOptions`]: Entity handling around a conversion.
//! * [`LegacyTranscoder`]: The seam for reverse transcoders, e.g. [`PreetiTranscoder`].
//!
//! ## Usage Example
//!
//! ```rust
//! use ttf2utf_core::{FontConverter, MarkupOptions};
//!
//! fn main() -> Result<(), ttf2utf_core::Ttf2UtfError> {
//!     let converter = FontConverter::with_default_rules()?;
//!
//!     let unicode = converter.to_unicode("g]kfn", "Preeti", MarkupOptions::plain())?;
//!     assert_eq!(unicode, "नेपाल");
//!
//!     let preeti = converter.to_legacy(&unicode, "Unicode", MarkupOptions::plain())?;
//!     assert_eq!(preeti, "g]kfn");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Ttf2UtfError`], with one variant per failure kind
//! so callers can tell a missing map file from an unknown font.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod converter;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod markup;
pub mod rules;

/// Re-exports the mapping definition types and helpers.
pub use config::{
    is_identity_font, merge_definitions, MapDefinition, RuleDefinition, AUTO_FONT, IDENTITY_FONT,
    MAX_PATTERN_LENGTH, PREETI_FONT,
};

/// Re-exports the error type for clear error reporting.
pub use errors::{Result, Ttf2UtfError};

/// Re-exports the transcoder seam and the facade.
pub use converter::{FontConverter, MarkupOptions};
pub use engine::LegacyTranscoder;

pub use engines::forward::ForwardMapper;
pub use engines::preeti::PreetiTranscoder;

/// Re-exports the one-shot helpers.
pub use headless::{default_converter, headless_to_preeti, headless_to_unicode};

// Re-export compiled rule types for advanced usage.
pub use rules::compiler::{compile_registry, get_or_compile_registry, CompiledRule, CompiledRuleSet, RuleRegistry};
