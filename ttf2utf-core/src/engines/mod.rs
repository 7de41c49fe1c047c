// ttf2utf-core/src/engines/mod.rs
//! Conversion engines.
//!
//! `forward` is the rule-driven legacy to Unicode mapper shared by every font
//! with a rule set. Each reverse direction is its own module implementing the
//! `LegacyTranscoder` trait; to add a layout, create a new module next to
//! `preeti` and declare it here.
//!
//! License: MIT OR APACHE 2.0

pub mod forward;
pub mod preeti;
