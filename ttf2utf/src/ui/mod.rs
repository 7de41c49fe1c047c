// ttf2utf/src/ui/mod.rs
//! Terminal presentation: colour themes and message formatting.

pub mod output_format;
pub mod theme;
