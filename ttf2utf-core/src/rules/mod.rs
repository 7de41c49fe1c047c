//! Compiled rule sets for the forward mapper.
//!
//! A `MapDefinition` is plain data; this module turns it into immutable
//! `CompiledRuleSet`s (regexes built once, character map keyed by `char`) and
//! groups them in a `RuleRegistry` that also answers for the Unicode
//! pseudo-font.

pub mod compiler;
