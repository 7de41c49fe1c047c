//! compiler.rs - Compiles mapping definitions into rule registries and caches them.
//!
//! Compilation is the only place a rule definition can fail after parsing, so
//! every problem is reported here as `InvalidMapDefinition`; conversions never
//! see a malformed regex. Registries compiled from identical definitions are
//! shared through a process-wide cache.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{is_identity_font, MapDefinition, RuleDefinition, IDENTITY_FONT, MAX_PATTERN_LENGTH};
use crate::errors::{Result, Ttf2UtfError};

/// A single compiled `(pattern, replacement)` rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Replacement in `regex` crate syntax (`${1}` group references, `$$` literal dollars).
    pub replace_with: String,
}

impl CompiledRule {
    /// Replaces every non-overlapping match in `input`.
    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(input, self.replace_with.as_str())
    }
}

/// The compiled, read-only rules for one origin font.
#[derive(Debug)]
pub struct CompiledRuleSet {
    font: String,
    pre_rules: Vec<CompiledRule>,
    character_map: HashMap<char, String>,
    post_rules: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn pre_rules(&self) -> &[CompiledRule] {
        &self.pre_rules
    }

    pub fn post_rules(&self) -> &[CompiledRule] {
        &self.post_rules
    }

    /// Replacement for a single source character, if the map has one.
    pub fn map_char(&self, c: char) -> Option<&str> {
        self.character_map.get(&c).map(String::as_str)
    }

    pub fn character_map_len(&self) -> usize {
        self.character_map.len()
    }
}

/// Every compiled rule set of a mapping definition, keyed by origin font name.
///
/// The registry also reports the Unicode pseudo-font as supported so callers can
/// treat "already Unicode" like any other origin.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rule_sets: BTreeMap<String, Arc<CompiledRuleSet>>,
}

impl RuleRegistry {
    /// The rule set registered for `font` (exact, case-sensitive name).
    pub fn get(&self, font: &str) -> Option<&Arc<CompiledRuleSet>> {
        self.rule_sets.get(font)
    }

    /// True for registered legacy fonts and for the Unicode pseudo-font.
    pub fn is_supported(&self, font: &str) -> bool {
        is_identity_font(font) || self.rule_sets.contains_key(font)
    }

    /// True for the Unicode pseudo-font, which never has a rule set.
    pub fn is_identity(&self, font: &str) -> bool {
        is_identity_font(font)
    }

    /// Names of all legacy fonts with a rule set.
    pub fn legacy_fonts(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.keys().map(String::as_str)
    }

    /// Legacy font names followed by the Unicode pseudo-font.
    pub fn supported_fonts(&self) -> Vec<String> {
        self.legacy_fonts()
            .map(str::to_string)
            .chain(std::iter::once(IDENTITY_FONT.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

lazy_static! {
    /// A thread-safe, global cache for compiled registries.
    /// The key is a hash of the `MapDefinition`.
    static ref COMPILED_REGISTRY_CACHE: RwLock<HashMap<u64, Arc<RuleRegistry>>> = RwLock::new(HashMap::new());
}

fn hash_definition(definition: &MapDefinition) -> u64 {
    let mut hasher = DefaultHasher::new();
    definition.hash(&mut hasher);
    hasher.finish()
}

/// Converts a replacement written with `\1` back-references into `regex` syntax.
///
/// `$` is literal in the source syntax, so it is doubled; `\\` is a literal backslash.
pub fn translate_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                Some(d) if d.is_ascii_digit() => {
                    out.push_str("${");
                    out.push(d);
                    out.push('}');
                }
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    out
}

fn compile_rule(font: &str, stage: &str, pattern: &str, replacement: &str) -> Result<CompiledRule> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(Ttf2UtfError::InvalidMapDefinition(format!(
            "font '{}': {} pattern length ({}) exceeds maximum allowed ({})",
            font,
            stage,
            pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }

    let regex = RegexBuilder::new(pattern)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| {
            Ttf2UtfError::InvalidMapDefinition(format!(
                "font '{}': failed to compile {} pattern '{}': {}",
                font, stage, pattern, e
            ))
        })?;

    log::debug!(
        target: "ttf2utf_core::compiler",
        "Font '{}': {} pattern '{}' compiled successfully.",
        font, stage, pattern
    );

    Ok(CompiledRule {
        regex,
        replace_with: translate_replacement(replacement),
    })
}

/// Compiles the rules of a single origin font.
pub fn compile_rule_set(font: &str, definition: &RuleDefinition) -> Result<CompiledRuleSet> {
    let pre_rules = definition
        .pre_rules
        .iter()
        .map(|(pattern, replacement)| compile_rule(font, "pre-rule", pattern, replacement))
        .collect::<Result<Vec<_>>>()?;

    let post_rules = definition
        .post_rules
        .iter()
        .map(|(pattern, replacement)| compile_rule(font, "post-rule", pattern, replacement))
        .collect::<Result<Vec<_>>>()?;

    let mut character_map = HashMap::with_capacity(definition.character_map.len());
    for (key, value) in &definition.character_map {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                character_map.insert(c, value.clone());
            }
            _ => {
                return Err(Ttf2UtfError::InvalidMapDefinition(format!(
                    "font '{}': character-map key '{}' must be exactly one character",
                    font, key
                )));
            }
        }
    }

    Ok(CompiledRuleSet {
        font: font.to_string(),
        pre_rules,
        character_map,
        post_rules,
    })
}

/// Compiles every rule set in a definition into a registry.
///
/// Errors from all fonts are gathered into a single report.
pub fn compile_registry(definition: &MapDefinition) -> Result<RuleRegistry> {
    debug!("Starting compilation of {} font rule set(s).", definition.fonts.len());

    let mut rule_sets = BTreeMap::new();
    let mut compilation_errors = Vec::new();

    for (font, rules) in &definition.fonts {
        match compile_rule_set(font, rules) {
            Ok(compiled) => {
                rule_sets.insert(font.clone(), Arc::new(compiled));
            }
            Err(e) => compilation_errors.push(e.to_string()),
        }
    }

    if !compilation_errors.is_empty() {
        return Err(Ttf2UtfError::InvalidMapDefinition(format!(
            "failed to compile {} rule set(s):\n{}",
            compilation_errors.len(),
            compilation_errors.join("\n")
        )));
    }

    debug!("Finished compiling rule sets. Total compiled: {}.", rule_sets.len());
    Ok(RuleRegistry { rule_sets })
}

/// Gets a `RuleRegistry` from the cache or compiles it if not found.
///
/// Returns an `Arc` so converters built from the same definition share one registry.
pub fn get_or_compile_registry(definition: &MapDefinition) -> Result<Arc<RuleRegistry>> {
    let cache_key = hash_definition(definition);

    {
        let cache = COMPILED_REGISTRY_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(registry) = cache.get(&cache_key) {
            debug!("Serving compiled registry from cache for key: {}", cache_key);
            return Ok(Arc::clone(registry));
        }
    }

    debug!("Compiled registry not found in cache. Compiling now.");
    let compiled = Arc::new(compile_registry(definition)?);

    COMPILED_REGISTRY_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Successfully compiled and cached registry for key: {}", cache_key);
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter().map(|(p, r)| (p.to_string(), r.to_string())).collect()
    }

    fn definition(pre: &[(&str, &str)], map: &[(&str, &str)], post: &[(&str, &str)]) -> RuleDefinition {
        RuleDefinition {
            pre_rules: pairs(pre),
            character_map: map.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            post_rules: pairs(post),
        }
    }

    #[test]
    fn translates_backreferences_and_dollars() {
        assert_eq!(translate_replacement(r"\1fि"), "${1}fि");
        assert_eq!(translate_replacement(r"{\1\2\3"), "{${1}${2}${3}");
        assert_eq!(translate_replacement("$5"), "$$5");
        assert_eq!(translate_replacement(r"a\\b"), r"a\b");
    }

    #[test]
    fn compiled_rule_uses_group_references() {
        let rule = compile_rule("Test", "pre-rule", "l(.)", r"\1ि").unwrap();
        assert_eq!(rule.apply("lsl/"), "sि/ि");
    }

    #[test]
    fn dollar_in_replacement_stays_literal() {
        let rule = compile_rule("Test", "post-rule", "x", "$1").unwrap();
        assert_eq!(rule.apply("axb"), "a$1b");
    }

    #[test]
    fn compile_rule_set_keys_by_char() {
        let set = compile_rule_set("Test", &definition(&[], &[("s", "क"), ("f", "ा")], &[])).unwrap();
        assert_eq!(set.map_char('s'), Some("क"));
        assert_eq!(set.map_char('z'), None);
        assert_eq!(set.character_map_len(), 2);
    }

    #[test]
    fn registry_reports_identity_font() {
        let mut def = MapDefinition::default();
        def.fonts.insert("Preeti".to_string(), definition(&[], &[], &[]));
        let registry = compile_registry(&def).unwrap();
        assert!(registry.is_supported("Preeti"));
        assert!(registry.is_supported("unicode"));
        assert!(registry.is_supported("Unicode"));
        assert!(!registry.is_supported("preeti"));
        assert_eq!(registry.supported_fonts(), vec!["Preeti".to_string(), "Unicode".to_string()]);
    }

    #[test]
    fn bad_pattern_is_invalid_definition() {
        let mut def = MapDefinition::default();
        def.fonts.insert("Broken".to_string(), definition(&[("(?<=a)b", "c")], &[], &[]));
        let err = compile_registry(&def).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(_)));
    }

    #[test]
    fn cache_returns_shared_registry() {
        let mut def = MapDefinition::default();
        def.fonts.insert("CacheProbe".to_string(), definition(&[], &[("a", "b")], &[]));
        let first = get_or_compile_registry(&def).unwrap();
        let second = get_or_compile_registry(&def).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
