//! Configuration management for `ttf2utf-core`.
//!
//! This module defines the serde model of a mapping definition: one rule set per
//! legacy origin font, each made of ordered pre-rules, a per-character map and
//! ordered post-rules. It handles loading definitions from JSON or YAML files,
//! the embedded default definition, merging a user definition over the default,
//! and validating rule integrity before anything gets compiled.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::errors::{Result, Ttf2UtfError};

/// Maximum allowed length for a rule pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Name of the pseudo-font that denotes text already in Unicode.
///
/// Matched case-insensitively, so `"unicode"` and `"Unicode"` both work.
pub const IDENTITY_FONT: &str = "Unicode";

/// Name of the only legacy font with a reverse transcoder.
pub const PREETI_FONT: &str = "Preeti";

/// Sentinel font name asking a document collaborator to detect fonts per run.
pub const AUTO_FONT: &str = "auto";

/// Returns true if `font` names the Unicode identity pseudo-font.
pub fn is_identity_font(font: &str) -> bool {
    font.eq_ignore_ascii_case(IDENTITY_FONT)
}

/// The substitution rules for one legacy origin font.
///
/// All three fields are required in a mapping file; an empty list or map is fine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct RuleDefinition {
    /// `(pattern, replacement)` pairs applied to every word before character mapping.
    #[serde(rename = "pre-rules")]
    pub pre_rules: Vec<(String, String)>,
    /// Single source character to replacement string.
    #[serde(rename = "character-map")]
    pub character_map: BTreeMap<String, String>,
    /// `(pattern, replacement)` pairs applied to every word after character mapping.
    #[serde(rename = "post-rules")]
    pub post_rules: Vec<(String, String)>,
}

/// A full mapping definition, keyed by origin font name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct MapDefinition {
    pub fonts: BTreeMap<String, RuleDefinition>,
}

impl MapDefinition {
    /// Loads a mapping definition from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as JSON.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading mapping definition from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| Ttf2UtfError::MapFileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let definition = if is_yaml {
            Self::from_yaml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        info!(
            "Loaded {} font rule set(s) from file {}.",
            definition.fonts.len(),
            path.display()
        );
        Ok(definition)
    }

    /// Loads the mapping definition embedded in the crate.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default mapping definition from embedded string...");
        let default_json = include_str!("../config/map.json");
        let definition = Self::from_json_str(default_json)?;
        debug!("Loaded {} default font rule set(s).", definition.fonts.len());
        Ok(definition)
    }

    /// Parses and validates a JSON mapping definition.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Ttf2UtfError::InvalidMapDefinition(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Parses and validates a YAML mapping definition.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yml::from_str(text)
            .map_err(|e| Ttf2UtfError::InvalidMapDefinition(format!("not valid YAML: {}", e)))?;
        Self::from_value(value)
    }

    /// Builds a definition from an already parsed document.
    ///
    /// Each font entry may either be the rule set itself, an object wrapping it
    /// under a `"rules"` key, or `{"alias": "<font>"}` naming another rule set in
    /// the same document whose rules it shares.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(Ttf2UtfError::InvalidMapDefinition(
                "top level must be an object keyed by font name".to_string(),
            ));
        };

        let mut fonts = BTreeMap::new();
        let mut aliases = Vec::new();
        for (font, entry) in entries {
            if let Some(target) = alias_target(&entry) {
                aliases.push((font, target?));
                continue;
            }
            let rules = match entry {
                Value::Object(mut obj) if obj.contains_key("rules") => obj.remove("rules").unwrap_or_default(),
                other => other,
            };
            let rule_definition: RuleDefinition = serde_json::from_value(rules).map_err(|e| {
                Ttf2UtfError::InvalidMapDefinition(format!("font '{}': {}", font, e))
            })?;
            fonts.insert(font, rule_definition);
        }

        for (font, target) in aliases {
            let rules = fonts.get(&target).cloned().ok_or_else(|| {
                Ttf2UtfError::InvalidMapDefinition(format!(
                    "font '{}' is an alias of '{}', which has no rule set in this definition",
                    font, target
                ))
            })?;
            debug!("Font '{}' shares the rule set of '{}'.", font, target);
            fonts.insert(font, rules);
        }

        let definition = MapDefinition { fonts };
        definition.validate()?;
        Ok(definition)
    }

    /// Names of all fonts defined, in sorted order.
    pub fn font_names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Validates rule integrity (character keys, regex compilation, capture groups).
    ///
    /// All problems are collected and reported together.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for (font, rules) in &self.fonts {
            if font.trim().is_empty() {
                errors.push("A rule set has an empty font name.".to_string());
            }
            if is_identity_font(font) {
                errors.push(format!("Font name '{}' is reserved for Unicode text.", font));
            }

            for key in rules.character_map.keys() {
                if key.chars().count() != 1 {
                    errors.push(format!(
                        "Font '{}': character-map key '{}' must be exactly one character.",
                        font, key
                    ));
                }
            }

            for (stage, list) in [("pre-rules", &rules.pre_rules), ("post-rules", &rules.post_rules)] {
                for (index, (pattern, replacement)) in list.iter().enumerate() {
                    if let Err(problem) = check_rule(pattern, replacement) {
                        errors.push(format!("Font '{}': {} #{}: {}", font, stage, index, problem));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Ttf2UtfError::InvalidMapDefinition(format!(
                "rule validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}

/// The target of an `{"alias": ...}` entry, or `None` if `entry` is a rule set.
fn alias_target(entry: &Value) -> Option<Result<String>> {
    let Value::Object(obj) = entry else {
        return None;
    };
    let target = obj.get("alias")?;
    if obj.len() != 1 {
        return Some(Err(Ttf2UtfError::InvalidMapDefinition(
            "an alias entry cannot carry rules of its own".to_string(),
        )));
    }
    Some(match target {
        Value::String(name) if !name.trim().is_empty() => Ok(name.clone()),
        _ => Err(Ttf2UtfError::InvalidMapDefinition(
            "alias must name another font".to_string(),
        )),
    })
}

/// Checks a single `(pattern, replacement)` pair.
fn check_rule(pattern: &str, replacement: &str) -> std::result::Result<(), String> {
    if pattern.is_empty() {
        return Err("empty pattern".to_string());
    }
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(format!(
            "pattern length ({}) exceeds maximum allowed ({})",
            pattern.len(),
            MAX_PATTERN_LENGTH
        ));
    }
    let regex = Regex::new(pattern).map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;
    let group_count = regex.captures_len() - 1;
    for group in referenced_groups(replacement) {
        if group > group_count {
            return Err(format!(
                "replacement '{}' references non-existent capture group '\\{}'",
                replacement, group
            ));
        }
    }
    Ok(())
}

/// Group numbers referenced as `\N` in a replacement string.
pub(crate) fn referenced_groups(replacement: &str) -> Vec<usize> {
    let mut groups = Vec::new();
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            continue;
        }
        match chars.peek() {
            Some(d) if d.is_ascii_digit() => {
                groups.push(d.to_digit(10).unwrap_or_default() as usize);
                chars.next();
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }
    groups
}

/// Merges a user definition over the default one.
///
/// A font present in both takes the user's rule set wholesale; rule lists are
/// never spliced together since their order is significant.
pub fn merge_definitions(default_definition: MapDefinition, user_definition: Option<MapDefinition>) -> MapDefinition {
    debug!(
        "merge_definitions called. Initial default font count: {}",
        default_definition.fonts.len()
    );
    let mut fonts = default_definition.fonts;

    if let Some(user) = user_definition {
        let default_names: HashSet<String> = fonts.keys().cloned().collect();
        for (font, rules) in user.fonts {
            if default_names.contains(&font) {
                warn!("User mapping definition overrides built-in rules for font '{}'.", font);
            }
            fonts.insert(font, rules);
        }
    }

    debug!("Final font count after merge: {}", fonts.len());
    MapDefinition { fonts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_groups_skips_escaped_backslash() {
        assert_eq!(referenced_groups(r"\1x\2"), vec![1, 2]);
        assert_eq!(referenced_groups(r"\\1"), Vec::<usize>::new());
        assert!(referenced_groups("plain").is_empty());
    }

    #[test]
    fn wrapped_and_bare_entries_both_load() {
        let json = r#"{
            "Wrapped": { "rules": { "pre-rules": [], "character-map": {"a": "b"}, "post-rules": [] } },
            "Bare": { "pre-rules": [], "character-map": {}, "post-rules": [["x", "y"]] }
        }"#;
        let def = MapDefinition::from_json_str(json).unwrap();
        assert_eq!(def.font_names().collect::<Vec<_>>(), vec!["Bare", "Wrapped"]);
        assert_eq!(def.fonts["Wrapped"].character_map["a"], "b");
        assert_eq!(def.fonts["Bare"].post_rules, vec![("x".to_string(), "y".to_string())]);
    }

    #[test]
    fn missing_field_is_invalid() {
        let json = r#"{ "Broken": { "pre-rules": [], "character-map": {} } }"#;
        let err = MapDefinition::from_json_str(json).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(ref msg) if msg.contains("Broken")));
    }

    #[test]
    fn empty_entry_is_invalid() {
        let err = MapDefinition::from_json_str(r#"{ "Empty": {} }"#).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(ref msg) if msg.contains("Empty")));
        let err = MapDefinition::from_json_str(r#"{ "Wrapped": { "rules": { "character-map": {} } } }"#).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(_)));
    }

    #[test]
    fn alias_shares_the_target_rule_set() {
        let json = r#"{
            "Kalpana": { "alias": "Base" },
            "Base": { "pre-rules": [], "character-map": {"a": "b"}, "post-rules": [] }
        }"#;
        let def = MapDefinition::from_json_str(json).unwrap();
        assert_eq!(def.fonts["Kalpana"], def.fonts["Base"]);
    }

    #[test]
    fn alias_to_a_missing_font_is_invalid() {
        let err = MapDefinition::from_json_str(r#"{ "Kalpana": { "alias": "Nowhere" } }"#).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::InvalidMapDefinition(ref msg) if msg.contains("Nowhere")));
        let json = r#"{ "Kalpana": { "alias": "Base", "character-map": {} },
                        "Base": { "pre-rules": [], "character-map": {}, "post-rules": [] } }"#;
        assert!(MapDefinition::from_json_str(json).is_err());
    }

    #[test]
    fn bad_rules_are_collected() {
        let json = r#"{ "Broken": {
            "pre-rules": [["(unclosed", "x"], ["(a)", "\\2"]],
            "character-map": {"ab": "x"},
            "post-rules": [["", "x"]]
        } }"#;
        let Err(Ttf2UtfError::InvalidMapDefinition(msg)) = MapDefinition::from_json_str(json) else {
            panic!("expected InvalidMapDefinition");
        };
        assert!(msg.contains("invalid pattern"));
        assert!(msg.contains("non-existent capture group"));
        assert!(msg.contains("exactly one character"));
        assert!(msg.contains("empty pattern"));
    }

    #[test]
    fn identity_name_is_reserved() {
        let json = r#"{ "unicode": { "pre-rules": [], "character-map": {}, "post-rules": [] } }"#;
        assert!(MapDefinition::from_json_str(json).is_err());
    }

    #[test]
    fn merge_prefers_user_rule_set() {
        let mut default_def = MapDefinition::default();
        default_def.fonts.insert("Preeti".to_string(), RuleDefinition::default());
        let mut user_def = MapDefinition::default();
        let mut user_rules = RuleDefinition::default();
        user_rules.character_map.insert("a".to_string(), "ब".to_string());
        user_def.fonts.insert("Preeti".to_string(), user_rules.clone());
        user_def.fonts.insert("Sagarmatha".to_string(), RuleDefinition::default());

        let merged = merge_definitions(default_def, Some(user_def));
        assert_eq!(merged.fonts.len(), 2);
        assert_eq!(merged.fonts["Preeti"], user_rules);
    }
}
