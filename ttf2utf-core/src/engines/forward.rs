// ttf2utf-core/src/engines/forward.rs
//! Rule-driven mapping from a legacy font encoding to Unicode.
//!
//! Input is split into alternating whitespace and non-whitespace tokens. Each
//! word goes through the font's pre-rules, then per-character substitution,
//! then post-rules; whitespace tokens are copied verbatim.
//! License: MIT OR APACHE 2.0

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::is_identity_font;
use crate::errors::{Result, Ttf2UtfError};
use crate::rules::compiler::{CompiledRule, CompiledRuleSet, RuleRegistry};

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+|\S+").expect("token pattern is valid"));

/// A maximal run of whitespace or of non-whitespace characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Whitespace(&'a str),
    Word(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Whitespace(s) | Token::Word(s) => s,
        }
    }
}

/// Splits `text` into tokens that concatenate back to exactly `text`.
pub fn tokenize(text: &str) -> impl Iterator<Item = Token<'_>> {
    TOKEN_PATTERN.find_iter(text).map(|m| {
        let s = m.as_str();
        if s.starts_with(char::is_whitespace) {
            Token::Whitespace(s)
        } else {
            Token::Word(s)
        }
    })
}

fn apply_rules(rules: &[CompiledRule], input: String) -> String {
    let mut current = input;
    for rule in rules {
        let replaced = match rule.apply(&current) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(s) = replaced {
            current = s;
        }
    }
    current
}

/// Maps a single non-whitespace word.
pub fn map_word(word: &str, rules: &CompiledRuleSet) -> String {
    let word = apply_rules(rules.pre_rules(), word.to_string());

    let mut mapped = String::with_capacity(word.len() * 3);
    for c in word.chars() {
        match rules.map_char(c) {
            Some(replacement) => mapped.push_str(replacement),
            None => mapped.push(c),
        }
    }

    apply_rules(rules.post_rules(), mapped)
}

/// Maps a whole text with one rule set.
pub fn map_with_rules(text: &str, rules: &CompiledRuleSet) -> String {
    let mut output = String::with_capacity(text.len() * 3);
    for token in tokenize(text) {
        match token {
            Token::Whitespace(ws) => output.push_str(ws),
            Token::Word(word) => output.push_str(&map_word(word, rules)),
        }
    }
    output
}

/// Forward mapper over a registry of rule sets.
#[derive(Debug, Clone)]
pub struct ForwardMapper {
    registry: Arc<RuleRegistry>,
}

impl ForwardMapper {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Maps `text` written in `origin_font` to Unicode.
    ///
    /// The Unicode pseudo-font returns the input unchanged; any other name without
    /// a rule set fails with `NoMapForOrigin`.
    pub fn map_to_unicode(&self, text: &str, origin_font: &str) -> Result<String> {
        if is_identity_font(origin_font) {
            return Ok(text.to_string());
        }
        let rules = self
            .registry
            .get(origin_font)
            .ok_or_else(|| Ttf2UtfError::NoMapForOrigin(origin_font.to_string()))?;

        debug!("Mapping {} byte(s) from '{}' to Unicode.", text.len(), origin_font);
        Ok(map_with_rules(text, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapDefinition, RuleDefinition};
    use crate::rules::compiler::{compile_registry, compile_rule_set};

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter().map(|(p, r)| (p.to_string(), r.to_string())).collect()
    }

    fn rule_set(pre: &[(&str, &str)], map: &[(&str, &str)], post: &[(&str, &str)]) -> CompiledRuleSet {
        let def = RuleDefinition {
            pre_rules: pairs(pre),
            character_map: map.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            post_rules: pairs(post),
        };
        compile_rule_set("Test", &def).unwrap()
    }

    #[test]
    fn tokenize_partitions_input() {
        let text = "  ab\tc \n\nd ";
        let tokens: Vec<Token> = tokenize(text).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Whitespace("  "),
                Token::Word("ab"),
                Token::Whitespace("\t"),
                Token::Word("c"),
                Token::Whitespace(" \n\n"),
                Token::Word("d"),
                Token::Whitespace(" "),
            ]
        );
        let joined: String = tokens.iter().map(Token::as_str).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn tokenize_empty_is_empty() {
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn rules_run_in_fixed_order() {
        // pre-rule turns "ab" into "c", the map turns "c" into "x", the post-rule turns "x" into "y".
        let rules = rule_set(&[("ab", "c")], &[("c", "x")], &[("x", "y")]);
        assert_eq!(map_word("ab", &rules), "y");
        // without the pre-rule match, 'a' and 'b' are unmapped and pass through
        assert_eq!(map_word("ba", &rules), "ba");
    }

    #[test]
    fn multi_char_and_empty_replacements() {
        let rules = rule_set(&[], &[("a", "xyz"), ("b", "")], &[]);
        assert_eq!(map_with_rules("ab ba", &rules), "xyz xyz");
    }

    #[test]
    fn rules_apply_per_word() {
        // '^' anchors at each word start because rules see one token at a time
        let rules = rule_set(&[("^a", "A")], &[], &[]);
        assert_eq!(map_with_rules("aa aa", &rules), "Aa Aa");
    }

    #[test]
    fn unknown_origin_is_an_error() {
        let mut def = MapDefinition::default();
        def.fonts.insert("Preeti".to_string(), RuleDefinition::default());
        let mapper = ForwardMapper::new(Arc::new(compile_registry(&def).unwrap()));
        assert!(matches!(
            mapper.map_to_unicode("text", "Helvetica"),
            Err(Ttf2UtfError::NoMapForOrigin(ref f)) if f == "Helvetica"
        ));
        assert_eq!(mapper.map_to_unicode("as-is", "unicode").unwrap(), "as-is");
    }
}
