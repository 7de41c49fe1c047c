//! First pass of the Preeti transcoder: collapse conjunct clusters into the
//! placeholder glyphs the emission pass expects.

use super::tables::{PreetiTables, EYELASH_RAKAR, RA, RAKAR, TA, TA_RAKAR, VIRAMA};

/// Replaces half-form clusters with their half-form glyph and consonant + virama + र
/// with a rakar sentinel, then folds `त` + rakar into the त्र glyph.
pub fn normalize(text: &str, tables: &PreetiTables) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if let Some(half) = half_form_at(&chars, i, tables) {
            out.push(half);
            i += 2;
        } else if let Some(sentinel) = rakar_at(&chars, i, tables) {
            out.push(sentinel);
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    let ta_rakar: String = [TA, RAKAR].iter().collect();
    out.replace(&ta_rakar, &TA_RAKAR.to_string())
}

/// A consonant followed by virama and a joining character, where the consonant
/// has a one-glyph half form. Any whitespace after the virama keeps it explicit.
fn half_form_at(chars: &[char], i: usize, tables: &PreetiTables) -> Option<char> {
    let c = chars[i];
    if c == RA || chars.get(i + 1) != Some(&VIRAMA) {
        return None;
    }
    let following = *chars.get(i + 2)?;
    if following == RA || following.is_whitespace() || tables.half_form_breakers.contains(&following) {
        return None;
    }
    tables.half_form(c)
}

/// Virama between a non-र character and र.
fn rakar_at(chars: &[char], i: usize, tables: &PreetiTables) -> Option<char> {
    if chars[i] != VIRAMA || chars.get(i + 1) != Some(&RA) {
        return None;
    }
    let previous = *chars.get(i.checked_sub(1)?)?;
    if previous == RA {
        return None;
    }
    if tables.eyelash_rakar_bases.contains(&previous) {
        Some(EYELASH_RAKAR)
    } else {
        Some(RAKAR)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tables::PREETI_TABLES;
    use super::*;

    fn norm(text: &str) -> String {
        normalize(text, &PREETI_TABLES)
    }

    #[test]
    fn half_forms_collapse() {
        assert_eq!(norm("न्त"), "Gत");
        assert_eq!(norm("स्क"), ":क");
        assert_eq!(norm("क्ष"), "Sष");
    }

    #[test]
    fn half_form_needs_a_joining_character() {
        // word-final virama, or virama before a space, danda or comma, stays as is
        assert_eq!(norm("न्"), "न्");
        assert_eq!(norm("न् क"), "न् क");
        assert_eq!(norm("न्।"), "न्।");
        assert_eq!(norm("न्,"), "न्,");
    }

    #[test]
    fn any_whitespace_after_virama_blocks_the_half_form() {
        assert_eq!(norm("भन्\nक"), "भन्\nक");
        assert_eq!(norm("भन्\tक"), "भन्\tक");
        assert_eq!(norm("भन्\r\nक"), "भन्\r\nक");
        assert_eq!(norm("भन्\u{a0}क"), "भन्\u{a0}क");
    }

    #[test]
    fn consonants_without_single_glyph_half_form_are_kept() {
        assert_eq!(norm("द्ध"), "द्ध");
        assert_eq!(norm("ण्ड"), "ण्ड");
    }

    #[test]
    fn rakar_becomes_sentinel() {
        assert_eq!(norm("क्रम"), "क|म");
        assert_eq!(norm("ट्रक"), "ट«क");
        assert_eq!(norm("ड्र"), "ड«");
    }

    #[test]
    fn ta_rakar_folds() {
        assert_eq!(norm("पत्र"), "पq");
    }

    #[test]
    fn leading_virama_and_double_ra_are_untouched() {
        assert_eq!(norm("्र"), "्र");
        assert_eq!(norm("र्र"), "र्र");
    }
}
