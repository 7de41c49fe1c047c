//! Second pass of the Preeti transcoder: walk the normalised text and emit glyphs.
//!
//! At each position the emission rules are tried in table order; the first rule
//! that matches decides the output and how many characters it consumed. The last
//! rule always matches, so the walk always advances.

use super::tables::{PreetiTables, BYTE_ORDER_MARK, EYELASH_RAKAR, RA, RAKAR, REPH, SHORT_I, SHORT_I_GLYPH, VIRAMA};

/// A read-only view of the normalised text at the current position.
pub struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
    tables: &'a PreetiTables,
}

impl Cursor<'_> {
    fn current(&self) -> char {
        self.chars[self.pos]
    }

    /// The character `offset` positions ahead; `None` past the end.
    fn ahead(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }
}

/// Glyphs emitted by a rule and the number of characters it consumed.
pub type Emission = (String, usize);

/// A named emission rule.
pub struct EmissionRule {
    pub name: &'static str,
    pub apply: fn(&Cursor<'_>) -> Option<Emission>,
}

/// Emission rules in priority order.
pub static EMISSION_RULES: &[EmissionRule] = &[
    EmissionRule { name: "byte-order-mark", apply: byte_order_mark },
    EmissionRule { name: "short-i", apply: short_i },
    EmissionRule { name: "rakar-short-i", apply: rakar_short_i },
    EmissionRule { name: "half-form-short-i", apply: half_form_short_i },
    EmissionRule { name: "reph", apply: reph },
    EmissionRule { name: "half-form-rakar-short-i", apply: half_form_rakar_short_i },
    EmissionRule { name: "single-glyph", apply: single_glyph },
];

fn byte_order_mark(cur: &Cursor<'_>) -> Option<Emission> {
    (cur.current() == BYTE_ORDER_MARK).then(|| (String::new(), 1))
}

fn is_rakar(c: char) -> bool {
    c == RAKAR || c == EYELASH_RAKAR
}

/// `X ि` is written `l X`. A rakar sentinel is never `X`; its consonant is.
fn short_i(cur: &Cursor<'_>) -> Option<Emission> {
    if cur.ahead(1) != Some(SHORT_I) || is_rakar(cur.current()) {
        return None;
    }
    let mut out = String::from(SHORT_I_GLYPH);
    cur.tables.push_glyph(&mut out, cur.current());
    Some((out, 2))
}

/// `X | ि` is written `l X |`.
fn rakar_short_i(cur: &Cursor<'_>) -> Option<Emission> {
    let sentinel = cur.ahead(1)?;
    if !is_rakar(sentinel) || cur.ahead(2) != Some(SHORT_I) {
        return None;
    }
    let mut out = String::from(SHORT_I_GLYPH);
    cur.tables.push_glyph(&mut out, cur.current());
    out.push(sentinel);
    Some((out, 3))
}

/// `H X ि`, where `H` is a half-form glyph, is written `l H X`.
fn half_form_short_i(cur: &Cursor<'_>) -> Option<Emission> {
    if cur.ahead(2) != Some(SHORT_I) || !cur.tables.half_form_glyphs.contains(&cur.current()) {
        return None;
    }
    let consonant = cur.ahead(1)?;
    let mut out = String::from(SHORT_I_GLYPH);
    out.push(cur.current());
    cur.tables.push_glyph(&mut out, consonant);
    Some((out, 3))
}

/// `र ् X [V]` is written with the reph glyph after the cluster it sits on.
fn reph(cur: &Cursor<'_>) -> Option<Emission> {
    if cur.current() != RA || cur.ahead(1) != Some(VIRAMA) {
        return None;
    }
    let consonant = cur.ahead(2)?;
    let mut out = String::new();
    match cur.ahead(3) {
        Some(sign) if cur.tables.reph_vowel_signs.contains(&sign) => {
            cur.tables.push_glyph(&mut out, consonant);
            cur.tables.push_glyph(&mut out, sign);
            out.push(REPH);
            Some((out, 4))
        }
        Some(SHORT_I) => {
            out.push(SHORT_I_GLYPH);
            cur.tables.push_glyph(&mut out, consonant);
            out.push(REPH);
            Some((out, 4))
        }
        _ => {
            cur.tables.push_glyph(&mut out, consonant);
            out.push(REPH);
            Some((out, 3))
        }
    }
}

/// `H X | ि` (or with the eyelash rakar) is written `l H X |`.
fn half_form_rakar_short_i(cur: &Cursor<'_>) -> Option<Emission> {
    if cur.ahead(3) != Some(SHORT_I) || !cur.tables.rakar_half_form_glyphs.contains(&cur.current()) {
        return None;
    }
    let sentinel = cur.ahead(2)?;
    if !is_rakar(sentinel) {
        return None;
    }
    let consonant = cur.ahead(1)?;
    let mut out = String::from(SHORT_I_GLYPH);
    out.push(cur.current());
    cur.tables.push_glyph(&mut out, consonant);
    out.push(sentinel);
    Some((out, 4))
}

fn single_glyph(cur: &Cursor<'_>) -> Option<Emission> {
    let mut out = String::new();
    cur.tables.push_glyph(&mut out, cur.current());
    Some((out, 1))
}

/// Emits Preeti glyphs for normalised text and applies the ligature folds.
pub fn emit(normalized: &str, tables: &PreetiTables) -> String {
    let chars: Vec<char> = normalized.chars().collect();
    let mut out = String::with_capacity(normalized.len());
    let mut pos = 0;

    while pos < chars.len() {
        let cursor = Cursor { chars: &chars, pos, tables };
        let (glyphs, consumed) = EMISSION_RULES
            .iter()
            .find_map(|rule| (rule.apply)(&cursor))
            .unwrap_or_else(|| (chars[pos].to_string(), 1));
        out.push_str(&glyphs);
        pos += consumed.max(1);
    }

    fold_ligatures(out, tables)
}

/// Applies the ligature table over the whole string, in order.
pub fn fold_ligatures(mut text: String, tables: &PreetiTables) -> String {
    for (sequence, ligature) in tables.ligatures {
        if text.contains(sequence) {
            text = text.replace(sequence, ligature);
        }
    }
    text
}
