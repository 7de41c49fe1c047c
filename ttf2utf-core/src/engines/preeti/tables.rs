//! Constant glyph data for the Preeti layout.
//!
//! Everything the Preeti transcoder consults lives in one `PreetiTables` value,
//! built once and borrowed by every transcoder instance.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const VIRAMA: char = '्';
pub const SHORT_I: char = 'ि';
pub const RA: char = 'र';
pub const TA: char = 'त';
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Normalisation sentinel for a consonant followed by virama + र.
pub const RAKAR: char = '|';
/// Rakar sentinel for ट/ठ/ड, which take the eyelash-shaped hook.
pub const EYELASH_RAKAR: char = '«';
/// Preeti glyph for त्र, replacing `त` + rakar after normalisation.
pub const TA_RAKAR: char = 'q';
/// Preeti glyph for the reph drawn above a cluster.
pub const REPH: char = '{';
/// Preeti glyph for the short-i matra, drawn left of its consonant.
pub const SHORT_I_GLYPH: char = 'l';

#[derive(Debug)]
pub struct PreetiTables {
    /// Unicode character to Preeti glyph sequence.
    pub glyphs: HashMap<char, &'static str>,
    /// Glyphs whose upper-case form is the consonant's half form.
    pub shiftable_glyphs: &'static [char],
    /// Half forms that are not a case shift.
    pub half_form_overrides: &'static [(char, char)],
    /// Characters after virama that prevent a half form, besides whitespace.
    pub half_form_breakers: &'static [char],
    /// Consonants taking the eyelash rakar.
    pub eyelash_rakar_bases: &'static [char],
    /// Half-form glyphs that can precede a consonant + short-i.
    pub half_form_glyphs: &'static [char],
    /// Half-form glyphs that can precede a rakar cluster + short-i.
    pub rakar_half_form_glyphs: &'static [char],
    /// Vowel signs written before the reph glyph.
    pub reph_vowel_signs: &'static [char],
    /// Whole-string ligature folds, applied in order after emission.
    pub ligatures: &'static [(&'static str, &'static str)],
}

impl PreetiTables {
    /// Preeti glyph(s) for `c`, if the layout has one.
    pub fn glyph(&self, c: char) -> Option<&'static str> {
        self.glyphs.get(&c).copied()
    }

    /// Appends the glyph for `c`, or `c` itself when unmapped.
    pub fn push_glyph(&self, out: &mut String, c: char) {
        match self.glyph(c) {
            Some(g) => out.push_str(g),
            None => out.push(c),
        }
    }

    /// The single-glyph half form of consonant `c`, if it has one.
    pub fn half_form(&self, c: char) -> Option<char> {
        if let Some(&(_, half)) = self.half_form_overrides.iter().find(|(base, _)| *base == c) {
            return Some(half);
        }
        let mut glyph = self.glyph(c)?.chars();
        match (glyph.next(), glyph.next()) {
            (Some(g), None) if self.shiftable_glyphs.contains(&g) => Some(g.to_ascii_uppercase()),
            _ => None,
        }
    }
}

static GLYPHS: &[(char, &str)] = &[
    ('अ', "c"),
    ('आ', "cf"),
    ('इ', "O"),
    ('ई', "O{"),
    ('उ', "p"),
    ('ऊ', "pm"),
    ('ए', "P"),
    ('ओ', "cf]"),
    ('औ', "cf}"),
    ('ा', "f"),
    ('ि', "l"),
    ('ी', "L"),
    ('ु', "'"),
    ('ू', "\""),
    ('ृ', "["),
    ('े', "]"),
    ('ै', "}"),
    ('ो', "f]"),
    ('ौ', "f}"),
    ('ं', "+"),
    ('ँ', "F"),
    ('्', "\\"),
    ('क', "s"),
    ('ख', "v"),
    ('ग', "u"),
    ('घ', "3"),
    ('ङ', "ª"),
    ('च', "r"),
    ('छ', "5"),
    ('ज', "h"),
    ('झ', "´"),
    ('ञ', "`"),
    ('ट', "6"),
    ('ठ', "7"),
    ('ड', "8"),
    ('ढ', "9"),
    ('ण', "0f"),
    ('त', "t"),
    ('थ', "y"),
    ('द', "b"),
    ('ध', "w"),
    ('न', "g"),
    ('प', "k"),
    ('फ', "km"),
    ('ब', "a"),
    ('भ', "e"),
    ('म', "d"),
    ('य', "o"),
    ('र', "/"),
    ('ल', "n"),
    ('व', "j"),
    ('श', "z"),
    ('ष', "if"),
    ('स', ";"),
    ('ह', "x"),
    ('१', "!"),
    ('२', "@"),
    ('३', "#"),
    ('४', "$"),
    ('५', "%"),
    ('६', "^"),
    ('७', "&"),
    ('८', "*"),
    ('९', "("),
    ('०', ")"),
    ('।', "."),
    ('-', " "),
    ('(', "-"),
    (')', "_"),
];

pub static PREETI_TABLES: Lazy<PreetiTables> = Lazy::new(|| PreetiTables {
    glyphs: GLYPHS.iter().copied().collect(),
    shiftable_glyphs: &[
        'w', 'e', 'r', 't', 'y', 'u', 'x', 'a', 's', 'd', 'g', 'h', 'j', 'k', 'z', 'v', 'n',
    ],
    half_form_overrides: &[('स', ':'), ('ष', 'i')],
    half_form_breakers: &['।', ','],
    eyelash_rakar_bases: &['ट', 'ठ', 'ड'],
    half_form_glyphs: &[
        'W', 'E', 'R', 'T', 'Y', 'U', 'X', 'A', 'S', 'D', 'G', 'H', 'J', 'K', ':', 'Z', 'V', 'N',
    ],
    rakar_half_form_glyphs: &[
        'W', 'E', 'R', 'T', 'Y', 'U', 'X', 'A', 'S', 'D', 'G', 'H', 'J', 'K', ':', 'Z', 'V', 'N', 'I', 'i',
    ],
    reph_vowel_signs: &['ा', 'ो', 'ौ', 'े', 'ै', 'ी'],
    ligatures: &[
        ("Si", "I"),      // क्ष
        ("H`", "1"),      // ज्ञ
        ("b\\w", "4"),    // द्ध
        ("z|", ">"),      // श्र
        ("/'", "?"),      // रु
        ("/\"", "¿"),     // रू
        ("Tt", "Q"),      // त्त
        ("b\\lj", "lå"),  // द्वि
        ("b\\j", "å"),    // द्व
        ("0f\\", "0"),    // ण्
        ("`\\", "~"),     // ञ्
    ],
});
