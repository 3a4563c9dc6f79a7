#![forbid(unsafe_code)]

//! Character-class catalog.
//!
//! Fixed codepoint-range tables and the predicates the width cascade is
//! built from. Everything here is immutable data; lookups are binary
//! searches over sorted inclusive ranges.
//!
//! # Example
//! ```
//! use grapheme_width::catalog::{CharClass, class_of};
//!
//! assert!(class_of('\u{200D}').contains(CharClass::ZERO_WIDTH));
//! assert!(class_of('文').contains(CharClass::EAST_ASIAN_WIDE));
//! // Halfwidth Katakana lives in the fullwidth block but stays narrow.
//! assert!(!class_of('ﾜ').contains(CharClass::EAST_ASIAN_WIDE));
//! ```

use bitflags::bitflags;
use unicode_normalization::char::is_combining_mark;

/// An ordered set of inclusive `[low, high]` codepoint intervals.
///
/// Intervals must be sorted by `low` and must not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSet {
    ranges: &'static [(u32, u32)],
}

impl RangeSet {
    /// Wrap a sorted, non-overlapping interval table.
    #[must_use]
    pub const fn new(ranges: &'static [(u32, u32)]) -> Self {
        Self { ranges }
    }

    /// Does `c` fall inside any interval?
    #[inline]
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        self.ranges
            .binary_search_by(|&(low, high)| {
                if high < cp {
                    std::cmp::Ordering::Less
                } else if low > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// The raw interval table.
    #[must_use]
    pub const fn ranges(&self) -> &'static [(u32, u32)] {
        self.ranges
    }
}

// ── Range tables ────────────────────────────────────────────────────────

/// Zero-width and format characters: ZWSP, ZWNJ, ZWJ, BOM, the word
/// joiner and invisible operator block, CGJ, Arabic letter mark, bidi
/// marks, embeddings and isolates, Mongolian free variation selectors,
/// interlinear annotation characters and the Hangul fillers.
pub const ZERO_WIDTH: RangeSet = RangeSet::new(&[
    (0x034F, 0x034F),
    (0x061C, 0x061C),
    (0x115F, 0x1160),
    (0x180B, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x2069),
    (0x3164, 0x3164),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
]);

/// Combining diacritic blocks counted as marks in addition to the
/// general category.
pub const COMBINING_BLOCKS: RangeSet = RangeSet::new(&[
    (0x0300, 0x036F),
    (0x1AB0, 0x1AFF),
    (0x1DC0, 0x1DFF),
    (0x20D0, 0x20FF),
]);

pub const VARIATION_SELECTORS: RangeSet = RangeSet::new(&[(0xFE0E, 0xFE0F)]);

/// Miscellaneous symbols, dingbats and the supplementary emoji planes.
pub const EMOJI: RangeSet =
    RangeSet::new(&[(0x2600, 0x26FF), (0x2700, 0x27BF), (0x1F000, 0x1FFFF)]);

/// Supplementary-plane pictographs that take part in ZWJ sequences.
pub const PICTOGRAPHS: RangeSet = RangeSet::new(&[(0x1F300, 0x1FAFF)]);

/// Broad East-Asian ranges. Includes the halfwidth forms; see [`HALFWIDTH`].
pub const EAST_ASIAN: RangeSet = RangeSet::new(&[
    (0x1100, 0x11FF),
    (0x3000, 0x303F),
    (0x3130, 0x318F),
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xAC00, 0xD7AF),
    (0xF900, 0xFAFF),
    (0xFF00, 0xFFEF),
]);

/// Halfwidth Katakana, halfwidth Hangul and halfwidth symbol variants.
pub const HALFWIDTH: RangeSet = RangeSet::new(&[(0xFF61, 0xFFDC), (0xFFE8, 0xFFEE)]);

pub const REGIONAL_INDICATORS: RangeSet = RangeSet::new(&[(0x1F1E6, 0x1F1FF)]);

pub const TAGS: RangeSet = RangeSet::new(&[(0xE0020, 0xE007F)]);

/// Fitzpatrick modifiers.
pub const SKIN_TONES: RangeSet = RangeSet::new(&[(0x1F3FB, 0x1F3FF)]);

pub const DEVANAGARI: RangeSet = RangeSet::new(&[
    (0x0900, 0x097F),
    (0xA8E0, 0xA8FF),
    (0x11B00, 0x11B5F),
]);

/// Symbols that render as narrow text when followed by VS15.
pub const TEXT_STYLE: RangeSet = RangeSet::new(&[(0x2600, 0x26FF), (0x2700, 0x27BF)]);

/// Symbols that default to a narrow glyph unless VS16 asks for emoji.
pub const TEXT_PRESENTATION: RangeSet =
    RangeSet::new(&[(0x2600, 0x26FF), (0x2700, 0x27BF), (0x1F100, 0x1F1FF)]);

/// Black flag, the introducer of tag-sequence flags.
pub const BLACK_FLAG: char = '\u{1F3F4}';

/// Combining enclosing keycap.
pub const KEYCAP: char = '\u{20E3}';

bitflags! {
    /// Character classes a single codepoint can belong to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharClass: u32 {
        const ZERO_WIDTH         = 1 << 0;
        const MARK               = 1 << 1;
        const VARIATION_SELECTOR = 1 << 2;
        const EMOJI              = 1 << 3;
        const PICTOGRAPH         = 1 << 4;
        const EAST_ASIAN_WIDE    = 1 << 5;
        const REGIONAL_INDICATOR = 1 << 6;
        const BLACK_FLAG         = 1 << 7;
        const TAG                = 1 << 8;
        const SKIN_TONE          = 1 << 9;
        const DEVANAGARI         = 1 << 10;
        const TEXT_STYLE         = 1 << 11;
        const TEXT_PRESENTATION  = 1 << 12;
        const LETTER             = 1 << 13;
        const KEYCAP_BASE        = 1 << 14;
        const ASCII              = 1 << 15;

        /// Anything that forces the cascade past the direct reference lookup.
        const SPECIAL = Self::ZERO_WIDTH.bits()
            | Self::MARK.bits()
            | Self::VARIATION_SELECTOR.bits()
            | Self::EMOJI.bits()
            | Self::EAST_ASIAN_WIDE.bits();
    }
}

/// Is `c` a combining mark (general category M or a combining block)?
#[inline]
#[must_use]
pub fn is_mark(c: char) -> bool {
    is_combining_mark(c) || COMBINING_BLOCKS.contains(c)
}

/// Is `c` East-Asian wide, with the halfwidth forms carved out?
#[inline]
#[must_use]
pub fn is_east_asian_wide(c: char) -> bool {
    EAST_ASIAN.contains(c) && !HALFWIDTH.contains(c)
}

/// All classes `c` belongs to.
#[must_use]
pub fn class_of(c: char) -> CharClass {
    let mut class = CharClass::empty();

    if c.is_ascii() {
        class |= CharClass::ASCII;
        if c.is_ascii_alphabetic() {
            class |= CharClass::LETTER;
        }
        if c.is_ascii_digit() || c == '#' || c == '*' {
            class |= CharClass::KEYCAP_BASE;
        }
        return class;
    }

    if ZERO_WIDTH.contains(c) {
        class |= CharClass::ZERO_WIDTH;
    }

    let mark = is_mark(c);
    if mark {
        class |= CharClass::MARK;
    } else if c.is_alphabetic() {
        class |= CharClass::LETTER;
    }

    if VARIATION_SELECTORS.contains(c) {
        class |= CharClass::VARIATION_SELECTOR;
    }
    if is_east_asian_wide(c) {
        class |= CharClass::EAST_ASIAN_WIDE;
    }
    if DEVANAGARI.contains(c) {
        class |= CharClass::DEVANAGARI;
    }
    if TAGS.contains(c) {
        class |= CharClass::TAG;
    }

    if EMOJI.contains(c) {
        class |= CharClass::EMOJI;
        if PICTOGRAPHS.contains(c) {
            class |= CharClass::PICTOGRAPH;
        }
        if TEXT_STYLE.contains(c) {
            class |= CharClass::TEXT_STYLE;
        }
        if TEXT_PRESENTATION.contains(c) {
            class |= CharClass::TEXT_PRESENTATION;
        }
        if REGIONAL_INDICATORS.contains(c) {
            class |= CharClass::REGIONAL_INDICATOR;
        }
        if SKIN_TONES.contains(c) {
            class |= CharClass::SKIN_TONE;
        }
        if c == BLACK_FLAG {
            class |= CharClass::BLACK_FLAG;
        }
    }

    class
}

/// Union of the classes of every codepoint in `text`.
#[must_use]
pub fn classes_of(text: &str) -> CharClass {
    text.chars().fold(CharClass::empty(), |acc, c| acc | class_of(c))
}
