#![forbid(unsafe_code)]

//! Grapheme width classification.
//!
//! A single grapheme cluster is run through an ordered cascade of
//! structural checks. The first rule that fires decides the width; the
//! order below is load-bearing and later rules assume earlier ones
//! declined.
//!
//! | # | Rule | Width |
//! |---|------|-------|
//! | 1 | empty input | 0 |
//! | 2 | single byte | 1 |
//! | 3 | pure ASCII | 1 |
//! | 4 | lone invisible codepoint | 0 |
//! | 5 | ASCII base + zero-width tail | 1 |
//! | 6 | regional-indicator pair or tag flag | 2 |
//! | 7 | Devanagari | 1 |
//! | 8 | NFC when a mark is present | - |
//! | 9 | ZWJ / ZWNJ handling | 1 or 2 |
//! | 10 | variation selectors | 1 or 2 |
//! | 11 | invisible characters | 0, 1 or 2 |
//! | 12 | nothing special: reference width | 1 or 2 |
//! | 13 | letter + marks | 1 |
//! | 14 | skin tone / flag pair in one grapheme | 2 |
//! | 15 | text-presentation symbol | 1 |
//! | 16 | reference width of the visible remainder | 1 or 2 |
//!
//! # Example
//! ```
//! use grapheme_width::{Rule, Width, classify_str, explain};
//!
//! assert_eq!(classify_str("文"), Width::Two);
//! assert_eq!(classify_str("\u{26A0}\u{FE0E}"), Width::One);
//!
//! let why = explain("🇺🇸".as_bytes());
//! assert_eq!(why.rule, Rule::FlagSequence);
//! assert_eq!(why.width.as_usize(), 2);
//! ```

use smallvec::SmallVec;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::catalog::{CharClass, KEYCAP, class_of};
use crate::normalize;
use crate::reference::reference_cells;

const ZWJ: char = '\u{200D}';
const ZWNJ: char = '\u{200C}';
const VS15: char = '\u{FE0E}';
const VS16: char = '\u{FE0F}';

/// Display width of a grapheme cluster, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Width {
    /// Renders nothing.
    #[default]
    Zero = 0,
    /// One cell.
    One = 1,
    /// Two cells (wide).
    Two = 2,
}

impl Width {
    /// Width as a cell count.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// Width from a cell count, saturating at [`Width::Two`].
    #[inline]
    #[must_use]
    pub const fn saturating_from(cells: usize) -> Self {
        match cells {
            0 => Self::Zero,
            1 => Self::One,
            _ => Self::Two,
        }
    }
}

impl From<Width> for usize {
    fn from(width: Width) -> Self {
        width.as_usize()
    }
}

/// The cascade step that decided a width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Empty,
    SingleByte,
    Ascii,
    LoneInvisible,
    AsciiWithJoiners,
    FlagSequence,
    Devanagari,
    /// Pictograph followed only by joiners.
    JoinedPictograph,
    /// One wide character left once joiners are removed.
    JoinedWide,
    /// One narrow character left once joiners are removed.
    JoinedNarrow,
    ZwjSequence,
    TextVariation,
    EmojiVariation,
    WideVariation,
    VariationReference,
    OnlyInvisible,
    LetterMarksInvisible,
    InvisibleWide,
    InvisibleNarrow,
    Reference,
    LetterWithMarks,
    SkinTone,
    RegionalPair,
    TextPresentation,
    Fallback,
}

impl Rule {
    /// Stable name, used in trace output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::SingleByte => "single_byte",
            Self::Ascii => "ascii",
            Self::LoneInvisible => "lone_invisible",
            Self::AsciiWithJoiners => "ascii_with_joiners",
            Self::FlagSequence => "flag_sequence",
            Self::Devanagari => "devanagari",
            Self::JoinedPictograph => "joined_pictograph",
            Self::JoinedWide => "joined_wide",
            Self::JoinedNarrow => "joined_narrow",
            Self::ZwjSequence => "zwj_sequence",
            Self::TextVariation => "text_variation",
            Self::EmojiVariation => "emoji_variation",
            Self::WideVariation => "wide_variation",
            Self::VariationReference => "variation_reference",
            Self::OnlyInvisible => "only_invisible",
            Self::LetterMarksInvisible => "letter_marks_invisible",
            Self::InvisibleWide => "invisible_wide",
            Self::InvisibleNarrow => "invisible_narrow",
            Self::Reference => "reference",
            Self::LetterWithMarks => "letter_with_marks",
            Self::SkinTone => "skin_tone",
            Self::RegionalPair => "regional_pair",
            Self::TextPresentation => "text_presentation",
            Self::Fallback => "fallback",
        }
    }
}

/// A width together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub width: Width,
    pub rule: Rule,
}

impl Classification {
    const fn new(width: Width, rule: Rule) -> Self {
        Self { width, rule }
    }
}

/// Classify one grapheme cluster given as raw bytes.
///
/// Total over all input: malformed UTF-8 is decoded lossily and measured
/// like any other text.
#[inline]
#[must_use]
pub fn classify(cluster: &[u8]) -> Width {
    explain(cluster).width
}

/// Classify one grapheme cluster.
#[inline]
#[must_use]
pub fn classify_str(cluster: &str) -> Width {
    classify(cluster.as_bytes())
}

/// Classify one grapheme cluster and report which rule decided it.
#[must_use]
pub fn explain(cluster: &[u8]) -> Classification {
    let result = cascade(cluster);
    trace!(
        rule = result.rule.as_str(),
        width = result.width.as_usize(),
        bytes = cluster.len(),
        "classified grapheme"
    );
    result
}

/// Count extended grapheme clusters in `text`.
///
/// This is deliberately independent of whatever segmentation produced the
/// cluster being classified; the cascade uses it to confirm that skin-tone
/// and flag patterns really form a single grapheme.
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

fn cascade(bytes: &[u8]) -> Classification {
    match bytes.len() {
        0 => return Classification::new(Width::Zero, Rule::Empty),
        1 => return Classification::new(Width::One, Rule::SingleByte),
        _ => {}
    }
    if bytes.is_ascii() {
        return Classification::new(Width::One, Rule::Ascii);
    }

    let text = String::from_utf8_lossy(bytes);
    let mut cluster = Codepoints::decode(&text);

    if cluster.len() == 1 && cluster.any(CharClass::ZERO_WIDTH) {
        return Classification::new(Width::Zero, Rule::LoneInvisible);
    }
    if cluster.is_ascii_with_joiners() {
        return Classification::new(Width::One, Rule::AsciiWithJoiners);
    }
    if cluster.has_flag_sequence() {
        return Classification::new(Width::Two, Rule::FlagSequence);
    }
    if cluster.any(CharClass::DEVANAGARI) {
        return Classification::new(Width::One, Rule::Devanagari);
    }

    if normalize::may_need_normalization(&cluster.chars) {
        cluster = Codepoints::decode(&normalize::to_nfc(&text));
    }

    if let Some(result) = joiner_rules(&cluster) {
        return result;
    }
    if let Some(result) = variation_rules(&cluster) {
        return result;
    }
    if let Some(result) = invisible_rules(&cluster) {
        return result;
    }

    if !cluster.any(CharClass::SPECIAL) {
        return Classification::new(reference_cells(&cluster.to_text()), Rule::Reference);
    }
    if cluster.is_letter_with_marks() {
        return Classification::new(Width::One, Rule::LetterWithMarks);
    }

    if grapheme_count(&cluster.to_text()) == 1 {
        if cluster.any(CharClass::SKIN_TONE) {
            return Classification::new(Width::Two, Rule::SkinTone);
        }
        if cluster.len() == 2 && cluster.all(CharClass::REGIONAL_INDICATOR) {
            return Classification::new(Width::Two, Rule::RegionalPair);
        }
    }

    if cluster.len() == 1 && cluster.all(CharClass::TEXT_PRESENTATION) && !cluster.has(VS16) {
        return Classification::new(Width::One, Rule::TextPresentation);
    }

    let visible = cluster.without(CharClass::ZERO_WIDTH);
    Classification::new(reference_cells(&visible.to_text()), Rule::Fallback)
}

/// Rule 9: clusters holding ZWJ or ZWNJ.
fn joiner_rules(cluster: &Codepoints) -> Option<Classification> {
    if !cluster.has(ZWJ) && !cluster.has(ZWNJ) {
        return None;
    }

    let residual = cluster.without(CharClass::ZERO_WIDTH);
    if residual.len() == 1 {
        let result = if cluster.is_pictograph_with_joiners() {
            Classification::new(Width::Two, Rule::JoinedPictograph)
        } else if residual.all(CharClass::EAST_ASIAN_WIDE) {
            Classification::new(Width::Two, Rule::JoinedWide)
        } else {
            Classification::new(Width::One, Rule::JoinedNarrow)
        };
        return Some(result);
    }

    if cluster.any(CharClass::PICTOGRAPH) {
        return Some(Classification::new(Width::Two, Rule::ZwjSequence));
    }
    None
}

/// Rule 10: clusters holding VS15 or VS16. Always decides.
fn variation_rules(cluster: &Codepoints) -> Option<Classification> {
    if !cluster.any(CharClass::VARIATION_SELECTOR) {
        return None;
    }

    let base = cluster.without(CharClass::VARIATION_SELECTOR);
    let result = if cluster.has(VS15) && base.len() == 1 && base.all(CharClass::TEXT_STYLE) {
        Classification::new(Width::One, Rule::TextVariation)
    } else if base.any(CharClass::EMOJI) || base.is_keycap() {
        Classification::new(Width::Two, Rule::EmojiVariation)
    } else if base.any(CharClass::EAST_ASIAN_WIDE) {
        Classification::new(Width::Two, Rule::WideVariation)
    } else {
        Classification::new(reference_cells(&base.to_text()), Rule::VariationReference)
    };
    Some(result)
}

/// Rule 11: clusters holding any invisible codepoint.
fn invisible_rules(cluster: &Codepoints) -> Option<Classification> {
    if !cluster.any(CharClass::ZERO_WIDTH) {
        return None;
    }

    let residual = cluster.without(CharClass::ZERO_WIDTH);
    if residual.is_empty() || residual.all(CharClass::MARK) {
        return Some(Classification::new(Width::Zero, Rule::OnlyInvisible));
    }
    if cluster.is_letter_marks_zero_width() {
        return Some(Classification::new(Width::One, Rule::LetterMarksInvisible));
    }
    if residual.len() == 1 {
        let result = if residual.all(CharClass::EAST_ASIAN_WIDE) {
            Classification::new(Width::Two, Rule::InvisibleWide)
        } else {
            Classification::new(Width::One, Rule::InvisibleNarrow)
        };
        return Some(result);
    }
    None
}

/// Decoded codepoints of a cluster with their catalog classes.
#[derive(Debug, Clone, Default)]
struct Codepoints {
    chars: SmallVec<[char; 8]>,
    classes: SmallVec<[CharClass; 8]>,
    union: CharClass,
}

impl Codepoints {
    fn decode(text: &str) -> Self {
        text.chars().collect()
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    fn has(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Does any codepoint carry any of `class`?
    fn any(&self, class: CharClass) -> bool {
        self.union.intersects(class)
    }

    /// Does every codepoint carry all of `class`? True when empty.
    fn all(&self, class: CharClass) -> bool {
        self.classes.iter().all(|c| c.contains(class))
    }

    /// Codepoints carrying none of `class`.
    fn without(&self, class: CharClass) -> Self {
        self.chars
            .iter()
            .zip(&self.classes)
            .filter(|(_, c)| !c.intersects(class))
            .map(|(&ch, _)| ch)
            .collect()
    }

    fn to_text(&self) -> String {
        self.chars.iter().collect()
    }

    fn first_is(&self, class: CharClass) -> bool {
        self.classes.first().is_some_and(|c| c.contains(class))
    }

    /// Does `classes[from..]` split into a non-empty run of `head` followed
    /// by a non-empty run of `tail`?
    fn runs(&self, from: usize, head: CharClass, tail: CharClass) -> bool {
        let rest = &self.classes[from.min(self.classes.len())..];
        if rest.len() < 2 {
            return false;
        }
        let leading = rest.iter().take_while(|c| c.contains(head)).count();
        let trailing = rest.iter().rev().take_while(|c| c.contains(tail)).count();
        leading >= 1 && trailing >= 1 && leading + trailing >= rest.len()
    }

    /// ASCII base followed by one or more zero-width characters.
    fn is_ascii_with_joiners(&self) -> bool {
        self.len() >= 2
            && self.first_is(CharClass::ASCII)
            && self.tail_all(CharClass::ZERO_WIDTH)
    }

    /// Pictograph followed by one or more zero-width characters.
    fn is_pictograph_with_joiners(&self) -> bool {
        self.len() >= 2
            && self.first_is(CharClass::PICTOGRAPH)
            && self.tail_all(CharClass::ZERO_WIDTH)
    }

    /// Letter followed by one or more marks.
    fn is_letter_with_marks(&self) -> bool {
        self.len() >= 2 && self.first_is(CharClass::LETTER) && self.tail_all(CharClass::MARK)
    }

    /// Letter, one or more marks, then one or more zero-width characters.
    fn is_letter_marks_zero_width(&self) -> bool {
        self.first_is(CharClass::LETTER) && self.runs(1, CharClass::MARK, CharClass::ZERO_WIDTH)
    }

    /// Two adjacent regional indicators, or a black flag followed by a tag.
    fn has_flag_sequence(&self) -> bool {
        self.classes.windows(2).any(|pair| {
            (pair[0].contains(CharClass::REGIONAL_INDICATOR)
                && pair[1].contains(CharClass::REGIONAL_INDICATOR))
                || (pair[0].contains(CharClass::BLACK_FLAG) && pair[1].contains(CharClass::TAG))
        })
    }

    /// Keycap base followed by the enclosing keycap mark.
    fn is_keycap(&self) -> bool {
        self.len() == 2 && self.first_is(CharClass::KEYCAP_BASE) && self.chars[1] == KEYCAP
    }

    fn tail_all(&self, class: CharClass) -> bool {
        self.classes[1..].iter().all(|c| c.contains(class))
    }
}

impl FromIterator<char> for Codepoints {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut decoded = Self::default();
        for ch in iter {
            let class = class_of(ch);
            decoded.union |= class;
            decoded.chars.push(ch);
            decoded.classes.push(class);
        }
        decoded
    }
}
