#![forbid(unsafe_code)]

//! Baseline reference width.
//!
//! A plain per-codepoint wcwidth with no cluster heuristics, backed by
//! `unicode-width`. The cascade only reaches for it once every structural
//! rule has declined, and always through [`clamp_reference`].

use unicode_width::UnicodeWidthChar;

use crate::classify::Width;

/// Sum of the per-codepoint widths of `text`.
///
/// Returns `None` when any codepoint is not printable (a control
/// character), mirroring `wcswidth` returning `-1`.
#[must_use]
pub fn reference_width(text: &str) -> Option<usize> {
    text.chars()
        .try_fold(0usize, |total, c| c.width().map(|w| total + w))
}

/// Clamp a reference result into a cluster width.
///
/// A cluster that reached the reference lookup is visible, so a missing
/// or zero result becomes one cell. Anything wider than two cells (a
/// multi-codepoint remainder) is capped at two.
#[inline]
#[must_use]
pub const fn clamp_reference(width: Option<usize>) -> Width {
    match width {
        None | Some(0) | Some(1) => Width::One,
        Some(_) => Width::Two,
    }
}

/// Measure `text` with the reference function and clamp the result.
#[inline]
#[must_use]
pub fn reference_cells(text: &str) -> Width {
    clamp_reference(reference_width(text))
}
