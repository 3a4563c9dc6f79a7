#![forbid(unsafe_code)]

//! NFC normalization adapter.
//!
//! Decomposed Latin (`e` + U+0301) is folded into a single precomposed
//! codepoint before the single-character rules run. Normalization is only
//! attempted when a cheap scan finds a combining mark.

use std::borrow::Cow;

use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

use crate::catalog::is_mark;

/// Could `chars` change under NFC? Only clusters carrying a mark can.
#[inline]
#[must_use]
pub fn may_need_normalization(chars: &[char]) -> bool {
    chars.iter().any(|&c| is_mark(c))
}

/// Canonically compose `text`, borrowing when it is already NFC.
#[must_use]
pub fn to_nfc(text: &str) -> Cow<'_, str> {
    if is_nfc_quick(text.chars()) == IsNormalized::Yes {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.nfc().collect())
    }
}
