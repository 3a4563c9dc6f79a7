//! Property-based invariant tests for grapheme width classification.
//!
//! These tests verify invariants that must hold for any input:
//!
//! 1. Classification never panics on arbitrary bytes and stays within 0..=2.
//! 2. Classification is deterministic.
//! 3. Pure ASCII is always one cell.
//! 4. Clusters made only of zero-width characters are zero cells.
//! 5. Only the empty cluster and invisible clusters are zero cells.
//! 6. A cache never changes an answer, however often it clears.
//! 7. A cache never holds more entries than its ceiling.

use grapheme_width::catalog::{CharClass, ZERO_WIDTH, class_of};
use grapheme_width::{CacheConfig, Width, WidthCache, classify, classify_str, explain};
use proptest::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

// ── Helpers ─────────────────────────────────────────────────────────────

fn zero_width_chars() -> Vec<char> {
    ZERO_WIDTH
        .ranges()
        .iter()
        .flat_map(|&(lo, hi)| lo..=hi)
        .filter_map(char::from_u32)
        .collect()
}

fn zero_width_cluster() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::sample::select(zero_width_chars()), 1..6)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Short clusters drawn from a pool that hits most of the cascade.
fn cluster_strategy() -> impl Strategy<Value = String> {
    let pool = prop::sample::select(vec![
        'a', 'Z', '1', '#', 'e', '\u{0301}', '\u{0308}', '\u{034F}', '\u{200B}', '\u{200C}',
        '\u{200D}', '\u{FE0E}', '\u{FE0F}', '\u{20E3}', '\u{6587}', '\u{FF9C}', '\u{FF21}',
        '\u{2600}', '\u{26A0}', '\u{2764}', '\u{1F44D}', '\u{1F3FB}', '\u{1F468}', '\u{1F1FA}',
        '\u{1F1F8}', '\u{1F3F4}', '\u{E0067}', '\u{E007F}', '\u{0915}', '\u{094D}', '\u{05D0}',
    ]);
    proptest::collection::vec(pool, 1..6).prop_map(|chars| chars.into_iter().collect())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Total over arbitrary bytes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classify_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let width = classify(&bytes).as_usize();
        prop_assert!(width <= 2, "width {} out of range for {:?}", width, bytes);
    }

    #[test]
    fn nonempty_bytes_rarely_zero(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        // Arbitrary bytes are zero cells only when every decoded codepoint
        // is invisible.
        if classify(&bytes) == Width::Zero {
            let text = String::from_utf8_lossy(&bytes);
            prop_assert!(
                text.chars().all(|c| class_of(c).intersects(CharClass::ZERO_WIDTH | CharClass::MARK)),
                "visible bytes measured as zero: {:?}",
                bytes
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classify_deterministic(cluster in cluster_strategy()) {
        prop_assert_eq!(explain(cluster.as_bytes()), explain(cluster.as_bytes()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. ASCII is one cell
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ascii_is_one_cell(bytes in proptest::collection::vec(0u8..0x80, 1..64)) {
        prop_assert_eq!(classify(&bytes), Width::One);
    }

    #[test]
    fn any_single_byte_is_one_cell(byte in any::<u8>()) {
        prop_assert_eq!(classify(&[byte]), Width::One);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Invisible clusters are zero cells
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zero_width_only_is_zero(cluster in zero_width_cluster()) {
        prop_assert_eq!(
            classify_str(&cluster),
            Width::Zero,
            "{:?} measured as visible",
            cluster.escape_unicode().to_string()
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Zero only for empty or invisible clusters
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn graphemes_of_text_stay_in_range(text in "\\PC{0,24}") {
        for grapheme in text.graphemes(true) {
            let width = classify_str(grapheme);
            if width == Width::Zero {
                prop_assert!(
                    grapheme.chars().all(|c| class_of(c).intersects(CharClass::ZERO_WIDTH | CharClass::MARK)),
                    "visible grapheme {:?} measured as zero",
                    grapheme.escape_unicode().to_string()
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Cache transparency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cache_is_transparent(
        clusters in proptest::collection::vec(cluster_strategy(), 1..40),
        max_entries in 1usize..8,
    ) {
        let mut cache = WidthCache::new(CacheConfig::new(max_entries).unwrap());
        for cluster in &clusters {
            prop_assert_eq!(
                cache.get_or_classify(cluster.as_bytes()),
                classify_str(cluster)
            );
        }
        cache.clear();
        for cluster in clusters.iter().rev() {
            prop_assert_eq!(
                cache.get_or_classify(cluster.as_bytes()),
                classify_str(cluster)
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Cache bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cache_never_exceeds_ceiling(
        clusters in proptest::collection::vec(cluster_strategy(), 1..60),
        max_entries in 1usize..8,
    ) {
        let mut cache = WidthCache::new(CacheConfig::new(max_entries).unwrap());
        for cluster in &clusters {
            cache.get_or_classify(cluster.as_bytes());
            prop_assert!(
                cache.len() <= max_entries,
                "cache holds {} entries, ceiling {}",
                cache.len(),
                max_entries
            );
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, clusters.len() as u64);
    }
}
