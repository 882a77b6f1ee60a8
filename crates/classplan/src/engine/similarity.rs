//! Jaro-Winkler similarity for matching instructor names.
//!
//! Catalog and rating exports spell the same person differently
//! ("Smith, J." vs "John A Smith", missing middle names, typos), so names are
//! compared fuzzily rather than for equality.

/// Winkler prefix scaling factor.
const PREFIX_SCALE: f64 = 0.1;

/// Longest common prefix rewarded by the Winkler boost.
const MAX_PREFIX: usize = 4;

/// Jaro scores at or below this get no prefix boost.
const BOOST_THRESHOLD: f64 = 0.7;

/// Returns the Jaro-Winkler similarity of `a` and `b` in `[0, 1]`.
///
/// Case-insensitively equal strings score 1. An empty string scores 0
/// against anything, including another empty string. Character matching is
/// case sensitive; the prefix boost is not.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.to_lowercase() == b.to_lowercase() {
        return 1.0;
    }

    let jaro = strsim::jaro(a, b);
    if jaro <= BOOST_THRESHOLD {
        return jaro;
    }

    let prefix = common_prefix_len(a, b);
    (jaro + prefix as f64 * PREFIX_SCALE * (1.0 - jaro)).min(1.0)
}

/// Case-insensitive common prefix, capped at [`MAX_PREFIX`] characters.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x.to_lowercase().eq(y.to_lowercase()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_equal_ignoring_case() {
        assert_eq!(similarity("Jane Doe", "jane doe"), 1.0);
        assert_eq!(similarity("X", "x"), 1.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("anything", ""), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn test_textbook_values() {
        // Standard Jaro-Winkler reference pairs
        assert!(approx(similarity("MARTHA", "MARHTA"), 0.961));
        assert!(approx(similarity("DWAYNE", "DUANE"), 0.84));
        assert!(approx(similarity("DIXON", "DICKSONX"), 0.813));
    }

    #[test]
    fn test_no_common_characters() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_no_boost_below_threshold() {
        // jaro("ab", "ax") = (1/2 + 1/2 + 1) / 3 = 0.667, no prefix boost
        assert!(approx(similarity("ab", "ax"), 2.0 / 3.0));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        // 'e' does not match 'E', so the mixed-case pair loses a match
        let same_case = similarity("JOHN SMITHE", "JOHN SMITHEx");
        let mixed_case = similarity("JOHN SMITHe", "JOHN SMITHEx");
        assert!(approx(same_case, 0.9833));
        assert!(approx(mixed_case, 0.9485));
        assert!(mixed_case < same_case);
        assert_eq!(similarity("JOHN SMITH", "john smith"), 1.0);
    }

    #[test]
    fn test_prefix_boost_ignores_case() {
        // 'J' and 'j' do not match, but the four-character prefix still counts
        let plain = strsim::jaro("Jane Doe", "jane Doex");
        assert!(approx(plain, 0.8843));
        assert!(approx(similarity("Jane Doe", "jane Doex"), plain + 0.4 * (1.0 - plain)));
    }

    #[test]
    fn test_instructor_name_against_full_name() {
        // An empty middle name leaves a double space; still a confident match
        assert!(similarity("Jane Doe", "Jane  Doe") > 0.90);
        assert!(similarity("Jane Doe", "John  Smith") < 0.90);
    }

    proptest! {
        #[test]
        fn prop_similarity_bounded(a in ".{0,24}", b in ".{0,24}") {
            let s = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn prop_self_similarity_is_one(a in ".{1,24}") {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }
    }
}
