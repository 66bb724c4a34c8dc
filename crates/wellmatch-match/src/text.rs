//! String primitives shared by the normalizer and the scorer.

use rapidfuzz::distance::levenshtein;

/// Classic edit distance: insertions, deletions and substitutions cost 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein::distance(a.chars(), b.chars())
}

/// Normalized Levenshtein similarity in `[0, 1]`.
///
/// `(max_len - distance) / max_len`, with two empty strings defined as 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b).min(longest);
    (longest - distance) as f64 / longest as f64
}

/// True when `needle` occurs in `haystack` delimited by string edges or
/// non-alphanumeric characters.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
