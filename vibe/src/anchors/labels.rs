//! Anchor label sets.

use std::collections::HashSet;

/// Anchors used when `VIBE_ANCHORS` is not set.
pub const DEFAULT_ANCHORS: &[&str] = &[
    "cozy",
    "chaotic",
    "nostalgic",
    "dreamy",
    "edgy",
    "wholesome",
    "mysterious",
    "energetic",
    "melancholic",
    "romantic",
    "luxurious",
    "playful",
];

/// Trims labels, drops blanks and repeats (first occurrence wins, case-insensitive).
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter_map(|l| {
            let l = l.as_ref().trim();
            if l.is_empty() || !seen.insert(l.to_lowercase()) {
                None
            } else {
                Some(l.to_string())
            }
        })
        .collect()
}

/// Parses a comma-separated label list, e.g. `"cozy, edgy,,dreamy"`.
pub fn parse_anchor_labels(raw: &str) -> Vec<String> {
    normalize_labels(raw.split(','))
}
