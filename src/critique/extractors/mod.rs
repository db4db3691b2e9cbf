// Extractors - deterministic text-to-structure engines

pub mod harmony;
pub mod metadata;
pub mod perspectives;
pub mod visual;

pub use harmony::{
    ColorHarmony, ColorScheme, Intensity, StyleRelationship, Temperature, VisualComparison,
    analyze_color_harmony, compare_visual_elements,
};
pub use metadata::{ArtisticElements, MetadataExtractor};
pub use perspectives::PerspectiveSegmenter;
pub use visual::{TechnicalDetails, VisualExtractor};

/// Sentence-like segments split on terminal punctuation, trimmed, empties dropped
pub(crate) fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// First sentence containing any of the keywords (case-insensitive substring)
pub(crate) fn first_sentence_with<S: AsRef<str>>(text: &str, keywords: &[S]) -> Option<String> {
    sentences(text)
        .find(|sentence| {
            let lower = sentence.to_lowercase();
            keywords.iter().any(|k| lower.contains(k.as_ref()))
        })
        .map(str::to_string)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word search in already-lowercased text
pub(crate) fn contains_word(haystack: &str, word: &str) -> bool {
    find_bounded(haystack, word, true)
}

/// Search for a word start in already-lowercased text; the match may run into a longer word
pub(crate) fn contains_word_prefix(haystack: &str, word: &str) -> bool {
    find_bounded(haystack, word, false)
}

fn find_bounded(haystack: &str, word: &str, bound_end: bool) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack.match_indices(word).any(|(start, matched)| {
        let before_ok = haystack[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
        let after_ok = !bound_end
            || haystack[start + matched.len()..]
                .chars()
                .next()
                .is_none_or(|c| !is_word_char(c));
        before_ok && after_ok
    })
}

/// Uppercase the first letter of each whitespace- or hyphen-separated word
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else if c.is_whitespace() || c == '-' {
            out.push(c);
            at_word_start = true;
        } else {
            out.extend(c.to_lowercase());
            at_word_start = false;
        }
    }
    out
}
