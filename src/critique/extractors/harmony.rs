// Color harmony analysis and cross-artwork visual comparison

use crate::critique::types::VisualElements;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const WARM: &[&str] = &["red", "orange", "yellow", "brown", "gold"];
const COOL: &[&str] = &["blue", "green", "purple", "silver"];
const HIGH_INTENSITY: &[&str] = &["red", "blue", "yellow", "orange", "purple", "green"];
const LOW_INTENSITY: &[&str] = &["brown", "gray", "grey", "beige", "cream"];

const COMPLEMENTARY_PAIRS: &[[&str; 2]] =
    &[["red", "green"], ["blue", "orange"], ["yellow", "purple"]];
const ANALOGOUS_GROUPS: &[[&str; 3]] = &[
    ["red", "orange", "yellow"],
    ["blue", "green", "purple"],
    ["yellow", "green", "blue"],
];
const TRIADS: &[[&str; 3]] = &[["red", "blue", "yellow"], ["orange", "green", "purple"]];

// Ignored when measuring compositional overlap
const TRIVIAL_WORDS: &[&str] = &[
    "the", "and", "with", "from", "into", "onto", "that", "this", "its", "are", "for", "his",
    "her", "their", "which", "where", "while",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Warm,
    Cool,
    Balanced,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Vibrant,
    Muted,
    Mixed,
}

/// Scheme labels; several may apply to one palette
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Monochromatic,
    Complementary,
    Analogous,
    Triadic,
    Custom,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Monochromatic => "monochromatic",
            ColorScheme::Complementary => "complementary",
            ColorScheme::Analogous => "analogous",
            ColorScheme::Triadic => "triadic",
            ColorScheme::Custom => "custom",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorHarmony {
    pub dominant_colors: Vec<String>,
    pub color_count: usize,
    pub color_temperature: Temperature,
    pub color_intensity: Intensity,
    pub potential_schemes: Vec<ColorScheme>,
}

/// Harmony analysis of a palette; `None` for an empty palette
pub fn analyze_color_harmony<S: AsRef<str>>(colors: &[S]) -> Option<ColorHarmony> {
    if colors.is_empty() {
        return None;
    }
    let colors: Vec<&str> = colors.iter().map(|c| c.as_ref()).collect();

    Some(ColorHarmony {
        dominant_colors: colors.iter().take(3).map(|c| c.to_string()).collect(),
        color_count: colors.len(),
        color_temperature: assess_temperature(&colors),
        color_intensity: assess_intensity(&colors),
        potential_schemes: identify_schemes(&colors),
    })
}

fn count_in(colors: &[&str], set: &[&str]) -> usize {
    colors.iter().filter(|c| set.contains(*c)).count()
}

fn assess_temperature(colors: &[&str]) -> Temperature {
    let warm = count_in(colors, WARM);
    let cool = count_in(colors, COOL);
    match warm.cmp(&cool) {
        std::cmp::Ordering::Greater => Temperature::Warm,
        std::cmp::Ordering::Less => Temperature::Cool,
        std::cmp::Ordering::Equal => Temperature::Balanced,
    }
}

fn assess_intensity(colors: &[&str]) -> Intensity {
    let high = count_in(colors, HIGH_INTENSITY);
    let low = count_in(colors, LOW_INTENSITY);
    match high.cmp(&low) {
        std::cmp::Ordering::Greater => Intensity::Vibrant,
        std::cmp::Ordering::Less => Intensity::Muted,
        std::cmp::Ordering::Equal => Intensity::Mixed,
    }
}

// Checks are independent, so labels can overlap.
fn identify_schemes(colors: &[&str]) -> Vec<ColorScheme> {
    let mut schemes = Vec::new();
    let distinct: HashSet<&str> = colors.iter().copied().collect();

    if distinct.len() <= 2 {
        schemes.push(ColorScheme::Monochromatic);
    }
    if COMPLEMENTARY_PAIRS
        .iter()
        .any(|pair| pair.iter().all(|c| distinct.contains(c)))
    {
        schemes.push(ColorScheme::Complementary);
    }
    if ANALOGOUS_GROUPS
        .iter()
        .any(|group| colors.iter().filter(|c| group.contains(*c)).count() >= 2)
    {
        schemes.push(ColorScheme::Analogous);
    }
    if TRIADS.iter().any(|triad| triad.iter().all(|c| distinct.contains(c))) {
        schemes.push(ColorScheme::Triadic);
    }

    if schemes.is_empty() {
        schemes.push(ColorScheme::Custom);
    }
    schemes
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StyleRelationship {
    #[default]
    Unknown,
    Identical,
    Related,
    Different,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisualComparison {
    pub similarities: Vec<String>,
    pub differences: Vec<String>,
    pub style_relationship: StyleRelationship,
}

/// Compare palettes, styles and compositions of two artworks
pub fn compare_visual_elements(a: &VisualElements, b: &VisualElements) -> VisualComparison {
    let mut comparison = VisualComparison::default();

    let shared: Vec<&str> = a
        .color_palette
        .iter()
        .filter(|c| b.color_palette.contains(c))
        .map(String::as_str)
        .collect();
    if !shared.is_empty() {
        comparison
            .similarities
            .push(format!("Shared colors: {}", shared.join(", ")));
    }

    let style_a = a.style.as_deref().unwrap_or_default().to_lowercase();
    let style_b = b.style.as_deref().unwrap_or_default().to_lowercase();
    if !style_a.is_empty() && !style_b.is_empty() {
        if style_a == style_b {
            comparison.similarities.push(format!("Same style: {}", style_a));
            comparison.style_relationship = StyleRelationship::Identical;
        } else if style_a.split_whitespace().any(|w| style_b.contains(w))
            || style_b.split_whitespace().any(|w| style_a.contains(w))
        {
            comparison
                .similarities
                .push(format!("Related styles: {} and {}", style_a, style_b));
            comparison.style_relationship = StyleRelationship::Related;
        } else {
            comparison
                .differences
                .push(format!("Different styles: {} vs {}", style_a, style_b));
            comparison.style_relationship = StyleRelationship::Different;
        }
    }

    let comp_a = a.composition.as_deref().unwrap_or_default().to_lowercase();
    let comp_b = b.composition.as_deref().unwrap_or_default().to_lowercase();
    if !comp_a.is_empty() && !comp_b.is_empty() {
        let words_a = significant_words(&comp_a);
        let words_b = significant_words(&comp_b);
        if words_a.intersection(&words_b).count() > 2 {
            comparison
                .similarities
                .push("Similar compositional approaches".to_string());
        } else {
            comparison
                .differences
                .push("Different compositional approaches".to_string());
        }
    }

    comparison
}

fn significant_words(text: &str) -> HashSet<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.len() > 2 && !TRIVIAL_WORDS.contains(w))
        .collect()
}
