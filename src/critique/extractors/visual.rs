// Visual-element extractor - structures the vision collaborator's free-text description

use super::{contains_word_prefix, first_sentence_with};
use crate::critique::lexicon::Lexicon;
use crate::critique::types::{FormalElements, VisualElements};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on palette size
pub const MAX_PALETTE: usize = 5;

static COLOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(\w+)[\s-]+(?:colou?red|hued|toned)\b",
        r"\b(?:shades?|tones?|hues?)\s+of\s+(\w+)",
        r"\b(\w+)\s+palette\b",
        r"\bpredominantly\s+(\w+)",
        r"\brich\s+(\w+)",
        r"\bdeep\s+(\w+)",
        r"\bvibrant\s+(\w+)",
        r"\bmuted\s+(\w+)",
        r"\bwarm\s+(\w+)",
        r"\bcool\s+(\w+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static BRUSHWORK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"brush(?:work|stroke)s?\s+(?:are|is)?\s*([^.]+)",
        r"(?:thick|thin|bold|delicate|loose|tight)\s+(?:brush|stroke)s?",
        r"impasto|glazing|scumbling|alla prima",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static SCALE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:large|small|medium|huge|tiny|massive|miniature)\s+(?:scale|size|work|painting)",
        r"(?:monumental|intimate|grand|modest)\s+(?:scale|proportions?)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Function words a descriptive colour pattern can capture ("the palette")
const NON_COLORS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "with", "its", "their", "his", "her", "this", "that",
    "in", "on", "is", "are", "same", "other",
];

const SUPPORTS: &[&str] = &["canvas", "wood", "panel", "paper", "board", "copper", "silk"];
const CONDITIONS: &[&str] = &[
    "restored", "damaged", "pristine", "aged", "cracked", "faded", "well-preserved",
];

/// Execution and condition details recovered from a visual description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TechnicalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brushwork: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Parses visual-description text into `VisualElements`
#[derive(Debug, Clone)]
pub struct VisualExtractor {
    lexicon: Arc<Lexicon>,
}

impl VisualExtractor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Run every per-kind extractor; kinds that found nothing stay empty
    pub fn parse(&self, text: &str) -> VisualElements {
        let vocab = &self.lexicon.visual;
        let lower = text.to_lowercase();

        VisualElements {
            composition: first_sentence_with(text, &vocab.composition),
            color_palette: self.extract_colors(&lower),
            style: first_sentence_with(text, &vocab.style),
            medium: vocab.medium.iter().find(|m| lower.contains(m.as_str())).cloned(),
            technique: first_sentence_with(text, &vocab.technique),
            subject_matter: vocab
                .subject_matter
                .iter()
                .filter(|s| contains_word_prefix(&lower, s))
                .cloned()
                .collect(),
            formal_elements: FormalElements {
                line: first_sentence_with(text, &vocab.line),
                shape: first_sentence_with(text, &vocab.shape),
                form: first_sentence_with(text, &vocab.form),
                space: first_sentence_with(text, &vocab.space),
            },
            lighting: first_sentence_with(text, &vocab.lighting),
            perspective: first_sentence_with(text, &vocab.perspective),
            texture: first_sentence_with(text, &vocab.texture),
            mood: first_sentence_with(text, &vocab.mood),
        }
    }

    /// Named colors plus descriptive phrases ("shades of teal"), modifiers removed
    fn extract_colors(&self, lower: &str) -> Vec<String> {
        let vocab = &self.lexicon.visual;
        let direct = vocab
            .color_names
            .iter()
            .filter(|c| contains_word_prefix(lower, c))
            .cloned();
        let described = COLOR_PATTERNS
            .iter()
            .flat_map(|re| re.captures_iter(lower).map(|caps| caps[1].to_string()))
            .collect::<Vec<_>>();

        let mut palette: Vec<String> = Vec::new();
        for color in direct.chain(described) {
            if vocab.color_modifiers.contains(&color)
                || NON_COLORS.contains(&color.as_str())
                || palette.contains(&color)
            {
                continue;
            }
            palette.push(color);
        }
        palette.truncate(MAX_PALETTE);
        palette
    }

    /// Brushwork, support, scale and condition details
    pub fn technical_details(&self, text: &str) -> TechnicalDetails {
        let lower = text.to_lowercase();

        let brushwork: Vec<String> = BRUSHWORK_PATTERNS
            .iter()
            .flat_map(|re| {
                re.captures_iter(&lower).map(|caps| {
                    caps.get(1)
                        .or_else(|| caps.get(0))
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default()
                })
            })
            .filter(|s| !s.is_empty())
            .take(2)
            .collect();

        TechnicalDetails {
            brushwork: (!brushwork.is_empty()).then(|| brushwork.join(" ")),
            support: SUPPORTS.iter().find(|s| lower.contains(*s)).map(|s| s.to_string()),
            scale: SCALE_PATTERNS
                .iter()
                .find_map(|re| re.find(&lower))
                .map(|m| m.as_str().to_string()),
            condition: CONDITIONS.iter().find(|c| lower.contains(*c)).map(|c| c.to_string()),
        }
    }

    /// One-line digest of the most salient elements
    pub fn summarize(elements: &VisualElements) -> String {
        let mut parts = Vec::new();

        if let Some(style) = &elements.style {
            parts.push(format!("Style: {}", style));
        }
        if let Some(medium) = &elements.medium {
            parts.push(format!("Medium: {}", medium));
        }
        if !elements.color_palette.is_empty() {
            let colors: Vec<&str> = elements.color_palette.iter().take(3).map(String::as_str).collect();
            parts.push(format!("Primary colors: {}", colors.join(", ")));
        }
        if let Some(composition) = &elements.composition {
            let short: String = composition.chars().take(100).collect();
            parts.push(format!("Composition: {}...", short));
        }
        if !elements.subject_matter.is_empty() {
            let subjects: Vec<&str> = elements.subject_matter.iter().take(3).map(String::as_str).collect();
            parts.push(format!("Subject: {}", subjects.join(", ")));
        }
        if let Some(mood) = &elements.mood {
            parts.push(format!("Mood: {}", mood));
        }

        parts.join(" | ")
    }
}
