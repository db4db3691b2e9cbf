// Metadata extractor - title, artist, year, periods, medium, style, colors, emotions

use super::{contains_word, contains_word_prefix};
use crate::critique::lexicon::{Lexicon, SynonymGroup};
use crate::critique::types::{ArtworkMetadata, PeriodCandidate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Confidence assigned to periods recovered from keywords rather than a year
pub const KEYWORD_PERIOD_CONFIDENCE: f64 = 0.8;

// Two or more capitalized words, optionally joined by lowercase particles ("Vincent van Gogh")
const NAME: &str = r"\p{Lu}\p{Ll}+(?:\s+(?:(?:van|de|da|del|du|le|la|von|di)\s+)?\p{Lu}\p{Ll}+)+";

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"["“]([^"“”]+)["”]"#,
        r#"(?i)titled\s+['"]([^'"]+)['"]"#,
        r#"(?i)called\s+['"]([^'"]+)['"]"#,
        r#"(?i)painting\s+['"]([^'"]+)['"]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ARTIST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?i:painted|created|made|drawn|sculpted|designed)\s+(?i:by)\s+",
        r"\b(?i:artist)\s+",
        r"\b(?i:work)\s+(?i:of|by)\s+",
        r"\b(?i:master|painter)\s+",
    ]
    .iter()
    .map(|trigger| Regex::new(&format!("{trigger}({NAME})")).unwrap())
    .collect()
});

static PLACE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:New|North|South|East|West|Saint|San|Santa)\s+").unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[4-9]\d{2}|20[0-2]\d)\b").unwrap());

const COMPOSITION_TERMS: &[&str] = &[
    "balanced", "symmetrical", "asymmetrical", "diagonal", "triangular", "circular", "vertical",
    "horizontal",
];
const COLOR_TERMS: &[&str] = &[
    "warm", "cool", "saturated", "muted", "bright", "dark", "monochromatic", "complementary",
];
const LINE_TERMS: &[&str] = &[
    "curved", "straight", "flowing", "rigid", "dynamic", "static", "bold", "delicate",
];
const FORM_TERMS: &[&str] = &[
    "three-dimensional", "flat", "sculptural", "geometric", "organic", "angular", "rounded",
];
const LIGHT_TERMS: &[&str] = &[
    "chiaroscuro", "dramatic", "soft", "harsh", "natural", "artificial", "backlighting",
    "spotlight",
];

/// Formal-element vocabulary found in a description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtisticElements {
    pub composition: Vec<String>,
    pub color: Vec<String>,
    pub line: Vec<String>,
    pub form: Vec<String>,
    pub light: Vec<String>,
}

impl ArtisticElements {
    pub fn is_empty(&self) -> bool {
        self.composition.is_empty()
            && self.color.is_empty()
            && self.line.is_empty()
            && self.form.is_empty()
            && self.light.is_empty()
    }
}

/// Turns free-form artwork descriptions into `ArtworkMetadata`
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    lexicon: Arc<Lexicon>,
}

impl MetadataExtractor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Extract everything recoverable from the text. Never fails; unmatched fields stay empty.
    pub fn extract(&self, text: &str) -> ArtworkMetadata {
        let lower = text.to_lowercase();
        let mut metadata = ArtworkMetadata {
            description: text.to_string(),
            title: self.extract_title(text),
            artist: self.extract_artist(text),
            ..ArtworkMetadata::default()
        };

        if let Some(year) = self.extract_year(text) {
            metadata.year = Some(year);
            metadata.periods = self.determine_periods(year);
            metadata.period = metadata.periods.first().map(|c| c.period.clone());
        }

        // Keyword fallback only when the year produced nothing
        if metadata.period.is_none() {
            let detected = self.detect_periods_from_text(text);
            if let Some(first) = detected.first() {
                metadata.period = Some(first.clone());
                metadata.periods = detected
                    .into_iter()
                    .map(|period| PeriodCandidate {
                        period,
                        confidence: KEYWORD_PERIOD_CONFIDENCE,
                        zone: None,
                    })
                    .collect();
            }
        }

        metadata.medium = self
            .lexicon
            .mediums
            .iter()
            .find(|m| contains_word(&lower, m))
            .cloned();
        metadata.style = self
            .lexicon
            .styles
            .iter()
            .find(|s| contains_word_prefix(&lower, s))
            .cloned();
        metadata.colors = self.extract_colors(text);
        metadata.emotions = self.extract_emotions(text);

        metadata
    }

    /// Extract from ordered fragments joined with single spaces
    pub fn extract_fragments<S: AsRef<str>>(&self, fragments: &[S]) -> ArtworkMetadata {
        let joined = fragments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.extract(&joined)
    }

    fn extract_title(&self, text: &str) -> Option<String> {
        TITLE_PATTERNS
            .iter()
            .find_map(|re| re.captures(text))
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_artist(&self, text: &str) -> Option<String> {
        // Only the first match of each pattern is considered
        ARTIST_PATTERNS.iter().find_map(|re| {
            let candidate = re.captures(text)?.get(1)?.as_str().trim();
            (!PLACE_PREFIX.is_match(candidate)).then(|| candidate.to_string())
        })
    }

    fn extract_year(&self, text: &str) -> Option<i32> {
        YEAR.captures(text).and_then(|caps| caps[1].parse().ok())
    }

    /// Periods whose confidence zones contain the year, best first.
    /// Ties keep the lexicon's period order.
    pub fn determine_periods(&self, year: i32) -> Vec<PeriodCandidate> {
        let mut candidates: Vec<PeriodCandidate> = self
            .lexicon
            .periods
            .iter()
            .filter_map(|period| {
                let zone = period.zone_for(year)?;
                Some(PeriodCandidate {
                    period: period.name.clone(),
                    confidence: zone.confidence(year),
                    zone: Some(zone),
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        candidates
    }

    /// Periods named directly or through one of their style keywords, in lexicon order
    pub fn detect_periods_from_text(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.lexicon
            .periods
            .iter()
            .filter(|period| {
                contains_word(&lower, &period.name)
                    || period.styles.iter().any(|s| contains_word(&lower, s))
            })
            .map(|period| period.name.clone())
            .collect()
    }

    pub fn extract_colors(&self, text: &str) -> BTreeSet<String> {
        fuzzy_match(&text.to_lowercase(), &self.lexicon.colors)
    }

    pub fn extract_emotions(&self, text: &str) -> BTreeSet<String> {
        fuzzy_match(&text.to_lowercase(), &self.lexicon.emotions)
    }

    /// Formal-element terms mentioned in a description
    pub fn artistic_elements(&self, text: &str) -> ArtisticElements {
        let lower = text.to_lowercase();
        let hits = |terms: &[&str]| -> Vec<String> {
            terms
                .iter()
                .filter(|t| contains_word_prefix(&lower, t))
                .map(|t| t.to_string())
                .collect()
        };
        ArtisticElements {
            composition: hits(COMPOSITION_TERMS),
            color: hits(COLOR_TERMS),
            line: hits(LINE_TERMS),
            form: hits(FORM_TERMS),
            light: hits(LIGHT_TERMS),
        }
    }
}

/// Canonical terms whose name or any synonym appears as a whole word
fn fuzzy_match(lower: &str, groups: &[SynonymGroup]) -> BTreeSet<String> {
    groups
        .iter()
        .filter(|group| {
            contains_word(lower, &group.canonical)
                || group.synonyms.iter().any(|s| contains_word(lower, s))
        })
        .map(|group| group.canonical.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new(Arc::new(Lexicon::builtin()))
    }

    #[test]
    fn test_end_to_end_description() {
        let text = "This oil painting, titled \"The Harbor\", painted by Claude Monet in 1873, \
                    uses cool blue and warm gold tones to evoke a peaceful mood.";
        let metadata = extractor().extract(text);

        assert_eq!(metadata.title.as_deref(), Some("The Harbor"));
        assert_eq!(metadata.artist.as_deref(), Some("Claude Monet"));
        assert_eq!(metadata.year, Some(1873));
        assert_eq!(metadata.medium.as_deref(), Some("oil"));
        assert_eq!(metadata.period.as_deref(), Some("impressionist"));
        let colors: Vec<&str> = metadata.colors.iter().map(String::as_str).collect();
        assert_eq!(colors, vec!["blue", "gold"]);

        let top = &metadata.periods[0];
        assert_eq!(top.period, "impressionist");
        assert_eq!(top.zone.map(|z| z.to_string()).as_deref(), Some("1860-1890"));
        assert!((top.confidence - (1.0 - (2.0 / 15.0) * 0.5)).abs() < 1e-9);
        // realist also covers 1873 but sits further from its zone centre
        assert_eq!(metadata.periods[1].period, "realist");
    }

    #[test]
    fn test_period_confidence_bounds_across_zones() {
        let extractor = extractor();
        let lexicon = Lexicon::builtin();
        for period in &lexicon.periods {
            for zone in &period.confidence_zones {
                if zone.start < 1400 {
                    continue;
                }
                let mid = (zone.start + zone.end) / 2;
                let mut at_mid = None;
                for year in zone.start..=zone.end {
                    let candidates = extractor.determine_periods(year);
                    let found = candidates
                        .iter()
                        .find(|c| c.period == period.name)
                        .expect("period present for year inside its zone");
                    assert!((0.5..=1.0).contains(&found.confidence));
                    if year == mid {
                        at_mid = Some(found.confidence);
                    }
                }
                let at_mid = at_mid.unwrap();
                let edge = extractor
                    .determine_periods(zone.start)
                    .into_iter()
                    .find(|c| c.period == period.name)
                    .unwrap();
                assert!(at_mid >= edge.confidence);
            }
        }
    }

    #[test]
    fn test_candidates_sorted_descending() {
        let candidates = extractor().determine_periods(1885);
        assert!(candidates.len() >= 2);
        assert!(candidates.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(candidates[0].period, "impressionist");
    }

    #[test]
    fn test_synonym_only_yields_canonical_once() {
        let extractor = extractor();
        let colors = extractor.extract_colors("A crimson sky over scarlet roofs and azure water");
        assert_eq!(colors.len(), 2);
        assert!(colors.contains("red"));
        assert!(colors.contains("blue"));
        assert!(!colors.contains("crimson"));

        let emotions = extractor.extract_emotions("Grief and melancholy, with a hint of serenity");
        let emotions: Vec<&str> = emotions.iter().map(String::as_str).collect();
        assert_eq!(emotions, vec!["peace", "sorrow"]);
    }

    #[test]
    fn test_keyword_fallback_without_year() {
        let metadata = extractor().extract("A gothic altarpiece with illuminated borders");
        assert_eq!(metadata.year, None);
        assert_eq!(metadata.period.as_deref(), Some("medieval"));
        assert_eq!(metadata.periods.len(), 1);
        assert_eq!(metadata.periods[0].confidence, KEYWORD_PERIOD_CONFIDENCE);
        assert!(metadata.periods[0].zone.is_none());
    }

    #[test]
    fn test_keyword_fallback_unions_periods() {
        let metadata = extractor().extract("Plein air studies with a baroque frame");
        let names: Vec<&str> = metadata.periods.iter().map(|c| c.period.as_str()).collect();
        assert_eq!(names, vec!["baroque", "realist", "impressionist"]);
        assert_eq!(metadata.period.as_deref(), Some("baroque"));
    }

    #[test]
    fn test_year_wins_over_keywords() {
        let metadata = extractor().extract("A baroque revival piece from 1955");
        assert_eq!(metadata.year, Some(1955));
        assert_eq!(metadata.period.as_deref(), Some("contemporary"));
        assert!(metadata.periods.iter().all(|c| c.zone.is_some()));
    }

    #[test]
    fn test_artist_rejects_place_names() {
        let extractor = extractor();
        let metadata = extractor.extract("A view made by New York craftsmen");
        assert_eq!(metadata.artist, None);

        let metadata = extractor.extract("The work of New Amsterdam, by the painter Vincent van Gogh");
        assert_eq!(metadata.artist.as_deref(), Some("Vincent van Gogh"));
    }

    #[test]
    fn test_artist_needs_two_names() {
        let extractor = extractor();
        assert_eq!(extractor.extract("a work of Art in oils").artist, None);
        assert_eq!(extractor.extract("painted by Rembrandt alone").artist, None);
        assert_eq!(
            extractor.extract("painted by Rembrandt van Rijn in 1642").artist.as_deref(),
            Some("Rembrandt van Rijn")
        );
    }

    #[test]
    fn test_title_patterns_in_order() {
        let extractor = extractor();
        assert_eq!(
            extractor.extract("the painting 'Water Lilies' shows a pond").title.as_deref(),
            Some("Water Lilies")
        );
        assert_eq!(
            extractor.extract("a canvas called 'Nocturne' at dusk").title.as_deref(),
            Some("Nocturne")
        );
        assert_eq!(extractor.extract("no title here").title, None);
    }

    #[test]
    fn test_first_year_wins_and_range_is_bounded() {
        let extractor = extractor();
        assert_eq!(extractor.extract("Painted 1350, restored 1650 and 1890").year, Some(1650));
        assert_eq!(extractor.extract("catalogue no. 20455").year, None);
    }

    #[test]
    fn test_medium_and_style_follow_list_order() {
        let metadata = extractor().extract("Watercolor and oil on panel in a surrealist, abstract manner");
        assert_eq!(metadata.medium.as_deref(), Some("oil"));
        assert_eq!(metadata.style.as_deref(), Some("abstract"));
        assert_eq!(extractor().extract("toil and turmoil").medium, None);
    }

    #[test]
    fn test_fragments_are_joined() {
        let metadata = extractor().extract_fragments(&["painted by Claude", "Monet in 1873"]);
        assert_eq!(metadata.artist.as_deref(), Some("Claude Monet"));
        assert_eq!(metadata.year, Some(1873));
    }

    #[test]
    fn test_malformed_input_is_empty() {
        let metadata = extractor().extract("");
        assert_eq!(metadata, ArtworkMetadata::default());
    }

    #[test]
    fn test_artistic_elements() {
        let elements =
            extractor().artistic_elements("A balanced, diagonal design with warm tones and chiaroscuro");
        assert_eq!(elements.composition, vec!["balanced", "diagonal"]);
        assert_eq!(elements.color, vec!["warm"]);
        assert_eq!(elements.light, vec!["chiaroscuro"]);
        assert!(elements.line.is_empty());
    }
}
