// Perspective segmenter - splits a generated narrative into period-attributed records

use super::{sentences, title_case};
use crate::critique::lexicon::Lexicon;
use crate::critique::types::PerspectiveRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

const MIN_SEGMENT_CHARS: usize = 50;
const MAX_RECORDS: usize = 5;
const MAX_ASPECTS: usize = 3;
const FALLBACK_ASPECTS: usize = 2;

const UNKNOWN_PERIOD: &str = "Unknown";
const BASE_CONFIDENCE: f64 = 0.7;
const VALIDATED_CONFIDENCE: f64 = 0.9;
const UNVALIDATED_CONFIDENCE: f64 = 0.6;

// Line-start markers that open a new segment, tried in order
static SECTION_STARTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d+\.\s",
        r"^\*\*[^*]+\*\*",
        r"^#{1,3}\s",
        r"^[A-Z][^:]*:",
        r"^\*\s",
        r"^-\s",
        r"^•\s",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

enum LabelPattern {
    /// Capture group 1 is the label
    Group(Regex),
    /// The whole match is the label
    Whole(Regex),
    /// "19th century" style ordinals
    Century(Regex),
    /// All groups joined by a space
    Joined(Regex),
}

static LABEL_PATTERNS: Lazy<Vec<LabelPattern>> = Lazy::new(|| {
    vec![
        LabelPattern::Group(
            Regex::new(
                r"(?m)(?:^|\*\*|##)[ \t]*(?:\d+\.[ \t]+)?(\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)*)[ \t]*(?:Era|Period|Century|Perspective|View|Analysis|Interpretation)\b",
            )
            .unwrap(),
        ),
        LabelPattern::Whole(
            Regex::new(
                r"(?i)\b(?:renaissance|baroque|medieval|ancient|modern|contemporary|impressionist|romantic|neoclassical|gothic|classical|victorian|enlightenment)\b",
            )
            .unwrap(),
        ),
        LabelPattern::Century(Regex::new(r"(?i)\b(\d{1,2}(?:st|nd|rd|th))\s+century\b").unwrap()),
        LabelPattern::Joined(
            Regex::new(r"(?i)\b(early|mid|late)\s+(renaissance|baroque|medieval|modern|contemporary)\b")
                .unwrap(),
        ),
        LabelPattern::Group(
            Regex::new(r"\b((?:[Pp]re-|[Pp]ost-)?\p{Lu}\p{Ll}+(?:ist|ism|al))\b").unwrap(),
        ),
    ]
});

static ASPECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)^[ \t]*[-•*][ \t]+([^\n]+)",
        r"(?m)^[ \t]*\d+\.[ \t]*([^\n]+)",
        r"(?i)(?:key|important|notable|significant)\s+(?:aspects?|points?|elements?):\s*([^\n]+)",
        r"(?i)(?:they would|this period|scholars)\s+(?:emphasizes?|focus(?:es)? on|highlights?|notes?)\s+([^.]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

impl LabelPattern {
    fn label(&self, text: &str) -> Option<String> {
        match self {
            LabelPattern::Group(re) => re.captures(text).map(|caps| caps[1].to_string()),
            LabelPattern::Whole(re) => re.find(text).map(|m| m.as_str().to_string()),
            LabelPattern::Century(re) => re
                .captures(text)
                .map(|caps| format!("{} century", caps[1].to_lowercase())),
            LabelPattern::Joined(re) => re.captures(text).map(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
        }
        .map(|label| title_case(&label))
    }
}

/// Turns a multi-section narrative into at most five `PerspectiveRecord`s
#[derive(Debug, Clone)]
pub struct PerspectiveSegmenter {
    lexicon: Arc<Lexicon>,
}

impl PerspectiveSegmenter {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Records sorted by confidence (descending, stable), capped at five. Never fails.
    pub fn segment(&self, text: &str) -> Vec<PerspectiveRecord> {
        let mut records: Vec<PerspectiveRecord> = split_sections(text)
            .into_iter()
            .filter(|section| section.chars().count() >= MIN_SEGMENT_CHARS)
            .map(|section| self.record(section))
            .collect();

        records.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        records.truncate(MAX_RECORDS);
        records
    }

    fn record(&self, section: String) -> PerspectiveRecord {
        let (period, confidence) = match LABEL_PATTERNS.iter().find_map(|p| p.label(&section)) {
            Some(label) => match self.validate_label(&label) {
                Some(known) => (known, VALIDATED_CONFIDENCE),
                None => (label, UNVALIDATED_CONFIDENCE),
            },
            None => (UNKNOWN_PERIOD.to_string(), BASE_CONFIDENCE),
        };

        PerspectiveRecord {
            period,
            key_aspects: key_aspects(&section),
            viewpoint: section,
            confidence,
        }
    }

    /// Exact period name first, then the first name that contains or is contained by the label
    fn validate_label(&self, label: &str) -> Option<String> {
        let lower = label.to_lowercase();
        self.lexicon
            .period_names()
            .find(|name| *name == lower)
            .or_else(|| {
                self.lexicon
                    .period_names()
                    .find(|name| lower.contains(name) || name.contains(lower.as_str()))
            })
            .map(title_case)
    }
}

/// Split before lines that open a section, using the first marker kind that
/// produces more than one non-empty piece
fn split_sections(text: &str) -> Vec<String> {
    for marker in SECTION_STARTS.iter() {
        let pieces = split_before(text, marker);
        if pieces.len() > 1 {
            return pieces;
        }
    }

    let whole = text.trim();
    if whole.is_empty() {
        Vec::new()
    } else {
        vec![whole.to_string()]
    }
}

fn split_before(text: &str, marker: &Regex) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            if marker.is_match(line) {
                pieces.push(std::mem::take(&mut current));
            } else {
                current.push('\n');
            }
        }
        current.push_str(line);
    }
    pieces.push(current);

    pieces
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn key_aspects(section: &str) -> Vec<String> {
    for pattern in ASPECT_PATTERNS.iter() {
        let found: Vec<String> = pattern
            .captures_iter(section)
            .map(|caps| caps[1].trim().to_string())
            .take(MAX_ASPECTS)
            .collect();
        if !found.is_empty() {
            return found;
        }
    }

    sentences(section)
        .filter(|s| {
            let len = s.chars().count();
            len > 20 && len < 150
        })
        .take(FALLBACK_ASPECTS)
        .map(str::to_string)
        .collect()
}
