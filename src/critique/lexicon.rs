// Lexicon tables - closed art-historical vocabulary shared by all extractors

use super::error::{CritiqueError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A sub-range of a period used to score how centrally a year falls in it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfidenceZone {
    pub start: i32,
    pub end: i32,
}

impl ConfidenceZone {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn midpoint(&self) -> f64 {
        (self.start as f64 + self.end as f64) / 2.0
    }

    /// 1.0 at the midpoint, decaying linearly to 0.5 at either edge.
    pub fn confidence(&self, year: i32) -> f64 {
        let half_width = (self.end - self.start) as f64 / 2.0;
        if half_width <= 0.0 {
            return 1.0;
        }
        let distance = (year as f64 - self.midpoint()).abs();
        (1.0 - (distance / half_width) * 0.5).max(0.5)
    }
}

impl fmt::Display for ConfidenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A historical period with its style vocabulary and confidence zones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodDefinition {
    pub name: String,
    pub start: i32,
    pub end: i32,
    #[serde(default)]
    pub styles: Vec<String>,
    /// Ordered; the first zone containing a year wins.
    pub confidence_zones: Vec<ConfidenceZone>,
}

impl PeriodDefinition {
    fn new(name: &str, start: i32, end: i32, styles: &[&str], zones: &[(i32, i32)]) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
            styles: strings(styles),
            confidence_zones: zones.iter().map(|&(s, e)| ConfidenceZone::new(s, e)).collect(),
        }
    }

    /// First confidence zone containing the year
    pub fn zone_for(&self, year: i32) -> Option<ConfidenceZone> {
        self.confidence_zones.iter().copied().find(|z| z.contains(year))
    }
}

/// A canonical term with its alternate surface forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynonymGroup {
    pub canonical: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl SynonymGroup {
    fn new(canonical: &str, synonyms: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            synonyms: strings(synonyms),
        }
    }
}

/// Keyword lists used by the visual-element extractor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualVocabulary {
    pub composition: Vec<String>,
    pub color_names: Vec<String>,
    pub color_modifiers: Vec<String>,
    pub style: Vec<String>,
    pub medium: Vec<String>,
    pub technique: Vec<String>,
    pub subject_matter: Vec<String>,
    pub line: Vec<String>,
    pub shape: Vec<String>,
    pub form: Vec<String>,
    pub space: Vec<String>,
    pub lighting: Vec<String>,
    pub perspective: Vec<String>,
    pub texture: Vec<String>,
    pub mood: Vec<String>,
}

impl Default for VisualVocabulary {
    fn default() -> Self {
        Self {
            composition: strings(&[
                "composition", "arrangement", "layout", "structure", "triangular", "circular",
                "linear", "diagonal", "symmetrical", "asymmetrical", "centered", "off-center",
                "rule of thirds", "golden ratio",
            ]),
            color_names: strings(&[
                "red", "blue", "green", "yellow", "purple", "orange", "brown", "black", "white",
                "gold", "silver",
            ]),
            color_modifiers: strings(&[
                "light", "dark", "bright", "pale", "deep", "rich", "vibrant", "muted", "warm",
                "cool",
            ]),
            style: strings(&[
                "renaissance", "baroque", "rococo", "neoclassical", "romantic", "realist",
                "impressionist", "post-impressionist", "expressionist", "cubist", "surrealist",
                "abstract", "modern", "contemporary", "medieval", "gothic", "byzantine",
                "realistic", "figurative", "geometric", "organic", "minimalist", "maximalist",
                "decorative", "ornate", "simple", "classical", "traditional", "avant-garde",
                "experimental",
            ]),
            medium: strings(&[
                "oil painting", "oil on canvas", "acrylic", "watercolor", "tempera", "fresco",
                "pastel", "charcoal", "pencil", "ink", "gouache", "canvas", "wood", "panel",
                "paper", "silk", "metal", "sculpture", "bronze", "marble", "stone", "clay",
                "ceramic", "photograph", "print", "etching", "lithograph", "woodcut",
                "mixed media", "collage", "assemblage",
            ]),
            technique: strings(&[
                "brushwork", "brushstrokes", "impasto", "glazing", "scumbling", "alla prima",
                "wet-on-wet", "dry brush", "stippling", "cross-hatching", "blending", "layering",
                "underpainting", "overpainting", "chiaroscuro", "sfumato", "tenebrism",
                "pointillism",
            ]),
            subject_matter: strings(&[
                "portrait", "landscape", "still life", "figure", "nude", "religious",
                "mythological", "historical", "genre scene", "interior", "exterior", "animal",
                "flower", "tree", "building", "architecture", "person", "woman", "man", "child",
                "group", "crowd",
            ]),
            line: strings(&["line", "linear", "contour", "outline", "curved", "straight", "diagonal"]),
            shape: strings(&["shape", "circular", "rectangular", "triangular", "organic", "geometric"]),
            form: strings(&["form", "volume", "mass", "three-dimensional", "3d", "dimensional"]),
            space: strings(&["space", "spatial", "depth", "foreground", "background", "middle ground"]),
            lighting: strings(&[
                "lighting", "light", "shadow", "bright", "dark", "illuminated",
                "dramatic lighting", "soft light", "harsh light", "natural light",
                "artificial light", "backlighting", "side lighting", "front lighting",
                "chiaroscuro", "tenebrism", "luminous", "glowing", "radiant",
            ]),
            perspective: strings(&[
                "perspective", "linear perspective", "atmospheric perspective",
                "one-point perspective", "two-point perspective", "three-point perspective",
                "bird's eye view", "worm's eye view", "eye level", "high angle", "low angle",
                "vanishing point", "horizon line", "foreshortening",
            ]),
            texture: strings(&[
                "texture", "textured", "smooth", "rough", "coarse", "fine", "grainy", "silky",
                "glossy", "matte", "bumpy", "ridged", "fabric", "skin", "hair", "fur", "metal",
                "wood grain",
            ]),
            mood: strings(&[
                "mood", "emotion", "feeling", "atmosphere", "ambiance", "serene", "peaceful",
                "calm", "tranquil", "dramatic", "intense", "melancholic", "joyful", "somber",
                "mysterious", "energetic", "contemplative", "spiritual", "romantic", "nostalgic",
                "powerful",
            ]),
        }
    }
}

/// The complete set of lookup tables. Immutable once loaded; share it behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Lexicon {
    /// Ordered; candidate ties keep this order.
    pub periods: Vec<PeriodDefinition>,
    pub colors: Vec<SynonymGroup>,
    pub emotions: Vec<SynonymGroup>,
    /// Ordered; first hit wins.
    pub mediums: Vec<String>,
    /// Ordered; first hit wins.
    pub styles: Vec<String>,
    pub visual: VisualVocabulary,
}

impl Lexicon {
    /// The built-in art-historical tables
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load tables from a TOML file. Missing sections fall back to the built-in tables.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let lexicon: Lexicon = toml::from_str(contents)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Reject tables the extractors cannot score against
    pub fn validate(&self) -> Result<()> {
        for period in &self.periods {
            if period.name.trim().is_empty() {
                return Err(CritiqueError::Config("period with empty name".to_string()));
            }
            if period.confidence_zones.is_empty() {
                return Err(CritiqueError::Config(format!(
                    "period '{}' has no confidence zones",
                    period.name
                )));
            }
            if let Some(zone) = period.confidence_zones.iter().find(|z| z.start > z.end) {
                return Err(CritiqueError::Config(format!(
                    "period '{}' has inverted zone {}",
                    period.name, zone
                )));
            }
        }
        Ok(())
    }

    pub fn period(&self, name: &str) -> Option<&PeriodDefinition> {
        self.periods.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn period_names(&self) -> impl Iterator<Item = &str> {
        self.periods.iter().map(|p| p.name.as_str())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            periods: vec![
                PeriodDefinition::new(
                    "ancient", -3000, 500,
                    &["egyptian", "greek", "roman", "byzantine"],
                    &[(-3000, 500)],
                ),
                PeriodDefinition::new(
                    "medieval", 500, 1400,
                    &["romanesque", "gothic", "illuminated", "byzantine"],
                    &[(500, 1000), (1000, 1400)],
                ),
                PeriodDefinition::new(
                    "renaissance", 1400, 1600,
                    &["renaissance", "quattrocento", "cinquecento", "mannerist"],
                    &[(1400, 1520), (1520, 1600)],
                ),
                PeriodDefinition::new(
                    "baroque", 1600, 1750,
                    &["baroque", "rococo", "counter-reformation"],
                    &[(1600, 1700), (1700, 1750)],
                ),
                PeriodDefinition::new(
                    "neoclassical", 1750, 1820,
                    &["neoclassical", "neoclassicism", "classical revival"],
                    &[(1750, 1820)],
                ),
                PeriodDefinition::new(
                    "romantic", 1800, 1850,
                    &["romantic", "romanticism", "sublime"],
                    &[(1800, 1850)],
                ),
                PeriodDefinition::new(
                    "realist", 1850, 1880,
                    &["realist", "naturalist", "plein air"],
                    &[(1850, 1880)],
                ),
                PeriodDefinition::new(
                    "impressionist", 1860, 1890,
                    &["impressionist", "impressionism", "plein air"],
                    &[(1860, 1890)],
                ),
                PeriodDefinition::new(
                    "post-impressionist", 1880, 1910,
                    &["post-impressionist", "symbolist", "fauve"],
                    &[(1880, 1910)],
                ),
                PeriodDefinition::new(
                    "modern", 1900, 1945,
                    &["cubist", "futurist", "dadaist", "surrealist", "expressionist", "abstract"],
                    &[(1900, 1920), (1920, 1945)],
                ),
                PeriodDefinition::new(
                    "contemporary", 1945, 2029,
                    &["abstract expressionist", "pop art", "minimalist", "conceptual", "postmodern"],
                    &[(1945, 1980), (1980, 2029)],
                ),
            ],
            colors: vec![
                SynonymGroup::new("red", &["crimson", "scarlet", "vermillion", "cherry", "ruby", "rose"]),
                SynonymGroup::new("blue", &["azure", "navy", "cobalt", "cerulean", "sapphire", "turquoise"]),
                SynonymGroup::new("green", &["emerald", "jade", "olive", "forest", "mint", "lime"]),
                SynonymGroup::new("yellow", &["amber", "lemon", "canary", "ochre", "saffron"]),
                SynonymGroup::new("purple", &["violet", "lavender", "plum", "magenta", "amethyst"]),
                SynonymGroup::new("orange", &["amber", "copper", "rust", "peach", "coral", "tangerine"]),
                SynonymGroup::new("brown", &["bronze", "mahogany", "umber", "sienna", "chestnut"]),
                SynonymGroup::new("black", &["ebony", "obsidian", "charcoal", "jet", "onyx"]),
                SynonymGroup::new("white", &["ivory", "pearl", "cream", "alabaster", "snow"]),
                SynonymGroup::new("gray", &["grey", "ash", "slate", "pewter", "charcoal"]),
                SynonymGroup::new("gold", &["golden", "gilded", "gilt"]),
                SynonymGroup::new("silver", &["silvery", "platinum"]),
            ],
            emotions: vec![
                SynonymGroup::new("joy", &["happiness", "delight", "cheerful", "jubilant", "elated", "joyful"]),
                SynonymGroup::new("sorrow", &["sadness", "grief", "melancholy", "mourning", "lament"]),
                SynonymGroup::new("anger", &["rage", "fury", "wrath", "indignation", "ire"]),
                SynonymGroup::new("peace", &["serenity", "tranquility", "calm", "harmony", "stillness", "peaceful"]),
                SynonymGroup::new("tension", &["anxiety", "unease", "stress", "conflict", "strain"]),
                SynonymGroup::new("triumph", &["victory", "success", "achievement", "glory", "conquest"]),
                SynonymGroup::new("despair", &["hopelessness", "anguish", "despondency", "dejection"]),
                SynonymGroup::new("hope", &["optimism", "aspiration", "faith", "expectation", "promise"]),
                SynonymGroup::new("fear", &["terror", "dread", "anxiety", "apprehension", "panic"]),
                SynonymGroup::new("love", &["affection", "devotion", "passion", "adoration", "tenderness"]),
            ],
            mediums: strings(&[
                "oil", "watercolor", "acrylic", "tempera", "fresco", "canvas", "panel",
                "sculpture", "bronze", "marble",
            ]),
            styles: strings(&[
                "renaissance", "baroque", "impressionist", "cubist", "abstract", "realistic",
                "surreal", "expressionist",
            ]),
            visual: VisualVocabulary::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
