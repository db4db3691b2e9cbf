// Core types for the critique pipeline

use super::extractors::harmony::ColorHarmony;
use super::extractors::visual::TechnicalDetails;
use super::lexicon::ConfidenceZone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Marker for base64 images embedded in message text
const DATA_URI_MARKER: &str = "data:image/";

/// Who authored a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One element of a structured message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
}

/// Message body: plain text or a sequence of parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Where an image lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ImageRef {
    Url(String),
    DataUri(String),
    Path(PathBuf),
}

impl ImageRef {
    /// Classify a raw reference string
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if reference.starts_with(DATA_URI_MARKER) {
            ImageRef::DataUri(reference.to_string())
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            ImageRef::Url(reference.to_string())
        } else {
            ImageRef::Path(PathBuf::from(reference))
        }
    }
}

/// Detect image file extensions
pub fn is_image_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp"
    )
}

fn ends_with_image_extension(text: &str) -> bool {
    Path::new(text.trim())
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_image_extension)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl InputMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl { url: image_url.into() },
            ]),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Textual content; text parts are joined with a space in order
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Whether the message carries an image reference, embedded image data,
    /// or ends in an image file name
    pub fn has_image(&self) -> bool {
        match &self.content {
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|part| matches!(part, ContentPart::ImageUrl { .. })),
            MessageContent::Text(text) => {
                text.contains(DATA_URI_MARKER) || ends_with_image_extension(text)
            }
        }
    }

    pub fn image_ref(&self) -> Option<ImageRef> {
        match &self.content {
            MessageContent::Parts(parts) => parts.iter().find_map(|part| match part {
                ContentPart::ImageUrl { url } => Some(ImageRef::parse(url)),
                ContentPart::Text { .. } => None,
            }),
            MessageContent::Text(text) => {
                if let Some(start) = text.find(DATA_URI_MARKER) {
                    let uri = text[start..].split_whitespace().next().unwrap_or_default();
                    Some(ImageRef::DataUri(uri.to_string()))
                } else if ends_with_image_extension(text) {
                    text.split_whitespace().last().map(ImageRef::parse)
                } else {
                    None
                }
            }
        }
    }
}

/// A historical-era guess with its confidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodCandidate {
    pub period: String,
    pub confidence: f64,
    /// None when the candidate came from a keyword rather than a year
    pub zone: Option<ConfidenceZone>,
}

/// Structured facts recovered from an artwork description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtworkMetadata {
    pub description: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub period: Option<String>,
    pub year: Option<i32>,
    pub medium: Option<String>,
    pub style: Option<String>,
    pub periods: Vec<PeriodCandidate>,
    pub colors: BTreeSet<String>,
    pub emotions: BTreeSet<String>,
}

/// Formal sub-elements; only matched keys are serialized
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormalElements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
}

impl FormalElements {
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.shape.is_none() && self.form.is_none() && self.space.is_none()
    }
}

/// The fixed keys of a visual-element mapping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Composition,
    ColorPalette,
    Style,
    Medium,
    Technique,
    SubjectMatter,
    FormalElements,
    Lighting,
    Perspective,
    Texture,
    Mood,
}

/// Sparse visual-element mapping; empty entries are omitted on serialization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisualElements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_palette: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_matter: Vec<String>,
    #[serde(default, skip_serializing_if = "FormalElements::is_empty")]
    pub formal_elements: FormalElements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl VisualElements {
    /// Kinds that carry a value, in key order
    pub fn kinds(&self) -> Vec<ElementKind> {
        let present = [
            (ElementKind::Composition, self.composition.is_some()),
            (ElementKind::ColorPalette, !self.color_palette.is_empty()),
            (ElementKind::Style, self.style.is_some()),
            (ElementKind::Medium, self.medium.is_some()),
            (ElementKind::Technique, self.technique.is_some()),
            (ElementKind::SubjectMatter, !self.subject_matter.is_empty()),
            (ElementKind::FormalElements, !self.formal_elements.is_empty()),
            (ElementKind::Lighting, self.lighting.is_some()),
            (ElementKind::Perspective, self.perspective.is_some()),
            (ElementKind::Texture, self.texture.is_some()),
            (ElementKind::Mood, self.mood.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(kind, has)| has.then_some(kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

/// A narrative fragment attributed to a historical viewpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerspectiveRecord {
    pub period: String,
    pub viewpoint: String,
    pub key_aspects: Vec<String>,
    pub confidence: f64,
}

/// Raw output of the vision collaborator plus what was derived from it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageAnalysis {
    pub raw_analysis: String,
    pub timestamp: DateTime<Utc>,
    pub color_harmony: Option<ColorHarmony>,
    pub technical: TechnicalDetails,
}

/// Context carried across pipeline stages. Owned by a single run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub messages: Vec<InputMessage>,
    pub has_image: bool,
    pub artwork_metadata: Option<ArtworkMetadata>,
    pub visual_elements: Option<VisualElements>,
    pub image_analysis: Option<ImageAnalysis>,
    pub current_analysis: Option<String>,
    pub historical_perspectives: Vec<PerspectiveRecord>,
    pub critique_complete: bool,
    pub discussion_mode: bool,
}

impl AgentState {
    pub fn new(messages: Vec<InputMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// State for answering a peer message from prior context
    pub fn discussion(message: InputMessage, artwork_metadata: Option<ArtworkMetadata>) -> Self {
        Self {
            messages: vec![message],
            artwork_metadata,
            discussion_mode: true,
            ..Self::default()
        }
    }

    pub fn last_message(&self) -> Option<&InputMessage> {
        self.messages.last()
    }

    /// Text of the most recent assistant message
    pub fn output(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(InputMessage::text)
    }
}
