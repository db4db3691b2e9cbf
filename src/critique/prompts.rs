// Prompt builders for the generation collaborators

use super::collaborators::ContextDocument;
use super::types::{ArtworkMetadata, ImageAnalysis, PerspectiveRecord, VisualElements};

/// Context documents quoted in the analysis prompt
const MAX_CONTEXT_DOCS: usize = 3;
const CONTEXT_EXCERPT_CHARS: usize = 200;

/// Instruction sent with the image to the vision collaborator
pub fn visual_analysis() -> String {
    r#"You are an art historian with a trained eye. Describe this artwork image precisely.

Cover, in full sentences:
- Composition: arrangement, organizing principles, focal points
- Color: palette, temperature, relationships between colors
- Line, shape and form: quality, direction, volume and mass
- Space: depth, perspective, foreground and background
- Texture and surface
- Light and shadow: direction and quality
- Style, medium and technique, including brushwork
- Subject matter and any symbolic elements
- Mood and emotional impact

Report what you can observe directly rather than general statements."#
        .to_string()
}

/// Free-text query for the context-search collaborator
pub fn search_query(metadata: &ArtworkMetadata, visual: Option<&VisualElements>) -> String {
    let mut parts = vec![metadata.description.clone()];

    if let Some(visual) = visual {
        if let Some(style) = &visual.style {
            parts.push(format!("style: {}", style));
        }
        if let Some(medium) = &visual.medium {
            parts.push(format!("medium: {}", medium));
        }
        if !visual.color_palette.is_empty() {
            parts.push(format!("colors: {}", visual.color_palette.join(", ")));
        }
        if let Some(composition) = &visual.composition {
            parts.push(format!("composition: {}", composition));
        }
    }

    parts.join(" ")
}

pub fn analysis(
    metadata: &ArtworkMetadata,
    context: &[ContextDocument],
    visual: Option<&VisualElements>,
) -> String {
    format!(
        r#"You are an art historian writing a methodical, scholarly analysis.

ARTWORK INFORMATION:
{}

VISUAL ANALYSIS:
{}

RELEVANT HISTORICAL CONTEXT:
{}

Write an initial analysis that combines the visual evidence with art-historical knowledge:
1. Formal analysis of composition, color and execution
2. Stylistic placement within movements and traditions
3. Materials, technique and craftsmanship
4. Cultural and historical circumstances
5. Relationships to other works and artists

Begin with direct observations and support every interpretation with specific evidence."#,
        format_artwork(metadata),
        visual.map(format_visual).unwrap_or_else(|| "No visual analysis available".to_string()),
        format_context(context),
    )
}

pub fn perspectives(
    metadata: &ArtworkMetadata,
    analysis: &str,
    visual: Option<&VisualElements>,
) -> String {
    format!(
        r#"You are an art historian tracing how this artwork would be read across time.

CURRENT ANALYSIS:
{}

VISUAL ELEMENTS:
{}

ARTWORK CONTEXT:
{}

Describe how each of these periods would interpret the work:
1. Its original period of reception
2. 19th century viewers
3. Modernist critics of the early and mid 20th century
4. Contemporary art history

Start each perspective on its own line with a numbered header naming the period, for example
"1. Renaissance Perspective:". For each, name the aesthetic theories of the time and the
visual evidence they would emphasize."#,
        analysis,
        visual.map(format_visual).unwrap_or_else(|| "Visual analysis not available".to_string()),
        format_artwork(metadata),
    )
}

pub fn synthesis(
    metadata: &ArtworkMetadata,
    analysis: &str,
    perspectives: &[PerspectiveRecord],
    visual: Option<&VisualElements>,
    image: Option<&ImageAnalysis>,
) -> String {
    let mut prompt = String::from(
        "You are an art historian preparing a final critique that synthesizes all prior analysis.\n\n",
    );

    prompt.push_str(&format!(
        "VISUAL ANALYSIS:\n{}\n\n",
        visual.map(format_visual).unwrap_or_else(|| "No visual analysis".to_string())
    ));

    if let Some(harmony) = image.and_then(|i| i.color_harmony.as_ref()) {
        let schemes: Vec<&str> = harmony.potential_schemes.iter().map(|s| s.as_str()).collect();
        prompt.push_str(&format!(
            "COLOR HARMONY:\nDominant: {}; temperature: {:?}; intensity: {:?}; schemes: {}\n\n",
            harmony.dominant_colors.join(", "),
            harmony.color_temperature,
            harmony.color_intensity,
            schemes.join(", ")
        ));
    }

    prompt.push_str(&format!("INITIAL ANALYSIS:\n{}\n\n", analysis));
    prompt.push_str(&format!(
        "HISTORICAL PERSPECTIVES:\n{}\n\n",
        format_perspectives(perspectives)
    ));
    prompt.push_str(&format!("ARTWORK CONTEXT:\n{}\n\n", format_artwork(metadata)));

    prompt.push_str(
        r#"Structure the critique as:
I. Visual foundation
II. Historical contextualization
III. Interpretive analysis, drawing on the historical perspectives
IV. Contemporary relevance
V. Scholarly assessment

Use precise terminology and support each claim with evidence from the analysis."#,
    );

    prompt
}

pub fn discussion(
    message: &str,
    metadata: Option<&ArtworkMetadata>,
    perspectives: &[PerspectiveRecord],
    visual: Option<&VisualElements>,
) -> String {
    format!(
        r#"You are an art historian in scholarly discussion with a colleague about an artwork.

COLLEAGUE'S MESSAGE:
{}

YOUR FOUNDATION:
Visual elements: {}
Artwork context: {}
Historical perspectives: {}

Engage with their observations, cite specific visual evidence, build on or respectfully
challenge their reading, and suggest questions worth pursuing further."#,
        message,
        visual.map(format_visual).unwrap_or_else(|| "Not available".to_string()),
        metadata
            .map(format_artwork)
            .unwrap_or_else(|| "No specific artwork information provided".to_string()),
        format_perspectives(perspectives),
    )
}

fn format_artwork(metadata: &ArtworkMetadata) -> String {
    let mut lines = Vec::new();

    if let Some(title) = &metadata.title {
        lines.push(format!("Title: {}", title));
    }
    if let Some(artist) = &metadata.artist {
        lines.push(format!("Artist: {}", artist));
    }
    if let Some(year) = metadata.year {
        lines.push(format!("Date: {}", year));
    }
    if let Some(period) = &metadata.period {
        lines.push(format!("Period: {}", period));
    }
    if let Some(medium) = &metadata.medium {
        lines.push(format!("Medium: {}", medium));
    }
    if let Some(style) = &metadata.style {
        lines.push(format!("Style: {}", style));
    }
    if !metadata.colors.is_empty() {
        let colors: Vec<&str> = metadata.colors.iter().map(String::as_str).collect();
        lines.push(format!("Colors: {}", colors.join(", ")));
    }
    if !metadata.emotions.is_empty() {
        let emotions: Vec<&str> = metadata.emotions.iter().map(String::as_str).collect();
        lines.push(format!("Mood: {}", emotions.join(", ")));
    }
    if !metadata.description.is_empty() {
        lines.push(format!("Description: {}", metadata.description));
    }

    if lines.is_empty() {
        "No specific artwork information provided".to_string()
    } else {
        lines.join("\n")
    }
}

fn format_visual(visual: &VisualElements) -> String {
    let mut lines = Vec::new();
    let mut push = |label: &str, value: &Option<String>| {
        if let Some(value) = value {
            lines.push(format!("**{}**: {}", label, value));
        }
    };

    push("Composition", &visual.composition);
    push("Style", &visual.style);
    push("Medium", &visual.medium);
    push("Technique", &visual.technique);
    push("Line", &visual.formal_elements.line);
    push("Shape", &visual.formal_elements.shape);
    push("Form", &visual.formal_elements.form);
    push("Space", &visual.formal_elements.space);
    push("Lighting", &visual.lighting);
    push("Perspective", &visual.perspective);
    push("Texture", &visual.texture);
    push("Mood", &visual.mood);

    if !visual.color_palette.is_empty() {
        lines.push(format!("**Color Palette**: {}", visual.color_palette.join(", ")));
    }
    if !visual.subject_matter.is_empty() {
        lines.push(format!("**Subject Matter**: {}", visual.subject_matter.join(", ")));
    }

    if lines.is_empty() {
        "Visual elements not available".to_string()
    } else {
        lines.join("\n")
    }
}

fn format_context(context: &[ContextDocument]) -> String {
    if context.is_empty() {
        return "No relevant historical documents found".to_string();
    }

    context
        .iter()
        .take(MAX_CONTEXT_DOCS)
        .enumerate()
        .map(|(i, doc)| {
            let excerpt: String = doc.content.chars().take(CONTEXT_EXCERPT_CHARS).collect();
            format!("{}. {}...", i + 1, excerpt)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_perspectives(perspectives: &[PerspectiveRecord]) -> String {
    if perspectives.is_empty() {
        return "No historical perspectives available".to_string();
    }

    perspectives
        .iter()
        .map(|p| {
            let mut entry = format!("**{}** (confidence {:.1}): {}", p.period, p.confidence, p.viewpoint);
            if !p.key_aspects.is_empty() {
                entry.push_str(&format!("\nKey aspects: {}", p.key_aspects.join("; ")));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
