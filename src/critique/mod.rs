// Critique pipeline - deterministic extractors driven by a staged orchestrator

pub mod collaborators;
pub mod config;
pub mod error;
pub mod extractors;
pub mod lexicon;
pub mod orchestrator;
pub mod prompts;
pub mod types;

pub use collaborators::{
    ContextDocument, ContextSearch, Generator, InMemoryKnowledgeBase, KnowledgeDocument,
    KnowledgeStore, OllamaGenerator,
};
pub use config::CritiqueConfig;
pub use error::{CollaboratorError, CritiqueError, Result};
pub use extractors::{MetadataExtractor, PerspectiveSegmenter, VisualExtractor};
pub use lexicon::Lexicon;
pub use orchestrator::{Orchestrator, RunOutcome, Stage, next_stage};
pub use types::{
    AgentState, ArtworkMetadata, ContentPart, FormalElements, ImageAnalysis, ImageRef,
    InputMessage, MessageContent, PerspectiveRecord, PeriodCandidate, Role, VisualElements,
};
