// atelier - structured art critique
// Extracts artwork facts from free text and sequences generation calls into a final critique

pub mod critique;

pub use critique::{CritiqueConfig, CritiqueError, Orchestrator, Result};
