// Configuration for the critique pipeline

use super::error::Result;
use super::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CritiqueConfig {
    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    #[serde(default = "default_endpoint")]
    pub ollama_endpoint: String,

    #[serde(default = "default_text_temperature")]
    pub text_temperature: f32,

    #[serde(default = "default_vision_temperature")]
    pub vision_temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Per-request timeout for generation calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Documents requested from the context-search collaborator
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Replacement lexicon tables; built-in tables when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,
}

fn default_text_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_vision_model() -> String {
    "llava:13b".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_text_temperature() -> f32 {
    0.7
}

fn default_vision_temperature() -> f32 {
    0.6
}

fn default_top_p() -> f32 {
    0.9
}

fn default_request_timeout() -> u64 {
    120_000
}

fn default_search_limit() -> usize {
    5
}

impl Default for CritiqueConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            ollama_endpoint: default_endpoint(),
            text_temperature: default_text_temperature(),
            vision_temperature: default_vision_temperature(),
            top_p: default_top_p(),
            request_timeout_ms: default_request_timeout(),
            search_limit: default_search_limit(),
            lexicon_path: None,
        }
    }
}

impl CritiqueConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: CritiqueConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// `<config_dir>/atelier/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("atelier").join("config.toml"))
    }

    /// User config file when present, else defaults; `OLLAMA_MODEL` overrides the text model
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            config.text_model = model;
        }

        Ok(config)
    }

    /// The configured lexicon tables
    pub fn lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_file(path),
            None => Ok(Lexicon::builtin()),
        }
    }
}
