// Orchestrator - staged critique pipeline over AgentState

use super::collaborators::{
    ContextSearch, Generator, InMemoryKnowledgeBase, KnowledgeDocument, KnowledgeStore,
    OllamaGenerator,
};
use super::config::CritiqueConfig;
use super::error::{CritiqueError, Result};
use super::extractors::{
    MetadataExtractor, PerspectiveSegmenter, VisualExtractor, analyze_color_harmony,
};
use super::lexicon::Lexicon;
use super::prompts;
use super::types::{AgentState, ArtworkMetadata, ImageAnalysis, InputMessage};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pipeline stages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    IntakeDetect,
    VisualAnalyze,
    ArtworkAnalyze,
    PerspectivesGenerate,
    Synthesize,
    Discussion,
    Terminal,
}

impl Stage {
    /// Entry stage for a fresh state
    pub fn initial(state: &AgentState) -> Self {
        if state.discussion_mode {
            Stage::Discussion
        } else {
            Stage::IntakeDetect
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::IntakeDetect => "intake_detect",
            Stage::VisualAnalyze => "visual_analyze",
            Stage::ArtworkAnalyze => "artwork_analyze",
            Stage::PerspectivesGenerate => "perspectives_generate",
            Stage::Synthesize => "synthesize",
            Stage::Discussion => "discussion",
            Stage::Terminal => "terminal",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the pipeline goes after `stage`, given what that stage left in `state`
pub fn next_stage(stage: Stage, state: &AgentState) -> Stage {
    match stage {
        Stage::IntakeDetect => {
            if state.has_image {
                Stage::VisualAnalyze
            } else {
                Stage::ArtworkAnalyze
            }
        }
        Stage::VisualAnalyze => Stage::ArtworkAnalyze,
        Stage::ArtworkAnalyze => {
            if state.artwork_metadata.is_some() && state.current_analysis.is_some() {
                Stage::PerspectivesGenerate
            } else {
                Stage::Terminal
            }
        }
        Stage::PerspectivesGenerate => {
            if state.historical_perspectives.is_empty() {
                Stage::Terminal
            } else {
                Stage::Synthesize
            }
        }
        Stage::Synthesize | Stage::Discussion | Stage::Terminal => Stage::Terminal,
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: AgentState,
    /// Every stage entered, ending with `Terminal`
    pub trace: Vec<Stage>,
    /// Latest assistant message, if the run produced one
    pub output: Option<String>,
}

/// Drives one `AgentState` through the stages, calling collaborators along the way
pub struct Orchestrator {
    text: Arc<dyn Generator>,
    vision: Arc<dyn Generator>,
    search: Arc<dyn ContextSearch>,
    store: Arc<dyn KnowledgeStore>,
    metadata: MetadataExtractor,
    visual: VisualExtractor,
    segmenter: PerspectiveSegmenter,
    search_limit: usize,
}

impl Orchestrator {
    pub fn new(
        lexicon: Arc<Lexicon>,
        text: Arc<dyn Generator>,
        vision: Arc<dyn Generator>,
        search: Arc<dyn ContextSearch>,
        store: Arc<dyn KnowledgeStore>,
    ) -> Self {
        Self {
            text,
            vision,
            search,
            store,
            metadata: MetadataExtractor::new(lexicon.clone()),
            visual: VisualExtractor::new(lexicon.clone()),
            segmenter: PerspectiveSegmenter::new(lexicon),
            search_limit: CritiqueConfig::default().search_limit,
        }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Ollama generators plus a shared knowledge base for search and storage
    pub fn from_config(config: &CritiqueConfig, knowledge: Arc<InMemoryKnowledgeBase>) -> Result<Self> {
        let lexicon = Arc::new(config.lexicon()?);
        let text = Arc::new(OllamaGenerator::text(config)?);
        let vision = Arc::new(OllamaGenerator::vision(config)?);

        Ok(Self::new(lexicon, text, vision, knowledge.clone(), knowledge)
            .with_search_limit(config.search_limit))
    }

    /// Run the pipeline to `Terminal`. A collaborator failure or cancellation
    /// aborts the run and the partial state is dropped.
    pub async fn run(&self, state: AgentState, cancel: &CancellationToken) -> Result<RunOutcome> {
        let mut state = state;
        let mut stage = Stage::initial(&state);
        let mut trace = Vec::new();

        loop {
            trace.push(stage);
            if stage == Stage::Terminal {
                break;
            }

            info!(stage = %stage, "entering stage");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(stage = %stage, "run cancelled");
                    return Err(CritiqueError::Cancelled);
                }
                result = self.execute(stage, &mut state) => result?,
            }

            let next = next_stage(stage, &state);
            debug!(stage = %stage, next = %next, "routing");
            stage = next;
        }

        Ok(RunOutcome {
            output: state.output(),
            state,
            trace,
        })
    }

    /// Critique a description, optionally with an image reference (path, URL or data URI)
    pub async fn analyze(
        &self,
        description: &str,
        image: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let message = match image {
            Some(image) => InputMessage::user_with_image(description, image),
            None => InputMessage::user(description),
        };
        let outcome = self.run(AgentState::new(vec![message]), cancel).await?;
        Ok(outcome.output)
    }

    /// Answer a peer's message from prior context
    pub async fn discuss(
        &self,
        message: &str,
        metadata: Option<ArtworkMetadata>,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let state = AgentState::discussion(InputMessage::user(message), metadata);
        let outcome = self.run(state, cancel).await?;
        Ok(outcome.output)
    }

    // Each effect finishes its collaborator calls before writing to state.
    async fn execute(&self, stage: Stage, state: &mut AgentState) -> Result<()> {
        match stage {
            Stage::IntakeDetect => {
                self.intake(state);
                Ok(())
            }
            Stage::VisualAnalyze => self.visual_analyze(state).await,
            Stage::ArtworkAnalyze => self.artwork_analyze(state).await,
            Stage::PerspectivesGenerate => self.perspectives_generate(state).await,
            Stage::Synthesize => self.synthesize(state).await,
            Stage::Discussion => self.discussion(state).await,
            Stage::Terminal => Ok(()),
        }
    }

    fn intake(&self, state: &mut AgentState) {
        state.has_image = state.last_message().is_some_and(InputMessage::has_image);
        if state.has_image {
            info!("image detected");
        }
    }

    async fn visual_analyze(&self, state: &mut AgentState) -> Result<()> {
        let Some(image) = state.last_message().and_then(InputMessage::image_ref) else {
            warn!("image flagged but no reference found");
            return Ok(());
        };

        let raw = self
            .vision
            .generate(&prompts::visual_analysis(), Some(&image))
            .await?;

        let elements = self.visual.parse(&raw);
        let technical = self.visual.technical_details(&raw);
        let color_harmony = analyze_color_harmony(&elements.color_palette);
        debug!(kinds = elements.kinds().len(), "visual elements extracted");

        state.visual_elements = Some(elements);
        state.image_analysis = Some(ImageAnalysis {
            raw_analysis: raw,
            timestamp: Utc::now(),
            color_harmony,
            technical,
        });
        Ok(())
    }

    async fn artwork_analyze(&self, state: &mut AgentState) -> Result<()> {
        let text = state.last_message().map(InputMessage::text).unwrap_or_default();
        let metadata = self.metadata.extract(&text);

        let query = prompts::search_query(&metadata, state.visual_elements.as_ref());
        let context = self.search.search(&query, self.search_limit).await?;
        debug!(documents = context.len(), "context retrieved");

        let prompt = prompts::analysis(&metadata, &context, state.visual_elements.as_ref());
        let analysis = self.text.generate(&prompt, None).await?;

        state.artwork_metadata = Some(metadata);
        state.current_analysis = (!analysis.trim().is_empty()).then_some(analysis);
        Ok(())
    }

    async fn perspectives_generate(&self, state: &mut AgentState) -> Result<()> {
        let (Some(metadata), Some(analysis)) = (&state.artwork_metadata, &state.current_analysis)
        else {
            return Ok(());
        };

        let prompt = prompts::perspectives(metadata, analysis, state.visual_elements.as_ref());
        let response = self.text.generate(&prompt, None).await?;
        let records = self.segmenter.segment(&response);
        debug!(records = records.len(), "perspectives segmented");

        state.historical_perspectives = records;
        Ok(())
    }

    async fn synthesize(&self, state: &mut AgentState) -> Result<()> {
        let metadata = state.artwork_metadata.clone().unwrap_or_default();
        let prompt = prompts::synthesis(
            &metadata,
            state.current_analysis.as_deref().unwrap_or_default(),
            &state.historical_perspectives,
            state.visual_elements.as_ref(),
            state.image_analysis.as_ref(),
        );
        let critique = self.text.generate(&prompt, None).await?;

        let document = KnowledgeDocument {
            content: format!("Analysis: {}", critique),
            metadata: analysis_metadata(&metadata),
        };
        // Detached: the run never waits on the store
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.store(document).await {
                warn!(error = %e, "failed to store critique");
            }
        });

        state.messages.push(InputMessage::assistant(critique));
        state.critique_complete = true;
        Ok(())
    }

    async fn discussion(&self, state: &mut AgentState) -> Result<()> {
        let message = state.last_message().map(InputMessage::text).unwrap_or_default();
        let prompt = prompts::discussion(
            &message,
            state.artwork_metadata.as_ref(),
            &state.historical_perspectives,
            state.visual_elements.as_ref(),
        );
        let response = self.text.generate(&prompt, None).await?;

        state.messages.push(InputMessage::assistant(response));
        Ok(())
    }
}

fn analysis_metadata(metadata: &ArtworkMetadata) -> HashMap<String, serde_json::Value> {
    let mut fields = HashMap::new();
    fields.insert("type".to_string(), json!("analysis"));
    fields.insert(
        "artwork".to_string(),
        json!(metadata.title.as_deref().unwrap_or("Unknown")),
    );
    fields.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
    if let Some(period) = &metadata.period {
        fields.insert("period".to_string(), json!(period));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critique::collaborators::ContextDocument;
    use crate::critique::error::CollaboratorError;
    use crate::critique::extractors::ColorScheme;
    use crate::critique::types::ImageRef;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replies from a fixed script and records every prompt
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<(String, Option<ImageRef>)>>,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Option<ImageRef>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            image: Option<&ImageRef>,
        ) -> std::result::Result<String, CollaboratorError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), image.cloned()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| CollaboratorError::Generation("script exhausted".to_string()))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _image: Option<&ImageRef>,
        ) -> std::result::Result<String, CollaboratorError> {
            Err(CollaboratorError::Network("connection refused".to_string()))
        }
    }

    struct PendingGenerator;

    #[async_trait]
    impl Generator for PendingGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _image: Option<&ImageRef>,
        ) -> std::result::Result<String, CollaboratorError> {
            std::future::pending().await
        }
    }

    struct FailingStore;

    #[async_trait]
    impl KnowledgeStore for FailingStore {
        async fn store(&self, _document: KnowledgeDocument) -> std::result::Result<(), CollaboratorError> {
            Err(CollaboratorError::Storage("disk full".to_string()))
        }
    }

    struct HangingStore;

    #[async_trait]
    impl KnowledgeStore for HangingStore {
        async fn store(&self, _document: KnowledgeDocument) -> std::result::Result<(), CollaboratorError> {
            std::future::pending().await
        }
    }

    struct EmptySearch;

    #[async_trait]
    impl ContextSearch for EmptySearch {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> std::result::Result<Vec<ContextDocument>, CollaboratorError> {
            Ok(Vec::new())
        }
    }

    const HARBOR: &str = "This oil painting, titled \"The Harbor\", painted by Claude Monet in 1873, \
        uses cool blue and warm gold tones to evoke a peaceful mood.";

    const PERSPECTIVES: &str = "1. Impressionist Perspective: Fellow painters would praise the broken color and the speed with which the light on the water was caught.\n\
        2. Academic Period: Salon critics would call the surface unfinished and object to the absence of a clear narrative subject.\n\
        3. Modernist View: Later critics would value the flattening of space and the autonomy of each stroke of color.";

    fn orchestrator(
        text: Arc<dyn Generator>,
        vision: Arc<dyn Generator>,
        knowledge: Arc<InMemoryKnowledgeBase>,
    ) -> Orchestrator {
        Orchestrator::new(
            Arc::new(Lexicon::builtin()),
            text,
            vision,
            knowledge.clone(),
            knowledge,
        )
    }

    #[test]
    fn test_transitions() {
        let mut state = AgentState::default();
        assert_eq!(next_stage(Stage::IntakeDetect, &state), Stage::ArtworkAnalyze);
        state.has_image = true;
        assert_eq!(next_stage(Stage::IntakeDetect, &state), Stage::VisualAnalyze);
        assert_eq!(next_stage(Stage::VisualAnalyze, &state), Stage::ArtworkAnalyze);

        assert_eq!(next_stage(Stage::ArtworkAnalyze, &state), Stage::Terminal);
        state.artwork_metadata = Some(ArtworkMetadata::default());
        assert_eq!(next_stage(Stage::ArtworkAnalyze, &state), Stage::Terminal);
        state.current_analysis = Some("analysis".to_string());
        assert_eq!(next_stage(Stage::ArtworkAnalyze, &state), Stage::PerspectivesGenerate);

        assert_eq!(next_stage(Stage::PerspectivesGenerate, &state), Stage::Terminal);
        state.historical_perspectives.push(crate::critique::types::PerspectiveRecord {
            period: "Baroque".to_string(),
            viewpoint: "drama".to_string(),
            key_aspects: Vec::new(),
            confidence: 0.9,
        });
        assert_eq!(next_stage(Stage::PerspectivesGenerate, &state), Stage::Synthesize);

        assert_eq!(next_stage(Stage::Synthesize, &state), Stage::Terminal);
        assert_eq!(next_stage(Stage::Discussion, &state), Stage::Terminal);
        assert_eq!(next_stage(Stage::Terminal, &state), Stage::Terminal);
    }

    #[test]
    fn test_initial_stage() {
        assert_eq!(Stage::initial(&AgentState::default()), Stage::IntakeDetect);
        let state = AgentState::discussion(InputMessage::user("hello"), None);
        assert_eq!(Stage::initial(&state), Stage::Discussion);
    }

    #[tokio::test]
    async fn test_empty_analysis_stops_after_artwork_analysis() {
        let text = ScriptedGenerator::new(&[""]);
        let orchestrator = orchestrator(
            text.clone(),
            ScriptedGenerator::new(&[]),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        );
        let state = AgentState::new(vec![InputMessage::user("A quiet picture of some boats")]);

        let outcome = orchestrator.run(state, &CancellationToken::new()).await.unwrap();

        assert_eq!(
            outcome.trace,
            vec![Stage::IntakeDetect, Stage::ArtworkAnalyze, Stage::Terminal]
        );
        assert!(outcome.state.historical_perspectives.is_empty());
        assert!(!outcome.state.critique_complete);
        assert!(outcome.state.current_analysis.is_none());
        let metadata = outcome.state.artwork_metadata.unwrap();
        assert!(metadata.title.is_none() && metadata.year.is_none());
        assert!(outcome.output.is_none());
        assert_eq!(text.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_full_text_pipeline() {
        let knowledge = Arc::new(InMemoryKnowledgeBase::seeded());
        let text = ScriptedGenerator::new(&[
            "The harbor dissolves into flickering light and broken color.",
            PERSPECTIVES,
            "A luminous, decisive critique.",
        ]);
        let orchestrator = orchestrator(text.clone(), ScriptedGenerator::new(&[]), knowledge.clone());

        let outcome = orchestrator
            .run(AgentState::new(vec![InputMessage::user(HARBOR)]), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome.trace,
            vec![
                Stage::IntakeDetect,
                Stage::ArtworkAnalyze,
                Stage::PerspectivesGenerate,
                Stage::Synthesize,
                Stage::Terminal
            ]
        );
        let state = &outcome.state;
        assert!(state.critique_complete);
        assert!(!state.has_image);
        assert_eq!(outcome.output.as_deref(), Some("A luminous, decisive critique."));

        let metadata = state.artwork_metadata.as_ref().unwrap();
        assert_eq!(metadata.title.as_deref(), Some("The Harbor"));
        assert_eq!(metadata.year, Some(1873));
        assert_eq!(state.historical_perspectives.len(), 3);
        assert_eq!(state.historical_perspectives[0].period, "Impressionist");

        let calls = text.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].0.contains("Impressionism (late 19th century)"));
        assert!(calls[1].0.contains("flickering light"));
        assert!(calls[2].0.contains("**Impressionist** (confidence 0.9)"));
        assert!(calls.iter().all(|(_, image)| image.is_none()));

        // the critique is stored in the background and then retrievable
        tokio::time::timeout(Duration::from_secs(1), async {
            while knowledge.len().await < 6 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("critique stored");
        assert_eq!(knowledge.len().await, 6);
        let hits = knowledge.search("luminous decisive critique", 1).await.unwrap();
        assert_eq!(hits[0].metadata["type"], "analysis");
        assert_eq!(hits[0].metadata["artwork"], "The Harbor");
    }

    #[tokio::test]
    async fn test_image_pipeline() {
        let vision = ScriptedGenerator::new(&[
            "The composition is built on a strong diagonal. \
             The palette is predominantly blue with shades of orange. Thick impasto on canvas.",
        ]);
        let text = ScriptedGenerator::new(&["A study of a harbor at dawn.", ""]);
        let orchestrator = orchestrator(
            text.clone(),
            vision.clone(),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        );
        let message = InputMessage::user_with_image("A harbor study", "data:image/png;base64,QUJD");

        let outcome = orchestrator
            .run(AgentState::new(vec![message]), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome.trace,
            vec![
                Stage::IntakeDetect,
                Stage::VisualAnalyze,
                Stage::ArtworkAnalyze,
                Stage::PerspectivesGenerate,
                Stage::Terminal
            ]
        );
        let state = &outcome.state;
        assert!(state.has_image);
        assert!(!state.critique_complete);
        assert!(state.historical_perspectives.is_empty());

        let visual = state.visual_elements.as_ref().unwrap();
        assert_eq!(visual.color_palette, vec!["blue", "orange"]);
        let analysis = state.image_analysis.as_ref().unwrap();
        assert_eq!(analysis.technical.support.as_deref(), Some("canvas"));
        let harmony = analysis.color_harmony.as_ref().unwrap();
        assert!(harmony.potential_schemes.contains(&ColorScheme::Complementary));

        let vision_calls = vision.calls();
        assert_eq!(vision_calls.len(), 1);
        assert_eq!(
            vision_calls[0].1,
            Some(ImageRef::DataUri("data:image/png;base64,QUJD".to_string()))
        );
        assert!(text.calls()[0].0.contains("**Color Palette**: blue, orange"));
    }

    #[tokio::test]
    async fn test_discussion_mode() {
        let text = ScriptedGenerator::new(&["The light is crepuscular, not dawn."]);
        let orchestrator = orchestrator(
            text.clone(),
            ScriptedGenerator::new(&[]),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        );
        let metadata = ArtworkMetadata {
            title: Some("The Harbor".to_string()),
            ..ArtworkMetadata::default()
        };

        let reply = orchestrator
            .discuss("Is this really dawn?", Some(metadata), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply.as_deref(), Some("The light is crepuscular, not dawn."));
        let calls = text.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("Is this really dawn?"));
        assert!(calls[0].0.contains("Title: The Harbor"));
    }

    #[tokio::test]
    async fn test_collaborator_failure_aborts_run() {
        let orchestrator = orchestrator(
            Arc::new(FailingGenerator),
            ScriptedGenerator::new(&[]),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        );

        let result = orchestrator
            .run(AgentState::new(vec![InputMessage::user(HARBOR)]), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(CritiqueError::Collaborator(CollaboratorError::Network(_)))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_surfaced() {
        let text = ScriptedGenerator::new(&["An analysis.", PERSPECTIVES, "The critique."]);
        let orchestrator = Orchestrator::new(
            Arc::new(Lexicon::builtin()),
            text,
            ScriptedGenerator::new(&[]),
            Arc::new(EmptySearch),
            Arc::new(FailingStore),
        );

        let outcome = orchestrator
            .run(AgentState::new(vec![InputMessage::user(HARBOR)]), &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.state.critique_complete);
        assert_eq!(outcome.output.as_deref(), Some("The critique."));
    }

    #[tokio::test]
    async fn test_hanging_store_does_not_block_run() {
        let text = ScriptedGenerator::new(&["An analysis.", PERSPECTIVES, "The critique."]);
        let orchestrator = Orchestrator::new(
            Arc::new(Lexicon::builtin()),
            text,
            ScriptedGenerator::new(&[]),
            Arc::new(EmptySearch),
            Arc::new(HangingStore),
        );

        let outcome = tokio::time::timeout(
            Duration::from_secs(2),
            orchestrator.run(AgentState::new(vec![InputMessage::user(HARBOR)]), &CancellationToken::new()),
        )
        .await
        .expect("run finishes while the store hangs")
        .unwrap();

        assert!(outcome.state.critique_complete);
        assert_eq!(outcome.trace.last(), Some(&Stage::Terminal));
        assert_eq!(outcome.output.as_deref(), Some("The critique."));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let orchestrator = orchestrator(
            ScriptedGenerator::new(&["unused"]),
            ScriptedGenerator::new(&[]),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = orchestrator
            .run(AgentState::new(vec![InputMessage::user(HARBOR)]), &cancel)
            .await;

        assert!(matches!(result, Err(CritiqueError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_while_generator_pending() {
        let orchestrator = orchestrator(
            Arc::new(PendingGenerator),
            ScriptedGenerator::new(&[]),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        );
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = orchestrator
            .run(AgentState::new(vec![InputMessage::user(HARBOR)]), &cancel)
            .await;

        assert!(matches!(result, Err(CritiqueError::Cancelled)));
    }

    #[tokio::test]
    async fn test_analyze_returns_critique() {
        let text = ScriptedGenerator::new(&["An analysis.", PERSPECTIVES, "Final words."]);
        let orchestrator = orchestrator(
            text,
            ScriptedGenerator::new(&[]),
            Arc::new(InMemoryKnowledgeBase::seeded()),
        )
        .with_search_limit(1);

        let critique = orchestrator
            .analyze(HARBOR, None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(critique.as_deref(), Some("Final words."));
    }
}
