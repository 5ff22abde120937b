//! The question-answering pipeline.
//!
//! [`FaqEngine`] owns the long-lived collaborators: the language identifier,
//! the matcher (with its read-only index and embedding provider), and the
//! conversation logger. It is constructed once at startup, either from a
//! [`Config`] via [`FaqEngine::bootstrap`] or from injected parts via
//! [`FaqEngine::new`], and shared behind an `Arc` afterwards.
//!
//! ```text
//! question ─▶ trim/validate ─▶ identify ─▶ match_query ─▶ record ─▶ Reply
//! ```

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::conversation_log::ConversationLogger;
use crate::corpus::load_corpus;
use crate::embedding::{create_provider, EmbeddingProvider};
use crate::error::{FaqError, FaqResult};
use crate::index::FaqIndex;
use crate::language::LanguageIdentifier;
use crate::matcher::{MatchResult, Matcher};
use crate::models::{ConversationLogEntry, FaqEntry, LanguageCode, Reply};

pub struct FaqEngine {
    identifier: LanguageIdentifier,
    matcher: Matcher,
    logger: ConversationLogger,
}

impl FaqEngine {
    pub fn new(
        identifier: LanguageIdentifier,
        matcher: Matcher,
        logger: ConversationLogger,
    ) -> Self {
        Self {
            identifier,
            matcher,
            logger,
        }
    }

    /// Load the corpus, create the embedding provider, and build the index.
    ///
    /// Any failure here is a [`FaqError::Bootstrap`]; callers must not start
    /// serving when this returns an error.
    pub async fn bootstrap(config: &Config) -> FaqResult<Self> {
        if !config.embedding.is_enabled() {
            return Err(FaqError::Bootstrap(anyhow::anyhow!(
                "an embedding provider is required to build the FAQ index"
            )));
        }

        let corpus = load_corpus(&config.corpus.path).map_err(FaqError::Bootstrap)?;
        info!(
            path = %config.corpus.path.display(),
            entries = corpus.len(),
            "loaded FAQ corpus"
        );

        let provider = create_provider(&config.embedding)
            .await
            .map_err(FaqError::Bootstrap)?;
        info!(model = provider.model_name(), dims = provider.dims(), "embedding provider ready");

        Self::with_provider(config, corpus, provider).await
    }

    /// Build an engine from an already-loaded corpus and provider.
    pub async fn with_provider(
        config: &Config,
        corpus: Vec<FaqEntry>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> FaqResult<Self> {
        let index = FaqIndex::build(corpus, provider.as_ref(), config.embedding.batch_size)
            .await
            .map_err(FaqError::Bootstrap)?;

        let matcher = Matcher::new(Arc::new(index), provider, config.matching.threshold);
        Ok(Self::new(
            LanguageIdentifier::default(),
            matcher,
            ConversationLogger::new(&config.logging.dir),
        ))
    }

    pub fn identifier(&self) -> &LanguageIdentifier {
        &self.identifier
    }

    pub fn index(&self) -> &FaqIndex {
        self.matcher.index()
    }

    /// Identify the language of `question` and match it.
    ///
    /// Does not write to the conversation log.
    pub async fn resolve(&self, question: &str) -> FaqResult<(LanguageCode, MatchResult)> {
        let question = question.trim();
        if question.is_empty() {
            return Err(FaqError::Validation("Missing question".to_string()));
        }

        let lang = self.identifier.identify(question);
        debug!(lang = %lang, query = question, "detected language");

        let result = self
            .matcher
            .match_query(question, lang)
            .await
            .map_err(FaqError::Collaborator)?;
        Ok((lang, result))
    }

    /// Answer a question end to end and record it in the conversation log.
    pub async fn ask(&self, question: &str) -> FaqResult<Reply> {
        let (lang, result) = match self.resolve(question).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(error = %e, "question could not be answered");
                return Err(e);
            }
        };

        info!(
            lang = %lang,
            decision = result.kind(),
            score = result.score(),
            faq_id = ?result.faq_id(),
            "answered question"
        );

        let entry = ConversationLogEntry {
            timestamp: Local::now().into(),
            user_query: question.trim().to_string(),
            detected_language: lang,
            faq_id: result.faq_id().cloned(),
            similarity_score: result.score(),
            answer: result.answer().to_string(),
        };
        self.logger.record(&entry).map_err(FaqError::Log)?;

        Ok(result.to_reply(lang))
    }
}
