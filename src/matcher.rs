//! Query matching against the FAQ index.
//!
//! Matching runs in two stages:
//!
//! 1. **Exact match**: a case-insensitive comparison of the trimmed query
//!    against every question in the language bucket. A hit returns score
//!    `1.0` and never touches the embedding provider.
//! 2. **Similarity**: the query is embedded and compared by cosine
//!    similarity with every vector in the bucket. The best score must be
//!    strictly greater than the threshold to count as a match.
//!
//! The similarity scan is a left-to-right linear pass with a strict `>`
//! comparison, so ties resolve to the lowest index.

use anyhow::Result;
use rand::Rng;
use std::sync::Arc;

use crate::embedding::{cosine_similarity, l2_normalize, EmbeddingProvider};
use crate::index::FaqIndex;
use crate::models::{FaqEntry, FaqId, LanguageCode, Reply};

/// Default similarity threshold (exclusive).
pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Score reported when a language bucket is empty.
pub const NO_CANDIDATE_SCORE: f32 = -1.0;

/// Outcome of matching one query.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// The query equals a known question (case-insensitive). Score is `1.0`.
    Exact { entry: FaqEntry },
    /// The nearest question's similarity exceeded the threshold.
    Similarity { entry: FaqEntry, score: f32 },
    /// Nothing matched. `score` is the best similarity seen, or `-1.0`.
    NoMatch { score: f32, message: &'static str },
}

impl MatchResult {
    pub fn score(&self) -> f32 {
        match self {
            MatchResult::Exact { .. } => 1.0,
            MatchResult::Similarity { score, .. } => *score,
            MatchResult::NoMatch { score, .. } => *score,
        }
    }

    pub fn entry(&self) -> Option<&FaqEntry> {
        match self {
            MatchResult::Exact { entry } | MatchResult::Similarity { entry, .. } => Some(entry),
            MatchResult::NoMatch { .. } => None,
        }
    }

    pub fn faq_id(&self) -> Option<&FaqId> {
        self.entry().map(|e| &e.id)
    }

    /// The text shown to the user: the FAQ answer or the localized fallback.
    pub fn answer(&self) -> &str {
        match self {
            MatchResult::Exact { entry } | MatchResult::Similarity { entry, .. } => &entry.answer,
            MatchResult::NoMatch { message, .. } => message,
        }
    }

    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchResult::Exact { .. } => "exact",
            MatchResult::Similarity { .. } => "similarity",
            MatchResult::NoMatch { .. } => "no_match",
        }
    }

    /// Build the caller-facing reply, attaching a fresh thinking time.
    pub fn to_reply(&self, detected_language: LanguageCode) -> Reply {
        Reply {
            reply: self.answer().to_string(),
            image: self.entry().and_then(|e| e.image.clone()),
            thinking_time: sample_thinking_time(),
            detected_language,
        }
    }
}

/// Localized "no answer found" message. Unknown languages get English.
pub fn fallback_message(lang: LanguageCode) -> &'static str {
    match lang {
        LanguageCode::En => "I'm sorry, I couldn't find an answer.",
        LanguageCode::My => "စိတ်မရှိပါနဲ့ နီးစပ်သောအဖြေမတွေ့ပါ",
        LanguageCode::Ja => "申し訳ありません、回答が見つかりません。",
        LanguageCode::Th => "ขออภัย ไม่พบคำตอบ",
    }
}

/// UI pacing delay in milliseconds, uniform in `[300, 800)`.
pub fn sample_thinking_time() -> f64 {
    rand::thread_rng().gen_range(300.0..800.0)
}

/// Matches queries against a shared, read-only [`FaqIndex`].
#[derive(Clone)]
pub struct Matcher {
    index: Arc<FaqIndex>,
    provider: Arc<dyn EmbeddingProvider>,
    threshold: f32,
}

impl Matcher {
    pub fn new(index: Arc<FaqIndex>, provider: Arc<dyn EmbeddingProvider>, threshold: f32) -> Self {
        Self {
            index,
            provider,
            threshold,
        }
    }

    pub fn index(&self) -> &FaqIndex {
        &self.index
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Match `query` within the bucket for `lang`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the query could not be embedded.
    pub async fn match_query(&self, query: &str, lang: LanguageCode) -> Result<MatchResult> {
        let query = query.trim();
        let bucket = self.index.bucket(lang);

        let lowered = query.to_lowercase();
        if let Some(hit) = bucket
            .iter()
            .find(|f| f.entry.question.to_lowercase() == lowered)
        {
            return Ok(MatchResult::Exact {
                entry: hit.entry.clone(),
            });
        }

        let mut query_vec = self.provider.embed_query(query).await?;
        l2_normalize(&mut query_vec);

        let mut best_score = NO_CANDIDATE_SCORE;
        let mut best_idx = None;
        for (i, item) in bucket.iter().enumerate() {
            let sim = cosine_similarity(&query_vec, &item.vector);
            if sim > best_score {
                best_score = sim;
                best_idx = Some(i);
            }
        }

        match best_idx.and_then(|i| bucket.get(i)) {
            Some(best) if best_score > self.threshold => Ok(MatchResult::Similarity {
                entry: best.entry.clone(),
                score: best_score,
            }),
            _ => Ok(MatchResult::NoMatch {
                score: best_score,
                message: fallback_message(lang),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider backed by a fixed text → vector table.
    struct TableProvider {
        table: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl TableProvider {
        fn new(pairs: &[(&str, Vec<f32>)]) -> Arc<Self> {
            Arc::new(Self {
                table: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for TableProvider {
        fn model_name(&self) -> &str {
            "table"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            texts
                .iter()
                .map(|t| {
                    self.table
                        .get(t)
                        .cloned()
                        .ok_or_else(|| anyhow::anyhow!("no vector for {:?}", t))
                })
                .collect()
        }
    }

    fn entry(id: i64, lang: LanguageCode, question: &str) -> FaqEntry {
        FaqEntry {
            id: FaqId::Number(id),
            lang,
            question: question.to_string(),
            answer: format!("answer {}", id),
            image: if id == 1 {
                Some("/images/one.png".to_string())
            } else {
                None
            },
        }
    }

    /// Unit vector at `cos = c` against the query direction `[1, 0]`.
    fn at_cos(c: f32) -> Vec<f32> {
        vec![c, (1.0 - c * c).max(0.0).sqrt()]
    }

    async fn matcher_with(
        corpus: Vec<FaqEntry>,
        provider: Arc<TableProvider>,
    ) -> Matcher {
        let index = FaqIndex::build(corpus, provider.as_ref(), 16).await.unwrap();
        provider.calls.store(0, Ordering::SeqCst);
        Matcher::new(Arc::new(index), provider, DEFAULT_THRESHOLD)
    }

    #[tokio::test]
    async fn test_exact_match_is_case_insensitive_and_skips_embedding() {
        let provider = TableProvider::new(&[("Hi", vec![1.0, 0.0])]);
        let matcher = matcher_with(vec![entry(1, LanguageCode::En, "Hi")], provider.clone()).await;

        let result = matcher.match_query("  hi ", LanguageCode::En).await.unwrap();

        assert_eq!(result.kind(), "exact");
        assert_eq!(result.score(), 1.0);
        assert_eq!(result.faq_id(), Some(&FaqId::Number(1)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exact_match_is_scoped_to_language() {
        let provider = TableProvider::new(&[("Hi", vec![1.0, 0.0]), ("hi", vec![0.0, 1.0])]);
        let matcher = matcher_with(vec![entry(1, LanguageCode::En, "Hi")], provider.clone()).await;

        let result = matcher.match_query("hi", LanguageCode::Th).await.unwrap();
        assert_eq!(
            result,
            MatchResult::NoMatch {
                score: NO_CANDIDATE_SCORE,
                message: fallback_message(LanguageCode::Th),
            }
        );
    }

    #[tokio::test]
    async fn test_best_similarity_wins() {
        let provider = TableProvider::new(&[
            ("low", at_cos(0.3)),
            ("high", at_cos(0.9)),
            ("query", vec![1.0, 0.0]),
        ]);
        let matcher = matcher_with(
            vec![
                entry(1, LanguageCode::En, "low"),
                entry(2, LanguageCode::En, "high"),
            ],
            provider.clone(),
        )
        .await;

        let result = matcher.match_query("query", LanguageCode::En).await.unwrap();

        assert_eq!(result.kind(), "similarity");
        assert_eq!(result.faq_id(), Some(&FaqId::Number(2)));
        assert!((result.score() - 0.9).abs() < 1e-5);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ties_resolve_to_lowest_index() {
        let provider = TableProvider::new(&[
            ("first", at_cos(0.8)),
            ("second", at_cos(0.8)),
            ("query", vec![1.0, 0.0]),
        ]);
        let matcher = matcher_with(
            vec![
                entry(1, LanguageCode::En, "first"),
                entry(2, LanguageCode::En, "second"),
            ],
            provider,
        )
        .await;

        let result = matcher.match_query("query", LanguageCode::En).await.unwrap();
        assert_eq!(result.faq_id(), Some(&FaqId::Number(1)));
    }

    #[tokio::test]
    async fn test_threshold_is_exclusive() {
        let provider = TableProvider::new(&[("faq", vec![1.0, 0.0]), ("query", vec![1.0, 0.0])]);
        let index = FaqIndex::build(
            vec![entry(1, LanguageCode::En, "faq")],
            provider.as_ref(),
            16,
        )
        .await
        .unwrap();
        // Identical vectors score exactly 1.0; a threshold of 1.0 must reject it.
        let strict = Matcher::new(Arc::new(index), provider, 1.0);

        let result = strict.match_query("query", LanguageCode::En).await.unwrap();
        assert_eq!(result.kind(), "no_match");
        assert_eq!(result.score(), 1.0);
        assert_eq!(result.answer(), fallback_message(LanguageCode::En));
    }

    #[tokio::test]
    async fn test_score_equal_to_threshold_is_no_match() {
        let provider = TableProvider::new(&[("faq", at_cos(0.6)), ("query", vec![1.0, 0.0])]);
        let index = FaqIndex::build(
            vec![entry(1, LanguageCode::En, "faq")],
            provider.as_ref(),
            16,
        )
        .await
        .unwrap();
        let index = Arc::new(index);
        let boundary = cosine_similarity(&[1.0, 0.0], &index.bucket(LanguageCode::En)[0].vector);

        let at = Matcher::new(index.clone(), provider.clone(), boundary);
        let result = at.match_query("query", LanguageCode::En).await.unwrap();
        assert_eq!(result.kind(), "no_match");
        assert!(result.faq_id().is_none());

        let below = Matcher::new(index, provider, boundary - 1e-3);
        let result = below.match_query("query", LanguageCode::En).await.unwrap();
        assert_eq!(result.kind(), "similarity");
    }

    #[tokio::test]
    async fn test_empty_bucket_reports_minus_one() {
        let provider = TableProvider::new(&[("faq", vec![1.0, 0.0]), ("何か", vec![1.0, 0.0])]);
        let matcher = matcher_with(vec![entry(1, LanguageCode::En, "faq")], provider).await;

        let result = matcher.match_query("何か", LanguageCode::Ja).await.unwrap();
        assert_eq!(result.score(), NO_CANDIDATE_SCORE);
        assert_eq!(result.answer(), fallback_message(LanguageCode::Ja));
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let provider = TableProvider::new(&[("faq", vec![1.0, 0.0])]);
        let matcher = matcher_with(vec![entry(1, LanguageCode::En, "faq")], provider).await;

        let err = matcher
            .match_query("unknown text", LanguageCode::En)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no vector"));
    }

    #[tokio::test]
    async fn test_reply_carries_image_and_thinking_time() {
        let provider = TableProvider::new(&[("Hi", vec![1.0, 0.0])]);
        let matcher = matcher_with(vec![entry(1, LanguageCode::En, "Hi")], provider).await;

        let result = matcher.match_query("HI", LanguageCode::En).await.unwrap();
        let reply = result.to_reply(LanguageCode::En);
        assert_eq!(reply.reply, "answer 1");
        assert_eq!(reply.image.as_deref(), Some("/images/one.png"));
        assert!((300.0..800.0).contains(&reply.thinking_time));
    }

    #[test]
    fn test_fallback_messages_are_localized() {
        let messages: Vec<_> = LanguageCode::ALL.iter().map(|l| fallback_message(*l)).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
