//! The per-language FAQ index.
//!
//! Built once at startup by [`FaqIndex::build`] and read-only afterwards.
//! Each language bucket is a flat `Vec` of [`IndexedFaq`] pairs in corpus
//! order, so position `i` always pairs an entry with its own vector.

use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::info;

use crate::embedding::{l2_normalize, EmbeddingProvider};
use crate::models::{FaqEntry, LanguageCode};

/// A FAQ entry together with the normalized embedding of its question.
#[derive(Debug, Clone)]
pub struct IndexedFaq {
    pub entry: FaqEntry,
    pub vector: Vec<f32>,
}

/// Immutable mapping from language to its ordered bucket of entries.
#[derive(Debug, Default)]
pub struct FaqIndex {
    buckets: HashMap<LanguageCode, Vec<IndexedFaq>>,
}

impl FaqIndex {
    /// Embed every question in `corpus` and group the results by language.
    ///
    /// Questions are sent to the provider in batches of `batch_size`. Any
    /// provider failure, or a response with the wrong number of vectors,
    /// aborts the build: a partially built index is never returned.
    pub async fn build(
        corpus: Vec<FaqEntry>,
        provider: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let mut vectors = Vec::with_capacity(corpus.len());

        for batch in corpus.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|e| e.question.clone()).collect();
            let embedded = provider.embed_texts(&texts).await?;
            if embedded.len() != texts.len() {
                bail!(
                    "Embedding provider returned {} vectors for {} questions",
                    embedded.len(),
                    texts.len()
                );
            }
            vectors.extend(embedded);
        }

        let mut buckets: HashMap<LanguageCode, Vec<IndexedFaq>> = HashMap::new();
        for (entry, mut vector) in corpus.into_iter().zip(vectors) {
            l2_normalize(&mut vector);
            buckets
                .entry(entry.lang)
                .or_default()
                .push(IndexedFaq { entry, vector });
        }

        let index = Self { buckets };
        for lang in LanguageCode::ALL {
            info!(lang = %lang, entries = index.bucket(lang).len(), "indexed language bucket");
        }
        Ok(index)
    }

    /// The entries for `lang` in corpus order. Empty if the language has none.
    pub fn bucket(&self, lang: LanguageCode) -> &[IndexedFaq] {
        self.buckets.get(&lang).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of indexed entries across all languages.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FaqId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that embeds a text as `[len, 1.0]` and counts batches.
    struct LengthProvider {
        batches: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for LengthProvider {
        fn model_name(&self) -> &str {
            "length"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| vec![t.chars().count() as f32, 1.0])
                .collect())
        }
    }

    struct ShortProvider;

    #[async_trait]
    impl EmbeddingProvider for ShortProvider {
        fn model_name(&self) -> &str {
            "short"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed_texts(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    fn entry(id: i64, lang: LanguageCode, question: &str) -> FaqEntry {
        FaqEntry {
            id: FaqId::Number(id),
            lang,
            question: question.to_string(),
            answer: format!("answer {}", id),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_build_groups_by_language_in_order() {
        let corpus = vec![
            entry(1, LanguageCode::En, "Hi"),
            entry(2, LanguageCode::Ja, "こんにちは"),
            entry(3, LanguageCode::En, "Where is my order?"),
            entry(4, LanguageCode::En, "Refund"),
        ];
        let provider = LengthProvider {
            batches: AtomicUsize::new(0),
        };

        let index = FaqIndex::build(corpus, &provider, 3).await.unwrap();

        assert_eq!(provider.batches.load(Ordering::SeqCst), 2);
        assert_eq!(index.len(), 4);
        let en: Vec<_> = index
            .bucket(LanguageCode::En)
            .iter()
            .map(|f| f.entry.id.clone())
            .collect();
        assert_eq!(en, vec![FaqId::Number(1), FaqId::Number(3), FaqId::Number(4)]);
        assert_eq!(index.bucket(LanguageCode::Ja).len(), 1);
        assert!(index.bucket(LanguageCode::Th).is_empty());
    }

    #[tokio::test]
    async fn test_vectors_are_normalized_and_paired() {
        let corpus = vec![
            entry(1, LanguageCode::En, "abc"),
            entry(2, LanguageCode::En, "abcdefg"),
        ];
        let provider = LengthProvider {
            batches: AtomicUsize::new(0),
        };
        let index = FaqIndex::build(corpus, &provider, 32).await.unwrap();

        for item in index.bucket(LanguageCode::En) {
            let norm: f32 = item.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6);
            let len = item.entry.question.chars().count() as f32;
            assert!((item.vector[0] / item.vector[1] - len).abs() < 1e-4);
        }
    }

    #[tokio::test]
    async fn test_vector_count_mismatch_aborts_build() {
        let corpus = vec![
            entry(1, LanguageCode::En, "one"),
            entry(2, LanguageCode::En, "two"),
        ];
        let err = FaqIndex::build(corpus, &ShortProvider, 8).await.unwrap_err();
        assert!(err.to_string().contains("returned 1 vectors for 2 questions"));
    }

    #[tokio::test]
    async fn test_empty_corpus_builds_empty_index() {
        let provider = LengthProvider {
            batches: AtomicUsize::new(0),
        };
        let index = FaqIndex::build(Vec::new(), &provider, 8).await.unwrap();
        assert!(index.is_empty());
        assert_eq!(provider.batches.load(Ordering::SeqCst), 0);
    }
}
