//! FAQ corpus loading.
//!
//! The corpus is a JSON array of records:
//!
//! ```json
//! [
//!   { "id": 1, "lang": "en", "question": "Hi", "answer": "Hello! How can I help?" },
//!   { "id": 2, "lang": "ja", "question": "営業時間は？", "answer": "...", "image": "/images/hours.png" }
//! ]
//! ```
//!
//! Records whose `lang` is not a supported [`LanguageCode`] are skipped with a
//! warning: the language identifier can never route a query to them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::models::{FaqEntry, FaqId, LanguageCode};

#[derive(Debug, Deserialize)]
struct FaqRecord {
    id: FaqId,
    lang: String,
    question: String,
    answer: String,
    #[serde(default)]
    image: Option<String>,
}

/// Read and parse the corpus file at `path`.
pub fn load_corpus(path: &Path) -> Result<Vec<FaqEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;

    parse_corpus(&content).with_context(|| format!("Invalid corpus file: {}", path.display()))
}

/// Parse corpus JSON, preserving record order.
pub fn parse_corpus(content: &str) -> Result<Vec<FaqEntry>> {
    let records: Vec<FaqRecord> =
        serde_json::from_str(content).context("Failed to parse corpus JSON")?;

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let Some(lang) = LanguageCode::from_code(&record.lang) else {
            warn!(
                id = %record.id,
                lang = %record.lang,
                "skipping FAQ entry with unsupported language"
            );
            continue;
        };
        entries.push(FaqEntry {
            id: record.id,
            lang,
            question: record.question,
            answer: record.answer,
            image: record.image,
        });
    }

    Ok(entries)
}
