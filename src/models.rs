//! Core data models used throughout the FAQ harness.
//!
//! These types represent the FAQ entries, language codes, audit records, and
//! replies that flow through the matching pipeline.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a FAQ entry as it appears in the corpus file.
///
/// Corpora in the wild use both numeric and string ids, so both are accepted
/// and written back out unchanged. Uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaqId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FaqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaqId::Number(n) => write!(f, "{}", n),
            FaqId::Text(s) => f.write_str(s),
        }
    }
}

/// Normalized language code. The set is closed; anything that cannot be
/// resolved to one of these variants is treated as [`LanguageCode::En`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    My,
    Ja,
    Th,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 4] = [
        LanguageCode::En,
        LanguageCode::My,
        LanguageCode::Ja,
        LanguageCode::Th,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::My => "my",
            LanguageCode::Ja => "ja",
            LanguageCode::Th => "th",
        }
    }

    /// Parse a normalized code as used in corpus files (`"en"`, `"my"`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(LanguageCode::En),
            "my" => Some(LanguageCode::My),
            "ja" => Some(LanguageCode::Ja),
            "th" => Some(LanguageCode::Th),
            _ => None,
        }
    }

    /// Translate an ISO 639-3 code from the statistical classifier.
    pub fn from_iso639_3(code: &str) -> Option<Self> {
        match code {
            "eng" => Some(LanguageCode::En),
            "mya" => Some(LanguageCode::My),
            "jpn" => Some(LanguageCode::Ja),
            "tha" => Some(LanguageCode::Th),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question/answer record from the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqEntry {
    pub id: FaqId,
    pub lang: LanguageCode,
    pub question: String,
    pub answer: String,
    pub image: Option<String>,
}

/// One line of the conversation audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationLogEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub user_query: String,
    pub detected_language: LanguageCode,
    pub faq_id: Option<FaqId>,
    pub similarity_score: f32,
    pub answer: String,
}

/// The caller-facing reply produced for every matched or unmatched query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
    pub thinking_time: f64,
    #[serde(rename = "detectedLanguage")]
    pub detected_language: LanguageCode,
}
