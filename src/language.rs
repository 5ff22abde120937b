//! Language identification for incoming questions.
//!
//! [`LanguageIdentifier::identify`] is total: every input resolves to a
//! [`LanguageCode`]. Rules are applied in order and the first match wins:
//!
//! 1. Any code point in the Myanmar block (`U+1000..=U+109F`) → `my`.
//! 2. Text of at most [`SHORT_TEXT_MAX_CHARS`] characters → `en`.
//! 3. The statistical classifier's ISO 639-3 guess, mapped through
//!    [`LanguageCode::from_iso639_3`]; unmapped or inconclusive → `en`.
//!
//! Short strings are forced to the default language even when they are
//! clearly not English (a four-character Thai greeting yields `en`). The
//! corpus and threshold were tuned with this behavior in place.

use std::sync::Arc;

use crate::models::LanguageCode;

/// Inputs with this many characters or fewer skip the classifier.
pub const SHORT_TEXT_MAX_CHARS: usize = 5;

/// Minimum length passed to the statistical classifier.
pub const CLASSIFIER_MIN_LENGTH: usize = 3;

/// A statistical n-gram language classifier.
pub trait LanguageClassifier: Send + Sync {
    /// Returns an ISO 639-3 code, or `None` when the input is too short
    /// or the classifier cannot decide.
    fn classify(&self, text: &str, min_length: usize) -> Option<String>;
}

/// [`LanguageClassifier`] backed by the `whatlang` trigram detector.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangClassifier;

impl LanguageClassifier for WhatlangClassifier {
    fn classify(&self, text: &str, min_length: usize) -> Option<String> {
        if text.chars().count() < min_length {
            return None;
        }
        whatlang::detect(text).map(|info| info.lang().code().to_string())
    }
}

/// Resolves free text to a supported [`LanguageCode`].
#[derive(Clone)]
pub struct LanguageIdentifier {
    classifier: Arc<dyn LanguageClassifier>,
}

impl LanguageIdentifier {
    pub fn new(classifier: Arc<dyn LanguageClassifier>) -> Self {
        Self { classifier }
    }

    pub fn identify(&self, text: &str) -> LanguageCode {
        if contains_myanmar(text) {
            return LanguageCode::My;
        }

        if text.chars().count() <= SHORT_TEXT_MAX_CHARS {
            return LanguageCode::En;
        }

        self.classifier
            .classify(text, CLASSIFIER_MIN_LENGTH)
            .and_then(|code| LanguageCode::from_iso639_3(&code))
            .unwrap_or_default()
    }
}

impl Default for LanguageIdentifier {
    fn default() -> Self {
        Self::new(Arc::new(WhatlangClassifier))
    }
}

fn contains_myanmar(text: &str) -> bool {
    text.chars().any(|c| ('\u{1000}'..='\u{109F}').contains(&c))
}
