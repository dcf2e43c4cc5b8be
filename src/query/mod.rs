//! Linguistic preprocessing of shopping requests
//!
//! The pipeline only depends on the [`QueryPreprocessor`] trait. The
//! [`SimplePreprocessor`] shipped here is a keyword-based implementation good
//! enough for the Arabic and English requests the facet lexicon knows about.

use crate::facets::Intent;
use crate::price::fold_digits;
use std::collections::BTreeSet;

/// Output of the preprocessing step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessedQuery {
    /// Original request text, digits folded; used by the regex facet path
    pub raw: String,
    /// Normalized tokens with stopwords and intent words removed
    pub tokens: Vec<String>,
    /// Two-letter language tag
    pub lang: String,
    pub intents: BTreeSet<Intent>,
}

/// Turns raw request text into tokens, a language tag and intents
pub trait QueryPreprocessor: Send + Sync {
    fn preprocess(&self, text: &str) -> PreprocessedQuery;
}

const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Cheap,
        &["cheap", "cheapest", "budget", "affordable", "رخيص", "ارخص"],
    ),
    (
        Intent::Quality,
        &["best", "quality", "premium", "افضل", "احسن", "جوده"],
    ),
    (
        Intent::AroundPrice,
        &["around", "about", "approximately", "حوالي", "تقريبا"],
    ),
];

const STOPWORDS: &[&str] = &[
    // English
    "i", "want", "need", "a", "an", "the", "for", "with", "me", "show", "find", "looking", "size",
    "and", "or", "in", "of", "to", "my", "please", "some", "under", "above", "between", "below",
    "price", "egp", "le", "pounds",
    // Arabic
    "عايز", "عاوز", "اريد", "محتاج", "ابغي", "ابي", "مقاس", "تحت", "فوق", "من", "ل", "لـ", "الي",
    "في", "و", "او", "ب", "بسعر", "سعر", "جنيه", "ج", "م",
];

/// Keyword-based preprocessor for Arabic and English requests
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePreprocessor;

impl SimplePreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl QueryPreprocessor for SimplePreprocessor {
    fn preprocess(&self, text: &str) -> PreprocessedQuery {
        let raw = fold_digits(text.trim());
        let normalized = normalize_arabic(&raw).to_lowercase();

        let lang = if normalized.chars().any(is_arabic_letter) {
            "ar"
        } else {
            "en"
        };

        let mut intents = BTreeSet::new();
        let mut tokens = Vec::new();

        for token in tokenize(&normalized) {
            if let Some(intent) = intent_for(&token) {
                intents.insert(intent);
                continue;
            }
            if STOPWORDS.contains(&token.as_str()) {
                continue;
            }
            tokens.push(token);
        }

        tracing::debug!(lang, tokens = ?tokens, intents = ?intents, "Preprocessed request");

        PreprocessedQuery {
            raw,
            tokens,
            lang: lang.to_string(),
            intents,
        }
    }
}

/// Folds Arabic letter variants to one spelling
///
/// Hamza forms of alef become bare alef, taa marbuta becomes haa, alef
/// maqsura becomes yaa. Tatweel and short-vowel marks are dropped.
pub fn normalize_arabic(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            'أ' | 'إ' | 'آ' => Some('ا'),
            'ة' => Some('ه'),
            'ى' => Some('ي'),
            'ـ' => None,
            '\u{064B}'..='\u{0652}' => None,
            other => Some(other),
        })
        .collect()
}

fn is_arabic_letter(c: char) -> bool {
    matches!(c, '\u{0621}'..='\u{064A}')
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn intent_for(token: &str) -> Option<Intent> {
    INTENT_KEYWORDS
        .iter()
        .find(|(_, words)| words.contains(&token))
        .map(|(intent, _)| *intent)
}
