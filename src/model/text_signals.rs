use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub polarity: f64,
    pub label: SentimentLabel,
    pub confidence: f64,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self {
            polarity: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            positive_words: Vec::new(),
            negative_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub has_suggestion: bool,
    pub suggestions: Vec<String>,
    pub categories: Vec<String>,
    pub confidence: f64,
}
