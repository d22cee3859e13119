use serde::{Deserialize, Serialize};

use crate::model::argument::Stance;
use crate::model::response::{Question, Vote};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisProfile {
    pub quality: QualityThresholds,
    pub classifier: ClassifierThresholds,
    pub arguments: ArgumentSettings,
    pub significance: SignificanceThresholds,
    pub stances: StanceMapping,
    pub demographics: DemographicSets,
    pub confidence_level: f64,
    pub population_estimate: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub min_chars: usize,
    pub min_words: usize,
    pub all_caps_min_chars: usize,
    pub max_char_run: usize,
    pub min_row_sequence: usize,
    pub min_repeat_len: usize,
    pub spam_token_share: f64,
    pub too_short_penalty: u8,
    pub keyboard_spam_penalty: u8,
    pub all_caps_penalty: u8,
    pub minimal_penalty: u8,
    pub min_valid_score: u8,
    pub review_threshold: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub min_comment_chars: usize,
    pub detection_threshold: f64,
    pub secondary_threshold: f64,
    pub saturation: f64,
    pub max_secondary: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgumentSettings {
    pub min_quality: u8,
    pub min_support: usize,
    pub max_quotes: usize,
    pub max_concern_quotes: usize,
    pub min_quote_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceThresholds {
    pub alpha: f64,
    pub strict_alpha: f64,
    pub very_strict_alpha: f64,
    pub cohens_h_small: f64,
    pub cohens_h_medium: f64,
    pub cohens_h_large: f64,
    pub correlation_weak: f64,
    pub correlation_moderate: f64,
    pub correlation_strong: f64,
    pub moe_strong: f64,
    pub moe_adequate: f64,
    pub small_sample: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceMapping {
    pub q1_yes: Stance,
    pub q2_yes: Stance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicSets {
    pub courses: Vec<String>,
    pub years: Vec<String>,
}

impl AnalysisProfile {
    pub fn default_v1() -> Self {
        Self {
            quality: QualityThresholds::default(),
            classifier: ClassifierThresholds::default(),
            arguments: ArgumentSettings::default(),
            significance: SignificanceThresholds::default(),
            stances: StanceMapping::default(),
            demographics: DemographicSets::default(),
            confidence_level: 0.95,
            population_estimate: None,
        }
    }

    pub fn stance_for(&self, question: Question, vote: Vote) -> Stance {
        let yes = match question {
            Question::Q1 => self.stances.q1_yes,
            Question::Q2 => self.stances.q2_yes,
        };
        match (vote, yes) {
            (Vote::Yes, s) => s,
            (Vote::No, Stance::For) => Stance::Against,
            (Vote::No, Stance::Against) => Stance::For,
        }
    }
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_chars: 10,
            min_words: 3,
            all_caps_min_chars: 10,
            max_char_run: 5,
            min_row_sequence: 5,
            min_repeat_len: 6,
            spam_token_share: 0.5,
            too_short_penalty: 30,
            keyboard_spam_penalty: 50,
            all_caps_penalty: 15,
            minimal_penalty: 20,
            min_valid_score: 40,
            review_threshold: 60,
        }
    }
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            min_comment_chars: 3,
            detection_threshold: 1.0,
            secondary_threshold: 0.5,
            saturation: 4.0,
            max_secondary: 3,
        }
    }
}

impl Default for ArgumentSettings {
    fn default() -> Self {
        Self {
            min_quality: 40,
            min_support: 2,
            max_quotes: 3,
            max_concern_quotes: 5,
            min_quote_chars: 20,
        }
    }
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            strict_alpha: 0.01,
            very_strict_alpha: 0.001,
            cohens_h_small: 0.2,
            cohens_h_medium: 0.5,
            cohens_h_large: 0.8,
            correlation_weak: 0.2,
            correlation_moderate: 0.4,
            correlation_strong: 0.7,
            moe_strong: 3.0,
            moe_adequate: 5.0,
            small_sample: 30,
        }
    }
}

impl Default for StanceMapping {
    fn default() -> Self {
        Self {
            q1_yes: Stance::For,
            q2_yes: Stance::For,
        }
    }
}

impl Default for DemographicSets {
    fn default() -> Self {
        Self {
            courses: [
                "Undergraduate (UG)",
                "Postgraduate (PG)",
                "PhD",
                "Research Scholar (RS)",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            years: ["1st Year", "2nd Year", "3rd Year", "4th Year", "5th Year"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
