use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::argument::ArgumentSet;
use crate::model::concern::{ConcernAnalysis, ConcernCategory};
use crate::model::flags::QualityFlag;
use crate::model::quality::QualityResult;
use crate::model::response::{GroupField, Question, Response};
use crate::model::stats::{
    ChiSquareResult, CorrelationStrength, PercentageWithCi, SampleAdequacy, SignificanceBadge,
};
use crate::model::text_signals::{SentimentResult, SuggestionResult};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub response: Response,
    pub quality: QualityResult,
    pub concerns: Option<ConcernAnalysis>,
    pub sentiment: Option<SentimentResult>,
    pub suggestions: Option<SuggestionResult>,
}

impl ScoredResponse {
    pub fn id(&self) -> u64 {
        self.response.id
    }

    pub fn primary_concern(&self) -> Option<ConcernCategory> {
        self.concerns.as_ref().and_then(|c| c.primary_concern)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question: Question,
    pub support_count: u64,
    pub oppose_count: u64,
    pub no_vote_count: u64,
    pub support: PercentageWithCi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_responses: u64,
    pub valid_responses: u64,
    pub flagged_responses: u64,
    pub duplicate_count: u64,
    pub needs_review_count: u64,
    pub q1: QuestionSummary,
    pub q2: QuestionSummary,
    pub response_by_course: BTreeMap<String, u64>,
    pub response_by_year: BTreeMap<String, u64>,
}

impl Overview {
    pub fn question(&self, question: Question) -> &QuestionSummary {
        match question {
            Question::Q1 => &self.q1,
            Question::Q2 => &self.q2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub excellent: u64,
    pub good: u64,
    pub acceptable: u64,
    pub poor: u64,
    pub flag_counts: BTreeMap<QualityFlag, u64>,
    pub score_median: f64,
    pub score_p10: f64,
    pub score_p90: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcernStat {
    pub concern: ConcernCategory,
    pub name: String,
    pub color: String,
    pub count: u64,
    pub percentage: f64,
    pub sample_quotes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub category: String,
    pub total: u64,
    pub valid: u64,
    pub q1_yes: u64,
    pub q1_no: u64,
    pub q1_support: PercentageWithCi,
    pub q2_yes: u64,
    pub q2_no: u64,
    pub q2_support: PercentageWithCi,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub by_course: Vec<DemographicBreakdown>,
    pub by_year: Vec<DemographicBreakdown>,
}

impl Demographics {
    pub fn get(&self, field: GroupField) -> &[DemographicBreakdown] {
        match field {
            GroupField::Course => &self.by_course,
            GroupField::Year => &self.by_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabulation {
    pub yes_yes: u64,
    pub yes_no: u64,
    pub no_yes: u64,
    pub no_no: u64,
    pub total_valid: u64,
    pub yes_yes_percent: f64,
    pub yes_no_percent: f64,
    pub no_yes_percent: f64,
    pub no_no_percent: f64,
    pub test: ChiSquareResult,
    pub strength: CorrelationStrength,
    pub badge: SignificanceBadge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub very_negative: u64,
    pub negative: u64,
    pub neutral: u64,
    pub positive: u64,
    pub very_positive: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub comments: u64,
    pub average_polarity: f64,
    pub median_polarity: f64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub neutral_count: u64,
    pub positive_percent: f64,
    pub negative_percent: f64,
    pub distribution: SentimentDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentOverview {
    pub overall: SentimentSummary,
    pub support: SentimentSummary,
    pub oppose: SentimentSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub total_with_suggestions: u64,
    pub suggestion_rate: f64,
    pub top_suggestions: Vec<String>,
    pub category_breakdown: BTreeMap<String, u64>,
    pub top_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u32,
    pub count: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub daily_count: u64,
    pub cumulative_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalSummary {
    pub hourly: Vec<u64>,
    pub daily: BTreeMap<NaiveDate, u64>,
    pub peak_hour: Option<PeakHour>,
    pub peak_day: Option<PeakDay>,
    pub cumulative: Vec<CumulativePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordFrequencies {
    pub all: Vec<WordCount>,
    pub support: Vec<WordCount>,
    pub oppose: Vec<WordCount>,
    pub total_words: u64,
    pub unique_words: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub quality: bool,
    pub concerns: bool,
    pub arguments: bool,
    pub cross_tabulation: bool,
    pub sentiment: bool,
    pub suggestions: bool,
    pub temporal: bool,
    pub word_frequencies: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub schema_version: u32,
    pub tool_version: String,
    pub computed_at: DateTime<Utc>,
    pub computation_ms: u64,
    pub input_rows: u64,
    pub processed_responses: u64,
    pub skipped_rows: u64,
    pub confidence_level: f64,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub overview: Overview,
    pub quality: QualitySummary,
    pub concerns: Vec<ConcernStat>,
    pub demographics: Demographics,
    pub cross_tabulation: Option<CrossTabulation>,
    pub arguments: BTreeMap<Question, ArgumentSet>,
    pub sample_adequacy: SampleAdequacy,
    pub sentiment: SentimentOverview,
    pub suggestions: SuggestionSummary,
    pub temporal: TemporalSummary,
    pub word_frequencies: WordFrequencies,
    pub responses: Vec<ScoredResponse>,
}

impl Snapshot {
    pub fn response(&self, id: u64) -> Option<&ScoredResponse> {
        self.responses
            .binary_search_by_key(&id, |r| r.id())
            .ok()
            .map(|idx| &self.responses[idx])
    }

    pub fn arguments(&self, question: Question) -> Option<&ArgumentSet> {
        self.arguments.get(&question)
    }

    pub fn total_responses(&self) -> u64 {
        self.overview.total_responses
    }
}
