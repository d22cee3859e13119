use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageWithCi {
    pub count: u64,
    pub sample_size: u64,
    pub percentage: f64,
    pub margin_of_error: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub wilson_lower: f64,
    pub wilson_upper: f64,
    pub confidence_level: f64,
    pub insufficient_sample: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectSize {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectSize {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectSize::Negligible => "negligible",
            EffectSize::Small => "small",
            EffectSize::Medium => "medium",
            EffectSize::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStatTest {
    pub z_statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    pub highly_significant: bool,
    pub difference: f64,
    pub effect_size: EffectSize,
    pub cohens_h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Negligible,
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationStrength::Negligible => "negligible",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub chi_square: f64,
    pub p_value: f64,
    pub correlation_coefficient: f64,
    pub yates_corrected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceLevel {
    HighlySignificant,
    VerySignificant,
    Significant,
    NotSignificant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceBadge {
    pub level: SignificanceLevel,
    pub label: String,
    pub symbol: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adequacy {
    Strong,
    Adequate,
    Weak,
}

impl Adequacy {
    pub fn as_str(self) -> &'static str {
        match self {
            Adequacy::Strong => "strong",
            Adequacy::Adequate => "adequate",
            Adequacy::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleAdequacy {
    pub sample_size: u64,
    pub population_estimate: Option<u64>,
    pub adequacy: Adequacy,
    pub worst_case_moe_percent: f64,
    pub can_detect_difference: f64,
}
