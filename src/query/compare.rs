use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::response::{GroupField, Question};
use crate::model::snapshot::{DemographicBreakdown, ScoredResponse, Snapshot};
use crate::model::stats::{ComparisonStatTest, SignificanceBadge};
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage4_aggregate::group_breakdown;
use crate::query::QueryError;
use crate::stats::{significance_badge_with, two_proportion_z_test_with};

const SIMILAR_VIEWS_PP: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupSelector {
    pub field: GroupField,
    pub value: String,
}

impl GroupSelector {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let Some((field, value)) = raw.split_once(':') else {
            return Err(QueryError::InvalidSelector(raw.to_string()));
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(QueryError::InvalidSelector(raw.to_string()));
        }
        let field =
            GroupField::parse(field).ok_or_else(|| QueryError::UnknownField(field.trim().to_string()))?;
        Ok(Self {
            field,
            value: value.to_string(),
        })
    }

    pub fn matches(&self, record: &ScoredResponse) -> bool {
        record.response.demographic(self.field) == self.value
    }
}

impl FromStr for GroupSelector {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupSelector::parse(s)
    }
}

impl fmt::Display for GroupSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub selector: GroupSelector,
    pub metrics: DemographicBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionComparison {
    pub question: Question,
    pub difference_pp: f64,
    pub test: ComparisonStatTest,
    pub badge: SignificanceBadge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Difference,
    Warning,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightConfidence {
    High,
    Low,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub metric: String,
    pub text: String,
    pub difference_pp: Option<f64>,
    pub significant: bool,
    pub confidence: InsightConfidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub group_a: GroupMetrics,
    pub group_b: GroupMetrics,
    pub q1: QuestionComparison,
    pub q2: QuestionComparison,
    pub insights: Vec<Insight>,
    pub combined_sample: u64,
}

impl GroupComparison {
    pub fn question(&self, question: Question) -> &QuestionComparison {
        match question {
            Question::Q1 => &self.q1,
            Question::Q2 => &self.q2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailableGroups {
    pub course: Vec<String>,
    pub year: Vec<String>,
}

impl AvailableGroups {
    pub fn get(&self, field: GroupField) -> &[String] {
        match field {
            GroupField::Course => &self.course,
            GroupField::Year => &self.year,
        }
    }
}

pub fn available_groups(snapshot: &Snapshot) -> AvailableGroups {
    let distinct = |field: GroupField| {
        snapshot
            .responses
            .iter()
            .map(|r| r.response.demographic(field).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };
    AvailableGroups {
        course: distinct(GroupField::Course),
        year: distinct(GroupField::Year),
    }
}

pub fn compare_groups(
    snapshot: &Snapshot,
    a: &GroupSelector,
    b: &GroupSelector,
    profile: &AnalysisProfile,
) -> Result<GroupComparison, QueryError> {
    if a == b {
        return Err(QueryError::SameGroup(a.to_string()));
    }
    let metrics_for = |selector: &GroupSelector| {
        let members = snapshot
            .responses
            .iter()
            .filter(|r| selector.matches(r))
            .collect::<Vec<_>>();
        group_breakdown(selector.value.clone(), &members, profile.confidence_level)
    };
    let metrics_a = metrics_for(a);
    let metrics_b = metrics_for(b);

    let q1 = compare_question(Question::Q1, &metrics_a, &metrics_b, profile);
    let q2 = compare_question(Question::Q2, &metrics_a, &metrics_b, profile);
    let insights = comparison_insights(&a.value, &b.value, &metrics_a, &metrics_b, &q1, &q2, profile);

    Ok(GroupComparison {
        combined_sample: metrics_a.total + metrics_b.total,
        group_a: GroupMetrics {
            selector: a.clone(),
            metrics: metrics_a,
        },
        group_b: GroupMetrics {
            selector: b.clone(),
            metrics: metrics_b,
        },
        q1,
        q2,
        insights,
    })
}

fn compare_question(
    question: Question,
    a: &DemographicBreakdown,
    b: &DemographicBreakdown,
    profile: &AnalysisProfile,
) -> QuestionComparison {
    let (sa, sb) = match question {
        Question::Q1 => (&a.q1_support, &b.q1_support),
        Question::Q2 => (&a.q2_support, &b.q2_support),
    };
    let thresholds = &profile.significance;
    let test = two_proportion_z_test_with(sa.count, sa.sample_size, sb.count, sb.sample_size, thresholds);
    QuestionComparison {
        question,
        difference_pp: test.difference,
        badge: significance_badge_with(test.p_value, test.significant, thresholds),
        test,
    }
}

fn policy_topic(question: Question) -> &'static str {
    match question {
        Question::Q1 => "parent notification",
        Question::Q2 => "24/7 monitoring",
    }
}

fn question_metric(question: Question) -> String {
    format!("{} Support", question.as_str().to_uppercase())
}

fn difference_insight(name_a: &str, name_b: &str, cmp: &QuestionComparison) -> Insight {
    let diff = cmp.difference_pp;
    let topic = policy_topic(cmp.question);
    if diff.abs() < SIMILAR_VIEWS_PP {
        return Insight {
            kind: InsightKind::Difference,
            metric: question_metric(cmp.question),
            text: format!("Both groups have similar views on {topic}"),
            difference_pp: Some(diff.abs()),
            significant: false,
            confidence: InsightConfidence::High,
        };
    }
    let (higher, lower) = if diff > 0.0 { (name_a, name_b) } else { (name_b, name_a) };
    let significant = cmp.test.significant;
    let (text, confidence) = if significant {
        (
            format!("{higher} students are significantly more supportive of {topic} than {lower} students"),
            InsightConfidence::High,
        )
    } else {
        (
            format!(
                "{higher} students appear more supportive of {topic}, but the difference is not statistically significant"
            ),
            InsightConfidence::Low,
        )
    };
    Insight {
        kind: InsightKind::Difference,
        metric: question_metric(cmp.question),
        text,
        difference_pp: Some(diff.abs()),
        significant,
        confidence,
    }
}

fn comparison_insights(
    name_a: &str,
    name_b: &str,
    metrics_a: &DemographicBreakdown,
    metrics_b: &DemographicBreakdown,
    q1: &QuestionComparison,
    q2: &QuestionComparison,
    profile: &AnalysisProfile,
) -> Vec<Insight> {
    let mut insights = vec![
        difference_insight(name_a, name_b, q1),
        difference_insight(name_a, name_b, q2),
    ];

    let min_size = metrics_a.total.min(metrics_b.total);
    if min_size < profile.significance.small_sample {
        insights.push(Insight {
            kind: InsightKind::Warning,
            metric: "Sample Size".to_string(),
            text: format!("Caution: small sample size ({min_size}) may limit reliability of comparison"),
            difference_pp: None,
            significant: false,
            confidence: InsightConfidence::NotApplicable,
        });
    }

    if q1.test.significant
        && q2.test.significant
        && (q1.difference_pp > 0.0) == (q2.difference_pp > 0.0)
    {
        let more_supportive = if q1.difference_pp > 0.0 { name_a } else { name_b };
        insights.push(Insight {
            kind: InsightKind::Summary,
            metric: "Overall Pattern".to_string(),
            text: format!("{more_supportive} students are consistently more supportive of both policies"),
            difference_pp: None,
            significant: true,
            confidence: InsightConfidence::High,
        });
    }
    insights
}

#[cfg(test)]
#[path = "../../tests/src_inline/query/compare.rs"]
mod tests;
