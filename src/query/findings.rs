use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::response::{GroupField, Question};
use crate::model::snapshot::{DemographicBreakdown, Snapshot};
use crate::model::stats::Adequacy;
use crate::model::thresholds::AnalysisProfile;
use crate::report::share_percent;
use crate::stats::two_proportion_z_test_with;

const MAX_FINDINGS: usize = 10;
const SUMMARY_FINDINGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Opposition,
    Concern,
    Demographic,
    Quality,
    Sentiment,
    Suggestions,
    Consensus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingConfidence {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub text: String,
    pub category: FindingCategory,
    pub importance: u8,
    pub confidence: FindingConfidence,
    pub data_reference: String,
    pub supporting_stat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFindings {
    pub findings: Vec<Finding>,
    pub total_findings: usize,
    pub executive_summary: String,
    pub categories: BTreeMap<FindingCategory, u64>,
}

pub fn generate_key_findings(snapshot: &Snapshot, profile: &AnalysisProfile) -> KeyFindings {
    let mut findings = Vec::new();
    opposition_findings(snapshot, &mut findings);
    concern_findings(snapshot, &mut findings);
    for field in GroupField::all() {
        demographic_finding(snapshot.demographics.get(field), field, profile, &mut findings);
    }
    quality_findings(snapshot, &mut findings);
    sentiment_finding(snapshot, &mut findings);
    suggestion_findings(snapshot, &mut findings);
    consensus_finding(snapshot, &mut findings);

    findings.sort_by(|a, b| b.importance.cmp(&a.importance));
    findings.truncate(MAX_FINDINGS);

    let mut categories = BTreeMap::new();
    for finding in &findings {
        *categories.entry(finding.category).or_default() += 1;
    }
    let executive_summary = if findings.is_empty() {
        String::new()
    } else {
        let top = findings
            .iter()
            .take(SUMMARY_FINDINGS)
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>();
        format!("{}.", top.join(". "))
    };
    KeyFindings {
        total_findings: findings.len(),
        findings,
        executive_summary,
        categories,
    }
}

fn push(
    findings: &mut Vec<Finding>,
    category: FindingCategory,
    importance: u8,
    confidence: FindingConfidence,
    text: String,
    data_reference: &str,
    supporting_stat: Option<String>,
) {
    findings.push(Finding {
        text,
        category,
        importance,
        confidence,
        data_reference: data_reference.to_string(),
        supporting_stat,
    });
}

fn oppose_percent(snapshot: &Snapshot, question: Question) -> Option<f64> {
    let summary = snapshot.overview.question(question);
    let voted = summary.support_count + summary.oppose_count;
    (voted > 0).then(|| share_percent(summary.oppose_count, voted))
}

fn opposition_findings(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let total = snapshot.total_responses();
    let Some(q1_oppose) = oppose_percent(snapshot, Question::Q1) else {
        return;
    };
    let (label, importance) = if q1_oppose >= 80.0 {
        ("Overwhelming majority", 100)
    } else if q1_oppose >= 60.0 {
        ("Clear majority", 95)
    } else if q1_oppose >= 50.0 {
        ("Majority", 90)
    } else {
        ("Minority", 70)
    };
    push(
        findings,
        FindingCategory::Opposition,
        importance,
        FindingConfidence::High,
        format!("{label} ({q1_oppose:.1}%) oppose the parent notification policy"),
        "Q1 vote results",
        Some(format!(
            "{} of {total} students",
            snapshot.overview.q1.oppose_count
        )),
    );

    let Some(q2_oppose) = oppose_percent(snapshot, Question::Q2) else {
        return;
    };
    let diff = q2_oppose - q1_oppose;
    let (text, importance) = if diff.abs() < 5.0 {
        (
            format!(
                "Opposition to 24/7 monitoring ({q2_oppose:.1}%) is consistent with notification opposition"
            ),
            75,
        )
    } else {
        let direction = if diff > 0.0 { "higher" } else { "lower" };
        (
            format!(
                "Opposition to 24/7 monitoring is {:.1}pp {direction} than notification opposition",
                diff.abs()
            ),
            80,
        )
    };
    push(
        findings,
        FindingCategory::Opposition,
        importance,
        FindingConfidence::High,
        text,
        "Q1 vs Q2 comparison",
        Some(format!("Q1: {q1_oppose:.1}% vs Q2: {q2_oppose:.1}%")),
    );
}

fn concern_findings(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let Some(top) = snapshot.concerns.first().filter(|c| c.count > 0) else {
        return;
    };
    push(
        findings,
        FindingCategory::Concern,
        85,
        if top.count >= 50 {
            FindingConfidence::High
        } else {
            FindingConfidence::Medium
        },
        format!(
            "{} is the dominant concern, mentioned by {} students ({:.1}%)",
            top.name, top.count, top.percentage
        ),
        "Concern analysis",
        Some(format!("{} mentions", top.count)),
    );

    let top3 = snapshot
        .concerns
        .iter()
        .take(3)
        .filter(|c| c.count > 0)
        .collect::<Vec<_>>();
    if top3.len() < 3 {
        return;
    }
    let top3_pct = top3.iter().map(|c| c.percentage).sum::<f64>();
    let (text, importance) = if top3_pct >= 70.0 {
        (
            format!(
                "Three concerns dominate feedback: {}, {}, and {}",
                top3[0].name, top3[1].name, top3[2].name
            ),
            70,
        )
    } else {
        (
            "Student concerns are distributed across multiple categories".to_string(),
            60,
        )
    };
    push(
        findings,
        FindingCategory::Concern,
        importance,
        FindingConfidence::Medium,
        text,
        "Concern distribution",
        Some(format!("Top 3 = {top3_pct:.1}% of mentions")),
    );
}

fn demographic_finding(
    groups: &[DemographicBreakdown],
    field: GroupField,
    profile: &AnalysisProfile,
    findings: &mut Vec<Finding>,
) {
    let voted = groups
        .iter()
        .filter(|g| g.q1_support.sample_size > 0)
        .collect::<Vec<_>>();
    if voted.len() < 2 {
        return;
    }
    // First group wins ties on either end.
    let mut max = voted[0];
    let mut min = voted[0];
    for group in &voted[1..] {
        if group.q1_support.percentage > max.q1_support.percentage {
            max = group;
        }
        if group.q1_support.percentage < min.q1_support.percentage {
            min = group;
        }
    }
    let difference = max.q1_support.percentage - min.q1_support.percentage;
    let field_name = field.as_str();
    let (text, importance, confidence) = if difference >= 15.0 {
        let test = two_proportion_z_test_with(
            max.q1_support.count,
            max.q1_support.sample_size,
            min.q1_support.count,
            min.q1_support.sample_size,
            &profile.significance,
        );
        (
            format!(
                "{} students are {difference:.1}pp more supportive than {} students",
                max.category, min.category
            ),
            80,
            if test.significant {
                FindingConfidence::High
            } else {
                FindingConfidence::Medium
            },
        )
    } else if difference >= 5.0 {
        (
            format!("Moderate variation in support across {field_name}s (range: {difference:.1}pp)"),
            65,
            FindingConfidence::Medium,
        )
    } else {
        (
            format!("Support levels are consistent across all {field_name}s (within {difference:.1}pp)"),
            60,
            FindingConfidence::High,
        )
    };
    let reference = match field {
        GroupField::Course => "Course breakdown",
        GroupField::Year => "Year breakdown",
    };
    push(
        findings,
        FindingCategory::Demographic,
        importance,
        confidence,
        text,
        reference,
        Some(format!(
            "{}: {:.1}% vs {}: {:.1}%",
            max.category, max.q1_support.percentage, min.category, min.q1_support.percentage
        )),
    );
}

fn quality_findings(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let overview = &snapshot.overview;
    let total = overview.total_responses;
    if total == 0 {
        return;
    }
    let valid_pct = share_percent(overview.valid_responses, total);
    let (text, importance) = if valid_pct >= 90.0 {
        (
            format!("High data quality: {valid_pct:.1}% of responses passed quality checks"),
            50,
        )
    } else if valid_pct >= 75.0 {
        (
            format!("Good data quality: {valid_pct:.1}% of responses are valid"),
            45,
        )
    } else {
        (
            format!("Data quality concern: only {valid_pct:.1}% of responses passed quality checks"),
            70,
        )
    };
    push(
        findings,
        FindingCategory::Quality,
        importance,
        FindingConfidence::High,
        text,
        "Quality analysis",
        Some(format!(
            "{} valid, {} flagged",
            overview.valid_responses, overview.flagged_responses
        )),
    );

    let adequacy = &snapshot.sample_adequacy;
    if matches!(adequacy.adequacy, Adequacy::Strong | Adequacy::Adequate) {
        push(
            findings,
            FindingCategory::Quality,
            55,
            FindingConfidence::High,
            format!("Sample size ({total} responses) provides statistically reliable results"),
            "Statistical adequacy",
            Some(format!(
                "Margin of error: ±{:.1}%",
                adequacy.worst_case_moe_percent
            )),
        );
    }
}

fn sentiment_finding(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let overall = &snapshot.sentiment.overall;
    if overall.comments == 0 {
        return;
    }
    let avg = overall.average_polarity;
    let (text, importance) = if avg < -0.2 {
        (
            format!(
                "Comments are predominantly negative in tone ({:.1}% negative vs {:.1}% positive)",
                overall.negative_percent, overall.positive_percent
            ),
            75,
        )
    } else if avg > 0.2 {
        ("Comments are predominantly positive in tone".to_string(), 65)
    } else {
        (
            format!(
                "Comment sentiment is mixed ({:.1}% negative, {:.1}% positive)",
                overall.negative_percent, overall.positive_percent
            ),
            55,
        )
    };
    push(
        findings,
        FindingCategory::Sentiment,
        importance,
        FindingConfidence::Medium,
        text,
        "Sentiment analysis",
        Some(format!("Average polarity: {avg:.2}")),
    );
}

fn suggestion_findings(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let summary = &snapshot.suggestions;
    if summary.total_with_suggestions == 0 {
        return;
    }
    push(
        findings,
        FindingCategory::Suggestions,
        70,
        FindingConfidence::High,
        format!(
            "{} students ({:.1}%) provided constructive suggestions",
            summary.total_with_suggestions, summary.suggestion_rate
        ),
        "Suggestion analysis",
        summary
            .top_categories
            .first()
            .map(|c| format!("Top category: {c}")),
    );
    if !summary.top_categories.is_empty() {
        let top = summary
            .top_categories
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>();
        push(
            findings,
            FindingCategory::Suggestions,
            65,
            FindingConfidence::Medium,
            format!("Most suggestions relate to: {}", top.join(", ")),
            "Suggestion categories",
            None,
        );
    }
}

fn consensus_finding(snapshot: &Snapshot, findings: &mut Vec<Finding>) {
    let Some(cross) = &snapshot.cross_tabulation else {
        return;
    };
    let consistency = cross.yes_yes_percent + cross.no_no_percent;
    let (text, importance) = if consistency >= 80.0 {
        (
            format!("Strong consistency: {consistency:.1}% of students voted the same way on both questions"),
            72,
        )
    } else if consistency >= 60.0 {
        (
            format!("Moderate consistency: {consistency:.1}% voted consistently on both questions"),
            60,
        )
    } else {
        (
            format!(
                "Students distinguish between the two policies (only {consistency:.1}% voted consistently)"
            ),
            68,
        )
    };
    push(
        findings,
        FindingCategory::Consensus,
        importance,
        FindingConfidence::High,
        text,
        "Cross-tabulation",
        Some(format!(
            "Correlation: {:.2} ({})",
            cross.test.correlation_coefficient,
            cross.strength.as_str()
        )),
    );
}

#[cfg(test)]
#[path = "../../tests/src_inline/query/findings.rs"]
mod tests;
