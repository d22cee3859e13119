use serde::Serialize;

use crate::model::concern::ConcernCategory;
use crate::model::response::{GroupField, Question};
use crate::model::snapshot::{DemographicBreakdown, Snapshot};
use crate::report::share_percent;

const MAX_RECOMMENDATIONS: usize = 5;
const GAP_PP: f64 = 15.0;
const SUGGESTION_CATEGORY_MIN: u64 = 50;
const SPLIT_VOTE_PERCENT: f64 = 10.0;
const LOW_VALID_PERCENT: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Policy,
    Communication,
    Concern,
    Demographic,
    Suggestions,
    Methodology,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub justification: String,
    pub action_items: Vec<String>,
    pub category: RecommendationCategory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<Recommendation>,
    pub total: usize,
    pub by_priority: PriorityCounts,
    pub summary: String,
}

struct ConcernAdvice {
    title: &'static str,
    description: &'static str,
    action_items: &'static [&'static str],
}

fn concern_advice(category: ConcernCategory) -> ConcernAdvice {
    match category {
        ConcernCategory::Privacy => ConcernAdvice {
            title: "Address Privacy Concerns Explicitly",
            description: "Privacy is the top student concern. Policy communication must directly address data handling and privacy protections.",
            action_items: &[
                "Publish clear data retention and access policies",
                "Specify who can access entry/exit data and under what circumstances",
                "Consider data minimization - collect only what's necessary",
                "Provide students with access to their own data logs",
            ],
        },
        ConcernCategory::Autonomy => ConcernAdvice {
            title: "Respect Student Autonomy",
            description: "Students value their independence as adults. Consider how to balance safety with autonomy.",
            action_items: &[
                "Acknowledge students as adults in policy framing",
                "Consider opt-out provisions for certain situations",
                "Frame policy around mutual safety rather than surveillance",
            ],
        },
        ConcernCategory::Trust => ConcernAdvice {
            title: "Build Trust Through Transparency",
            description: "Trust concerns indicate students feel the policy reflects distrust of them. Work to rebuild mutual trust.",
            action_items: &[
                "Involve student representatives in policy refinement",
                "Be transparent about the reasons driving this policy",
                "Create accountability mechanisms for policy administrators",
            ],
        },
        ConcernCategory::Safety => ConcernAdvice {
            title: "Clarify Safety Benefits",
            description: "Some students cite safety concerns. Leverage this by clearly articulating safety benefits.",
            action_items: &[
                "Provide data on how this policy improves safety",
                "Share examples of how similar policies have helped",
                "Ensure emergency procedures are clearly communicated",
            ],
        },
        ConcernCategory::Parental => ConcernAdvice {
            title: "Refine Parental Notification Scope",
            description: "Concerns about parental involvement suggest students want clearer boundaries.",
            action_items: &[
                "Define specific scenarios that trigger notifications",
                "Consider notification only for genuine emergencies",
                "Allow students to set their own emergency contacts",
            ],
        },
        ConcernCategory::Necessity => ConcernAdvice {
            title: "Justify Policy Necessity",
            description: "Students question whether this policy is necessary. Provide clear justification.",
            action_items: &[
                "Present data or incidents that motivated this policy",
                "Explain what alternatives were considered and why rejected",
                "Commit to reviewing necessity periodically",
            ],
        },
        ConcernCategory::Implementation => ConcernAdvice {
            title: "Clarify Implementation Details",
            description: "Students raise practical questions about how the system would work day to day.",
            action_items: &[
                "Publish how entry and exit events are recorded and reviewed",
                "Run a limited pilot and share the results",
                "Set up a channel for reporting technical problems",
            ],
        },
    }
}

pub fn generate_recommendations(snapshot: &Snapshot) -> Recommendations {
    let mut recs = Vec::new();
    opposition_recommendation(snapshot, &mut recs);
    concern_recommendation(snapshot, &mut recs);
    for field in GroupField::all() {
        demographic_recommendation(snapshot.demographics.get(field), &mut recs);
    }
    suggestion_recommendations(snapshot, &mut recs);
    quality_recommendation(snapshot, &mut recs);
    consensus_recommendation(snapshot, &mut recs);

    recs.sort_by_key(|r| r.priority);
    recs.truncate(MAX_RECOMMENDATIONS);

    let mut by_priority = PriorityCounts::default();
    for rec in &recs {
        match rec.priority {
            Priority::High => by_priority.high += 1,
            Priority::Medium => by_priority.medium += 1,
            Priority::Low => by_priority.low += 1,
        }
    }
    let summary = if by_priority.high > 0 {
        format!(
            "There are {} high-priority recommendation(s) that should be addressed before policy implementation.",
            by_priority.high
        )
    } else if by_priority.medium > 0 {
        format!(
            "There are {} medium-priority recommendation(s) to improve policy acceptance.",
            by_priority.medium
        )
    } else {
        "Current data suggests proceeding with standard implementation practices.".to_string()
    };
    Recommendations {
        total: recs.len(),
        recommendations: recs,
        by_priority,
        summary,
    }
}

fn push(
    recs: &mut Vec<Recommendation>,
    title: &str,
    description: &str,
    priority: Priority,
    justification: String,
    action_items: &[&str],
    category: RecommendationCategory,
) {
    recs.push(Recommendation {
        title: title.to_string(),
        description: description.to_string(),
        priority,
        justification,
        action_items: action_items.iter().map(|s| s.to_string()).collect(),
        category,
    });
}

fn opposition_recommendation(snapshot: &Snapshot, recs: &mut Vec<Recommendation>) {
    let q1 = snapshot.overview.question(Question::Q1);
    let voted = q1.support_count + q1.oppose_count;
    if voted == 0 {
        return;
    }
    let oppose = share_percent(q1.oppose_count, voted);
    if oppose >= 80.0 {
        push(
            recs,
            "Reconsider Policy Approach",
            "With overwhelming opposition, consider fundamental policy alternatives or significant modifications before implementation.",
            Priority::High,
            format!("{oppose:.1}% of students oppose the current policy proposal"),
            &[
                "Convene stakeholder discussions to explore alternative approaches",
                "Identify core objectives and explore different mechanisms to achieve them",
                "Consider pilot programs with voluntary participation before mandates",
            ],
            RecommendationCategory::Policy,
        );
    } else if oppose >= 60.0 {
        push(
            recs,
            "Address Concerns Before Implementation",
            "Majority opposition suggests the policy needs refinement and better communication before proceeding.",
            Priority::High,
            format!("{oppose:.1}% opposition indicates significant resistance"),
            &[
                "Conduct town halls to discuss policy rationale and address concerns",
                "Develop clear communication about how privacy will be protected",
                "Consider phased implementation with feedback mechanisms",
            ],
            RecommendationCategory::Policy,
        );
    } else if oppose >= 40.0 {
        push(
            recs,
            "Proactive Communication Strategy",
            "Significant minority opposition warrants proactive engagement to build understanding.",
            Priority::Medium,
            format!("{oppose:.1}% oppose, indicating notable concerns remain"),
            &[
                "Develop FAQ documents addressing common concerns",
                "Establish clear feedback channels for ongoing concerns",
                "Monitor sentiment after implementation",
            ],
            RecommendationCategory::Communication,
        );
    }
}

fn concern_recommendation(snapshot: &Snapshot, recs: &mut Vec<Recommendation>) {
    let Some(top) = snapshot.concerns.first().filter(|c| c.count > 0) else {
        return;
    };
    let advice = concern_advice(top.concern);
    push(
        recs,
        advice.title,
        advice.description,
        Priority::High,
        format!(
            "{} mentioned by {} students ({:.1}%)",
            top.name, top.count, top.percentage
        ),
        advice.action_items,
        RecommendationCategory::Concern,
    );
}

fn demographic_recommendation(groups: &[DemographicBreakdown], recs: &mut Vec<Recommendation>) {
    let voted = groups
        .iter()
        .filter(|g| g.q1_support.sample_size > 0)
        .collect::<Vec<_>>();
    if voted.len() < 2 {
        return;
    }
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
    let gap = max.q1_support.percentage - min.q1_support.percentage;
    if gap < GAP_PP {
        return;
    }
    let investigate = format!("Investigate specific concerns of {} students", min.category);
    push(
        recs,
        "Tailored Communication by Group",
        "Significant opinion gap between student groups suggests different concerns may be at play.",
        Priority::Medium,
        format!(
            "{gap:.1}pp difference between {} and {}",
            max.category, min.category
        ),
        &[
            investigate.as_str(),
            "Consider focus groups with each demographic",
            "Develop targeted communication addressing group-specific concerns",
        ],
        RecommendationCategory::Demographic,
    );
}

fn suggestion_recommendations(snapshot: &Snapshot, recs: &mut Vec<Recommendation>) {
    let summary = &snapshot.suggestions;
    let prominent = |category: &str| -> Option<u64> {
        let in_top = summary.top_categories.iter().take(3).any(|c| c == category);
        let count = summary.category_breakdown.get(category).copied().unwrap_or(0);
        (in_top && count > SUGGESTION_CATEGORY_MIN).then_some(count)
    };
    if let Some(count) = prominent("timing") {
        push(
            recs,
            "Evaluate Timing Flexibility",
            "Many students suggest timing-related modifications. Consider flexible implementation.",
            Priority::Medium,
            format!("{count} suggestions related to timing"),
            &[
                "Review suggestions about notification timing",
                "Consider different rules for different times of day",
                "Evaluate weekend vs. weekday policies",
            ],
            RecommendationCategory::Suggestions,
        );
    }
    if let Some(count) = prominent("flexibility") {
        push(
            recs,
            "Build in Flexibility Mechanisms",
            "Students seek flexibility in policy application. Consider exceptions framework.",
            Priority::Medium,
            format!("{count} suggestions about flexibility"),
            &[
                "Define clear exception procedures",
                "Create emergency override provisions",
                "Allow customization where feasible",
            ],
            RecommendationCategory::Suggestions,
        );
    }
}

fn quality_recommendation(snapshot: &Snapshot, recs: &mut Vec<Recommendation>) {
    let overview = &snapshot.overview;
    if overview.total_responses == 0 {
        return;
    }
    let valid_pct = share_percent(overview.valid_responses, overview.total_responses);
    if valid_pct < LOW_VALID_PERCENT {
        push(
            recs,
            "Consider Survey Methodology Review",
            "Lower quality response rate suggests survey design improvements may be needed for future data collection.",
            Priority::Low,
            format!("Only {valid_pct:.1}% of responses passed quality checks"),
            &[
                "Review survey length and complexity",
                "Consider incentives for thoughtful responses",
                "Add attention check questions in future surveys",
            ],
            RecommendationCategory::Methodology,
        );
    }
}

fn consensus_recommendation(snapshot: &Snapshot, recs: &mut Vec<Recommendation>) {
    let Some(cross) = &snapshot.cross_tabulation else {
        return;
    };
    if cross.yes_no_percent < SPLIT_VOTE_PERCENT && cross.no_yes_percent < SPLIT_VOTE_PERCENT {
        return;
    }
    push(
        recs,
        "Consider Policies Separately",
        "Students distinguish between notification and monitoring policies. Consider implementing or communicating them independently.",
        Priority::Medium,
        format!(
            "{:.1}% voted differently on the two questions",
            cross.yes_no_percent + cross.no_yes_percent
        ),
        &[
            "Evaluate each policy on its own merits",
            "Consider implementing the more accepted policy first",
            "Use staged implementation to build trust",
        ],
        RecommendationCategory::Policy,
    );
}

#[cfg(test)]
#[path = "../../tests/src_inline/query/recommendations.rs"]
mod tests;
