use super::{GroupSelector, InsightKind, available_groups, compare_groups};
use crate::model::response::{GroupField, Response, Vote};
use crate::model::snapshot::Snapshot;
use crate::model::stats::SignificanceLevel;
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage6_snapshot::{Stage6Input, build_snapshot};
use crate::query::QueryError;

/// 50 PhD responses with 70% support and 50 UG responses with 40% support
/// on both questions. Even positions in each block are 1st Year.
fn fixture() -> Snapshot {
    let mut responses = Vec::new();
    for (course, yes_count) in [("PhD", 35), ("Undergraduate (UG)", 20)] {
        for idx in 0..50u64 {
            let vote = if idx < yes_count { Vote::Yes } else { Vote::No };
            responses.push(Response {
                id: responses.len() as u64 + 1,
                timestamp: None,
                name: String::new(),
                roll_no: String::new(),
                course: course.to_string(),
                year: if idx % 2 == 0 { "1st Year" } else { "2nd Year" }.to_string(),
                q1: Some(vote),
                q2: Some(vote),
                comment: String::new(),
            });
        }
    }
    build_snapshot(
        Stage6Input {
            responses,
            skipped_rows: 0,
        },
        &AnalysisProfile::default_v1(),
    )
}

fn selector(raw: &str) -> GroupSelector {
    GroupSelector::parse(raw).unwrap()
}

#[test]
fn test_selector_parsing() {
    let sel = selector("course:PhD");
    assert_eq!(sel.field, GroupField::Course);
    assert_eq!(sel.value, "PhD");
    assert_eq!(sel.to_string(), "course:PhD");

    let sel: GroupSelector = " Year : 4th Year ".parse().unwrap();
    assert_eq!(sel.field, GroupField::Year);
    assert_eq!(sel.value, "4th Year");

    assert_eq!(
        GroupSelector::parse("PhD").unwrap_err(),
        QueryError::InvalidSelector("PhD".to_string())
    );
    assert_eq!(
        GroupSelector::parse("course:  ").unwrap_err(),
        QueryError::InvalidSelector("course:  ".to_string())
    );
    assert_eq!(
        GroupSelector::parse("major:CS").unwrap_err(),
        QueryError::UnknownField("major".to_string())
    );
}

#[test]
fn test_significant_difference_between_courses() {
    let snapshot = fixture();
    let profile = AnalysisProfile::default_v1();
    let result = compare_groups(
        &snapshot,
        &selector("course:PhD"),
        &selector("course:Undergraduate (UG)"),
        &profile,
    )
    .unwrap();

    assert_eq!(result.group_a.metrics.total, 50);
    assert_eq!(result.group_b.metrics.total, 50);
    assert_eq!(result.combined_sample, 100);
    assert!((result.q1.difference_pp - 30.0).abs() < 1e-9);
    assert!(result.q1.test.significant);
    assert!(result.q1.test.p_value < 0.01);
    assert_eq!(result.q1.badge.level, SignificanceLevel::VerySignificant);

    let texts = result.insights.iter().map(|i| i.text.as_str()).collect::<Vec<_>>();
    assert_eq!(
        texts,
        vec![
            "PhD students are significantly more supportive of parent notification than Undergraduate (UG) students",
            "PhD students are significantly more supportive of 24/7 monitoring than Undergraduate (UG) students",
            "PhD students are consistently more supportive of both policies",
        ]
    );
    assert_eq!(result.insights[2].kind, InsightKind::Summary);
}

#[test]
fn test_comparison_is_antisymmetric() {
    let snapshot = fixture();
    let profile = AnalysisProfile::default_v1();
    let a = selector("course:PhD");
    let b = selector("course:Undergraduate (UG)");
    let ab = compare_groups(&snapshot, &a, &b, &profile).unwrap();
    let ba = compare_groups(&snapshot, &b, &a, &profile).unwrap();
    assert!((ab.q1.difference_pp + ba.q1.difference_pp).abs() < 1e-9);
    assert!((ab.q1.test.p_value - ba.q1.test.p_value).abs() < 1e-12);
    assert!(ba.insights[0].text.starts_with("PhD students are significantly"));
}

#[test]
fn test_non_significant_difference_wording() {
    let snapshot = fixture();
    let profile = AnalysisProfile::default_v1();
    let result = compare_groups(
        &snapshot,
        &selector("year:1st Year"),
        &selector("year:2nd Year"),
        &profile,
    )
    .unwrap();
    // 28/50 vs 27/50.
    assert!((result.q1.difference_pp - 2.0).abs() < 1e-9);
    assert!(!result.q1.test.significant);
    assert_eq!(result.q1.badge.symbol, "ns");
    assert_eq!(
        result.insights[0].text,
        "1st Year students appear more supportive of parent notification, but the difference is not statistically significant"
    );
    assert_eq!(result.insights.len(), 2);
}

#[test]
fn test_empty_group_triggers_small_sample_caution() {
    let snapshot = fixture();
    let profile = AnalysisProfile::default_v1();
    let result = compare_groups(
        &snapshot,
        &selector("course:PhD"),
        &selector("course:Research Scholar (RS)"),
        &profile,
    )
    .unwrap();
    assert_eq!(result.group_b.metrics.total, 0);
    assert_eq!(result.q1.difference_pp, 0.0);
    assert_eq!(
        result.insights[0].text,
        "Both groups have similar views on parent notification"
    );
    let warning = result
        .insights
        .iter()
        .find(|i| i.kind == InsightKind::Warning)
        .unwrap();
    assert_eq!(
        warning.text,
        "Caution: small sample size (0) may limit reliability of comparison"
    );
}

#[test]
fn test_comparing_group_with_itself_is_rejected() {
    let snapshot = fixture();
    let err = compare_groups(
        &snapshot,
        &selector("course:PhD"),
        &selector("course: PhD"),
        &AnalysisProfile::default_v1(),
    )
    .unwrap_err();
    assert_eq!(err, QueryError::SameGroup("course:PhD".to_string()));
}

#[test]
fn test_available_groups_sorted() {
    let groups = available_groups(&fixture());
    assert_eq!(groups.course, vec!["PhD", "Undergraduate (UG)"]);
    assert_eq!(groups.get(GroupField::Year), ["1st Year", "2nd Year"]);
}
