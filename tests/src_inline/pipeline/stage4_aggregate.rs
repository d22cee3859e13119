use super::{
    build_concern_stats, build_cross_tab, build_demographics, build_overview,
    build_quality_summary, ordered_categories, primary_concern_counts,
};
use crate::model::concern::ConcernCategory;
use crate::model::flags::QualityFlag;
use crate::model::response::{GroupField, Response, Vote};
use crate::model::snapshot::ScoredResponse;
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage1_quality::score_comment;
use crate::pipeline::stage2_concerns::classify;

fn record(
    id: u64,
    course: &str,
    year: &str,
    q1: Option<Vote>,
    q2: Option<Vote>,
    comment: &str,
) -> ScoredResponse {
    let profile = AnalysisProfile::default_v1();
    let quality = score_comment(comment, &profile.quality);
    let concerns = (quality.is_valid && !comment.trim().is_empty())
        .then(|| classify(comment, &profile.classifier));
    ScoredResponse {
        response: Response {
            id,
            timestamp: None,
            name: String::new(),
            roll_no: String::new(),
            course: course.to_string(),
            year: year.to_string(),
            q1,
            q2,
            comment: comment.to_string(),
        },
        quality,
        concerns,
        sentiment: None,
        suggestions: None,
    }
}

fn fixture() -> Vec<ScoredResponse> {
    vec![
        record(
            1,
            "Undergraduate (UG)",
            "1st Year",
            Some(Vote::Yes),
            Some(Vote::Yes),
            "Campus safety is the top priority for me",
        ),
        record(
            2,
            "PhD",
            "2nd Year",
            Some(Vote::No),
            Some(Vote::Yes),
            "Privacy of students must be respected at all costs",
        ),
        record(3, "Undergraduate (UG)", "1st Year", Some(Vote::No), None, ""),
        record(
            4,
            "Alumni",
            "2nd Year",
            Some(Vote::Yes),
            Some(Vote::No),
            "This is a clear violation of my privacy",
        ),
    ]
}

#[test]
fn test_overview_counts() {
    let profile = AnalysisProfile::default_v1();
    let overview = build_overview(&fixture(), &profile);
    assert_eq!(overview.total_responses, 4);
    assert_eq!(overview.valid_responses, 3);
    assert_eq!(overview.flagged_responses, 1);
    assert_eq!(overview.duplicate_count, 0);

    assert_eq!(overview.q1.support_count, 2);
    assert_eq!(overview.q1.oppose_count, 2);
    assert_eq!(overview.q1.support.percentage, 50.0);

    assert_eq!(overview.q2.support_count, 2);
    assert_eq!(overview.q2.no_vote_count, 1);
    assert_eq!(overview.q2.support.sample_size, 3);

    assert_eq!(overview.response_by_course["Undergraduate (UG)"], 2);
    assert_eq!(overview.response_by_course["Alumni"], 1);
    assert_eq!(overview.response_by_year["2nd Year"], 2);
}

#[test]
fn test_sixty_forty_margin_of_error() {
    let records = (1..=100)
        .map(|id| {
            let vote = if id <= 60 { Vote::Yes } else { Vote::No };
            record(id, "PhD", "1st Year", Some(vote), None, "")
        })
        .collect::<Vec<_>>();
    let overview = build_overview(&records, &AnalysisProfile::default_v1());
    assert_eq!(overview.q1.support.percentage, 60.0);
    assert!((overview.q1.support.margin_of_error - 9.602).abs() < 0.01);
}

#[test]
fn test_quality_summary_buckets() {
    let summary = build_quality_summary(&fixture());
    assert_eq!(summary.excellent, 3);
    assert_eq!(summary.poor, 1);
    assert_eq!(summary.flag_counts[&QualityFlag::Empty], 1);
    assert_eq!(summary.flag_counts[&QualityFlag::Duplicate], 0);
    assert_eq!(summary.score_median, 100.0);
}

#[test]
fn test_quality_summary_empty_input() {
    let summary = build_quality_summary(&[]);
    assert_eq!(summary.excellent + summary.good + summary.acceptable + summary.poor, 0);
    assert_eq!(summary.score_median, 0.0);
}

#[test]
fn test_concern_stats_ranked() {
    let profile = AnalysisProfile::default_v1();
    let stats = build_concern_stats(&fixture(), &profile);
    assert_eq!(stats.len(), ConcernCategory::all().len());

    let privacy = &stats[0];
    assert_eq!(privacy.concern, ConcernCategory::Privacy);
    assert_eq!(privacy.count, 2);
    assert!((privacy.percentage - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(
        privacy.sample_quotes,
        vec![
            "Privacy of students must be respected at all costs",
            "This is a clear violation of my privacy",
        ]
    );

    assert_eq!(stats[1].concern, ConcernCategory::Safety);
    assert_eq!(stats[1].count, 1);
    assert!(stats[2..].iter().all(|s| s.count == 0 && s.percentage == 0.0));
}

#[test]
fn test_primary_concern_counts() {
    let counts = primary_concern_counts(&fixture());
    assert_eq!(counts[&ConcernCategory::Privacy], 2);
    assert_eq!(counts[&ConcernCategory::Safety], 1);
    assert!(!counts.contains_key(&ConcernCategory::Trust));
}

#[test]
fn test_demographic_order_known_first() {
    let profile = AnalysisProfile::default_v1();
    let records = fixture();
    assert_eq!(
        ordered_categories(&records, GroupField::Course, &profile),
        vec!["Undergraduate (UG)", "PhD", "Alumni"]
    );

    let demographics = build_demographics(&records, &profile);
    let ug = &demographics.by_course[0];
    assert_eq!(ug.total, 2);
    assert_eq!(ug.valid, 1);
    assert_eq!(ug.q1_yes, 1);
    assert_eq!(ug.q1_no, 1);
    assert_eq!(ug.q1_support.percentage, 50.0);
    assert!(!ug.q2_support.insufficient_sample);

    let years = demographics
        .by_year
        .iter()
        .map(|b| b.category.as_str())
        .collect::<Vec<_>>();
    assert_eq!(years, vec!["1st Year", "2nd Year"]);
}

#[test]
fn test_cross_tab_counts_both_votes_only() {
    let profile = AnalysisProfile::default_v1();
    let table = build_cross_tab(&fixture(), &profile).unwrap();
    assert_eq!(table.yes_yes, 1);
    assert_eq!(table.yes_no, 1);
    assert_eq!(table.no_yes, 1);
    assert_eq!(table.no_no, 0);
    assert_eq!(table.total_valid, 3);
    assert!(table.test.yates_corrected);
}

#[test]
fn test_cross_tab_absent_without_paired_votes() {
    let profile = AnalysisProfile::default_v1();
    let records = vec![record(1, "PhD", "1st Year", Some(Vote::Yes), None, "")];
    assert!(build_cross_tab(&records, &profile).is_none());
}
