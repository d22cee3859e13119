use super::cluster_arguments;
use crate::model::argument::Stance;
use crate::model::concern::ConcernCategory;
use crate::model::response::{Question, Response, Vote};
use crate::model::snapshot::ScoredResponse;
use crate::model::thresholds::{AnalysisProfile, StanceMapping};
use crate::pipeline::stage1_quality::score_comment;
use crate::pipeline::stage2_concerns::classify;

fn record(id: u64, q1: Option<Vote>, comment: &str) -> ScoredResponse {
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
            course: "Undergraduate (UG)".to_string(),
            year: "2nd Year".to_string(),
            q1,
            q2: None,
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
        record(1, Some(Vote::No), "This is a clear violation of my privacy"),
        record(2, Some(Vote::No), "Privacy of students must be respected at all costs"),
        record(3, Some(Vote::No), "privacy matters"),
        record(4, Some(Vote::No), "We are adults and deserve our freedom"),
        record(5, Some(Vote::No), "Adults should have the freedom to move"),
        record(6, Some(Vote::No), "Adults should have the freedom to move"),
        record(7, Some(Vote::Yes), "It improves safety for everyone on campus"),
        record(8, Some(Vote::Yes), "Campus safety is the top priority for me"),
        record(9, Some(Vote::Yes), "I like the idea overall, good move"),
        record(10, None, "Privacy is a big issue in this policy"),
        record(11, Some(Vote::No), "asdkjasdkj"),
        record(12, Some(Vote::Yes), ""),
    ]
}

#[test]
fn test_clusters_by_stance_and_concern() {
    let profile = AnalysisProfile::default_v1();
    let set = cluster_arguments(&fixture(), Question::Q1, 40, &profile);

    assert_eq!(set.against.len(), 2);
    let privacy = &set.against[0];
    assert_eq!(privacy.concern, Some(ConcernCategory::Privacy));
    assert_eq!(privacy.reason, "privacy");
    assert_eq!(privacy.frequency, 3);
    assert_eq!(privacy.response_ids, vec![1, 2, 3]);
    assert_eq!(privacy.stance, Stance::Against);

    let autonomy = &set.against[1];
    assert_eq!(autonomy.concern, Some(ConcernCategory::Autonomy));
    assert_eq!(autonomy.frequency, 3);

    assert_eq!(set.for_.len(), 1);
    assert_eq!(set.for_[0].concern, Some(ConcernCategory::Safety));
    assert_eq!(set.for_[0].claim, "Improves student safety");
}

#[test]
fn test_quotes_longest_first_without_duplicates() {
    let profile = AnalysisProfile::default_v1();
    let set = cluster_arguments(&fixture(), Question::Q1, 40, &profile);

    let privacy = &set.against[0];
    assert_eq!(
        privacy.representative_quotes,
        vec![
            "Privacy of students must be respected at all costs",
            "This is a clear violation of my privacy",
            "privacy matters",
        ]
    );

    let autonomy = &set.against[1];
    assert_eq!(autonomy.representative_quotes.len(), 2);
    assert_eq!(
        autonomy.representative_quotes[0],
        "Adults should have the freedom to move"
    );
}

#[test]
fn test_min_support_drops_singletons() {
    let profile = AnalysisProfile::default_v1();
    let set = cluster_arguments(&fixture(), Question::Q1, 40, &profile);
    assert!(set.for_.iter().all(|c| c.frequency >= 2));
    assert!(set.for_.iter().all(|c| c.concern.is_some()));
}

#[test]
fn test_general_cluster_for_unclassified() {
    let profile = AnalysisProfile::default_v1();
    let records = vec![
        record(1, Some(Vote::Yes), "I like the idea overall, good move"),
        record(2, Some(Vote::Yes), "Sounds like a fine plan to me"),
    ];
    let set = cluster_arguments(&records, Question::Q1, 40, &profile);
    assert_eq!(set.for_.len(), 1);
    assert_eq!(set.for_[0].claim, "General support");
    assert_eq!(set.for_[0].reason, "general");
    assert_eq!(set.for_[0].concern, None);
}

#[test]
fn test_stance_mapping_is_configuration() {
    let mut profile = AnalysisProfile::default_v1();
    profile.stances = StanceMapping {
        q1_yes: Stance::Against,
        q2_yes: Stance::For,
    };
    let set = cluster_arguments(&fixture(), Question::Q1, 40, &profile);
    assert!(set.for_.iter().any(|c| c.concern == Some(ConcernCategory::Privacy)));
    assert!(
        set.against
            .iter()
            .any(|c| c.concern == Some(ConcernCategory::Safety))
    );
}

#[test]
fn test_min_quality_filters_members() {
    let profile = AnalysisProfile::default_v1();
    let set = cluster_arguments(&fixture(), Question::Q1, 90, &profile);
    let privacy = set
        .against
        .iter()
        .find(|c| c.concern == Some(ConcernCategory::Privacy));
    let privacy = privacy.unwrap();
    assert_eq!(privacy.frequency, 2);
    assert_eq!(privacy.response_ids, vec![1, 2]);
}
