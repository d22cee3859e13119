use super::{PageRequest, ResponseFilter, filter_responses, group_by};
use crate::model::concern::ConcernCategory;
use crate::model::response::{GroupField, Response, Vote};
use crate::model::snapshot::Snapshot;
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage6_snapshot::{Stage6Input, build_snapshot};
use crate::query::QueryError;

#[allow(clippy::too_many_arguments)]
fn response(
    id: u64,
    name: &str,
    roll_no: &str,
    course: &str,
    year: &str,
    q1: Option<Vote>,
    q2: Option<Vote>,
    comment: &str,
) -> Response {
    Response {
        id,
        timestamp: None,
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        course: course.to_string(),
        year: year.to_string(),
        q1,
        q2,
        comment: comment.to_string(),
    }
}

fn fixture() -> Snapshot {
    use Vote::{No, Yes};
    let responses = vec![
        response(1, "Asha", "R001", "PhD", "1st Year", Some(Yes), Some(No),
            "Privacy is my biggest worry about this policy"),
        response(2, "Ben", "R002", "PhD", "2nd Year", Some(No), Some(No),
            "Safety in an emergency matters more than anything"),
        response(3, "Chen", "R003", "Undergraduate (UG)", "1st Year", Some(No), Some(Yes), "asdfgh"),
        response(4, "Dana", "R004", "Undergraduate (UG)", "2nd Year", Some(Yes), Some(Yes), ""),
        response(5, "Ravi", "R005", "Postgraduate (PG)", "1st Year", Some(No), None,
            "Students deserve privacy and respect from the administration"),
    ];
    build_snapshot(
        Stage6Input {
            responses,
            skipped_rows: 0,
        },
        &AnalysisProfile::default_v1(),
    )
}

fn ids(snapshot: &Snapshot, filter: &ResponseFilter) -> Vec<u64> {
    filter_responses(snapshot, filter, PageRequest::default())
        .unwrap()
        .responses
        .iter()
        .map(|r| r.id())
        .collect()
}

#[test]
fn test_default_filter_matches_everything() {
    let snapshot = fixture();
    let page = filter_responses(&snapshot, &ResponseFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.responses.len(), 5);
}

#[test]
fn test_demographic_and_vote_filters() {
    let snapshot = fixture();
    let by_course = ResponseFilter {
        courses: vec!["PhD".to_string()],
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &by_course), vec![1, 2]);

    let by_year = ResponseFilter {
        years: vec!["2nd Year".to_string()],
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &by_year), vec![2, 4]);

    let q1_no = ResponseFilter {
        q1: Some(Vote::No),
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &q1_no), vec![2, 3, 5]);

    let q2_yes = ResponseFilter {
        q2: Some(Vote::Yes),
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &q2_yes), vec![3, 4]);
}

#[test]
fn test_concern_and_quality_filters() {
    let snapshot = fixture();
    let privacy = ResponseFilter {
        concerns: vec![ConcernCategory::Privacy],
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &privacy), vec![1, 5]);

    let valid = ResponseFilter {
        valid_only: true,
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &valid), vec![1, 2, 5]);

    let at_least_40 = ResponseFilter {
        min_quality: Some(40),
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &at_least_40), vec![1, 2, 5]);

    let zero_only = ResponseFilter {
        max_quality: Some(0),
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &zero_only), vec![3, 4]);

    let combined = ResponseFilter {
        q1: Some(Vote::No),
        valid_only: true,
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &combined), vec![2, 5]);
}

#[test]
fn test_search_is_case_insensitive_across_fields() {
    let snapshot = fixture();
    let search = |needle: &str| ResponseFilter {
        search: Some(needle.to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&snapshot, &search("ravi")), vec![5]);
    assert_eq!(ids(&snapshot, &search("r001")), vec![1]);
    assert_eq!(ids(&snapshot, &search("EMERGENCY")), vec![2]);
    assert_eq!(ids(&snapshot, &search("   ")).len(), 5);
}

#[test]
fn test_pagination() {
    let snapshot = fixture();
    let filter = ResponseFilter::default();
    let page = filter_responses(&snapshot, &filter, PageRequest::new(2, 2).unwrap()).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    let page_ids = page.responses.iter().map(|r| r.id()).collect::<Vec<_>>();
    assert_eq!(page_ids, vec![3, 4]);

    let past_end = filter_responses(&snapshot, &filter, PageRequest::new(4, 2).unwrap()).unwrap();
    assert_eq!(past_end.total, 5);
    assert!(past_end.responses.is_empty());
}

#[test]
fn test_invalid_parameters() {
    assert_eq!(
        PageRequest::new(0, 10).unwrap_err(),
        QueryError::PageOutOfRange(0)
    );
    assert!(matches!(
        PageRequest::new(1, 0),
        Err(QueryError::PageSizeOutOfRange { got: 0, .. })
    ));
    assert!(matches!(
        PageRequest::new(1, 201),
        Err(QueryError::PageSizeOutOfRange { got: 201, max: 200 })
    ));
    assert!(PageRequest::new(1, 200).is_ok());

    let snapshot = fixture();
    let inverted = ResponseFilter {
        min_quality: Some(60),
        max_quality: Some(40),
        ..Default::default()
    };
    assert_eq!(
        filter_responses(&snapshot, &inverted, PageRequest::default()).unwrap_err(),
        QueryError::QualityRange { min: 60, max: 40 }
    );
}

#[test]
fn test_group_by_filtered_course() {
    let snapshot = fixture();
    let profile = AnalysisProfile::default_v1();
    let valid = ResponseFilter {
        valid_only: true,
        ..Default::default()
    };
    let groups = group_by(&snapshot, &valid, GroupField::Course, &profile).unwrap();
    let names = groups.iter().map(|g| g.category.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Postgraduate (PG)", "PhD"]);
    assert_eq!(groups[0].total, 1);
    assert_eq!(groups[0].q1_no, 1);
    assert_eq!(groups[1].total, 2);
    assert_eq!(groups[1].q1_yes, 1);
    assert_eq!(groups[1].q1_no, 1);
    assert!((groups[1].q1_support.percentage - 50.0).abs() < 1e-9);
}
