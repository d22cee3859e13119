use super::{is_keyboard_spam, mark_duplicates, run_stage1, score_comment};
use crate::model::flags::QualityFlag;
use crate::model::response::Response;
use crate::model::thresholds::QualityThresholds;

fn thresholds() -> QualityThresholds {
    QualityThresholds::default()
}

fn response(id: u64, comment: &str) -> Response {
    Response {
        id,
        timestamp: None,
        name: String::new(),
        roll_no: String::new(),
        course: "PhD".to_string(),
        year: "1st Year".to_string(),
        q1: None,
        q2: None,
        comment: comment.to_string(),
    }
}

#[test]
fn test_score_always_within_bounds() {
    let samples = [
        "",
        "   ",
        "ok",
        "asdkjasdkj",
        "AAAAAAAAAAAAAAAA",
        "QWERTY QWERTY",
        "The monitoring system feels excessive for adult students",
        "!!!!!!",
        "n/a",
    ];
    for s in samples {
        let r = score_comment(s, &thresholds());
        assert!(r.score <= 100, "{s:?} scored {}", r.score);
    }
}

#[test]
fn test_empty_comment_scores_zero() {
    for s in ["", "   ", "\t\n"] {
        let r = score_comment(s, &thresholds());
        assert_eq!(r.score, 0);
        assert_eq!(r.flags, vec![QualityFlag::Empty]);
        assert!(!r.is_valid);
    }
}

#[test]
fn test_clean_comment_scores_hundred() {
    let r = score_comment(
        "The policy respects student safety and keeps parents informed",
        &thresholds(),
    );
    assert_eq!(r.score, 100);
    assert!(r.flags.is_empty());
    assert!(r.is_valid);
    assert!(!r.needs_review);
}

#[test]
fn test_keyboard_spam_repeated_unit() {
    let r = score_comment("asdkjasdkj", &thresholds());
    assert!(r.has_flag(QualityFlag::KeyboardSpam));
    assert!(!r.is_valid);
    assert_eq!(r.score, 30);
    assert!(r.needs_review);
}

#[test]
fn test_keyboard_spam_variants() {
    let t = thresholds();
    assert!(is_keyboard_spam("qwerty asdfgh zxcvbn", &t));
    assert!(is_keyboard_spam("lkjhg things", &t));
    assert!(is_keyboard_spam("sooooo", &t));
    assert!(is_keyboard_spam("hahaha", &t));
    assert!(!is_keyboard_spam("qwerty is what I think", &t));
    assert!(!is_keyboard_spam("I think this is fine for now", &t));
    assert!(!is_keyboard_spam("Privacy matters... a lot", &t));
}

#[test]
fn test_numbers_and_elongated_words_in_sentences_are_not_spam() {
    let t = thresholds();
    for comment in [
        "The hostel fee is already 100000 rupees and now they want to track us too",
        "My roll number is 2312345 and I do not want my parents notified every time",
        "Nooooo, this policy treats adult students like children and violates privacy",
    ] {
        let r = score_comment(comment, &t);
        assert!(!r.has_flag(QualityFlag::KeyboardSpam), "{comment:?}");
        assert_eq!(r.score, 100, "{comment:?}");
        assert!(r.is_valid, "{comment:?}");
    }
    assert!(!is_keyboard_spam("12345 67890 11111", &t));
}

#[test]
fn test_all_caps_and_short_penalties() {
    let caps = score_comment("THIS POLICY IS TERRIBLE FOR US", &thresholds());
    assert_eq!(caps.flags, vec![QualityFlag::AllCaps]);
    assert_eq!(caps.score, 85);
    assert!(caps.is_valid);

    let short = score_comment("bad idea", &thresholds());
    assert_eq!(short.flags, vec![QualityFlag::TooShort, QualityFlag::Minimal]);
    assert_eq!(short.score, 50);
    assert!(short.is_valid);
    assert!(short.needs_review);

    let filler = score_comment("N/A", &thresholds());
    assert!(filler.has_flag(QualityFlag::Minimal));
    assert_eq!(filler.score, 50);
    assert!(filler.needs_review);
}

#[test]
fn test_duplicates_after_first_occurrence() {
    let t = thresholds();
    let comments = [
        "Parents should not be notified",
        "parents   should NOT be notified ",
        "",
        "",
        "Something else entirely here",
        "Parents should not be notified",
    ];
    let mut results = comments
        .iter()
        .map(|c| score_comment(c, &t))
        .collect::<Vec<_>>();
    let marked = mark_duplicates(&comments, &mut results, &t);
    assert_eq!(marked, 2);
    assert!(results[0].is_valid);
    assert!(results[1].has_flag(QualityFlag::Duplicate));
    assert!(!results[1].is_valid);
    assert_eq!(results[1].score, 100);
    assert!(!results[3].has_flag(QualityFlag::Duplicate));
    assert!(results[5].has_flag(QualityFlag::Duplicate));
}

#[test]
fn test_run_stage1_keeps_input_order() {
    let responses = vec![
        response(1, "Students deserve more privacy than this"),
        response(2, ""),
        response(3, "Students deserve more privacy than this"),
    ];
    let results = run_stage1(&responses, &thresholds());
    assert_eq!(results.len(), 3);
    assert!(results[0].is_valid);
    assert!(results[1].has_flag(QualityFlag::Empty));
    assert!(results[2].has_flag(QualityFlag::Duplicate));
}
