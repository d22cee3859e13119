use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::lexicon::auxiliary::{FILLER_COMMENTS, KEYBOARD_PATTERNS, KEYBOARD_ROWS};
use crate::lexicon::matching::normalize_whitespace;
use crate::model::flags::{QualityFlag, order_flags};
use crate::model::quality::QualityResult;
use crate::model::response::Response;
use crate::model::thresholds::QualityThresholds;

pub fn score_comment(comment: &str, thresholds: &QualityThresholds) -> QualityResult {
    let text = comment.trim();
    if text.is_empty() {
        return finalize(0, vec![QualityFlag::Empty], thresholds);
    }

    let mut flags = Vec::new();
    let mut score: u8 = 100;

    if text.chars().count() < thresholds.min_chars {
        flags.push(QualityFlag::TooShort);
        score = score.saturating_sub(thresholds.too_short_penalty);
    }
    if is_keyboard_spam(text, thresholds) {
        flags.push(QualityFlag::KeyboardSpam);
        score = score.saturating_sub(thresholds.keyboard_spam_penalty);
    }
    if is_all_caps(text, thresholds) {
        flags.push(QualityFlag::AllCaps);
        score = score.saturating_sub(thresholds.all_caps_penalty);
    }
    if is_minimal(text, thresholds) {
        flags.push(QualityFlag::Minimal);
        score = score.saturating_sub(thresholds.minimal_penalty);
    }

    finalize(score.min(100), flags, thresholds)
}

pub fn mark_duplicates(
    comments: &[&str],
    results: &mut [QualityResult],
    thresholds: &QualityThresholds,
) -> usize {
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    for (comment, result) in comments.iter().zip(results.iter_mut()) {
        let key = normalize_whitespace(comment);
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key) {
            let mut flags = result.flags.clone();
            flags.push(QualityFlag::Duplicate);
            *result = finalize(result.score, flags, thresholds);
            duplicates += 1;
        }
    }
    duplicates
}

pub fn run_stage1(responses: &[Response], thresholds: &QualityThresholds) -> Vec<QualityResult> {
    let mut results = responses
        .par_iter()
        .map(|r| score_comment(&r.comment, thresholds))
        .collect::<Vec<_>>();
    let comments = responses
        .iter()
        .map(|r| r.comment.as_str())
        .collect::<Vec<_>>();
    let duplicates = mark_duplicates(&comments, &mut results, thresholds);
    debug!(
        responses = responses.len(),
        duplicates, "quality scoring complete"
    );
    results
}

fn finalize(score: u8, flags: Vec<QualityFlag>, thresholds: &QualityThresholds) -> QualityResult {
    let flags = order_flags(&flags);
    let hard_fail = flags.iter().any(|f| f.is_hard_fail());
    let is_valid = score >= thresholds.min_valid_score && !hard_fail;
    let borderline = score >= thresholds.min_valid_score && score < thresholds.review_threshold;
    QualityResult {
        score,
        needs_review: borderline || flags.len() >= 2,
        flags,
        is_valid,
    }
}

/// Letters-only tokens are checked one by one; numbers never count. A
/// comment is spam when spam tokens are the majority, when any spam token
/// appears in a comment shorter than `min_words`, or when the whole comment
/// is one repeated unit.
pub fn is_keyboard_spam(text: &str, thresholds: &QualityThresholds) -> bool {
    let lower = text.to_lowercase();
    let tokens = lower
        .split_whitespace()
        .map(|token| token.chars().filter(|c| c.is_alphabetic()).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>();
    let spam_tokens = tokens
        .iter()
        .filter(|token| is_spam_token(token, thresholds))
        .count();
    if spam_tokens > 0
        && (tokens.len() < thresholds.min_words
            || spam_tokens as f64 > tokens.len() as f64 * thresholds.spam_token_share)
    {
        return true;
    }
    let compact = lower
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<Vec<_>>();
    compact.len() >= thresholds.min_repeat_len && is_repeated_unit(&compact)
}

fn is_spam_token(token: &str, thresholds: &QualityThresholds) -> bool {
    KEYBOARD_PATTERNS.iter().any(|p| token.contains(p))
        || has_row_sequence(token, thresholds.min_row_sequence)
        || longest_char_run(token) >= thresholds.max_char_run
}

fn has_row_sequence(token: &str, min_len: usize) -> bool {
    let chars = token.chars().collect::<Vec<_>>();
    if min_len == 0 || chars.len() < min_len {
        return false;
    }
    for row in KEYBOARD_ROWS {
        let forward = row.chars().collect::<String>();
        let backward = row.chars().rev().collect::<String>();
        for window in chars.windows(min_len) {
            let candidate = window.iter().collect::<String>();
            if forward.contains(&candidate) || backward.contains(&candidate) {
                return true;
            }
        }
    }
    false
}

fn longest_char_run(text: &str) -> usize {
    let mut longest = 0usize;
    let mut run = 0usize;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if !ch.is_alphanumeric() {
            prev = None;
            run = 0;
            continue;
        }
        if prev == Some(ch) {
            run += 1;
        } else {
            run = 1;
        }
        prev = Some(ch);
        longest = longest.max(run);
    }
    longest
}

fn is_repeated_unit(chars: &[char]) -> bool {
    let n = chars.len();
    (1..=n / 2)
        .filter(|unit| n % unit == 0)
        .any(|unit| chars.chunks(unit).all(|chunk| chunk == &chars[..unit]))
}

fn is_all_caps(text: &str, thresholds: &QualityThresholds) -> bool {
    let non_space = text.chars().filter(|c| !c.is_whitespace()).count();
    if non_space < thresholds.all_caps_min_chars {
        return false;
    }
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

fn is_minimal(text: &str, thresholds: &QualityThresholds) -> bool {
    let lower = text.to_lowercase();
    text.split_whitespace().count() < thresholds.min_words
        || FILLER_COMMENTS.contains(&lower.as_str())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_quality.rs"]
mod tests;
