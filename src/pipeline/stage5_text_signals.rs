use std::collections::{BTreeMap, HashSet};

use chrono::Timelike;

use crate::lexicon::auxiliary::{
    GENERAL_SUGGESTION_CATEGORY, PLEASE_VERBS, SUGGESTION_CATEGORIES, SUGGESTION_CUES,
    intensifier, is_negation, is_negative, is_positive, is_stopword,
};
use crate::lexicon::matching::{contains_phrase, tokenize, truncate_chars};
use crate::model::response::Vote;
use crate::model::snapshot::{
    CumulativePoint, PeakDay, PeakHour, ScoredResponse, SentimentDistribution, SentimentOverview,
    SentimentSummary, SuggestionSummary, TemporalSummary, WordCount, WordFrequencies,
};
use crate::model::text_signals::{SentimentLabel, SentimentResult, SuggestionResult};
use crate::report::{mean, median, share_percent};

const LABEL_THRESHOLD: f64 = 0.1;
const STRONG_POLARITY: f64 = 0.5;
const NEGATED_NEGATIVE_WEIGHT: f64 = 0.5;
const SENTIMENT_WORD_CONFIDENCE: f64 = 0.2;
const MAX_SENTIMENT_WORDS: usize = 5;

const MIN_SUGGESTION_CHARS: usize = 10;
const MAX_SUGGESTION_CHARS: usize = 250;
const MAX_SUGGESTIONS: usize = 3;
const SUGGESTION_CONFIDENCE: f64 = 0.3;
const TOP_SUGGESTIONS: usize = 20;
const TOP_SUGGESTION_CATEGORIES: usize = 5;

const MIN_WORD_COMMENT_CHARS: usize = 5;
const MIN_WORD_LEN: usize = 3;
const WORD_LIST_LIMIT: usize = 100;
const MIN_WORD_COUNT: u64 = 3;
const MAX_WORD_SIZE: u64 = 100;

/// Lexicon polarity of one comment.
///
/// A negation flips the next sentiment word, and stays armed across
/// intensifiers so "not very good" reads as negative. Any other word
/// disarms it.
pub fn analyze_sentiment(comment: &str) -> SentimentResult {
    let words = tokenize(comment);
    if words.is_empty() {
        return SentimentResult::default();
    }

    let mut pos_score = 0.0;
    let mut neg_score = 0.0;
    let mut pos_found = Vec::new();
    let mut neg_found = Vec::new();
    let mut negated = false;
    let mut intensity = 1.0;

    for word in &words {
        let word = word.as_str();
        if is_negation(word) {
            negated = true;
            intensity = 1.0;
            continue;
        }
        if let Some(factor) = intensifier(word) {
            intensity = factor;
            continue;
        }
        if is_positive(word) {
            if negated {
                neg_score += intensity;
                neg_found.push(format!("not {word}"));
            } else {
                pos_score += intensity;
                pos_found.push(word.to_string());
            }
        } else if is_negative(word) {
            if negated {
                pos_score += intensity * NEGATED_NEGATIVE_WEIGHT;
                pos_found.push(format!("not {word}"));
            } else {
                neg_score += intensity;
                neg_found.push(word.to_string());
            }
        }
        negated = false;
        intensity = 1.0;
    }

    let total = pos_score + neg_score;
    let polarity = if total > 0.0 {
        ((pos_score - neg_score) / total).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let matched = pos_found.len() + neg_found.len();
    SentimentResult {
        polarity,
        label: label_for(polarity),
        confidence: (matched as f64 * SENTIMENT_WORD_CONFIDENCE).min(1.0),
        positive_words: first_unique(pos_found, MAX_SENTIMENT_WORDS),
        negative_words: first_unique(neg_found, MAX_SENTIMENT_WORDS),
    }
}

fn label_for(polarity: f64) -> SentimentLabel {
    if polarity > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if polarity < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn first_unique(words: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .take(limit)
        .collect()
}

pub fn summarize_sentiment<'a>(
    results: impl IntoIterator<Item = &'a SentimentResult>,
) -> SentimentSummary {
    let mut summary = SentimentSummary::default();
    let mut polarities = Vec::new();
    for result in results {
        polarities.push(result.polarity);
        match result.label {
            SentimentLabel::Positive => summary.positive_count += 1,
            SentimentLabel::Negative => summary.negative_count += 1,
            SentimentLabel::Neutral => summary.neutral_count += 1,
        }
        let d = &mut summary.distribution;
        let p = result.polarity;
        if p < -STRONG_POLARITY {
            d.very_negative += 1;
        } else if p < -LABEL_THRESHOLD {
            d.negative += 1;
        } else if p <= LABEL_THRESHOLD {
            d.neutral += 1;
        } else if p <= STRONG_POLARITY {
            d.positive += 1;
        } else {
            d.very_positive += 1;
        }
    }
    let n = polarities.len() as u64;
    summary.comments = n;
    summary.average_polarity = mean(&polarities);
    summary.median_polarity = median(&polarities);
    summary.positive_percent = share_percent(summary.positive_count, n);
    summary.negative_percent = share_percent(summary.negative_count, n);
    summary
}

pub fn build_sentiment_overview(records: &[ScoredResponse]) -> SentimentOverview {
    let with_q1 = |vote: Vote| {
        summarize_sentiment(
            records
                .iter()
                .filter(move |r| r.response.q1 == Some(vote))
                .filter_map(|r| r.sentiment.as_ref()),
        )
    };
    SentimentOverview {
        overall: summarize_sentiment(records.iter().filter_map(|r| r.sentiment.as_ref())),
        support: with_q1(Vote::Yes),
        oppose: with_q1(Vote::No),
    }
}

pub fn extract_suggestions(comment: &str) -> SuggestionResult {
    let mut suggestions: Vec<String> = Vec::new();
    let mut cue_sentences = 0usize;
    for sentence in comment.split(['.', '!', '?', '\n']) {
        let sentence = sentence.trim();
        if sentence.chars().count() < MIN_SUGGESTION_CHARS {
            continue;
        }
        let tokens = tokenize(sentence);
        if !has_suggestion_cue(&tokens) {
            continue;
        }
        cue_sentences += 1;
        let text = truncate_chars(sentence, MAX_SUGGESTION_CHARS);
        if !suggestions.contains(&text) {
            suggestions.push(text);
        }
    }
    if suggestions.is_empty() {
        return SuggestionResult::default();
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    SuggestionResult {
        has_suggestion: true,
        suggestions,
        categories: suggestion_categories(&tokenize(comment)),
        confidence: (cue_sentences as f64 * SUGGESTION_CONFIDENCE).min(1.0),
    }
}

fn has_suggestion_cue(tokens: &[String]) -> bool {
    SUGGESTION_CUES
        .iter()
        .any(|cue| contains_phrase(tokens, cue))
        || followed_by(tokens, "please", PLEASE_VERBS)
        || followed_by(tokens, "choose", &["instead"])
}

fn followed_by(tokens: &[String], first: &str, later: &[&str]) -> bool {
    tokens
        .iter()
        .position(|t| t == first)
        .is_some_and(|idx| tokens[idx + 1..].iter().any(|t| later.contains(&t.as_str())))
}

fn suggestion_categories(tokens: &[String]) -> Vec<String> {
    let categories = SUGGESTION_CATEGORIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| contains_phrase(tokens, kw)))
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>();
    if categories.is_empty() {
        vec![GENERAL_SUGGESTION_CATEGORY.to_string()]
    } else {
        categories
    }
}

pub fn summarize_suggestions(records: &[ScoredResponse]) -> SuggestionSummary {
    let mut summary = SuggestionSummary::default();
    let mut commented = 0u64;
    let mut unique = Vec::<String>::new();
    let mut seen = HashSet::new();
    for result in records.iter().filter_map(|r| r.suggestions.as_ref()) {
        commented += 1;
        if !result.has_suggestion {
            continue;
        }
        summary.total_with_suggestions += 1;
        for text in &result.suggestions {
            if seen.insert(text.clone()) {
                unique.push(text.clone());
            }
        }
        for category in &result.categories {
            *summary
                .category_breakdown
                .entry(category.clone())
                .or_default() += 1;
        }
    }
    summary.suggestion_rate = share_percent(summary.total_with_suggestions, commented);

    unique.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    unique.truncate(TOP_SUGGESTIONS);
    summary.top_suggestions = unique;

    let mut ranked = summary.category_breakdown.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    summary.top_categories = ranked
        .into_iter()
        .take(TOP_SUGGESTION_CATEGORIES)
        .map(|(name, _)| name.clone())
        .collect();
    summary
}

pub fn build_temporal(records: &[ScoredResponse]) -> TemporalSummary {
    let mut hourly = vec![0u64; 24];
    let mut daily = BTreeMap::new();
    for ts in records.iter().filter_map(|r| r.response.timestamp) {
        hourly[ts.hour() as usize] += 1;
        *daily.entry(ts.date()).or_default() += 1;
    }

    // Ties go to the earliest hour and the earliest day.
    let peak_hour = hourly
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .fold(None::<(usize, u64)>, |best, (hour, &count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((hour, count)),
        })
        .map(|(hour, count)| PeakHour {
            hour: hour as u32,
            count,
            label: format!("{}:00 - {}:00", hour, hour + 1),
        });
    let peak_day = daily
        .iter()
        .fold(None::<(chrono::NaiveDate, u64)>, |best, (&date, &count)| {
            match best {
                Some((_, c)) if c >= count => best,
                _ => Some((date, count)),
            }
        })
        .map(|(date, count)| PeakDay { date, count });

    let mut running = 0u64;
    let cumulative = daily
        .iter()
        .map(|(&date, &count)| {
            running += count;
            CumulativePoint {
                date,
                daily_count: count,
                cumulative_count: running,
            }
        })
        .collect();

    TemporalSummary {
        hourly,
        daily,
        peak_hour,
        peak_day,
        cumulative,
    }
}

pub fn extract_words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.len() >= MIN_WORD_LEN && w.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|w| w.to_ascii_lowercase())
        .filter(|w| !is_stopword(w))
        .collect()
}

pub fn build_word_frequencies(records: &[ScoredResponse]) -> WordFrequencies {
    let mut all: BTreeMap<String, u64> = BTreeMap::new();
    let mut support: BTreeMap<String, u64> = BTreeMap::new();
    let mut oppose: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_words = 0u64;
    for record in records {
        let comment = record.response.comment.trim();
        if comment.chars().count() < MIN_WORD_COMMENT_CHARS {
            continue;
        }
        let bucket = match record.response.q1 {
            Some(Vote::Yes) => Some(&mut support),
            Some(Vote::No) => Some(&mut oppose),
            None => None,
        };
        let words = extract_words(comment);
        total_words += words.len() as u64;
        if let Some(bucket) = bucket {
            for word in &words {
                *bucket.entry(word.clone()).or_default() += 1;
            }
        }
        for word in words {
            *all.entry(word).or_default() += 1;
        }
    }
    WordFrequencies {
        unique_words: all.len() as u64,
        total_words,
        all: word_list(all),
        support: word_list(support),
        oppose: word_list(oppose),
    }
}

fn word_list(counts: BTreeMap<String, u64>) -> Vec<WordCount> {
    let mut ranked = counts.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(WORD_LIST_LIMIT)
        .filter(|(_, count)| *count >= MIN_WORD_COUNT)
        .map(|(word, count)| WordCount {
            word,
            count,
            size: (count * 2).min(MAX_WORD_SIZE),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_text_signals.rs"]
mod tests;
