use std::cmp::Ordering;

use crate::lexicon::defs::concern_registry;
use crate::lexicon::matching::{contains_phrase, tokenize};
use crate::model::concern::{ConcernAnalysis, ConcernCategory};
use crate::model::thresholds::ClassifierThresholds;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub category: ConcernCategory,
    pub raw_score: f64,
    pub matched: Vec<&'static str>,
}

pub fn score_categories(comment: &str) -> Vec<CategoryScore> {
    let tokens = tokenize(comment);
    concern_registry()
        .iter()
        .map(|def| {
            let mut raw_score = 0.0;
            let mut matched = Vec::new();
            for pattern in def.patterns {
                if contains_phrase(&tokens, pattern.phrase) {
                    raw_score += pattern.weight;
                    matched.push(pattern.phrase);
                }
            }
            CategoryScore {
                category: def.category,
                raw_score,
                matched,
            }
        })
        .collect()
}

pub fn classify(comment: &str, thresholds: &ClassifierThresholds) -> ConcernAnalysis {
    let text = comment.trim();
    if text.chars().count() < thresholds.min_comment_chars {
        return ConcernAnalysis::default();
    }

    let mut ranked = score_categories(text)
        .into_iter()
        .filter(|s| s.raw_score > 0.0)
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.priority().cmp(&b.category.priority()))
    });

    let Some(top) = ranked.first() else {
        return ConcernAnalysis::default();
    };
    if top.raw_score < thresholds.detection_threshold {
        return ConcernAnalysis::default();
    }

    let secondary_concerns = ranked[1..]
        .iter()
        .filter(|s| s.raw_score >= thresholds.secondary_threshold)
        .take(thresholds.max_secondary)
        .map(|s| s.category)
        .collect();
    let confidence = if thresholds.saturation > 0.0 {
        (top.raw_score / thresholds.saturation).min(1.0)
    } else {
        1.0
    };

    ConcernAnalysis {
        primary_concern: Some(top.category),
        secondary_concerns,
        confidence,
        matched_keywords: top.matched.iter().map(|m| m.to_string()).collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_concerns.rs"]
mod tests;
