use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::model::quality::QualityResult;
use crate::model::response::{Question, Response};
use crate::model::snapshot::{
    FeatureFlags, SNAPSHOT_SCHEMA_VERSION, ScoredResponse, Snapshot, SnapshotMetadata,
};
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage1_quality::run_stage1;
use crate::pipeline::stage2_concerns::classify;
use crate::pipeline::stage3_arguments::cluster_arguments;
use crate::pipeline::stage4_aggregate::{
    build_concern_stats, build_cross_tab, build_demographics, build_overview,
    build_quality_summary,
};
use crate::pipeline::stage5_text_signals::{
    analyze_sentiment, build_sentiment_overview, build_temporal, build_word_frequencies,
    extract_suggestions, summarize_suggestions,
};
use crate::stats::sample_adequacy_with;

#[derive(Debug, Clone, Default)]
pub struct Stage6Input {
    pub responses: Vec<Response>,
    pub skipped_rows: u64,
}

pub fn build_snapshot(input: Stage6Input, profile: &AnalysisProfile) -> Snapshot {
    let started = Instant::now();
    let Stage6Input {
        mut responses,
        skipped_rows,
    } = input;
    responses.sort_by_key(|r| r.id);
    let input_rows = responses.len() as u64 + skipped_rows;

    let qualities = run_stage1(&responses, &profile.quality);
    let records = responses
        .into_par_iter()
        .zip(qualities.into_par_iter())
        .map(|(response, quality)| score_response(response, quality, profile))
        .collect::<Vec<_>>();
    debug!(responses = records.len(), "per-response scoring complete");

    let arguments = Question::all()
        .into_iter()
        .map(|q| {
            (
                q,
                cluster_arguments(&records, q, profile.arguments.min_quality, profile),
            )
        })
        .collect::<BTreeMap<_, _>>();

    let overview = build_overview(&records, profile);
    let quality = build_quality_summary(&records);
    let concerns = build_concern_stats(&records, profile);
    let demographics = build_demographics(&records, profile);
    let cross_tabulation = build_cross_tab(&records, profile);
    let sample_adequacy = sample_adequacy_with(
        overview.total_responses,
        profile.population_estimate,
        &profile.significance,
    );
    let sentiment = build_sentiment_overview(&records);
    let suggestions = summarize_suggestions(&records);
    let temporal = build_temporal(&records);
    let word_frequencies = build_word_frequencies(&records);

    let features = FeatureFlags {
        quality: !records.is_empty(),
        concerns: concerns.iter().any(|c| c.count > 0),
        arguments: arguments
            .values()
            .any(|set| !set.for_.is_empty() || !set.against.is_empty()),
        cross_tabulation: cross_tabulation.is_some(),
        sentiment: sentiment.overall.comments > 0,
        suggestions: suggestions.total_with_suggestions > 0,
        temporal: temporal.peak_hour.is_some(),
        word_frequencies: word_frequencies.total_words > 0,
    };
    let computation_ms = started.elapsed().as_millis() as u64;
    info!(
        responses = records.len(),
        valid = overview.valid_responses,
        skipped = skipped_rows,
        computation_ms,
        "snapshot built"
    );

    Snapshot {
        metadata: SnapshotMetadata {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            computed_at: Utc::now(),
            computation_ms,
            input_rows,
            processed_responses: records.len() as u64,
            skipped_rows,
            confidence_level: profile.confidence_level,
            features,
        },
        overview,
        quality,
        concerns,
        demographics,
        cross_tabulation,
        arguments,
        sample_adequacy,
        sentiment,
        suggestions,
        temporal,
        word_frequencies,
        responses: records,
    }
}

pub fn score_response(
    response: Response,
    quality: QualityResult,
    profile: &AnalysisProfile,
) -> ScoredResponse {
    let has_comment = response.has_comment();
    let concerns =
        (has_comment && quality.is_valid).then(|| classify(&response.comment, &profile.classifier));
    let sentiment = has_comment.then(|| analyze_sentiment(&response.comment));
    let suggestions = has_comment.then(|| extract_suggestions(&response.comment));
    ScoredResponse {
        response,
        quality,
        concerns,
        sentiment,
        suggestions,
    }
}

pub fn first_non_finite(snapshot: &Snapshot) -> Option<&'static str> {
    let overview = &snapshot.overview;
    let mut checks: Vec<(&'static str, f64)> = vec![
        ("overview.q1.support", overview.q1.support.percentage),
        ("overview.q1.margin_of_error", overview.q1.support.margin_of_error),
        ("overview.q2.support", overview.q2.support.percentage),
        ("overview.q2.margin_of_error", overview.q2.support.margin_of_error),
        ("quality.score_median", snapshot.quality.score_median),
        (
            "sample_adequacy.worst_case_moe_percent",
            snapshot.sample_adequacy.worst_case_moe_percent,
        ),
        (
            "sample_adequacy.can_detect_difference",
            snapshot.sample_adequacy.can_detect_difference,
        ),
        (
            "sentiment.average_polarity",
            snapshot.sentiment.overall.average_polarity,
        ),
        ("suggestions.suggestion_rate", snapshot.suggestions.suggestion_rate),
    ];
    for stat in &snapshot.concerns {
        checks.push(("concerns.percentage", stat.percentage));
    }
    for breakdown in snapshot
        .demographics
        .by_course
        .iter()
        .chain(snapshot.demographics.by_year.iter())
    {
        checks.push(("demographics.q1_support", breakdown.q1_support.percentage));
        checks.push(("demographics.q2_support", breakdown.q2_support.percentage));
    }
    if let Some(table) = &snapshot.cross_tabulation {
        checks.push(("cross_tabulation.chi_square", table.test.chi_square));
        checks.push(("cross_tabulation.p_value", table.test.p_value));
        checks.push((
            "cross_tabulation.correlation",
            table.test.correlation_coefficient,
        ));
    }
    for record in &snapshot.responses {
        if let Some(concerns) = &record.concerns {
            checks.push(("responses.concern_confidence", concerns.confidence));
        }
        if let Some(sentiment) = &record.sentiment {
            checks.push(("responses.polarity", sentiment.polarity));
        }
    }
    checks
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_snapshot.rs"]
mod tests;
