use std::collections::{BTreeMap, HashSet};

use crate::lexicon::defs::concern_registry;
use crate::lexicon::matching::normalize_whitespace;
use crate::model::concern::ConcernCategory;
use crate::model::flags::{QualityFlag, flag_order};
use crate::model::quality::QualityBand;
use crate::model::response::{GroupField, Question, Vote};
use crate::model::snapshot::{
    ConcernStat, CrossTabulation, DemographicBreakdown, Demographics, Overview, QualitySummary,
    QuestionSummary, ScoredResponse,
};
use crate::model::thresholds::AnalysisProfile;
use crate::report::{median, p10, p90, share_percent};
use crate::stats::{
    chi_square_2x2, correlation_strength, percentage_with_ci, significance_badge_with,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub yes: u64,
    pub no: u64,
    pub missing: u64,
}

impl VoteCounts {
    pub fn tally<'a>(
        records: impl IntoIterator<Item = &'a ScoredResponse>,
        question: Question,
    ) -> Self {
        let mut counts = VoteCounts::default();
        for record in records {
            match record.response.vote(question) {
                Some(Vote::Yes) => counts.yes += 1,
                Some(Vote::No) => counts.no += 1,
                None => counts.missing += 1,
            }
        }
        counts
    }

    pub fn voted(&self) -> u64 {
        self.yes + self.no
    }
}

pub fn question_summary(
    records: &[ScoredResponse],
    question: Question,
    confidence: f64,
) -> QuestionSummary {
    let counts = VoteCounts::tally(records, question);
    QuestionSummary {
        question,
        support_count: counts.yes,
        oppose_count: counts.no,
        no_vote_count: counts.missing,
        support: percentage_with_ci(counts.yes, counts.voted(), confidence),
    }
}

pub fn build_overview(records: &[ScoredResponse], profile: &AnalysisProfile) -> Overview {
    let mut overview = Overview {
        total_responses: records.len() as u64,
        valid_responses: 0,
        flagged_responses: 0,
        duplicate_count: 0,
        needs_review_count: 0,
        q1: question_summary(records, Question::Q1, profile.confidence_level),
        q2: question_summary(records, Question::Q2, profile.confidence_level),
        response_by_course: BTreeMap::new(),
        response_by_year: BTreeMap::new(),
    };
    for record in records {
        let quality = &record.quality;
        if quality.is_valid {
            overview.valid_responses += 1;
        }
        if quality.is_flagged() {
            overview.flagged_responses += 1;
        }
        if quality.has_flag(QualityFlag::Duplicate) {
            overview.duplicate_count += 1;
        }
        if quality.needs_review {
            overview.needs_review_count += 1;
        }
        *overview
            .response_by_course
            .entry(record.response.course.clone())
            .or_default() += 1;
        *overview
            .response_by_year
            .entry(record.response.year.clone())
            .or_default() += 1;
    }
    overview
}

pub fn build_quality_summary(records: &[ScoredResponse]) -> QualitySummary {
    let mut summary = QualitySummary::default();
    for flag in flag_order() {
        summary.flag_counts.insert(*flag, 0);
    }
    let mut scores = Vec::with_capacity(records.len());
    for record in records {
        let quality = &record.quality;
        match QualityBand::from_score(quality.score) {
            QualityBand::Excellent => summary.excellent += 1,
            QualityBand::Good => summary.good += 1,
            QualityBand::Acceptable => summary.acceptable += 1,
            QualityBand::Poor => summary.poor += 1,
        }
        for flag in &quality.flags {
            *summary.flag_counts.entry(*flag).or_default() += 1;
        }
        scores.push(f64::from(quality.score));
    }
    summary.score_median = median(&scores);
    summary.score_p10 = p10(&scores);
    summary.score_p90 = p90(&scores);
    summary
}

pub fn build_concern_stats(
    records: &[ScoredResponse],
    profile: &AnalysisProfile,
) -> Vec<ConcernStat> {
    let classified = records
        .iter()
        .filter(|r| r.primary_concern().is_some())
        .count() as u64;
    let mut stats = concern_registry()
        .iter()
        .map(|def| {
            let members = records
                .iter()
                .filter(|r| r.primary_concern() == Some(def.category))
                .collect::<Vec<_>>();
            let count = members.len() as u64;
            ConcernStat {
                concern: def.category,
                name: def.name.to_string(),
                color: def.color.to_string(),
                count,
                percentage: share_percent(count, classified),
                sample_quotes: concern_quotes(&members, profile),
            }
        })
        .collect::<Vec<_>>();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.concern.priority().cmp(&b.concern.priority()))
    });
    stats
}

fn concern_quotes(members: &[&ScoredResponse], profile: &AnalysisProfile) -> Vec<String> {
    let settings = &profile.arguments;
    let mut candidates = members
        .iter()
        .map(|r| (r.id(), r.response.comment.trim()))
        .filter(|(_, text)| text.chars().count() > settings.min_quote_chars)
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| {
        b.1.chars()
            .count()
            .cmp(&a.1.chars().count())
            .then_with(|| a.0.cmp(&b.0))
    });
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|(_, text)| seen.insert(normalize_whitespace(text)))
        .take(settings.max_concern_quotes)
        .map(|(_, text)| text.to_string())
        .collect()
}

pub fn build_demographics(records: &[ScoredResponse], profile: &AnalysisProfile) -> Demographics {
    Demographics {
        by_course: breakdown_by(records, GroupField::Course, profile),
        by_year: breakdown_by(records, GroupField::Year, profile),
    }
}

pub fn ordered_categories<'a>(
    records: impl IntoIterator<Item = &'a ScoredResponse>,
    field: GroupField,
    profile: &AnalysisProfile,
) -> Vec<String> {
    let present = records
        .into_iter()
        .map(|r| r.response.demographic(field).to_string())
        .collect::<std::collections::BTreeSet<_>>();
    let known = match field {
        GroupField::Course => &profile.demographics.courses,
        GroupField::Year => &profile.demographics.years,
    };
    let mut ordered = known
        .iter()
        .filter(|k| present.contains(*k))
        .cloned()
        .collect::<Vec<_>>();
    for value in present {
        if !known.contains(&value) {
            ordered.push(value);
        }
    }
    ordered
}

fn breakdown_by(
    records: &[ScoredResponse],
    field: GroupField,
    profile: &AnalysisProfile,
) -> Vec<DemographicBreakdown> {
    ordered_categories(records, field, profile)
        .into_iter()
        .map(|category| {
            let members = records
                .iter()
                .filter(|r| r.response.demographic(field) == category)
                .collect::<Vec<_>>();
            group_breakdown(category, &members, profile.confidence_level)
        })
        .collect()
}

pub fn group_breakdown(
    category: String,
    members: &[&ScoredResponse],
    confidence: f64,
) -> DemographicBreakdown {
    let q1 = VoteCounts::tally(members.iter().copied(), Question::Q1);
    let q2 = VoteCounts::tally(members.iter().copied(), Question::Q2);
    DemographicBreakdown {
        category,
        total: members.len() as u64,
        valid: members.iter().filter(|r| r.quality.is_valid).count() as u64,
        q1_yes: q1.yes,
        q1_no: q1.no,
        q1_support: percentage_with_ci(q1.yes, q1.voted(), confidence),
        q2_yes: q2.yes,
        q2_no: q2.no,
        q2_support: percentage_with_ci(q2.yes, q2.voted(), confidence),
    }
}

pub fn build_cross_tab(
    records: &[ScoredResponse],
    profile: &AnalysisProfile,
) -> Option<CrossTabulation> {
    let (mut yes_yes, mut yes_no, mut no_yes, mut no_no) = (0u64, 0u64, 0u64, 0u64);
    for record in records {
        match (record.response.q1, record.response.q2) {
            (Some(Vote::Yes), Some(Vote::Yes)) => yes_yes += 1,
            (Some(Vote::Yes), Some(Vote::No)) => yes_no += 1,
            (Some(Vote::No), Some(Vote::Yes)) => no_yes += 1,
            (Some(Vote::No), Some(Vote::No)) => no_no += 1,
            _ => {}
        }
    }
    let total_valid = yes_yes + yes_no + no_yes + no_no;
    if total_valid == 0 {
        return None;
    }
    let test = chi_square_2x2(yes_yes, yes_no, no_yes, no_no);
    let thresholds = &profile.significance;
    let significant = test.p_value < thresholds.alpha;
    Some(CrossTabulation {
        yes_yes,
        yes_no,
        no_yes,
        no_no,
        total_valid,
        yes_yes_percent: share_percent(yes_yes, total_valid),
        yes_no_percent: share_percent(yes_no, total_valid),
        no_yes_percent: share_percent(no_yes, total_valid),
        no_no_percent: share_percent(no_no, total_valid),
        strength: correlation_strength(test.correlation_coefficient, thresholds),
        badge: significance_badge_with(test.p_value, significant, thresholds),
        test,
    })
}

pub fn primary_concern_counts(records: &[ScoredResponse]) -> BTreeMap<ConcernCategory, u64> {
    let mut counts = BTreeMap::new();
    for category in records.iter().filter_map(|r| r.primary_concern()) {
        *counts.entry(category).or_default() += 1;
    }
    counts
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_aggregate.rs"]
mod tests;
