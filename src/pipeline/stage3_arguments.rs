use std::collections::{BTreeMap, HashSet};

use crate::lexicon::defs::{GENERAL_REASON, concern_def, general_claim};
use crate::lexicon::matching::normalize_whitespace;
use crate::model::argument::{ArgumentCluster, ArgumentSet, Stance};
use crate::model::concern::ConcernCategory;
use crate::model::response::Question;
use crate::model::snapshot::ScoredResponse;
use crate::model::thresholds::AnalysisProfile;

pub fn cluster_arguments(
    records: &[ScoredResponse],
    question: Question,
    min_quality: u8,
    profile: &AnalysisProfile,
) -> ArgumentSet {
    let mut groups: BTreeMap<(bool, Option<ConcernCategory>), Vec<&ScoredResponse>> =
        BTreeMap::new();
    for record in records {
        let Some(vote) = record.response.vote(question) else {
            continue;
        };
        if record.quality.score < min_quality
            || record.quality.is_hard_failed()
            || !record.response.has_comment()
        {
            continue;
        }
        let stance = profile.stance_for(question, vote);
        groups
            .entry((stance == Stance::For, record.primary_concern()))
            .or_default()
            .push(record);
    }

    let settings = &profile.arguments;
    let mut set = ArgumentSet::default();
    for ((is_for, concern), members) in groups {
        if members.len() < settings.min_support {
            continue;
        }
        let stance = if is_for { Stance::For } else { Stance::Against };
        let cluster = build_cluster(stance, concern, &members, settings.max_quotes);
        if is_for {
            set.for_.push(cluster);
        } else {
            set.against.push(cluster);
        }
    }
    sort_clusters(&mut set.for_);
    sort_clusters(&mut set.against);
    set
}

fn build_cluster(
    stance: Stance,
    concern: Option<ConcernCategory>,
    members: &[&ScoredResponse],
    max_quotes: usize,
) -> ArgumentCluster {
    let (claim, reason) = match concern {
        Some(category) => (
            concern_def(category).claim(stance).to_string(),
            category.as_str().to_string(),
        ),
        None => (general_claim(stance).to_string(), GENERAL_REASON.to_string()),
    };
    let mut response_ids = members.iter().map(|r| r.id()).collect::<Vec<_>>();
    response_ids.sort_unstable();

    ArgumentCluster {
        claim,
        reason,
        concern,
        frequency: members.len(),
        representative_quotes: representative_quotes(members, max_quotes),
        response_ids,
        stance,
    }
}

pub fn representative_quotes(members: &[&ScoredResponse], max_quotes: usize) -> Vec<String> {
    let mut ranked = members.to_vec();
    ranked.sort_by(|a, b| {
        let len_a = a.response.comment.trim().chars().count();
        let len_b = b.response.comment.trim().chars().count();
        len_b.cmp(&len_a).then_with(|| a.id().cmp(&b.id()))
    });
    let mut seen = HashSet::new();
    let mut quotes = Vec::new();
    for record in ranked {
        if quotes.len() >= max_quotes {
            break;
        }
        let quote = record.response.comment.trim();
        if seen.insert(normalize_whitespace(quote)) {
            quotes.push(quote.to_string());
        }
    }
    quotes
}

fn sort_clusters(clusters: &mut [ArgumentCluster]) {
    clusters.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| cluster_priority(a).cmp(&cluster_priority(b)))
    });
}

fn cluster_priority(cluster: &ArgumentCluster) -> usize {
    cluster.concern.map_or(usize::MAX, |c| c.priority())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_arguments.rs"]
mod tests;
