use serde::Serialize;

use crate::model::snapshot::{
    ConcernStat, CrossTabulation, Overview, QualitySummary, Snapshot, SnapshotMetadata,
};
use crate::model::stats::SampleAdequacy;
use crate::query::findings::KeyFindings;

pub const TOOL_NAME: &str = "campus-surveyqc";

#[derive(Debug, Serialize)]
pub struct SummaryJson<'a> {
    pub tool: &'static str,
    pub metadata: &'a SnapshotMetadata,
    pub overview: &'a Overview,
    pub quality: &'a QualitySummary,
    pub concerns: &'a [ConcernStat],
    pub cross_tabulation: Option<&'a CrossTabulation>,
    pub sample_adequacy: &'a SampleAdequacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_findings: Option<&'a KeyFindings>,
}

impl<'a> SummaryJson<'a> {
    pub fn new(snapshot: &'a Snapshot, findings: Option<&'a KeyFindings>) -> Self {
        Self {
            tool: TOOL_NAME,
            metadata: &snapshot.metadata,
            overview: &snapshot.overview,
            quality: &snapshot.quality,
            concerns: &snapshot.concerns,
            cross_tabulation: snapshot.cross_tabulation.as_ref(),
            sample_adequacy: &snapshot.sample_adequacy,
            key_findings: findings,
        }
    }
}

pub fn render_summary_json(
    snapshot: &Snapshot,
    findings: Option<&KeyFindings>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SummaryJson::new(snapshot, findings))
}

pub fn render_snapshot_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}
