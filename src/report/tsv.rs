use std::io::Write;

use csv::WriterBuilder;

use crate::model::response::Vote;
use crate::model::snapshot::ScoredResponse;

const HEADER: [&str; 16] = [
    "id",
    "timestamp",
    "course",
    "year",
    "q1",
    "q2",
    "quality_score",
    "is_valid",
    "needs_review",
    "flags",
    "primary_concern",
    "secondary_concerns",
    "concern_confidence",
    "sentiment_polarity",
    "suggestion_count",
    "comment",
];

pub fn write_responses_tsv<W: Write>(
    writer: W,
    responses: &[ScoredResponse],
) -> Result<(), csv::Error> {
    let mut w = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    w.write_record(HEADER)?;
    for record in responses {
        w.write_record(response_row(record))?;
    }
    w.flush()?;
    Ok(())
}

fn response_row(record: &ScoredResponse) -> Vec<String> {
    let response = &record.response;
    let quality = &record.quality;
    let vote = |v: Option<Vote>| v.map(|v| v.as_str().to_string()).unwrap_or_default();
    let flags = quality
        .flags
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let (primary, secondary, confidence) = match &record.concerns {
        Some(c) => (
            c.primary_concern.map(|p| p.as_str()).unwrap_or_default().to_string(),
            c.secondary_concerns
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(","),
            format!("{:.3}", c.confidence),
        ),
        None => (String::new(), String::new(), String::new()),
    };
    vec![
        response.id.to_string(),
        response
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        response.course.clone(),
        response.year.clone(),
        vote(response.q1),
        vote(response.q2),
        quality.score.to_string(),
        quality.is_valid.to_string(),
        quality.needs_review.to_string(),
        flags,
        primary,
        secondary,
        confidence,
        record
            .sentiment
            .as_ref()
            .map(|s| format!("{:.3}", s.polarity))
            .unwrap_or_default(),
        record
            .suggestions
            .as_ref()
            .map(|s| s.suggestions.len().to_string())
            .unwrap_or_default(),
        response.comment.clone(),
    ]
}
