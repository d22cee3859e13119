use std::fmt::Write;

use crate::model::argument::Stance;
use crate::model::response::Question;
use crate::model::snapshot::{DemographicBreakdown, QuestionSummary, Snapshot};
use crate::model::stats::PercentageWithCi;
use crate::query::findings::KeyFindings;
use crate::report::format_f64_2;

const TOP_ARGUMENTS: usize = 3;

pub fn render_report_text(snapshot: &Snapshot, findings: &KeyFindings) -> String {
    let mut out = String::new();
    let overview = &snapshot.overview;
    let meta = &snapshot.metadata;

    out.push_str("Campus Policy Survey Report\n");
    out.push_str("===========================\n\n");

    out.push_str("1. Responses\n");
    let _ = writeln!(out, "Total responses: {}", overview.total_responses);
    let _ = writeln!(out, "Valid responses: {}", overview.valid_responses);
    let _ = writeln!(out, "Flagged responses: {}", overview.flagged_responses);
    let _ = writeln!(out, "Duplicates: {}", overview.duplicate_count);
    let _ = writeln!(out, "Needs review: {}", overview.needs_review_count);
    let _ = writeln!(out, "Skipped input rows: {}", meta.skipped_rows);
    let _ = writeln!(
        out,
        "Computed at: {} ({} ms)\n",
        meta.computed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        meta.computation_ms
    );

    out.push_str("2. Vote results\n");
    for question in Question::all() {
        out.push_str(&question_line(overview.question(question)));
    }
    let adequacy = &snapshot.sample_adequacy;
    let _ = writeln!(
        out,
        "Sample adequacy: {} (worst-case MOE {}%, detectable difference {}pp)\n",
        adequacy.adequacy.as_str(),
        format_f64_2(adequacy.worst_case_moe_percent),
        format_f64_2(adequacy.can_detect_difference)
    );

    out.push_str("3. Q1 x Q2\n");
    match &snapshot.cross_tabulation {
        Some(cross) => {
            let _ = writeln!(
                out,
                "Yes/Yes: {}  Yes/No: {}  No/Yes: {}  No/No: {}  (n={})",
                cross.yes_yes, cross.yes_no, cross.no_yes, cross.no_no, cross.total_valid
            );
            let _ = writeln!(
                out,
                "Chi-square: {}{}  p: {}  phi: {} ({})  {}\n",
                format_f64_2(cross.test.chi_square),
                if cross.test.yates_corrected { " (Yates)" } else { "" },
                format_p(cross.test.p_value),
                format_f64_2(cross.test.correlation_coefficient),
                cross.strength.as_str(),
                cross.badge.symbol
            );
        }
        None => out.push_str("No responses answered both questions.\n\n"),
    }

    out.push_str("4. Concerns\n");
    let mentioned = snapshot
        .concerns
        .iter()
        .filter(|c| c.count > 0)
        .collect::<Vec<_>>();
    if mentioned.is_empty() {
        out.push_str("No concerns detected.\n");
    }
    for concern in mentioned {
        let _ = writeln!(
            out,
            "{}: {} ({}%)",
            concern.name,
            concern.count,
            format_f64_2(concern.percentage)
        );
    }
    out.push('\n');

    out.push_str("5. Arguments\n");
    for question in Question::all() {
        let Some(set) = snapshot.arguments(question) else {
            continue;
        };
        for stance in [Stance::For, Stance::Against] {
            let clusters = set.stance(stance);
            if clusters.is_empty() {
                continue;
            }
            let top = clusters
                .iter()
                .take(TOP_ARGUMENTS)
                .map(|c| format!("{} ({})", c.claim, c.frequency))
                .collect::<Vec<_>>();
            let _ = writeln!(
                out,
                "{} {}: {}",
                question.as_str().to_uppercase(),
                stance.as_str(),
                top.join("; ")
            );
        }
    }
    out.push('\n');

    out.push_str("6. Demographics (Q1 support)\n");
    for group in snapshot
        .demographics
        .by_course
        .iter()
        .chain(&snapshot.demographics.by_year)
    {
        out.push_str(&group_line(group));
    }
    out.push('\n');

    out.push_str("7. Quality\n");
    let quality = &snapshot.quality;
    let _ = writeln!(
        out,
        "Excellent: {}  Good: {}  Acceptable: {}  Poor: {}",
        quality.excellent, quality.good, quality.acceptable, quality.poor
    );
    let _ = writeln!(
        out,
        "Score median: {}  p10: {}  p90: {}",
        format_f64_2(quality.score_median),
        format_f64_2(quality.score_p10),
        format_f64_2(quality.score_p90)
    );
    let flags = quality
        .flag_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(flag, count)| format!("{}={count}", flag.as_str()))
        .collect::<Vec<_>>();
    if !flags.is_empty() {
        let _ = writeln!(out, "Flags: {}", flags.join(", "));
    }
    out.push('\n');

    out.push_str("8. Key findings\n");
    if findings.findings.is_empty() {
        out.push_str("No findings.\n");
    }
    for (idx, finding) in findings.findings.iter().enumerate() {
        let _ = write!(out, "{}. {}", idx + 1, finding.text);
        if let Some(stat) = &finding.supporting_stat {
            let _ = write!(out, " [{stat}]");
        }
        out.push('\n');
    }

    out
}

fn format_ci(ci: &PercentageWithCi) -> String {
    format!(
        "{}% ± {} [{}, {}]",
        format_f64_2(ci.percentage),
        format_f64_2(ci.margin_of_error),
        format_f64_2(ci.ci_lower),
        format_f64_2(ci.ci_upper)
    )
}

fn format_p(p: f64) -> String {
    if p < 0.001 {
        "<0.001".to_string()
    } else {
        format!("{p:.3}")
    }
}

fn question_line(summary: &QuestionSummary) -> String {
    format!(
        "{} support: {} (yes {}, no {}, blank {})\n",
        summary.question.as_str().to_uppercase(),
        format_ci(&summary.support),
        summary.support_count,
        summary.oppose_count,
        summary.no_vote_count
    )
}

fn group_line(group: &DemographicBreakdown) -> String {
    format!(
        "{}: {} (n={})\n",
        group.category,
        format_ci(&group.q1_support),
        group.total
    )
}
