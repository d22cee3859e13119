use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::snapshot::Snapshot;
use crate::query::findings::KeyFindings;
use crate::report::json::{render_snapshot_json, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::tsv::write_responses_tsv;

pub const SNAPSHOT_FILE: &str = "snapshot.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const RESPONSES_FILE: &str = "responses.tsv";
pub const REPORT_FILE: &str = "report.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub snapshot: PathBuf,
    pub summary: PathBuf,
    pub responses: PathBuf,
    pub report: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(out_dir: &Path) -> Self {
        Self {
            snapshot: out_dir.join(SNAPSHOT_FILE),
            summary: out_dir.join(SUMMARY_FILE),
            responses: out_dir.join(RESPONSES_FILE),
            report: out_dir.join(REPORT_FILE),
        }
    }
}

pub fn write_reports(
    snapshot: &Snapshot,
    findings: &KeyFindings,
    out_dir: &Path,
) -> std::io::Result<ReportPaths> {
    fs::create_dir_all(out_dir)?;
    let paths = ReportPaths::in_dir(out_dir);

    write_text(&paths.snapshot, &render_snapshot_json(snapshot)?)?;
    write_text(&paths.summary, &render_summary_json(snapshot, Some(findings))?)?;

    let w = BufWriter::new(File::create(&paths.responses)?);
    write_responses_tsv(w, &snapshot.responses)?;

    write_text(&paths.report, &render_report_text(snapshot, findings))?;

    info!(out_dir = %out_dir.display(), "reports written");
    Ok(paths)
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_report.rs"]
mod tests;
