use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use campus_surveyqc::input::CsvSource;
use campus_surveyqc::input::cache::FileSnapshotStore;
use campus_surveyqc::logging::init_logging;
use campus_surveyqc::model::concern::ConcernCategory;
use campus_surveyqc::model::response::{GroupField, Vote};
use campus_surveyqc::model::snapshot::Snapshot;
use campus_surveyqc::model::thresholds::AnalysisProfile;
use campus_surveyqc::orchestrator::{Orchestrator, SnapshotCell};
use campus_surveyqc::pipeline::stage7_report::write_reports;
use campus_surveyqc::query::filter::DEFAULT_PAGE_SIZE;
use campus_surveyqc::query::findings::generate_key_findings;
use campus_surveyqc::query::{
    GroupSelector, PageRequest, ResponseFilter, available_groups, compare_groups,
    filter_responses, generate_recommendations, group_by,
};

#[derive(Debug, Parser)]
#[command(name = "campus-surveyqc", version)]
#[command(about = "Quality scoring, concern classification and significance-tested statistics for campus policy surveys", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// JSON analysis profile overriding default thresholds
    #[arg(long, global = true)]
    profile: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Survey export (CSV, optionally .csv.gz)
    #[arg(long)]
    input: PathBuf,
    /// Snapshot cache file; a `.gz` path is compressed
    #[arg(long)]
    cache: Option<PathBuf>,
    /// Recompute even when the cache holds a snapshot
    #[arg(long)]
    refresh: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VoteArg {
    Yes,
    No,
}

impl From<VoteArg> for Vote {
    fn from(v: VoteArg) -> Self {
        match v {
            VoteArg::Yes => Vote::Yes,
            VoteArg::No => Vote::No,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldArg {
    Course,
    Year,
}

impl From<FieldArg> for GroupField {
    fn from(f: FieldArg) -> Self {
        match f {
            FieldArg::Course => GroupField::Course,
            FieldArg::Year => GroupField::Year,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a fresh snapshot and write all reports
    Run {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "surveyqc_out")]
        out: PathBuf,
    },
    /// List scored responses matching filters, as JSON
    Responses {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        course: Vec<String>,
        #[arg(long)]
        year: Vec<String>,
        #[arg(long, value_enum)]
        q1: Option<VoteArg>,
        #[arg(long, value_enum)]
        q2: Option<VoteArg>,
        #[arg(long, value_parser = parse_concern)]
        concern: Vec<ConcernCategory>,
        #[arg(long)]
        min_quality: Option<u8>,
        #[arg(long)]
        max_quality: Option<u8>,
        #[arg(long)]
        valid_only: bool,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u64,
    },
    /// List available groups, or break votes down by one field
    Groups {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_enum)]
        by: Option<FieldArg>,
    },
    /// Compare two groups, e.g. `course:PhD year:1st Year`
    Compare {
        #[command(flatten)]
        source: SourceArgs,
        group_a: GroupSelector,
        group_b: GroupSelector,
    },
    /// Ranked plain-language key findings
    Findings {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Prioritised policy recommendations
    Recommendations {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn parse_concern(raw: &str) -> Result<ConcernCategory, String> {
    ConcernCategory::parse(raw).ok_or_else(|| {
        let known = ConcernCategory::all()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>();
        format!("unknown concern {raw:?}; expected one of {}", known.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let profile = load_profile(cli.profile.as_deref())?;

    match cli.command {
        Command::Run { source, out } => {
            let orchestrator = orchestrator_for(&source, &profile);
            let outcome = orchestrator.refresh(&CsvSource::new(&source.input));
            if !outcome.success {
                bail!("refresh failed: {}", outcome.message);
            }
            let snapshot = orchestrator
                .current()
                .context("refresh reported success without a snapshot")?;
            let findings = generate_key_findings(&snapshot, &profile);
            write_reports(&snapshot, &findings, &out)
                .with_context(|| format!("failed to write reports to {}", out.display()))?;
            println!("{} in {} ms", outcome.message, outcome.duration_ms);
            println!("reports written to {}", out.display());
        }
        Command::Responses {
            source,
            course,
            year,
            q1,
            q2,
            concern,
            min_quality,
            max_quality,
            valid_only,
            search,
            page,
            page_size,
        } => {
            let snapshot = obtain_snapshot(&source, &profile)?;
            let filter = ResponseFilter {
                courses: course,
                years: year,
                q1: q1.map(Vote::from),
                q2: q2.map(Vote::from),
                concerns: concern,
                min_quality,
                max_quality,
                valid_only,
                search,
            };
            let page = PageRequest::new(page, page_size)?;
            print_json(&filter_responses(&snapshot, &filter, page)?)?;
        }
        Command::Groups { source, by } => {
            let snapshot = obtain_snapshot(&source, &profile)?;
            match by {
                Some(field) => print_json(&group_by(
                    &snapshot,
                    &ResponseFilter::default(),
                    field.into(),
                    &profile,
                )?)?,
                None => print_json(&available_groups(&snapshot))?,
            }
        }
        Command::Compare {
            source,
            group_a,
            group_b,
        } => {
            let snapshot = obtain_snapshot(&source, &profile)?;
            print_json(&compare_groups(&snapshot, &group_a, &group_b, &profile)?)?;
        }
        Command::Findings { source } => {
            let snapshot = obtain_snapshot(&source, &profile)?;
            print_json(&generate_key_findings(&snapshot, &profile))?;
        }
        Command::Recommendations { source } => {
            let snapshot = obtain_snapshot(&source, &profile)?;
            print_json(&generate_recommendations(&snapshot))?;
        }
    }
    Ok(())
}

fn load_profile(path: Option<&Path>) -> anyhow::Result<AnalysisProfile> {
    let Some(path) = path else {
        return Ok(AnalysisProfile::default_v1());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let profile = serde_json::from_str(&raw)
        .with_context(|| format!("invalid profile {}", path.display()))?;
    info!(path = %path.display(), "loaded analysis profile");
    Ok(profile)
}

fn orchestrator_for(source: &SourceArgs, profile: &AnalysisProfile) -> Orchestrator {
    let orchestrator = Orchestrator::with_cell(profile.clone(), SnapshotCell::global());
    match &source.cache {
        Some(path) => orchestrator.with_store(Box::new(FileSnapshotStore::new(path))),
        None => orchestrator,
    }
}

/// Cached snapshot when allowed and present, otherwise a fresh computation.
fn obtain_snapshot(
    source: &SourceArgs,
    profile: &AnalysisProfile,
) -> anyhow::Result<Arc<Snapshot>> {
    let orchestrator = orchestrator_for(source, profile);
    if !source.refresh {
        match orchestrator.warm_start() {
            Ok(Some(snapshot)) => return Ok(snapshot),
            Ok(None) => {}
            Err(err) => warn!("ignoring unreadable snapshot cache: {err}"),
        }
    }
    let snapshot = orchestrator
        .current_or_refresh(&CsvSource::new(&source.input))
        .with_context(|| format!("failed to analyse {}", source.input.display()))?;
    Ok(snapshot)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
