use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{info, warn};

pub mod cache;
pub mod columns;

use columns::{Column, ColumnMap};

use crate::model::response::{Response, Vote};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("empty input: {0}")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {reason}")]
pub struct RowError {
    pub row: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedResponses {
    pub responses: Vec<Response>,
    pub skipped: Vec<RowError>,
}

impl LoadedResponses {
    pub fn skipped_rows(&self) -> u64 {
        self.skipped.len() as u64
    }
}

pub trait ResponseSource: Send + Sync {
    fn fetch(&self) -> Result<LoadedResponses, InputError>;
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResponseSource for CsvSource {
    fn fetch(&self) -> Result<LoadedResponses, InputError> {
        load_responses(&self.path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub batch: LoadedResponses,
}

impl ResponseSource for StaticSource {
    fn fetch(&self) -> Result<LoadedResponses, InputError> {
        Ok(self.batch.clone())
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn load_responses(path: &Path) -> Result<LoadedResponses, InputError> {
    let loaded = read_responses(open_maybe_gz(path)?)?;
    info!(
        path = %path.display(),
        responses = loaded.responses.len(),
        skipped = loaded.skipped.len(),
        "loaded survey export"
    );
    Ok(loaded)
}

pub fn read_responses<R: Read>(reader: R) -> Result<LoadedResponses, InputError> {
    let mut csv = ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(InputError::Empty("no header row".to_string()));
    }
    let map = ColumnMap::resolve(&headers)?;

    let mut loaded = LoadedResponses::default();
    let mut seen_ids = HashSet::new();
    for (idx, record) in csv.records().enumerate() {
        let row = idx as u64 + 1;
        let parsed = match record {
            Ok(record) if is_blank(&record) => continue,
            Ok(record) => parse_row(&record, &map, row, &mut seen_ids),
            Err(e) => Err(RowError {
                row,
                reason: e.to_string(),
            }),
        };
        match parsed {
            Ok(response) => loaded.responses.push(response),
            Err(err) => {
                warn!(row = err.row, reason = %err.reason, "skipping malformed row");
                loaded.skipped.push(err);
            }
        }
    }
    Ok(loaded)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

pub fn parse_row(
    record: &StringRecord,
    map: &ColumnMap,
    row: u64,
    seen_ids: &mut HashSet<u64>,
) -> Result<Response, RowError> {
    let fail = |reason: String| RowError { row, reason };

    let id = match map.get(Column::Id) {
        Some(_) => {
            let raw = map.cell(record, Column::Id);
            raw.parse::<u64>()
                .map_err(|_| fail(format!("id {raw:?} is not a non-negative integer")))?
        }
        None => row,
    };
    if seen_ids.contains(&id) {
        return Err(fail(format!("duplicate id {id}")));
    }

    let timestamp = parse_timestamp(map.cell(record, Column::Timestamp)).map_err(fail)?;
    let course = map.cell(record, Column::Course);
    if course.is_empty() {
        return Err(fail("empty course".to_string()));
    }
    let year = map.cell(record, Column::Year);
    if year.is_empty() {
        return Err(fail("empty year".to_string()));
    }
    let q1 = Vote::parse(map.cell(record, Column::Q1)).map_err(|e| fail(format!("q1: {e}")))?;
    let q2 = Vote::parse(map.cell(record, Column::Q2)).map_err(|e| fail(format!("q2: {e}")))?;
    seen_ids.insert(id);

    Ok(Response {
        id,
        timestamp,
        name: map.cell(record, Column::Name).to_string(),
        roll_no: map.cell(record, Column::RollNo).to_string(),
        course: course.to_string(),
        year: year.to_string(),
        q1,
        q2,
        comment: map.cell(record, Column::Comment).to_string(),
    })
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Empty text is an absent timestamp. RFC 3339 keeps its local wall-clock
/// time; ambiguous slash dates read month first.
pub fn parse_timestamp(raw: &str) -> Result<Option<NaiveDateTime>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.naive_local()));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(Some)
        .ok_or_else(|| format!("unparseable timestamp {raw:?}"))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
