use serde::Serialize;

use crate::model::concern::ConcernCategory;
use crate::model::response::{GroupField, Vote};
use crate::model::snapshot::{DemographicBreakdown, ScoredResponse, Snapshot};
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage4_aggregate::{group_breakdown, ordered_categories};
use crate::query::QueryError;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFilter {
    pub courses: Vec<String>,
    pub years: Vec<String>,
    pub q1: Option<Vote>,
    pub q2: Option<Vote>,
    pub concerns: Vec<ConcernCategory>,
    pub min_quality: Option<u8>,
    pub max_quality: Option<u8>,
    pub valid_only: bool,
    pub search: Option<String>,
}

impl ResponseFilter {
    pub fn validate(&self) -> Result<(), QueryError> {
        if let (Some(min), Some(max)) = (self.min_quality, self.max_quality) {
            if min > max {
                return Err(QueryError::QualityRange { min, max });
            }
        }
        Ok(())
    }

    pub fn matches(&self, record: &ScoredResponse) -> bool {
        let response = &record.response;
        let quality = &record.quality;
        if !self.courses.is_empty() && !self.courses.contains(&response.course) {
            return false;
        }
        if !self.years.is_empty() && !self.years.contains(&response.year) {
            return false;
        }
        if self.q1.is_some_and(|v| response.q1 != Some(v)) {
            return false;
        }
        if self.q2.is_some_and(|v| response.q2 != Some(v)) {
            return false;
        }
        if !self.concerns.is_empty()
            && !record
                .primary_concern()
                .is_some_and(|c| self.concerns.contains(&c))
        {
            return false;
        }
        if self.min_quality.is_some_and(|min| quality.score < min)
            || self.max_quality.is_some_and(|max| quality.score > max)
        {
            return false;
        }
        if self.valid_only && !quality.is_valid {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [&response.comment, &response.name, &response.roll_no]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::PageOutOfRange(page));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(QueryError::PageSizeOutOfRange {
                got: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, page_size })
    }

    fn offset(&self) -> usize {
        ((self.page - 1).saturating_mul(self.page_size)) as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePage<'a> {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub responses: Vec<&'a ScoredResponse>,
}

pub fn filter_responses<'a>(
    snapshot: &'a Snapshot,
    filter: &ResponseFilter,
    page: PageRequest,
) -> Result<ResponsePage<'a>, QueryError> {
    filter.validate()?;
    let matching = snapshot
        .responses
        .iter()
        .filter(|r| filter.matches(r))
        .collect::<Vec<_>>();
    let total = matching.len() as u64;
    let responses = matching
        .into_iter()
        .skip(page.offset())
        .take(page.page_size as usize)
        .collect();
    Ok(ResponsePage {
        total,
        page: page.page,
        page_size: page.page_size,
        total_pages: total.div_ceil(page.page_size),
        responses,
    })
}

pub fn group_by(
    snapshot: &Snapshot,
    filter: &ResponseFilter,
    field: GroupField,
    profile: &AnalysisProfile,
) -> Result<Vec<DemographicBreakdown>, QueryError> {
    filter.validate()?;
    let matching = snapshot
        .responses
        .iter()
        .filter(|r| filter.matches(r))
        .collect::<Vec<_>>();
    Ok(
        ordered_categories(matching.iter().copied(), field, profile)
            .into_iter()
            .map(|category| {
                let members = matching
                    .iter()
                    .copied()
                    .filter(|r| r.response.demographic(field) == category)
                    .collect::<Vec<_>>();
                group_breakdown(category, &members, profile.confidence_level)
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/src_inline/query/filter.rs"]
mod tests;
