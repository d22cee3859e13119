use thiserror::Error;

pub mod compare;
pub mod filter;
pub mod findings;
pub mod recommendations;

pub use compare::{GroupComparison, GroupSelector, available_groups, compare_groups};
pub use filter::{PageRequest, ResponseFilter, ResponsePage, filter_responses, group_by};
pub use findings::{KeyFindings, generate_key_findings};
pub use recommendations::{Recommendations, generate_recommendations};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid group selector {0:?}: expected field:value")]
    InvalidSelector(String),
    #[error("unknown group field {0:?}: expected course or year")]
    UnknownField(String),
    #[error("cannot compare group {0} with itself")]
    SameGroup(String),
    #[error("page must be at least 1, got {0}")]
    PageOutOfRange(u64),
    #[error("page_size must be between 1 and {max}, got {got}")]
    PageSizeOutOfRange { got: u64, max: u64 },
    #[error("min quality {min} is above max quality {max}")]
    QualityRange { min: u8, max: u8 },
}
