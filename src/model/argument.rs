use serde::{Deserialize, Serialize};

use crate::model::concern::ConcernCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    For,
    Against,
}

impl Stance {
    pub fn as_str(self) -> &'static str {
        match self {
            Stance::For => "for",
            Stance::Against => "against",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentCluster {
    pub claim: String,
    pub reason: String,
    pub concern: Option<ConcernCategory>,
    pub frequency: usize,
    pub representative_quotes: Vec<String>,
    pub response_ids: Vec<u64>,
    pub stance: Stance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSet {
    #[serde(rename = "for")]
    pub for_: Vec<ArgumentCluster>,
    pub against: Vec<ArgumentCluster>,
}

impl ArgumentSet {
    pub fn stance(&self, stance: Stance) -> &[ArgumentCluster] {
        match stance {
            Stance::For => &self.for_,
            Stance::Against => &self.against,
        }
    }
}
