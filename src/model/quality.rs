use serde::{Deserialize, Serialize};

use crate::model::flags::QualityFlag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityResult {
    pub score: u8,
    pub flags: Vec<QualityFlag>,
    pub is_valid: bool,
    pub needs_review: bool,
}

impl QualityResult {
    pub fn has_flag(&self, flag: QualityFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_hard_failed(&self) -> bool {
        self.flags.iter().any(|f| f.is_hard_fail())
    }

    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl QualityBand {
    pub fn from_score(score: u8) -> QualityBand {
        match score {
            90..=u8::MAX => QualityBand::Excellent,
            70..=89 => QualityBand::Good,
            40..=69 => QualityBand::Acceptable,
            _ => QualityBand::Poor,
        }
    }
}
