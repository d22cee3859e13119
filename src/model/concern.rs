use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcernCategory {
    Privacy,
    Autonomy,
    Trust,
    Safety,
    Parental,
    Necessity,
    Implementation,
}

impl ConcernCategory {
    pub fn all() -> &'static [ConcernCategory] {
        &[
            ConcernCategory::Privacy,
            ConcernCategory::Autonomy,
            ConcernCategory::Trust,
            ConcernCategory::Safety,
            ConcernCategory::Parental,
            ConcernCategory::Necessity,
            ConcernCategory::Implementation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConcernCategory::Privacy => "privacy",
            ConcernCategory::Autonomy => "autonomy",
            ConcernCategory::Trust => "trust",
            ConcernCategory::Safety => "safety",
            ConcernCategory::Parental => "parental",
            ConcernCategory::Necessity => "necessity",
            ConcernCategory::Implementation => "implementation",
        }
    }

    pub fn parse(s: &str) -> Option<ConcernCategory> {
        let lower = s.trim().to_ascii_lowercase();
        ConcernCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
    }

    pub fn priority(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcernAnalysis {
    pub primary_concern: Option<ConcernCategory>,
    pub secondary_concerns: Vec<ConcernCategory>,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

impl ConcernAnalysis {
    pub fn is_empty(&self) -> bool {
        self.primary_concern.is_none() && self.secondary_concerns.is_empty()
    }
}
