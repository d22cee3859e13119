use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    Empty,
    TooShort,
    KeyboardSpam,
    AllCaps,
    Minimal,
    Duplicate,
}

impl QualityFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityFlag::Empty => "empty",
            QualityFlag::TooShort => "too_short",
            QualityFlag::KeyboardSpam => "keyboard_spam",
            QualityFlag::AllCaps => "all_caps",
            QualityFlag::Minimal => "minimal",
            QualityFlag::Duplicate => "duplicate",
        }
    }

    pub fn is_hard_fail(self) -> bool {
        matches!(
            self,
            QualityFlag::Empty | QualityFlag::KeyboardSpam | QualityFlag::Duplicate
        )
    }
}

pub fn flag_order() -> &'static [QualityFlag] {
    &[
        QualityFlag::Empty,
        QualityFlag::TooShort,
        QualityFlag::KeyboardSpam,
        QualityFlag::AllCaps,
        QualityFlag::Minimal,
        QualityFlag::Duplicate,
    ]
}

pub fn order_flags(flags: &[QualityFlag]) -> Vec<QualityFlag> {
    let mut ordered = Vec::with_capacity(flags.len());
    for flag in flag_order() {
        if flags.contains(flag) {
            ordered.push(*flag);
        }
    }
    ordered
}
