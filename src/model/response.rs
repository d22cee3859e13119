use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Question {
    Q1,
    Q2,
}

impl Question {
    pub fn all() -> [Question; 2] {
        [Question::Q1, Question::Q2]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Question::Q1 => "q1",
            Question::Q2 => "q2",
        }
    }

    pub fn parse(s: &str) -> Option<Question> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q1" => Some(Question::Q1),
            "q2" => Some(Question::Q2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
}

impl Vote {
    pub fn parse(raw: &str) -> Result<Option<Vote>, String> {
        let v = raw.trim();
        if v.is_empty() {
            return Ok(None);
        }
        match v.to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Some(Vote::Yes)),
            "no" | "n" => Ok(Some(Vote::No)),
            _ => Err(format!("unrecognized vote value {v:?}")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vote::Yes => "Yes",
            Vote::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Course,
    Year,
}

impl GroupField {
    pub fn all() -> [GroupField; 2] {
        [GroupField::Course, GroupField::Year]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupField::Course => "course",
            GroupField::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Option<GroupField> {
        match s.trim().to_ascii_lowercase().as_str() {
            "course" => Some(GroupField::Course),
            "year" => Some(GroupField::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    pub timestamp: Option<NaiveDateTime>,
    pub name: String,
    pub roll_no: String,
    pub course: String,
    pub year: String,
    pub q1: Option<Vote>,
    pub q2: Option<Vote>,
    pub comment: String,
}

impl Response {
    pub fn vote(&self, question: Question) -> Option<Vote> {
        match question {
            Question::Q1 => self.q1,
            Question::Q2 => self.q2,
        }
    }

    pub fn demographic(&self, field: GroupField) -> &str {
        match field {
            GroupField::Course => &self.course,
            GroupField::Year => &self.year,
        }
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.trim().is_empty()
    }
}
