use csv::StringRecord;

use crate::input::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Timestamp,
    Name,
    RollNo,
    Course,
    Year,
    Q1,
    Q2,
    Comment,
}

const COLUMNS: [Column; 9] = [
    Column::Id,
    Column::Timestamp,
    Column::Name,
    Column::RollNo,
    Column::Course,
    Column::Year,
    Column::Q1,
    Column::Q2,
    Column::Comment,
];

const MIN_CONTAINED_ALIAS: usize = 4;

impl Column {
    pub fn all() -> &'static [Column] {
        &COLUMNS
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Timestamp => "timestamp",
            Column::Name => "name",
            Column::RollNo => "roll_no",
            Column::Course => "course",
            Column::Year => "year",
            Column::Q1 => "q1",
            Column::Q2 => "q2",
            Column::Comment => "comment",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Id => &["id", "response id", "response_id"],
            Column::Timestamp => &["timestamp", "submitted at"],
            Column::Name => &["name", "full name"],
            Column::RollNo => &["roll_no", "roll no", "roll number"],
            Column::Course => &["course", "course of study"],
            Column::Year => &["year", "current year"],
            Column::Q1 => &[
                "q1",
                "q1_parent_notification",
                "automated parent notification system",
            ],
            Column::Q2 => &["q2", "q2_monitoring", "entry exit monitoring policy"],
            Column::Comment => &[
                "comment",
                "comments",
                "please provide your reasoning",
            ],
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Column::Course | Column::Year | Column::Q1)
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; 9],
}

impl ColumnMap {
    pub fn resolve(headers: &StringRecord) -> Result<Self, InputError> {
        let normalized = headers
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect::<Vec<_>>();
        let mut map = ColumnMap::default();
        let mut claimed = vec![false; normalized.len()];

        for column in Column::all() {
            if let Some(idx) = (0..normalized.len())
                .find(|&i| !claimed[i] && column.aliases().contains(&normalized[i].as_str()))
            {
                map.positions[column.index()] = Some(idx);
                claimed[idx] = true;
            }
        }
        for column in Column::all() {
            if map.get(*column).is_some() {
                continue;
            }
            if let Some(idx) = (0..normalized.len()).find(|&i| {
                !claimed[i]
                    && column
                        .aliases()
                        .iter()
                        .any(|a| a.len() >= MIN_CONTAINED_ALIAS && normalized[i].contains(a))
            }) {
                map.positions[column.index()] = Some(idx);
                claimed[idx] = true;
            }
        }

        for column in Column::all() {
            if column.is_required() && map.get(*column).is_none() {
                return Err(InputError::MissingColumn(column.as_str()));
            }
        }
        Ok(map)
    }

    pub fn get(&self, column: Column) -> Option<usize> {
        self.positions[column.index()]
    }

    pub fn cell<'r>(&self, record: &'r StringRecord, column: Column) -> &'r str {
        self.get(column)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}
