use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Current,
    Former,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Current => "current",
            Status::Former => "former",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Current => "Current",
            Status::Former => "Former",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Current
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated entry from the records resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub footage: Option<String>,
    pub year: i64,
    pub status: Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotAnObject,
    MissingName,
    MissingTitle,
    MissingDescription,
    InvalidYear,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotAnObject => "not an object",
            RejectReason::MissingName => "missing name",
            RejectReason::MissingTitle => "missing title",
            RejectReason::MissingDescription => "missing description",
            RejectReason::InvalidYear => "year is not a finite number",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: RejectReason,
    pub raw: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParsedRecord {
    Valid(Record),
    Rejected(RejectedRecord),
}

impl ParsedRecord {
    pub fn into_valid(self) -> Option<Record> {
        match self {
            ParsedRecord::Valid(record) => Some(record),
            ParsedRecord::Rejected(_) => None,
        }
    }
}

/// Outcome of normalizing a whole payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub rejected: Vec<RejectedRecord>,
}
