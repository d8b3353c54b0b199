use chrono::NaiveDate;
use std::path::PathBuf;

/// A candidate access log discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileRef {
    pub path: PathBuf,
    /// Date encoded in the file name, used only for recency comparison
    pub date: NaiveDate,
    pub is_compressed: bool,
}

/// A successfully parsed access log line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub url: String,
    /// Request processing time in seconds
    pub request_time: f64,
}

/// Result of parsing a single line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Record(ParsedRecord),
    Malformed,
}

impl ParseOutcome {
    pub fn is_record(&self) -> bool {
        matches!(self, ParseOutcome::Record(_))
    }

    pub fn as_record(&self) -> Option<&ParsedRecord> {
        match self {
            ParseOutcome::Record(record) => Some(record),
            ParseOutcome::Malformed => None,
        }
    }
}
