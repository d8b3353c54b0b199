mod summary;
mod url_stats;

pub use summary::SummaryAnalyzer;
pub use url_stats::UrlStatsAnalyzer;

use crate::access_log::ParseOutcome;
use serde::{Deserialize, Serialize};

/// Line level parse statistics used by the error-rate gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub total_lines: usize,
    pub parsed_lines: usize,
    /// `1 - parsed_lines / total_lines`, or 0 for an empty log
    pub error_rate: f64,
}

impl ParseSummary {
    pub fn malformed_lines(&self) -> usize {
        self.total_lines - self.parsed_lines
    }

    /// True when the share of malformed lines is strictly above `threshold`
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.error_rate > threshold
    }
}

/// Aggregated statistics for a single URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStat {
    pub url: String,
    pub count: usize,
    /// Share of all valid requests, in percent
    pub count_perc: f64,
    pub time_sum: f64,
    /// Share of the total request time, in percent
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, outcomes: &[ParseOutcome]) -> Self::Output;
}
