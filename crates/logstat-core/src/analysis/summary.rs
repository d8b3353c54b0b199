use super::{Analyzer, ParseSummary};
use crate::access_log::ParseOutcome;

pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = ParseSummary;

    fn analyze(&self, outcomes: &[ParseOutcome]) -> Self::Output {
        let total_lines = outcomes.len();
        let parsed_lines = outcomes.iter().filter(|o| o.is_record()).count();

        let error_rate = if total_lines > 0 {
            1.0 - parsed_lines as f64 / total_lines as f64
        } else {
            0.0
        };

        tracing::debug!(
            "Parse summary: {} of {} lines parsed, error rate {:.4}",
            parsed_lines,
            total_lines,
            error_rate
        );

        ParseSummary {
            total_lines,
            parsed_lines,
            error_rate,
        }
    }
}
