use crate::config::Config;
use anyhow::{Context, Result};
use logstat_core::access_log::{LogLocator, LogParser, ParseOutcome};
use logstat_core::analysis::{Analyzer, SummaryAnalyzer, UrlStatsAnalyzer};
use logstat_core::report::{self, ReportWriter};
use std::path::PathBuf;

/// Template used when `template_file` is not configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.html");

/// How a report run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No access log matched the naming convention
    NoLogFound,
    /// A report for the latest log already exists
    AlreadyReported { report_path: PathBuf },
    /// Too many lines failed to parse; nothing was aggregated
    ErrorRateExceeded { error_rate: f64, threshold: f64 },
    Completed { report_path: PathBuf, rows: usize },
}

/// Locate the latest log, analyze it and write its report
pub fn run(config: &Config) -> Result<RunOutcome> {
    tracing::info!(log_dir = %config.log_dir.display(), "Starting log analyzer");

    let locator = LogLocator::new(&config.log_prefix)?;
    let log = locator
        .find_latest(&config.log_dir)
        .with_context(|| format!("Failed to scan log directory {}", config.log_dir.display()))?;
    let Some(log) = log else {
        tracing::info!("No log files found");
        return Ok(RunOutcome::NoLogFound);
    };

    let report_path = report::report_path(&config.report_dir, log.date);
    if report_path.exists() {
        tracing::info!(report_path = %report_path.display(), "Report already exists, skipping");
        return Ok(RunOutcome::AlreadyReported { report_path });
    }

    let outcomes: Vec<ParseOutcome> = LogParser::open(&log)
        .and_then(|lines| lines.collect())
        .with_context(|| format!("Failed to read access log {}", log.path.display()))?;

    let summary = SummaryAnalyzer.analyze(&outcomes);
    if summary.exceeds(config.parsing_error_threshold) {
        tracing::error!(
            error_rate = summary.error_rate,
            threshold = config.parsing_error_threshold,
            "Parsing error rate exceeded threshold"
        );
        return Ok(RunOutcome::ErrorRateExceeded {
            error_rate: summary.error_rate,
            threshold: config.parsing_error_threshold,
        });
    }

    let stats = UrlStatsAnalyzer.analyze(&outcomes);

    let writer = match &config.template_file {
        Some(path) => ReportWriter::from_template_file(path)
            .with_context(|| format!("Failed to read report template {}", path.display()))?,
        None => ReportWriter::new(DEFAULT_TEMPLATE),
    };
    let top = ReportWriter::top_rows(&stats, config.report_size);
    writer
        .to_file(top, &report_path)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;

    tracing::info!(
        report_path = %report_path.display(),
        rows = top.len(),
        "Log analysis completed"
    );

    Ok(RunOutcome::Completed {
        report_path,
        rows: top.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const GOOD: &str = r#"127.0.0.1 - - [01/Jan/2021:00:00:00 +0000] "GET /test HTTP/1.1" 200 123 "-" "Mozilla/5.0" 0.123"#;

    fn config_for(dir: &TempDir) -> Config {
        Config {
            log_dir: dir.path().join("log"),
            report_dir: dir.path().join("reports"),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_template_has_placeholder() {
        assert!(DEFAULT_TEMPLATE.contains("$table_json"));
    }

    #[test]
    fn test_empty_log_dir_is_no_log_found() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        fs::create_dir_all(&config.log_dir).unwrap();

        assert_eq!(run(&config).unwrap(), RunOutcome::NoLogFound);
    }

    #[test]
    fn test_missing_log_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(run(&config_for(&dir)).is_err());
    }

    #[test]
    fn test_error_rate_gate_blocks_report() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        fs::create_dir_all(&config.log_dir).unwrap();

        // 17 good lines, 3 bad: 15% against the default 10%
        let mut content = String::new();
        for _ in 0..17 {
            content.push_str(GOOD);
            content.push('\n');
        }
        content.push_str("bad\nbad\nbad\n");
        fs::write(config.log_dir.join("nginx-access-ui.log-20210101.log"), content).unwrap();

        match run(&config).unwrap() {
            RunOutcome::ErrorRateExceeded {
                error_rate,
                threshold,
            } => {
                assert!((error_rate - 0.15).abs() < 1e-9);
                assert_eq!(threshold, 0.1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!config.report_dir.join("report-2021.01.01.html").exists());
    }

    #[test]
    fn test_completed_then_skipped() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        fs::create_dir_all(&config.log_dir).unwrap();
        fs::write(
            config.log_dir.join("nginx-access-ui.log-20210101.log"),
            format!("{GOOD}\n"),
        )
        .unwrap();

        let expected = config.report_dir.join("report-2021.01.01.html");
        assert_eq!(
            run(&config).unwrap(),
            RunOutcome::Completed {
                report_path: expected.clone(),
                rows: 1
            }
        );
        assert!(expected.exists());

        assert_eq!(
            run(&config).unwrap(),
            RunOutcome::AlreadyReported {
                report_path: expected
            }
        );
    }
}
