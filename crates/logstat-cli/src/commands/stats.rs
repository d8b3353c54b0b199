use crate::OutputFormat;
use anyhow::{Context, Result};
use logstat_core::access_log::{LogParser, ParseOutcome};
use logstat_core::analysis::{Analyzer, ParseSummary, SummaryAnalyzer, UrlStat, UrlStatsAnalyzer};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct LogAnalysis {
    pub summary: ParseSummary,
    pub stats: Vec<UrlStat>,
}

/// Parse and aggregate a single log file. A `.gz` extension selects gzip decoding.
pub fn analyze_log(file: &Path) -> Result<LogAnalysis> {
    let is_compressed = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    tracing::debug!("Reading access log: {}", file.display());
    let outcomes: Vec<ParseOutcome> = LogParser::open_path(file, is_compressed)
        .and_then(|lines| lines.collect())
        .with_context(|| format!("Failed to read access log {}", file.display()))?;

    Ok(LogAnalysis {
        summary: SummaryAnalyzer.analyze(&outcomes),
        stats: UrlStatsAnalyzer.analyze(&outcomes),
    })
}

pub fn execute(file: &Path, top: usize, format: OutputFormat) -> Result<()> {
    tracing::info!(
        "Extracting URL statistics from access log: {} (format: {})",
        file.display(),
        format.as_str()
    );

    let mut analysis = analyze_log(file)?;
    analysis.stats.truncate(top);

    match format {
        OutputFormat::Json => output_json(&analysis)?,
        OutputFormat::Table => output_table(&analysis),
        OutputFormat::Pretty => output_pretty(&analysis),
    }

    Ok(())
}

fn output_pretty(analysis: &LogAnalysis) {
    use console::style;

    println!("\n{}", style("Access Log Statistics").bold().cyan());
    println!("{}", style("=====================").cyan());

    println!("\n{}", style("Parsing:").bold());
    println!("  Total Lines:     {}", analysis.summary.total_lines);
    println!("  Parsed Lines:    {}", analysis.summary.parsed_lines);
    println!(
        "  Error Rate:      {:.2}%",
        analysis.summary.error_rate * 100.0
    );

    if analysis.stats.is_empty() {
        println!("\n  No requests found.");
        println!();
        return;
    }

    println!("\n{}", style("Top URLs by total time:").bold());
    for (i, stat) in analysis.stats.iter().enumerate() {
        println!(
            "  {}. [{:.3} s, {:.2}%] {} requests, avg {:.3} s, med {:.3} s, max {:.3} s - {}",
            i + 1,
            stat.time_sum,
            stat.time_perc,
            stat.count,
            stat.time_avg,
            stat.time_med,
            stat.time_max,
            stat.url
        );
    }

    println!();
}

fn output_json(analysis: &LogAnalysis) -> Result<()> {
    let json = serde_json::to_string_pretty(analysis)?;
    println!("{}", json);
    Ok(())
}

fn output_table(analysis: &LogAnalysis) {
    println!("url,count,count_perc,time_sum,time_perc,time_avg,time_max,time_med");
    for stat in &analysis.stats {
        println!(
            "\"{}\",{},{},{},{},{},{},{}",
            stat.url.replace('"', "\"\""),
            stat.count,
            stat.count_perc,
            stat.time_sum,
            stat.time_perc,
            stat.time_avg,
            stat.time_max,
            stat.time_med
        );
    }
}
