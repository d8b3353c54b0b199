use super::{Analyzer, UrlStat};
use crate::access_log::ParseOutcome;
use std::collections::HashMap;

/// Groups parsed records by URL and computes per-URL latency statistics.
///
/// Rows come back ordered by total time, largest first. Rows with the same
/// total time are ordered by URL.
pub struct UrlStatsAnalyzer;

impl Analyzer for UrlStatsAnalyzer {
    type Output = Vec<UrlStat>;

    fn analyze(&self, outcomes: &[ParseOutcome]) -> Self::Output {
        tracing::debug!("Aggregating {} parse outcomes by URL", outcomes.len());

        let mut buckets: HashMap<&str, Vec<f64>> = HashMap::new();
        let mut total_requests = 0usize;
        let mut total_time = 0.0f64;

        for record in outcomes.iter().filter_map(ParseOutcome::as_record) {
            buckets
                .entry(record.url.as_str())
                .or_default()
                .push(record.request_time);
            total_requests += 1;
            total_time = saturating_add(total_time, record.request_time);
        }

        let mut rows: Vec<(f64, UrlStat)> = buckets
            .into_iter()
            .map(|(url, mut times)| {
                let count = times.len();
                let time_sum = times.iter().copied().fold(0.0, saturating_add);
                let time_avg = time_sum / count as f64;
                let time_max = times.iter().copied().fold(f64::MIN, f64::max);
                let time_med = median(&mut times);

                let count_perc = if total_requests > 0 {
                    count as f64 / total_requests as f64 * 100.0
                } else {
                    0.0
                };
                let time_perc = if total_time > 0.0 {
                    (time_sum / total_time * 100.0).min(100.0)
                } else {
                    0.0
                };

                let stat = UrlStat {
                    url: url.to_string(),
                    count,
                    count_perc: round_to(count_perc, 2),
                    time_sum: round_to(time_sum, 3),
                    time_perc: round_to(time_perc, 2),
                    time_avg: round_to(time_avg, 3),
                    time_max: round_to(time_max, 3),
                    time_med: round_to(time_med, 3),
                };
                (time_sum, stat)
            })
            .collect();

        // Order on the unrounded sums
        rows.sort_by(|(a_sum, a), (b_sum, b)| {
            b_sum.total_cmp(a_sum).then_with(|| a.url.cmp(&b.url))
        });

        tracing::info!(
            "URL aggregation complete: {} requests across {} URLs, total time {:.3}s",
            total_requests,
            rows.len(),
            total_time
        );

        rows.into_iter().map(|(_, stat)| stat).collect()
    }
}

/// Addition that stops at `f64::MAX` instead of overflowing to infinity
fn saturating_add(acc: f64, value: f64) -> f64 {
    (acc + value).min(f64::MAX)
}

/// Median of a non-empty sample; even sized samples average the two middle values
fn median(times: &mut [f64]) -> f64 {
    times.sort_by(f64::total_cmp);
    let mid = times.len() / 2;
    if times.len().is_multiple_of(2) {
        times[mid - 1] / 2.0 + times[mid] / 2.0
    } else {
        times[mid]
    }
}

/// Round half away from zero to `decimals` places
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to carry a fractional part
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_log::ParsedRecord;

    fn record(url: &str, time: f64) -> ParseOutcome {
        ParseOutcome::Record(ParsedRecord {
            url: url.to_string(),
            request_time: time,
        })
    }

    fn find<'a>(stats: &'a [UrlStat], url: &str) -> &'a UrlStat {
        stats.iter().find(|s| s.url == url).unwrap()
    }

    #[test]
    fn test_basic_aggregation() {
        let outcomes = vec![
            record("/a", 1.0),
            record("/a", 2.0),
            record("/b", 3.0),
            ParseOutcome::Malformed,
        ];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        assert_eq!(stats.len(), 2);

        let a = find(&stats, "/a");
        assert_eq!(a.count, 2);
        assert_eq!(a.time_sum, 3.0);
        assert_eq!(a.time_avg, 1.5);
        assert_eq!(a.time_max, 2.0);
        assert_eq!(a.time_med, 1.5);
        assert_eq!(a.count_perc, 66.67);
        assert_eq!(a.time_perc, 50.0);

        let b = find(&stats, "/b");
        assert_eq!(b.count, 1);
        assert_eq!(b.time_sum, 3.0);
        assert_eq!(b.time_avg, 3.0);
        assert_eq!(b.time_max, 3.0);
        assert_eq!(b.time_med, 3.0);
        assert_eq!(b.count_perc, 33.33);

        let total: usize = stats.iter().map(|s| s.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_equal_sums_ordered_by_url() {
        let outcomes = vec![record("/b", 3.0), record("/a", 1.0), record("/a", 2.0)];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        assert_eq!(stats[0].url, "/a");
        assert_eq!(stats[1].url, "/b");
    }

    #[test]
    fn test_sorted_by_time_sum_descending() {
        let outcomes = vec![
            record("/fast", 0.01),
            record("/slow", 5.0),
            record("/medium", 0.5),
            record("/fast", 0.02),
            record("/medium", 0.7),
        ];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        let urls: Vec<&str> = stats.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["/slow", "/medium", "/fast"]);
        for pair in stats.windows(2) {
            assert!(pair[0].time_sum >= pair[1].time_sum);
        }
    }

    #[test]
    fn test_ordering_uses_unrounded_sums() {
        // Both round to 1.0 but /b is larger before rounding
        let outcomes = vec![record("/a", 1.0001), record("/b", 1.0004)];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        assert_eq!(stats[0].url, "/b");
        assert_eq!(stats[0].time_sum, stats[1].time_sum);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [2.0, 1.0]), 1.5);
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut [7.0]), 7.0);
    }

    #[test]
    fn test_urls_are_case_sensitive() {
        let outcomes = vec![record("/A", 1.0), record("/a", 1.0)];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        assert_eq!(stats.len(), 2);
    }

    #[test]
    fn test_empty_and_all_malformed() {
        assert!(UrlStatsAnalyzer.analyze(&[]).is_empty());
        let stats = UrlStatsAnalyzer.analyze(&[ParseOutcome::Malformed, ParseOutcome::Malformed]);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_zero_total_time_gives_zero_share() {
        let outcomes = vec![record("/a", 0.0), record("/b", 0.0)];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        assert!(stats.iter().all(|s| s.time_perc == 0.0));
        assert!(stats.iter().all(|s| s.count_perc == 50.0));
    }

    #[test]
    fn test_huge_request_times_stay_finite() {
        let outcomes = vec![record("/a", 1e308), record("/a", 1e308), record("/b", 1.0)];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        assert_eq!(stats[0].url, "/a");

        for s in &stats {
            for value in [
                s.count_perc,
                s.time_sum,
                s.time_perc,
                s.time_avg,
                s.time_max,
                s.time_med,
            ] {
                assert!(value.is_finite(), "{} has non-finite value", s.url);
            }
            assert!((0.0..=100.0).contains(&s.time_perc));
        }

        let a = find(&stats, "/a");
        assert_eq!(a.time_sum, f64::MAX);
        assert_eq!(a.time_perc, 100.0);
        assert_eq!(a.time_med, 1e308);
        assert_eq!(find(&stats, "/b").time_perc, 0.0);
    }

    #[test]
    fn test_rounding_precision() {
        let outcomes = vec![record("/a", 0.12345), record("/a", 0.2), record("/b", 0.1)];
        let stats = UrlStatsAnalyzer.analyze(&outcomes);
        let a = find(&stats, "/a");
        assert_eq!(a.time_sum, 0.323);
        assert_eq!(a.time_max, 0.2);
        assert_eq!(a.time_avg, 0.162);
        assert_eq!(a.time_perc, 76.38);
    }
}
