use super::types::LogFileRef;
use crate::Result;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

/// File name prefix used by the nginx UI access logs
pub const DEFAULT_LOG_PREFIX: &str = "nginx-access-ui.log";

lazy_static! {
    static ref DEFAULT_PATTERN: Regex =
        build_pattern(DEFAULT_LOG_PREFIX).expect("default log pattern is valid");
}

fn build_pattern(prefix: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"^{}-(\d{{8}})\.(gz|log)$", regex::escape(prefix)))
}

/// Finds the most recent access log in a directory.
///
/// Candidates are named `<prefix>-<YYYYMMDD>.log` or `<prefix>-<YYYYMMDD>.gz`.
/// Names whose date segment is not a real calendar date are skipped.
#[derive(Debug, Clone)]
pub struct LogLocator {
    pattern: Regex,
}

impl LogLocator {
    pub fn new(prefix: &str) -> Result<Self> {
        Ok(Self {
            pattern: build_pattern(prefix)?,
        })
    }

    /// Match a single file name against the naming convention
    pub fn candidate(&self, dir: &Path, file_name: &str) -> Option<LogFileRef> {
        let caps = self.pattern.captures(file_name)?;
        let date = NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok()?;

        Some(LogFileRef {
            path: dir.join(file_name),
            date,
            is_compressed: &caps[2] == "gz",
        })
    }

    /// Return the candidate with the greatest date, or `None` when there is none.
    ///
    /// When several candidates share the greatest date the lexicographically
    /// smallest file name wins, so the result does not depend on directory
    /// enumeration order.
    pub fn find_latest(&self, dir: &Path) -> Result<Option<LogFileRef>> {
        tracing::debug!("Scanning for access logs in: {}", dir.display());

        let mut latest: Option<(LogFileRef, String)> = None;

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(candidate) = self.candidate(dir, name) else {
                continue;
            };

            let replace = match &latest {
                None => true,
                Some((best, best_name)) => {
                    candidate.date > best.date
                        || (candidate.date == best.date && name < best_name.as_str())
                }
            };
            if replace {
                latest = Some((candidate, name.to_string()));
            }
        }

        match &latest {
            Some((log, _)) => tracing::info!("Latest access log: {}", log.path.display()),
            None => tracing::debug!("No access logs found in {}", dir.display()),
        }

        Ok(latest.map(|(log, _)| log))
    }
}

impl Default for LogLocator {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}
