use super::template;
use crate::analysis::UrlStat;
use crate::{Error, Result};
use std::fs;
use std::path::Path;

pub struct ReportReader;

impl ReportReader {
    /// Read the rows back out of a report written with `template`
    pub fn from_file(path: &Path, template: &str) -> Result<Vec<UrlStat>> {
        tracing::debug!("Reading report from: {}", path.display());

        let rendered = fs::read_to_string(path)?;
        Self::from_str(&rendered, template)
    }

    /// Extract the JSON table from a rendered report.
    ///
    /// The text before the first table placeholder is rendered the same way
    /// the writer renders it and stripped; the table is the JSON array that
    /// immediately follows.
    pub fn from_str(rendered: &str, template: &str) -> Result<Vec<UrlStat>> {
        let pos = template::first_placeholder(template).ok_or_else(|| {
            Error::Template(format!(
                "template has no ${} placeholder",
                template::TABLE_PLACEHOLDER
            ))
        })?;

        let prefix = template::substitute(&template[..pos], "");
        let rest = rendered.strip_prefix(prefix.as_str()).ok_or_else(|| {
            Error::Template("report does not start with the template header".to_string())
        })?;

        let rows = serde_json::Deserializer::from_str(rest)
            .into_iter::<Vec<UrlStat>>()
            .next()
            .ok_or_else(|| Error::Template("report contains no table".to_string()))??;

        tracing::debug!("Read {} rows from report", rows.len());
        Ok(rows)
    }
}
