use super::template;
use crate::Result;
use crate::analysis::UrlStat;
use std::fs;
use std::path::Path;

/// Renders URL statistics into an HTML template
pub struct ReportWriter {
    template: String,
}

impl ReportWriter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Load the template from disk
    pub fn from_template_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading report template from: {}", path.display());
        Ok(Self::new(fs::read_to_string(path)?))
    }

    /// First `max_rows` rows of an already sorted result
    pub fn top_rows(stats: &[UrlStat], max_rows: usize) -> &[UrlStat] {
        &stats[..stats.len().min(max_rows)]
    }

    /// Substitute the rows, as a pretty printed JSON array, into the template.
    ///
    /// `<` is written as `\u003c` so a URL cannot close the surrounding
    /// `<script>` element. The result is still valid JSON.
    pub fn render(&self, rows: &[UrlStat]) -> Result<String> {
        let table_json = serde_json::to_string_pretty(rows)?.replace('<', "\\u003c");
        if template::first_placeholder(&self.template).is_none() {
            tracing::warn!("Report template has no ${} placeholder", template::TABLE_PLACEHOLDER);
        }
        Ok(template::substitute(&self.template, &table_json))
    }

    /// Render and write the report, creating the report directory if needed
    pub fn to_file(&self, rows: &[UrlStat], path: &Path) -> Result<()> {
        tracing::debug!("Writing report to: {}", path.display());

        let content = self.render(rows)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;

        tracing::info!(
            "Successfully wrote report with {} rows to {}",
            rows.len(),
            path.display()
        );

        Ok(())
    }
}
