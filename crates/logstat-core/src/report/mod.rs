mod reader;
mod template;
mod writer;

pub use reader::ReportReader;
pub use template::{TABLE_PLACEHOLDER, substitute};
pub use writer::ReportWriter;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Report location for a log of the given date: `<dir>/report-YYYY.MM.DD.html`
pub fn report_path(report_dir: &Path, date: NaiveDate) -> PathBuf {
    report_dir.join(format!("report-{}.html", date.format("%Y.%m.%d")))
}
