mod locator;
mod parser;
mod types;

pub use locator::{DEFAULT_LOG_PREFIX, LogLocator};
pub use parser::{LogParser, ParsedLines, parse_line};
pub use types::*;
