use super::types::{LogFileRef, ParseOutcome, ParsedRecord};
use crate::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Minimum number of whitespace separated fields in a usable line
const MIN_FIELDS: usize = 12;

/// Parse one line of the nginx `ui_short` log format.
///
/// The request line `"<METHOD> <PATH> <PROTOCOL>"` occupies fields 5..=7 and
/// the request time is the last field. Anything that does not fit yields
/// [`ParseOutcome::Malformed`].
pub fn parse_line(line: &str) -> ParseOutcome {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return ParseOutcome::Malformed;
    }

    let [_, _, _, _, _, _method, url, _protocol, .., last] = fields.as_slice() else {
        return ParseOutcome::Malformed;
    };

    match last.parse::<f64>() {
        Ok(request_time) if request_time.is_finite() && request_time >= 0.0 => {
            ParseOutcome::Record(ParsedRecord {
                url: (*url).to_string(),
                request_time,
            })
        }
        _ => ParseOutcome::Malformed,
    }
}

pub struct LogParser;

impl LogParser {
    /// Open a located log, decoding it according to its compression flag
    pub fn open(log: &LogFileRef) -> Result<ParsedLines> {
        Self::open_path(&log.path, log.is_compressed)
    }

    /// Open a log file and return a lazy iterator of per-line outcomes
    pub fn open_path(path: &Path, is_compressed: bool) -> Result<ParsedLines> {
        tracing::debug!(
            "Opening access log {} (compressed: {})",
            path.display(),
            is_compressed
        );

        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if is_compressed {
            // Rotated logs may be several concatenated gzip members
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(ParsedLines::new(reader))
    }
}

/// Single pass iterator yielding one [`ParseOutcome`] per input line.
///
/// Only I/O failures are surfaced as errors; iteration stops after the first one.
pub struct ParsedLines {
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
    done: bool,
}

impl ParsedLines {
    pub fn new(reader: Box<dyn BufRead>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl Iterator for ParsedLines {
    type Item = Result<ParseOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => match std::str::from_utf8(&self.buf) {
                Ok(line) => Some(Ok(parse_line(line))),
                Err(_) => Some(Ok(ParseOutcome::Malformed)),
            },
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
