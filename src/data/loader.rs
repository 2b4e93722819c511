use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::model::StressSeries;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot open log {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: invalid {field} value {text:?}")]
    Number {
        line: usize,
        field: &'static str,
        text: String,
    },
}

impl LogError {
    /// I/O error kind behind an open/read failure.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            LogError::Open { source, .. } | LogError::Read { source, .. } => Some(source.kind()),
            LogError::Number { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Lines carrying data look like
/// `... Spawned object count: 120 | FPS: 58.31 ...`.
/// Digits are ASCII only; other scripts' digits do not match.
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Spawned object count: ([0-9]+) \| FPS: ([0-9.]+)")
            .expect("log line pattern is valid")
    })
}

/// Parse a stress-test log into a [`StressSeries`].
///
/// The file is read as UTF-8, one line at a time. An empty series is a
/// valid result; callers decide what to do with it.
pub fn parse_log(path: &Path) -> Result<StressSeries, LogError> {
    let file = File::open(path).map_err(|source| LogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let (counts, rates) = parse_reader(BufReader::new(file))?;
    log::debug!("{} samples in {}", counts.len(), path.display());
    Ok(StressSeries::new(path, counts, rates))
}

/// Scan any buffered source for data lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<(Vec<u64>, Vec<f64>), LogError> {
    let pattern = line_pattern();
    let mut counts = Vec::new();
    let mut rates = Vec::new();
    let mut line_no = 0;

    for chunk in reader.split(b'\n') {
        let bytes = chunk.map_err(|source| LogError::Read {
            line: line_no + 1,
            source,
        })?;
        let body = bytes.strip_suffix(b"\r".as_slice()).unwrap_or(&bytes[..]);

        for raw in body.split(|&b| b == b'\r') {
            line_no += 1;
            let line = std::str::from_utf8(raw).map_err(|e| LogError::Read {
                line: line_no,
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;

            let Some(caps) = pattern.captures(line) else {
                continue;
            };

            let count_text = &caps[1];
            let rate_text = &caps[2];
            let count: u64 = count_text.parse().map_err(|_| LogError::Number {
                line: line_no,
                field: "object count",
                text: count_text.to_string(),
            })?;
            let rate: f64 = rate_text.parse().map_err(|_| LogError::Number {
                line: line_no,
                field: "FPS",
                text: rate_text.to_string(),
            })?;

            counts.push(count);
            rates.push(rate);
        }
    }

    Ok((counts, rates))
}
