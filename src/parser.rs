use regex::Regex;

use crate::record::{Record, Severity};

lazy_static::lazy_static! {
    static ref RECORD_RE: Regex = Regex::new(r"^([A-Z])/([^(]+)\(([^)]+)\): (.*)$").unwrap();
}

#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    Record(Record),
    /// The line has the logcat shape but an unknown priority letter.
    UnknownSeverity(char),
    NoMatch,
}

/// Drops the trailing `\n` or `\r\n` of a line read from the stream.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Parses one logcat `brief` line, `P/Tag(  pid): message`.
pub fn parse_line(line: &str) -> ParseOutcome {
    let caps = match RECORD_RE.captures(line) {
        Some(caps) => caps,
        None => return ParseOutcome::NoMatch,
    };

    let letter = caps[1].chars().next().unwrap_or('?');
    match Severity::from_letter(letter) {
        Some(severity) => {
            ParseOutcome::Record(Record::new(severity, &caps[2], &caps[3], &caps[4]))
        }
        None => ParseOutcome::UnknownSeverity(letter),
    }
}
