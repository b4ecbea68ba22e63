//! Level / grep filter with trailing context
//!
//! Every parsed record goes through [`FilterEngine::apply`] exactly once, in
//! input order. The trailing counter counts records since the last match; it
//! starts past the window so nothing trails before the first match.

use regex::{Regex, RegexBuilder};

use crate::config::{ConfigError, FilterConfig};
use crate::format::FormatSpec;
use crate::record::Severity;

lazy_static::lazy_static! {
    static ref SGR_RE: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub trailing_counter: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub emit: bool,
    pub matched: bool,
    /// Rendered message, with the grep hit highlighted when there was one.
    pub message: String,
}

#[derive(Debug)]
pub struct FilterEngine {
    pub config: FilterConfig,
    pub state: FilterState,
    grep_re: Option<Regex>,
    highlight: String,
    reset: String,
}

impl FilterEngine {
    pub fn new(config: FilterConfig, highlight: FormatSpec) -> Result<FilterEngine, ConfigError> {
        config.validate()?;

        let grep_re = match &config.grep {
            Some(pattern) => Some(
                RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(config.case_insensitive)
                    .build()
                    .map_err(|e| ConfigError::InvalidGrep(e.to_string()))?,
            ),
            None => None,
        };

        Ok(FilterEngine {
            state: FilterState {
                trailing_counter: config.trailing_lines.saturating_add(1),
            },
            config,
            grep_re,
            highlight: highlight.render(),
            reset: FormatSpec::reset().render(),
        })
    }

    fn level_allows(&self, severity: Severity) -> bool {
        match self.config.level {
            Some(level) => level <= severity,
            None => true,
        }
    }

    /// Decides whether the record is shown and updates the trailing counter.
    ///
    /// `raw_line` is the input line, used for the grep test; `message` is the
    /// rendered message, where the hit gets highlighted.
    pub fn apply(&mut self, severity: Severity, raw_line: &str, message: String) -> Decision {
        let mut message = message;
        let matched = match &self.grep_re {
            Some(re) => {
                if re.is_match(raw_line) && self.level_allows(severity) {
                    self.state.trailing_counter = 0;
                    if let Some(highlighted) =
                        highlight_first(re, &message, &self.highlight, &self.reset)
                    {
                        message = highlighted;
                    }
                    true
                } else {
                    false
                }
            }
            None => self.level_allows(severity),
        };
        self.state.trailing_counter = self.state.trailing_counter.saturating_add(1);

        let emit = matched
            || self.config.is_unbounded()
            || self.state.trailing_counter <= self.config.trailing_lines.saturating_add(1);

        Decision {
            emit,
            matched,
            message,
        }
    }
}

/// Wraps the first hit in `message` with `highlight` and `reset`. Escape
/// sequences already in the message (from rules) are never searched, so a
/// hit can not land inside one.
fn highlight_first(re: &Regex, message: &str, highlight: &str, reset: &str) -> Option<String> {
    let end = message.len();
    let escapes = SGR_RE
        .find_iter(message)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((end, end)));

    let mut start = 0;
    for (escape_start, escape_end) in escapes {
        if let Some(found) = re.find(&message[start..escape_start]) {
            let (hit_start, hit_end) = (start + found.start(), start + found.end());
            return Some(format!(
                "{}{}{}{}{}",
                &message[..hit_start],
                highlight,
                &message[hit_start..hit_end],
                reset,
                &message[hit_end..]
            ));
        }
        start = escape_end;
    }
    None
}
