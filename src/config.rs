//! Session configuration
//!
//! Built once from the command line and validated before any input is read.

use thiserror::Error;

use crate::record::Severity;

/// Trailing line count from which every record is shown and grep only
/// highlights.
pub const UNBOUNDED_TRAILING: usize = 99;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("trailing lines ({0}) need a grep pattern")]
    TrailingWithoutGrep(usize),
    #[error("log level must be between 0 and 5, got {0}")]
    InvalidLevel(i64),
    #[error("trailing lines must be a number, got '{0}'")]
    InvalidTrailing(String),
    #[error("grep pattern can not be empty")]
    EmptyGrep,
    #[error("invalid grep pattern: {0}")]
    InvalidGrep(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Minimum severity to show. `None` shows everything.
    pub level: Option<Severity>,
    pub grep: Option<String>,
    pub case_insensitive: bool,
    pub trailing_lines: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            level: None,
            grep: None,
            case_insensitive: true,
            trailing_lines: 0,
        }
    }
}

impl FilterConfig {
    pub fn new(
        level: Option<Severity>,
        grep: Option<String>,
        case_insensitive: bool,
        trailing_lines: usize,
    ) -> Result<FilterConfig, ConfigError> {
        let mut config = FilterConfig {
            level,
            grep,
            case_insensitive,
            trailing_lines,
        };
        config.validate()?;
        // past 99 every count means the same
        config.trailing_lines = config.trailing_lines.min(UNBOUNDED_TRAILING);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(grep) = &self.grep {
            if grep.is_empty() {
                return Err(ConfigError::EmptyGrep);
            }
        } else if self.trailing_lines > 0 {
            return Err(ConfigError::TrailingWithoutGrep(self.trailing_lines));
        }
        Ok(())
    }

    pub fn is_unbounded(&self) -> bool {
        self.trailing_lines >= UNBOUNDED_TRAILING
    }
}

/// Converts the numeric level used on the command line (0 = verbose,
/// 5 = fatal, -1 = no level filter).
pub fn level_from_number(number: i64) -> Result<Option<Severity>, ConfigError> {
    match number {
        -1 => Ok(None),
        n if n < 0 => Err(ConfigError::InvalidLevel(n)),
        n => Severity::from_rank(n as usize)
            .map(Some)
            .ok_or(ConfigError::InvalidLevel(n)),
    }
}
