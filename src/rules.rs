use regex::{Captures, Regex};
use std::str::FromStr;

use crate::format::{Color, FormatSpec};
use crate::settings::{RuleSettings, SettingsError};

lazy_static::lazy_static! {
    static ref STYLE_TOKEN_RE: Regex = Regex::new(r"(\$?)\{(\w+)\}").unwrap();
}

/// A regex substitution over the wrapped message.
#[derive(Debug, Clone)]
pub struct Rule {
    pub matcher: Regex,
    pub replacement: String,
}

impl Rule {
    pub fn new(settings: &RuleSettings) -> Result<Rule, SettingsError> {
        let matcher = Regex::new(&settings.pattern).map_err(|e| SettingsError::InvalidRule {
            pattern: settings.pattern.clone(),
            reason: e.to_string(),
        })?;
        Ok(Rule {
            matcher,
            replacement: expand_style_tokens(&settings.replacement),
        })
    }

    pub fn apply(&self, message: &str) -> String {
        self.matcher
            .replace_all(message, self.replacement.as_str())
            .into_owned()
    }
}

pub fn load_rules(settings: &[RuleSettings]) -> Result<Vec<Rule>, SettingsError> {
    settings.iter().map(Rule::new).collect()
}

pub fn apply_rules(rules: &[Rule], message: String) -> String {
    rules
        .iter()
        .fold(message, |message, rule| rule.apply(&message))
}

/// Replaces `{color}` and `{reset}` with escape codes. `${name}` capture
/// references and unknown words are left alone.
pub fn expand_style_tokens(replacement: &str) -> String {
    STYLE_TOKEN_RE
        .replace_all(replacement, |caps: &Captures| {
            if !caps[1].is_empty() {
                return caps[0].to_string();
            }
            let word = &caps[2];
            if word == "reset" {
                return FormatSpec::reset().render();
            }
            match Color::from_str(word) {
                Ok(color) => FormatSpec::new().fg(color).render(),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}
