use serde::{de::Deserializer, Deserialize};
use std::{collections::HashMap, path::PathBuf, str::FromStr};
use thiserror::Error;

use crate::format::{Color, FormatSpec};
use crate::record::Severity;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("could not locate config directory: {0}")]
    Xdg(String),
    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },
}

#[derive(Debug)]
pub struct Settings {
    pub default_command: String,
    pub default_width: usize,
    pub layout: LayoutSettings,
    pub palette: Vec<Color>,
    pub known_tags: HashMap<String, Color>,
    pub colors: ColorSettings,
    pub rules: Vec<RuleSettings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsFromYaml {
    #[serde(default)]
    pub default_command: Option<String>,
    #[serde(default)]
    pub default_width: Option<usize>,
    #[serde(default)]
    pub layout: Option<LayoutSettings>,
    #[serde(default)]
    pub palette: Vec<Color>,
    #[serde(default)]
    pub known_tags: HashMap<String, Color>,
    #[serde(default)]
    pub colors: Option<ColorSettings>,
    #[serde(default)]
    pub rules: Vec<RuleSettings>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub tag_type_width: usize,
    pub tag_width: usize,
    pub owner_width: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            tag_type_width: 3,
            tag_width: 20,
            owner_width: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColorSettings {
    #[serde(deserialize_with = "parse_style")]
    pub owner: FormatSpec,
    #[serde(deserialize_with = "parse_style")]
    pub highlight: FormatSpec,
    pub badges: BadgeColorSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BadgeColorSettings {
    #[serde(deserialize_with = "parse_style")]
    pub verbose: FormatSpec,
    #[serde(deserialize_with = "parse_style")]
    pub debug: FormatSpec,
    #[serde(deserialize_with = "parse_style")]
    pub info: FormatSpec,
    #[serde(deserialize_with = "parse_style")]
    pub warning: FormatSpec,
    #[serde(deserialize_with = "parse_style")]
    pub error: FormatSpec,
    #[serde(deserialize_with = "parse_style")]
    pub fatal: FormatSpec,
}

impl Default for ColorSettings {
    fn default() -> Self {
        ColorSettings {
            owner: FormatSpec::new().fg(Color::Black).bg(Color::Black).bright(),
            highlight: FormatSpec::new().fg(Color::Yellow).bold(),
            badges: BadgeColorSettings::default(),
        }
    }
}

impl Default for BadgeColorSettings {
    fn default() -> Self {
        BadgeColorSettings {
            verbose: FormatSpec::new().fg(Color::White).bg(Color::Black),
            debug: FormatSpec::new().fg(Color::Black).bg(Color::Blue),
            info: FormatSpec::new().fg(Color::Black).bg(Color::Green),
            warning: FormatSpec::new().fg(Color::Black).bg(Color::Yellow),
            error: FormatSpec::new().fg(Color::Black).bg(Color::Red),
            fatal: FormatSpec::new().fg(Color::White).bg(Color::Red).bold(),
        }
    }
}

impl BadgeColorSettings {
    pub fn for_severity(&self, severity: Severity) -> FormatSpec {
        match severity {
            Severity::Verbose => self.verbose,
            Severity::Debug => self.debug,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
            Severity::Fatal => self.fatal,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSettings {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

fn parse_style<'de, D>(deserializer: D) -> Result<FormatSpec, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    string_to_format(&s).map_err(serde::de::Error::custom)
}

/// Parses "fg [bg] [bold|dim|bright]", ie "black yellow" or "red bold".
pub fn string_to_format(s: &str) -> Result<FormatSpec, String> {
    let mut spec = FormatSpec::new();
    let mut colors = 0;
    for word in s.split_whitespace() {
        match word {
            "bold" => spec = spec.bold(),
            "dim" => spec = spec.dim(),
            "bright" => spec = spec.bright(),
            _ => {
                let color = Color::from_str(word)?;
                spec = match colors {
                    0 => spec.fg(color),
                    1 => spec.bg(color),
                    _ => return Err(format!("Too many colors in style '{}'", s)),
                };
                colors += 1;
            }
        }
    }
    if colors == 0 {
        return Err(format!("Missing color in style '{}'", s));
    }
    Ok(spec)
}

impl Settings {
    pub fn new() -> Result<Settings, SettingsError> {
        let mut settings = Settings::builtin()?;

        // ~/.config/logtint/settings.yaml, if any
        if let Some(filename) = Self::local_settings_filename() {
            if filename.exists() {
                log::debug!("Loading settings from {}", filename.display());
                settings.read_from_yaml(&filename)?;
            }
        }

        Ok(settings)
    }

    /// Settings from the embedded default file only.
    pub fn builtin() -> Result<Settings, SettingsError> {
        let defaults: SettingsFromYaml = serde_yaml::from_str(Self::default_settings_yaml_data())?;
        let mut settings = Settings {
            default_command: "adb logcat".to_string(),
            default_width: 80,
            layout: LayoutSettings::default(),
            palette: Vec::new(),
            known_tags: HashMap::new(),
            colors: ColorSettings::default(),
            rules: Vec::new(),
        };
        settings.merge_with(defaults);
        Ok(settings)
    }

    pub fn default_settings_yaml_data() -> &'static str {
        include_str!("../settings.yaml")
    }

    pub fn local_settings_filename() -> Option<PathBuf> {
        let xdg = xdg::BaseDirectories::with_prefix("logtint").ok()?;
        xdg.find_config_file("settings.yaml")
    }

    /// Writes the default settings file to the config dir and returns its path.
    pub fn save_default_settings() -> Result<PathBuf, SettingsError> {
        let xdg = xdg::BaseDirectories::with_prefix("logtint")
            .map_err(|e| SettingsError::Xdg(e.to_string()))?;
        let path = xdg.place_config_file("settings.yaml")?;
        std::fs::write(&path, Self::default_settings_yaml_data())?;
        Ok(path)
    }

    pub fn read_from_yaml(&mut self, filename: &std::path::Path) -> Result<(), SettingsError> {
        let file = std::fs::File::open(filename)?;
        let reader = std::io::BufReader::new(file);
        let settings: SettingsFromYaml = serde_yaml::from_reader(reader)?;
        self.merge_with(settings);
        Ok(())
    }

    pub fn read_from_string(&mut self, s: &str) -> Result<(), SettingsError> {
        let settings: SettingsFromYaml = serde_yaml::from_str(s)?;
        self.merge_with(settings);
        Ok(())
    }

    pub fn merge_with(&mut self, other: SettingsFromYaml) {
        if let Some(command) = other.default_command {
            self.default_command = command;
        }
        if let Some(width) = other.default_width {
            self.default_width = width;
        }
        if let Some(layout) = other.layout {
            self.layout = layout;
        }
        if !other.palette.is_empty() {
            self.palette = other.palette;
        }
        self.known_tags.extend(other.known_tags);
        if let Some(colors) = other.colors {
            self.colors = colors;
        }

        // user rules run before the ones already loaded
        let mut rules = other.rules;
        rules.extend(self.rules.drain(..));
        self.rules = rules;
    }
}
