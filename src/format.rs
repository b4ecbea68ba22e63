//! ANSI escape sequence rendering
//!
//! Only the basic eight colors are used; codes follow the SGR table
//! (30-37 foreground, 40-47 background, 100-107 bright background).

use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Color::ALL
            .iter()
            .find(|color| color.name() == s)
            .copied()
            .ok_or_else(|| format!("Invalid color: {}", s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Color::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FormatSpec {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bright: bool,
    pub bold: bool,
    pub dim: bool,
    pub reset: bool,
}

impl FormatSpec {
    pub fn new() -> FormatSpec {
        FormatSpec::default()
    }

    pub fn reset() -> FormatSpec {
        FormatSpec {
            reset: true,
            ..FormatSpec::default()
        }
    }

    pub fn fg(mut self, color: Color) -> FormatSpec {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> FormatSpec {
        self.bg = Some(color);
        self
    }

    pub fn bright(mut self) -> FormatSpec {
        self.bright = true;
        self
    }

    pub fn bold(mut self) -> FormatSpec {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> FormatSpec {
        self.dim = true;
        self
    }

    pub fn render(&self) -> String {
        render(self)
    }
}

/// Builds the escape sequence for `spec`.
///
/// `reset` wins over every other field. Otherwise exactly one weight code is
/// emitted: bold, then dim, then normal intensity.
pub fn render(spec: &FormatSpec) -> String {
    let mut codes: Vec<String> = Vec::new();
    if spec.reset {
        codes.push("0".to_string());
    } else {
        if let Some(fg) = spec.fg {
            codes.push(format!("3{}", fg.code()));
        }
        if let Some(bg) = spec.bg {
            if spec.bright {
                codes.push(format!("10{}", bg.code()));
            } else {
                codes.push(format!("4{}", bg.code()));
            }
        }
        if spec.bold {
            codes.push("1".to_string());
        } else if spec.dim {
            codes.push("2".to_string());
        } else {
            codes.push("22".to_string());
        }
    }
    format!("\x1b[{}m", codes.join(";"))
}
