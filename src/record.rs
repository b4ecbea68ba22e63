use std::fmt;

/// Logcat priority letter, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Verbose,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Verbose,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn from_letter(letter: char) -> Option<Severity> {
        match letter {
            'V' => Some(Severity::Verbose),
            'D' => Some(Severity::Debug),
            'I' => Some(Severity::Info),
            'W' => Some(Severity::Warning),
            'E' => Some(Severity::Error),
            'F' => Some(Severity::Fatal),
            _ => None,
        }
    }

    pub fn from_rank(rank: usize) -> Option<Severity> {
        Severity::ALL.get(rank).copied()
    }

    pub fn letter(&self) -> char {
        match self {
            Severity::Verbose => 'V',
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Fatal => 'F',
        }
    }

    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub severity: Severity,
    pub tag: String,
    pub owner: String,
    pub message: String,
}

impl Record {
    pub fn new(severity: Severity, tag: &str, owner: &str, message: &str) -> Record {
        Record {
            severity,
            tag: tag.trim().to_string(),
            owner: owner.trim().to_string(),
            message: message.to_string(),
        }
    }
}
