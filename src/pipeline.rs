use std::io::{self, BufRead, Write};

use crate::colors::TagColorAllocator;
use crate::config::FilterConfig;
use crate::error::Error;
use crate::filter::FilterEngine;
use crate::format::FormatSpec;
use crate::input;
use crate::parser::{self, ParseOutcome};
use crate::record::{Record, Severity};
use crate::rules::{self, Rule};
use crate::settings::Settings;
use crate::utils::{center, indent_wrap, right_align_tail};

/// Column widths of the header printed before each message.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub tag_type_width: usize,
    pub tag_width: usize,
    /// 0 hides the owner column.
    pub owner_width: usize,
    pub width: usize,
}

impl Layout {
    pub fn header_width(&self) -> usize {
        let owner = if self.owner_width > 0 {
            self.owner_width + 1
        } else {
            0
        };
        self.tag_type_width + 1 + self.tag_width + 1 + owner
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    EndOfInput,
    Interrupted,
    UnknownSeverity(char),
    OutputClosed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Emit(String),
    Skip,
    Stop(char),
}

/// Everything that lives for the whole stream: tag colors, filter state and
/// the rendering setup.
pub struct Session {
    pub layout: Layout,
    pub colors: TagColorAllocator,
    pub filter: FilterEngine,
    pub rules: Vec<Rule>,
    owner_style: String,
    badges: Vec<String>,
    reset: String,
}

impl Session {
    pub fn new(settings: &Settings, config: FilterConfig, width: usize) -> Result<Session, Error> {
        let layout = Layout {
            tag_type_width: settings.layout.tag_type_width,
            tag_width: settings.layout.tag_width,
            owner_width: settings.layout.owner_width,
            width,
        };
        let reset = FormatSpec::reset().render();
        let badges = Severity::ALL
            .iter()
            .map(|severity| {
                format!(
                    "{}{}{} ",
                    settings.colors.badges.for_severity(*severity).render(),
                    center(&severity.letter().to_string(), layout.tag_type_width),
                    reset
                )
            })
            .collect();

        Ok(Session {
            colors: TagColorAllocator::new(settings.known_tags.clone(), &settings.palette),
            filter: FilterEngine::new(config, settings.colors.highlight)?,
            rules: rules::load_rules(&settings.rules)?,
            owner_style: settings.colors.owner.render(),
            badges,
            reset,
            layout,
        })
    }

    /// Builds the colored header and the wrapped message of a record.
    pub fn render_record(&mut self, record: &Record) -> (String, String) {
        let mut header = String::new();

        if self.layout.owner_width > 0 {
            header.push_str(&self.owner_style);
            header.push_str(&center(&record.owner, self.layout.owner_width));
            header.push_str(&self.reset);
            header.push(' ');
        }

        let color = self.colors.color_for(&record.tag);
        header.push_str(&FormatSpec::new().fg(color).render());
        header.push_str(&right_align_tail(&record.tag, self.layout.tag_width));
        header.push(' ');
        header.push_str(&self.reset);

        header.push_str(&self.badges[record.severity.rank()]);

        let message = indent_wrap(
            &record.message,
            self.layout.header_width(),
            self.layout.width,
        );
        let message = rules::apply_rules(&self.rules, message);

        (header, message)
    }

    /// Runs one input line (without its line ending) through parse, render
    /// and filter.
    pub fn process_line(&mut self, line: &str) -> LineOutcome {
        let record = match parser::parse_line(line) {
            ParseOutcome::Record(record) => record,
            ParseOutcome::NoMatch => return LineOutcome::Emit(line.to_string()),
            ParseOutcome::UnknownSeverity(letter) => return LineOutcome::Stop(letter),
        };

        let (header, message) = self.render_record(&record);
        let decision = self.filter.apply(record.severity, line, message);
        if decision.emit {
            LineOutcome::Emit(format!("{}{}", header, decision.message))
        } else {
            LineOutcome::Skip
        }
    }

    /// Reads until end of input, interrupt or an unexpected record.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<StopReason> {
        let mut buf = Vec::new();
        let reason = loop {
            if input::interrupted() {
                break StopReason::Interrupted;
            }

            buf.clear();
            match input::read_line(reader, &mut buf) {
                Ok(0) => break StopReason::EndOfInput,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    break StopReason::Interrupted
                }
                Err(e) => return Err(e),
            }

            let text = String::from_utf8_lossy(&buf);
            let line = parser::strip_line_ending(&text);
            match self.process_line(line) {
                LineOutcome::Emit(output) => {
                    let written = writeln!(writer, "{}", output).and_then(|_| writer.flush());
                    match written {
                        Ok(()) => {}
                        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                            break StopReason::OutputClosed
                        }
                        Err(e) => return Err(e),
                    }
                }
                LineOutcome::Skip => {}
                LineOutcome::Stop(letter) => {
                    log::error!("Unexpected log level '{}' in line: {}", letter, line);
                    break StopReason::UnknownSeverity(letter);
                }
            }
        };

        log::debug!("Stopped: {:?}", reason);
        match writer.flush() {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
            _ => Ok(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(config: FilterConfig) -> Session {
        let settings = Settings::builtin().unwrap();
        Session::new(&settings, config, 80).unwrap()
    }

    #[test]
    fn test_header_width() {
        let layout = Layout {
            tag_type_width: 3,
            tag_width: 20,
            owner_width: 8,
            width: 80,
        };
        assert_eq!(layout.header_width(), 34);
        let layout = Layout {
            owner_width: 0,
            ..layout
        };
        assert_eq!(layout.header_width(), 25);
    }

    #[test]
    fn test_render_record() {
        let mut session = session(FilterConfig::default());
        let record = Record::new(Severity::Info, "ActivityManager", "123", "Starting");
        let (header, message) = session.render_record(&record);
        assert_eq!(
            header,
            "\x1b[30;100;22m  123   \x1b[0m \
             \x1b[36;22m     ActivityManager \x1b[0m\
             \x1b[30;42;22m I \x1b[0m "
        );
        assert_eq!(message, "Starting");
    }

    #[test]
    fn test_long_message_is_wrapped_under_header() {
        let mut session = session(FilterConfig::default());
        let text = "x".repeat(50);
        let record = Record::new(Severity::Debug, "Tag", "1", &text);
        let (_, message) = session.render_record(&record);
        assert_eq!(
            message,
            format!("{}\n{}{}", "x".repeat(46), " ".repeat(34), "x".repeat(4))
        );
    }

    #[test]
    fn test_unmatched_line_passes_through() {
        let mut session = session(FilterConfig::new(Some(Severity::Fatal), None, true, 0).unwrap());
        assert_eq!(
            session.process_line("--------- beginning of main"),
            LineOutcome::Emit("--------- beginning of main".to_string())
        );
    }

    #[test]
    fn test_unknown_severity_stops() {
        let mut session = session(FilterConfig::default());
        assert_eq!(session.process_line("Q/Tag(1): ?"), LineOutcome::Stop('Q'));
    }

    #[test]
    fn test_run_stops_at_unknown_severity() {
        let mut session = session(FilterConfig::default());
        let mut reader = io::Cursor::new(b"I/A(1): one\nX/B(2): two\nI/C(3): three\n".to_vec());
        let mut output: Vec<u8> = Vec::new();
        let reason = session.run(&mut reader, &mut output).unwrap();
        assert_eq!(reason, StopReason::UnknownSeverity('X'));
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("one"));
    }
}
