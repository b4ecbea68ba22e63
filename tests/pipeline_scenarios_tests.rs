//! Pipeline Scenario Tests
//!
//! Feed whole streams through a fresh session and look at what reaches the
//! output.

use std::io::Cursor;

use logtint::utils::clean_ansi_text;
use logtint::{FilterConfig, Session, Settings, Severity, StopReason};

fn run_stream(config: FilterConfig, input: &str) -> (StopReason, Vec<String>) {
    let settings = Settings::builtin().unwrap();
    let mut session = Session::new(&settings, config, 80).unwrap();
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output: Vec<u8> = Vec::new();
    let reason = session.run(&mut reader, &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    (reason, output.lines().map(|l| l.to_string()).collect())
}

#[test]
fn test_single_record_without_filters() {
    println!("Testing a single record with no filters");

    let (reason, lines) = run_stream(
        FilterConfig::default(),
        "I/ActivityManager(  123): Starting activity\n",
    );
    assert_eq!(reason, StopReason::EndOfInput);
    assert_eq!(lines.len(), 1);

    let line = &lines[0];
    // I badge on a green background
    assert!(line.contains("\x1b[30;42;22m I \x1b[0m"));
    assert_eq!(
        clean_ansi_text(line),
        "  123         ActivityManager  I  Starting activity"
    );
    println!("✓ record rendered with owner, tag and badge");
}

#[test]
fn test_level_threshold_scenario() {
    println!("Testing level threshold W");

    let config = FilterConfig::new(Some(Severity::Warning), None, true, 0).unwrap();
    let input = "D/Tag(1): debug line\n\
                 W/Tag(1): warning line\n\
                 E/Tag(1): error line\n\
                 V/Tag(1): verbose line\n";
    let (_, lines) = run_stream(config, input);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("warning line"));
    assert!(lines[1].ends_with("error line"));
    println!("✓ only W and E records emitted");
}

#[test]
fn test_grep_with_trailing_lines_scenario() {
    println!("Testing grep with two trailing lines");

    let config = FilterConfig::new(None, Some("boot".into()), true, 2).unwrap();
    let input = "I/Init(1): boot started\n\
                 I/Init(1): line 2\n\
                 I/Init(1): line 3\n\
                 I/Init(1): line 4\n\
                 I/Init(1): line 5\n";
    let (_, lines) = run_stream(config, input);
    let texts: Vec<String> = lines.iter().map(|l| clean_ansi_text(l)).collect();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].ends_with("boot started"));
    assert!(texts[1].ends_with("line 2"));
    assert!(texts[2].ends_with("line 3"));
    println!("✓ match plus two trailing lines emitted");
}

#[test]
fn test_unbounded_trailing_scenario() {
    println!("Testing trailing lines 99");

    let config = FilterConfig::new(None, Some("x".into()), true, 99).unwrap();
    let input = "I/A(1): has x here\n\
                 I/A(1): nothing\n\
                 W/B(2): more\n";
    let (_, lines) = run_stream(config, input);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("has \x1b[33;1mx\x1b[0m here"));
    assert!(lines[1].ends_with("nothing"));
    println!("✓ every record emitted, hit highlighted");
}

#[test]
fn test_unparsed_line_passes_through() {
    println!("Testing pass-through of non logcat lines");

    let config = FilterConfig::new(Some(Severity::Error), None, true, 0).unwrap();
    let input = "--------- beginning of main\nD/Tag(1): hidden\n";
    let (_, lines) = run_stream(config, input);
    assert_eq!(lines, vec!["--------- beginning of main".to_string()]);
    println!("✓ raw line emitted without color codes");
}

#[test]
fn test_unparsed_lines_do_not_touch_trailing_window() {
    let config = FilterConfig::new(None, Some("boot".into()), true, 1).unwrap();
    let input = "I/A(1): boot\n\
                 garbage\n\
                 I/A(1): trailing\n\
                 I/A(1): gone\n";
    let (_, lines) = run_stream(config, input);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "garbage");
    assert!(lines[2].ends_with("trailing"));
}

#[test]
fn test_crlf_input() {
    let (_, lines) = run_stream(FilterConfig::default(), "E/Tag(7): oops\r\n");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("oops"));
}

#[test]
fn test_tag_colors_follow_lru() {
    let settings = Settings::builtin().unwrap();
    let mut session = Session::new(&settings, FilterConfig::default(), 80).unwrap();
    let palette_len = session.colors.palette_len();

    let first = session.colors.color_for("tag-0");
    for i in 1..palette_len {
        session.colors.color_for(&format!("tag-{}", i));
    }
    assert_eq!(session.colors.color_for("fresh"), first);
}

#[test]
fn test_trailing_without_grep_is_rejected() {
    assert!(FilterConfig::new(None, None, true, 5).is_err());
}

#[test]
fn test_rules_from_settings() {
    let mut settings = Settings::builtin().unwrap();
    settings
        .read_from_string(
            "rules:\n  - pattern: 'secret=\\w+'\n    replacement: 'secret=***'\n",
        )
        .unwrap();
    let mut session = Session::new(&settings, FilterConfig::default(), 80).unwrap();
    let mut reader = Cursor::new(b"I/Auth(9): login secret=hunter2 ok\n".to_vec());
    let mut output: Vec<u8> = Vec::new();
    session.run(&mut reader, &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("login secret=*** ok"));
}

/// Writer for a reader that went away, like `lt | head`.
struct ClosedPipe;

impl std::io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }
}

#[test]
fn test_closed_output_stops_quietly() {
    println!("Testing a closed stdout");

    let settings = Settings::builtin().unwrap();
    let mut session = Session::new(&settings, FilterConfig::default(), 80).unwrap();
    let mut reader = Cursor::new(b"I/A(1): one\nI/A(1): two\n".to_vec());
    let reason = session.run(&mut reader, &mut ClosedPipe).unwrap();
    assert_eq!(reason, StopReason::OutputClosed);
    // the second line was never read
    assert_eq!(reader.position(), "I/A(1): one\n".len() as u64);
    println!("✓ broken pipe ends the stream as OutputClosed");
}
