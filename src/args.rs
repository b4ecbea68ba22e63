//! Command Line Argument Parsing
//!
//! Besides the options, the old positional forms still work:
//! `lt LEVEL`, `lt PATTERN` and `lt PATTERN TRAILING_LINES`.

use clap::{Arg, ArgAction, Command};

use crate::config::{level_from_number, ConfigError, FilterConfig};

#[derive(Debug, Default, PartialEq)]
pub struct ParsedArgs {
    pub level: Option<i64>,
    pub grep: Option<String>,
    pub trailing: Option<String>,
    pub case_sensitive: bool,
    pub width: Option<usize>,
    pub command: Option<Vec<String>>,
    pub no_owner: bool,
    pub verbose: bool,
    pub dump_settings: bool,
}

fn command() -> Command {
    Command::new("lt")
        .about("Colored, indented and filterable logcat viewer")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("filter")
                .value_name("LEVEL|PATTERN")
                .allow_negative_numbers(true)
                .help("Minimum log level (0=V .. 5=F, -1 for all) or text to grep for"),
        )
        .arg(
            Arg::new("trailing_lines")
                .value_name("TRAILING_LINES")
                .help("Lines to show after each grep match (99 shows all, only highlighting)"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .value_name("LEVEL")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Minimum log level, 0=V 1=D 2=I 3=W 4=E 5=F, -1 for all"),
        )
        .arg(
            Arg::new("grep")
                .short('g')
                .long("grep")
                .value_name("PATTERN")
                .help("Only show records containing PATTERN"),
        )
        .arg(
            Arg::new("trailing")
                .short('t')
                .long("trailing")
                .value_name("N")
                .help("Lines to show after each grep match"),
        )
        .arg(
            Arg::new("case_sensitive")
                .long("case-sensitive")
                .action(ArgAction::SetTrue)
                .help("Match the grep pattern case sensitively"),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_name("COLUMNS")
                .value_parser(clap::value_parser!(usize))
                .help("Wrap at COLUMNS instead of the terminal width"),
        )
        .arg(
            Arg::new("command")
                .short('c')
                .long("command")
                .value_name("CMD")
                .help("Command to read logs from when stdin is a terminal (default: adb logcat)"),
        )
        .arg(
            Arg::new("no_owner")
                .long("no-owner")
                .action(ArgAction::SetTrue)
                .help("Hide the owner (pid) column"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Debug diagnostics on stderr"),
        )
        .arg(
            Arg::new("dump_settings")
                .long("dump-settings")
                .action(ArgAction::SetTrue)
                .help("Write the default settings.yaml to the config directory and exit"),
        )
}

/// Parse command line arguments using clap
///
/// Everything after a `--` is the command to read logs from.
pub fn parse_args_with_clap(args: Vec<String>) -> Result<ParsedArgs, clap::Error> {
    let separator_pos = args.iter().position(|arg| arg == "--");
    let (lt_args, command_args) = match separator_pos {
        Some(pos) => {
            let (before_sep, after_sep) = args.split_at(pos);
            (before_sep.to_vec(), Some(after_sep[1..].to_vec()))
        }
        None => (args, None),
    };

    let matches = command().try_get_matches_from(lt_args)?;

    let mut parsed = ParsedArgs {
        level: matches.get_one::<i64>("level").copied(),
        grep: matches.get_one::<String>("grep").cloned(),
        trailing: matches.get_one::<String>("trailing").cloned(),
        case_sensitive: matches.get_flag("case_sensitive"),
        width: matches.get_one::<usize>("width").copied(),
        command: matches
            .get_one::<String>("command")
            .map(|c| c.split_whitespace().map(|s| s.to_string()).collect()),
        no_owner: matches.get_flag("no_owner"),
        verbose: matches.get_flag("verbose"),
        dump_settings: matches.get_flag("dump_settings"),
    };

    // Positional forms fill in what the options left unset
    if let Some(filter) = matches.get_one::<String>("filter") {
        match filter.parse::<i64>() {
            Ok(level) if parsed.level.is_none() => parsed.level = Some(level),
            Ok(_) => {}
            Err(_) if parsed.grep.is_none() => parsed.grep = Some(filter.clone()),
            Err(_) => {}
        }
    }
    if parsed.trailing.is_none() {
        parsed.trailing = matches.get_one::<String>("trailing_lines").cloned();
    }

    if let Some(command_args) = command_args {
        parsed.command = Some(command_args);
    }

    Ok(parsed)
}

impl ParsedArgs {
    pub fn to_filter_config(&self) -> Result<FilterConfig, ConfigError> {
        let level = match self.level {
            Some(number) => level_from_number(number)?,
            None => None,
        };
        let trailing_lines = match &self.trailing {
            Some(trailing) => trailing
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidTrailing(trailing.clone()))?,
            None => 0,
        };
        FilterConfig::new(
            level,
            self.grep.clone(),
            !self.case_sensitive,
            trailing_lines,
        )
    }
}
