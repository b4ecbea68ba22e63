use std::io::{self, IsTerminal};
use std::process;

use logtint::args::{parse_args_with_clap, ParsedArgs};
use logtint::input::{self, Input};
use logtint::{logging, Error, Session, Settings, StopReason};

fn main() {
    let parsed = match parse_args_with_clap(std::env::args().collect()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    logging::init(parsed.verbose);

    match run(&parsed) {
        Ok(code) => process::exit(code),
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("lt: {}", e);
            process::exit(1);
        }
    }
}

fn run(parsed: &ParsedArgs) -> Result<i32, Error> {
    if parsed.dump_settings {
        let path = Settings::save_default_settings()?;
        println!("Default settings written to {}", path.display());
        return Ok(0);
    }

    // Bad filter combinations are rejected before touching the input
    let config = parsed.to_filter_config()?;

    let mut settings = Settings::new()?;
    if parsed.no_owner {
        settings.layout.owner_width = 0;
    }
    let width = parsed
        .width
        .unwrap_or_else(|| terminal_width(settings.default_width));
    log::debug!("Filter {:?}, width {}", config, width);

    let mut session = Session::new(&settings, config, width)?;

    input::install_interrupt_handler()?;
    let command = match &parsed.command {
        Some(command) => command.clone(),
        None => settings
            .default_command
            .split_whitespace()
            .map(|s| s.to_string())
            .collect(),
    };
    let mut input = Input::open(&command)?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let reason = session.run(&mut input.reader, &mut writer);
    input.close();

    Ok(match reason? {
        StopReason::UnknownSeverity(_) => 1,
        _ => 0,
    })
}

// Only a real terminal has a width worth wrapping to
fn terminal_width(default_width: usize) -> usize {
    if !io::stdout().is_terminal() {
        return default_width;
    }
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => columns as usize,
        _ => default_width,
    }
}
