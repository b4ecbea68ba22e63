//! Diagnostics logger
//!
//! Writes `log` records to stderr, stdout carries the filtered stream. The
//! level comes from `LOGTINT_LOG` (error, warn, info, debug, trace).

use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr(),
            "[{:>5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

pub fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

pub fn init(verbose: bool) {
    static LOGGER: StderrLogger = StderrLogger;

    let env = std::env::var("LOGTINT_LOG").ok();
    let mut level = level_from_env(env.as_deref());
    if verbose && level < LevelFilter::Debug {
        level = LevelFilter::Debug;
    }

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
