//! Minimal `log` backend: colored level tag + target on stderr.

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct CliLogger;

static LOGGER: CliLogger = CliLogger;

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".dimmed(),
        };
        eprintln!("{} {} {}", tag, record.target().dimmed(), record.args());
    }

    fn flush(&self) {}
}

/// Install the logger. Verbose shows engine activity down to `debug`;
/// otherwise only warnings and errors reach the terminal.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // A second install (tests) is harmless; keep the first logger.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
