//! Stderr backend for the `log` facade.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[1;31m";
const YEL: &str = "\x1b[1;33m";
const DIM: &str = "\x1b[2m";

pub struct StderrLogger {
    level: LevelFilter,
    color: bool,
}

impl StderrLogger {
    /// Install the logger. `verbosity` counts `-v` flags; `quiet` wins.
    pub fn init(verbosity: u8, quiet: bool, color: bool) -> Result<(), log::SetLoggerError> {
        let level = level_for(verbosity, quiet);
        log::set_boxed_logger(Box::new(StderrLogger { level, color }))?;
        log::set_max_level(level);
        Ok(())
    }
}

fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let colr = match record.level() {
            Level::Error => RED,
            Level::Warn => YEL,
            Level::Info => "",
            Level::Debug | Level::Trace => DIM,
        };
        let (colr, reset) = if self.color { (colr, RESET) } else { ("", "") };

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{}[{:5}] {}{}",
            colr,
            record.level(),
            record.args(),
            reset
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
