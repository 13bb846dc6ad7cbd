use std::{
    io::{self, Write as _},
    sync::{Arc, OnceLock, RwLock},
};

use crossterm::style::{Color, Stylize as _};
use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<AppLogger> = OnceLock::new();

pub fn get_logger() -> &'static AppLogger {
    LOGGER.get_or_init(|| AppLogger::new(LevelFilter::Warn))
}

/// Installs the logger, calling it again only changes the level.
pub fn init(level: LevelFilter) {
    let logger = get_logger();
    logger.set_min_level(level);

    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Level given by the number of `-v` flags, `None` when there were none.
pub fn verbosity_level(count: u8) -> Option<LevelFilter> {
    match count {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::White,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Grey,
    }
}

/// Writes records to stderr as `LEVEL source -> message`.
pub struct AppLogger {
    pub min_level: Arc<RwLock<LevelFilter>>,
}

impl AppLogger {
    fn new(min_level: LevelFilter) -> Self {
        Self {
            min_level: Arc::new(RwLock::new(min_level)),
        }
    }

    pub fn min_level(&self) -> LevelFilter {
        *self.min_level.read().unwrap()
    }

    pub fn set_min_level(&self, level: LevelFilter) {
        *self.min_level.write().unwrap() = level;
    }

    pub fn format(level: Level, source: &str, message: &str) -> String {
        format!("{level:<5} {source} -> {message}")
    }
}

impl Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format(
            record.level(),
            record.module_path().unwrap_or("unknown"),
            &record.args().to_string(),
        );
        let _ = writeln!(io::stderr(), "{}", line.with(level_color(record.level())));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
