use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use treewm_core::paths;

const TARGET_COLORS: &[Color] = &[
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Info and above
    Quiet,
    /// Debug and above
    Normal,
    /// Everything, including per-primitive traces
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    fn max_level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::Info,
            Verbosity::Normal => Level::Debug,
            Verbosity::Verbose => Level::Trace,
        }
    }
}

/// Writes coloured records to stderr, keeping stdout free for layout output, and mirrors
/// them as plain text into the log file.
pub struct TreeWMLogger {
    verbosity: Verbosity,
    log_file: Mutex<Option<File>>,
    target_colors: Mutex<HashMap<String, Color>>,
}

impl TreeWMLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            log_file: Mutex::new(Self::open_log_file()),
            target_colors: Mutex::new(HashMap::new()),
        }
    }

    fn open_log_file() -> Option<File> {
        paths::ensure_data_dir()?;
        let path = paths::log_file_path()?;
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| eprintln!("Warning: Failed to open log file at {}: {e}", path.display()))
            .ok()
    }

    fn color_for_target(&self, target: &str) -> Color {
        let mut target_colors = self
            .target_colors
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = TARGET_COLORS[target_colors.len() % TARGET_COLORS.len()];
        *target_colors.entry(target.to_string()).or_insert(next)
    }

    fn level_tag(level: Level) -> &'static str {
        match level {
            Level::Error => "[E]",
            Level::Warn => "[W]",
            Level::Info => "[I]",
            Level::Debug => "[D]",
            Level::Trace => "[T]",
        }
    }

    fn short_target<'a>(record: &'a Record) -> Option<&'a str> {
        record.target().rsplit("::").next().filter(|t| !t.is_empty())
    }

    fn format_colored(&self, record: &Record) -> String {
        let tag = Self::level_tag(record.level());
        let target = Self::short_target(record)
            .map(|t| format!("[{}] ", t.color(self.color_for_target(t)).dimmed()))
            .unwrap_or_default();

        match record.level() {
            Level::Error => format!("{tag} {target}{}", record.args()).red().bold().to_string(),
            Level::Warn => format!("{tag} {target}{}", record.args())
                .yellow()
                .bold()
                .to_string(),
            Level::Info => format!("{} {target}{}", tag.green().bold(), record.args()),
            Level::Debug => format!("{} {target}{}", tag.blue().bold(), record.args()),
            Level::Trace => format!("{} {target}{}", tag.white().bold(), record.args()),
        }
    }

    fn format_plain(record: &Record) -> String {
        let target = Self::short_target(record)
            .map(|t| format!("[{t}] "))
            .unwrap_or_default();
        format!("{} {target}{}", Self::level_tag(record.level()), record.args())
    }
}

impl Log for TreeWMLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.verbosity.max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("{}", self.format_colored(record));

        let mut log_file = self.log_file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = log_file.as_mut() {
            let _ = writeln!(file, "{}", Self::format_plain(record));
        }
    }

    fn flush(&self) {
        let mut log_file = self.log_file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = log_file.as_mut() {
            let _ = file.flush();
        }
    }
}

pub fn init_logger(verbosity: Verbosity) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(TreeWMLogger::new(verbosity)))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
