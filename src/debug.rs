use parking_lot::Mutex;
/// Debug logging for termdeck
///
/// Every `log::*!` call in the workspace is routed here by [`init_log_bridge`].
/// Level precedence:
/// - `--log-level` CLI flag
/// - `RUST_LOG` (lines are also mirrored to stderr)
/// - `DEBUG_LEVEL` (0 = off, 1 = errors, 2 = info, 3 = debug, 4 = trace)
/// - `log_level` in the settings file, applied once settings are loaded
///
/// Output goes to `termdeck_debug.log` in the system temp directory, never to
/// stdout, so the replayed shell's output is not interleaved with diagnostics.
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Option<Self> {
        let val = std::env::var("DEBUG_LEVEL").ok()?;
        match val.trim().parse::<u8>() {
            Ok(0) => Some(DebugLevel::Off),
            Ok(1) => Some(DebugLevel::Error),
            Ok(2) => Some(DebugLevel::Info),
            Ok(3) => Some(DebugLevel::Debug),
            Ok(4) => Some(DebugLevel::Trace),
            _ => None,
        }
    }

    fn to_level_filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::Off,
            DebugLevel::Error => LevelFilter::Error,
            DebugLevel::Info => LevelFilter::Info,
            DebugLevel::Debug => LevelFilter::Debug,
            DebugLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("termdeck_debug.log")
}

/// Global debug logger
struct DebugLogger {
    file: Option<std::fs::File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn open(&mut self) {
        if self.file.is_some() {
            return;
        }
        // Silently skip logging if the file can't be opened
        if let Ok(f) = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            self.file = Some(f);
            self.write_raw(&format!(
                "\n{}\ntermdeck debug session started at {} (level={})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                log::max_level(),
                "=".repeat(80)
            ));
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: &str, category: &str, msg: &str) {
        let line = format!("[{}] [{}] [{}] {}\n", get_timestamp(), level, category, msg);
        if self.mirror_stderr {
            eprint!("{}", line);
        }
        self.write_raw(&line);
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();
static LEVEL_OVERRIDDEN: AtomicBool = AtomicBool::new(false);

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| {
        Mutex::new(DebugLogger {
            file: None,
            mirror_stderr: false,
        })
    })
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// `log` facade adapter writing into the debug file
struct LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            log::Level::Error => "ERROR",
            log::Level::Warn => "WARN ",
            log::Level::Info => "INFO ",
            log::Level::Debug => "DEBUG",
            log::Level::Trace => "TRACE",
        };
        let target = record.target();
        let category = target.split("::").next().unwrap_or(target);
        get_logger()
            .lock()
            .log(level, category, &record.args().to_string());
    }

    fn flush(&self) {}
}

static BRIDGE: LogBridge = LogBridge;

fn rust_log_level() -> Option<LevelFilter> {
    let val = std::env::var("RUST_LOG").ok()?;
    // Accept a bare level or the first `target=level` directive's level
    let directive = val.split(',').next()?.trim();
    let level = directive.rsplit('=').next()?;
    level.parse().ok()
}

/// Install the `log` bridge. Call once, before anything logs.
///
/// `cli_level` comes from `--log-level`. When neither the flag nor the
/// environment picks a level, logging stays off until
/// [`apply_config_log_level`] runs.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let rust_log = rust_log_level();
    let level = cli_level
        .or(rust_log)
        .or_else(|| DebugLevel::from_env().map(DebugLevel::to_level_filter));

    LEVEL_OVERRIDDEN.store(level.is_some(), Ordering::SeqCst);
    get_logger().lock().mirror_stderr = rust_log.is_some();

    if log::set_logger(&BRIDGE).is_err() {
        return;
    }
    set_log_level(level.unwrap_or(LevelFilter::Off));
}

/// Apply the settings file's level unless the CLI or environment chose one
pub fn apply_config_log_level(level: LevelFilter) {
    if !LEVEL_OVERRIDDEN.load(Ordering::SeqCst) {
        set_log_level(level);
    }
}

/// Change the active level, opening the log file on first use
pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
    if level != LevelFilter::Off {
        get_logger().lock().open();
    }
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    level != DebugLevel::Off && level.to_level_filter() <= log::max_level()
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    if !is_enabled(level) {
        return;
    }
    let level_str = match level {
        DebugLevel::Error => "ERROR",
        DebugLevel::Info => "INFO ",
        DebugLevel::Debug => "DEBUG",
        DebugLevel::Trace => "TRACE",
        DebugLevel::Off => return,
    };
    get_logger().lock().log(level_str, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}
