use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use chrono::{DateTime, Local};

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages including debug output (most verbose)
///
/// The level can be set via the `LOG_LEVEL` environment variable or at runtime
/// using `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive)
    ///
    /// Valid values: "silent", "error", "warn", "info", "debug"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

/// Rotates log files, keeping only the last 5 log files
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match log_file.try_exists() {
        Ok(true) => {}
        _ => return Ok(()),
    }

    let metadata = std::fs::metadata(log_file)?;
    let modified = metadata.modified()?;

    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let new_path = parent.join(format!("log.{}.txt", timestamp));

    std::fs::rename(log_file, &new_path)?;

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                filename.starts_with("log.") && filename.ends_with(".txt") && filename != "log.txt"
            } else {
                false
            }
        })
        .collect();

    // Sort by filename (which sorts by datetime)
    log_files.sort();

    if log_files.len() > 5 {
        for file in &log_files[0..log_files.len() - 5] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.trim().to_lowercase() == "true")
        .unwrap_or(default)
}

pub struct Logger {
    log_file: Option<PathBuf>,
    enable_print_log: bool,
    level: Arc<Mutex<Level>>,
}

impl Logger {
    /// Reads `LOG_LEVEL`, `LOG_DIR`, `DISABLE_LOG` and `ENABLE_PRINT_LOG`.
    ///
    /// Without `LOG_DIR` nothing is written to disk.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let disable_log = env_flag("DISABLE_LOG", false);
        let enable_print_log = env_flag("ENABLE_PRINT_LOG", true);

        let log_file = match std::env::var("LOG_DIR") {
            Ok(dir) if !dir.trim().is_empty() && !disable_log => {
                let dir = PathBuf::from(dir);
                std::fs::create_dir_all(&dir)?;
                let log_file = dir.join("log.txt");
                if let Err(e) = rotate_log_files(&log_file) {
                    eprintln!("Failed to rotate log files: {}", e);
                }
                Some(log_file)
            }
            _ => None,
        };

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_str(&v))
            .unwrap_or(Level::Info);

        Ok(Logger {
            log_file,
            enable_print_log,
            level: Arc::new(Mutex::new(level)),
        })
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(log_file) = &self.log_file else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        let log_line = format!("[{}] {}\n", timestamp, message);

        file.write_all(log_line.as_bytes())?;

        Ok(())
    }

    fn enabled(&self, level: Level) -> bool {
        self.get_level() >= level
    }

    pub fn debug(&self, msg: &str) {
        if !self.enabled(Level::Debug) {
            return;
        }
        if self.enable_print_log {
            tracing::debug!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("DEBUG: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.enabled(Level::Info) {
            return;
        }
        if self.enable_print_log {
            tracing::info!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("INFO: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.enabled(Level::Warn) {
            return;
        }
        if self.enable_print_log {
            tracing::warn!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("WARN: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn error(&self, msg: &str) {
        if !self.enabled(Level::Error) {
            return;
        }
        if self.enable_print_log {
            tracing::error!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("ERROR: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    /// Returns Level::Info if the lock cannot be acquired.
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    TRACING_INITIALIZED.get_or_init(|| {
        // Fails when the host (e.g. a test harness) already set a subscriber, which is fine.
        let _ = Logger::init_tracing();
    });

    let logger = LOGGER.get_or_init(|| {
        match Logger::new() {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Failed to create logger: {}", e);
                Logger {
                    log_file: None,
                    enable_print_log: true,
                    level: Arc::new(Mutex::new(Level::Info)),
                }
            }
        }
    });

    f(logger)
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.info(msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}

/// Set the log level from a string (case insensitive).
///
/// Returns false if the string is not a valid level.
pub fn set_log_level_str(level_str: &str) -> bool {
    if let Some(level) = Level::from_str(level_str) {
        set_log_level(level);
        true
    } else {
        false
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
