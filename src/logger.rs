//! Per-launch log file for Pixelpad.
//!
//! Opening the log empties it, so after a crash the file holds exactly the
//! session that crashed. Where it lives by default:
//!   Windows:  `%APPDATA%\Pixelpad\pixelpad.log`
//!   Linux:    `~/.local/share/Pixelpad/pixelpad.log`
//!   macOS:    `~/Library/Application Support/Pixelpad/pixelpad.log`
//!
//! `log_info!`, `log_warn!` and `log_err!` do nothing until `init()` or
//! `init_at()` has opened a file, which keeps unit tests quiet.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

struct Session {
    path: PathBuf,
    file: Mutex<File>,
}

static SESSION: OnceLock<Session> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Panic,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
        }
    }
}

/// Where this session is logging, once the logger is open.
pub fn log_path() -> Option<&'static Path> {
    SESSION.get().map(|s| s.path.as_path())
}

/// Append `line` verbatim. A failed write is dropped.
pub fn write_line(line: &str) {
    let Some(session) = SESSION.get() else { return };
    if let Ok(mut file) = session.file.lock() {
        let _ = writeln!(file, "{}", line);
    }
}

pub fn write(level: Level, msg: &str) {
    write_line(&format_line(&clock_time(), level, msg));
}

pub(crate) fn format_line(time: &str, level: Level, msg: &str) -> String {
    format!("[{}] [{}] {}", time, level.tag(), msg)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, &format!($($arg)*))
    };
}

pub fn init() {
    init_at(&default_log_path());
}

/// Open (and empty) the log at `path`, then chain a panic hook that copies the
/// panic message into it. Later calls are ignored.
pub fn init_at(path: &Path) {
    if SESSION.get().is_some() {
        return;
    }
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    let opened = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path);
    let file = match opened {
        Ok(file) => file,
        Err(e) => {
            eprintln!("[logger] cannot open {}: {}", path.display(), e);
            return;
        }
    };
    let _ = SESSION.set(Session {
        path: path.to_path_buf(),
        file: Mutex::new(file),
    });

    write_line(&format!("=== Pixelpad session started (unix {}) ===", unix_seconds()));
    write_line(&format!("Log file: {}", path.display()));
    write_line("");

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write(Level::Panic, &info.to_string());
        previous(info);
    }));
}

fn default_log_path() -> PathBuf {
    data_dir().join("Pixelpad").join("pixelpad.log")
}

fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support");
        }
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// HH:MM:SS in UTC.
fn clock_time() -> String {
    let secs = unix_seconds();
    format!(
        "{:02}:{:02}:{:02}",
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
