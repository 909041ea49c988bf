//! Per-category run journal
//!
//! Each provisioning step writes to its own append-only log file
//! (`timestamp | LEVEL | message`), mirrors the line to the console with a
//! status colour, and emits a `tracing` event tagged with the category.
//! A single [`Journal`] is created at startup and lent to every component.

use crate::error::Result;
use crate::types::EntryKind;
use chrono::Local;
use colored::Colorize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Operation category, one log file each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    SessionOpen,
    Token,
    Users,
    Groups,
    SessionClose,
}

impl LogCategory {
    pub const ALL: [LogCategory; 5] = [
        LogCategory::SessionOpen,
        LogCategory::Token,
        LogCategory::Users,
        LogCategory::Groups,
        LogCategory::SessionClose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionOpen => "session_open",
            Self::Token => "token",
            Self::Users => "users",
            Self::Groups => "groups",
            Self::SessionClose => "session_close",
        }
    }

    /// Log file name under the journal directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::SessionOpen => "edir_ldap_session_creation.log",
            Self::Token => "edir_ldap_token_creation.log",
            Self::Users => "edir_ldap_users_creation.log",
            Self::Groups => "edir_ldap_groups_creation.log",
            Self::SessionClose => "edir_ldap_session_deletion.log",
        }
    }

    pub fn for_kind(kind: EntryKind) -> Self {
        match kind {
            EntryKind::User => Self::Users,
            EntryKind::Group => Self::Groups,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::SessionOpen => 0,
            Self::Token => 1,
            Self::Users => 2,
            Self::Groups => 3,
            Self::SessionClose => 4,
        }
    }
}

/// Severity written to the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Console colouring of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Notice,
    Success,
    Failure,
    Detail,
}

fn paint(tone: Tone, message: &str) -> String {
    match tone {
        Tone::Plain => message.to_string(),
        Tone::Notice => message.yellow().to_string(),
        Tone::Success => message.green().to_string(),
        Tone::Failure => message.red().to_string(),
        Tone::Detail => message.cyan().to_string(),
    }
}

/// Format one log file line
pub fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} | {} | {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        level.as_str(),
        message
    )
}

/// Log sink for one category
#[derive(Debug)]
pub struct CategoryLog {
    category: LogCategory,
    file: Option<File>,
    console: bool,
}

impl CategoryLog {
    fn open(category: LogCategory, directory: &Path, console: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(directory.join(category.file_name()))?;

        Ok(Self {
            category,
            file: Some(file),
            console,
        })
    }

    fn detached(category: LogCategory, console: bool) -> Self {
        Self {
            category,
            file: None,
            console,
        }
    }

    pub fn category(&self) -> LogCategory {
        self.category
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.record(Level::Info, Tone::Plain, message.as_ref());
    }

    pub fn notice(&self, message: impl AsRef<str>) {
        self.record(Level::Info, Tone::Notice, message.as_ref());
    }

    pub fn detail(&self, message: impl AsRef<str>) {
        self.record(Level::Info, Tone::Detail, message.as_ref());
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.record(Level::Info, Tone::Success, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.record(Level::Warning, Tone::Notice, message.as_ref());
    }

    pub fn failure(&self, message: impl AsRef<str>) {
        self.record(Level::Error, Tone::Failure, message.as_ref());
    }

    fn record(&self, level: Level, tone: Tone, message: &str) {
        let category = self.category.as_str();
        match level {
            Level::Info => info!(category, "{}", message),
            Level::Warning => warn!(category, "{}", message),
            Level::Error => error!(category, "{}", message),
        }

        if let Some(mut file) = self.file.as_ref() {
            if let Err(e) = file.write_all(format_line(level, message).as_bytes()) {
                warn!(category, "Failed to write log line: {}", e);
            }
        }

        if self.console {
            println!("{}", paint(tone, message));
        }
    }
}

/// The set of category logs for one run
#[derive(Debug)]
pub struct Journal {
    logs: [CategoryLog; 5],
    directory: Option<PathBuf>,
    console: bool,
}

impl Journal {
    /// Open (or create) one append-only file per category under `directory`
    pub fn open(directory: impl AsRef<Path>, console: bool) -> Result<Self> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let [a, b, c, d, e] = LogCategory::ALL;
        Ok(Self {
            logs: [
                CategoryLog::open(a, directory, console)?,
                CategoryLog::open(b, directory, console)?,
                CategoryLog::open(c, directory, console)?,
                CategoryLog::open(d, directory, console)?,
                CategoryLog::open(e, directory, console)?,
            ],
            directory: Some(directory.to_path_buf()),
            console,
        })
    }

    /// A journal that writes no files; console and tracing output only
    pub fn disabled(console: bool) -> Self {
        Self {
            logs: LogCategory::ALL.map(|c| CategoryLog::detached(c, console)),
            directory: None,
            console,
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn get(&self, category: LogCategory) -> &CategoryLog {
        &self.logs[category.index()]
    }

    pub fn for_kind(&self, kind: EntryKind) -> &CategoryLog {
        self.get(LogCategory::for_kind(kind))
    }

    pub fn session_open(&self) -> &CategoryLog {
        self.get(LogCategory::SessionOpen)
    }

    pub fn token(&self) -> &CategoryLog {
        self.get(LogCategory::Token)
    }

    pub fn session_close(&self) -> &CategoryLog {
        self.get(LogCategory::SessionClose)
    }

    /// Console-only status line that belongs to no category
    pub fn say(&self, tone: Tone, message: impl AsRef<str>) {
        info!("{}", message.as_ref());
        if self.console {
            println!("{}", paint(tone, message.as_ref()));
        }
    }
}
