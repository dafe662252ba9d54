//! Standard paths used by FocusForge

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest path we are willing to hand to the filesystem
pub const MAX_PATH_LEN: usize = 4096;

/// Name of the per-user directory under `$HOME`
pub const DIR_NAME: &str = ".focusforge";

/// Errors that abort startup before the terminal UI takes over
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("HOME directory could not be determined")]
    NoHomeDir,

    #[error("Path too long for {what}: {path}")]
    PathTooLong { what: &'static str, path: PathBuf },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    #[error("Terminal too small ({cols}x{rows}). Minimum size: {min_rows}x{min_cols}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
}

/// Standard FocusForge paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (~/.focusforge)
    pub dir: PathBuf,
    /// Task list (~/.focusforge/tasks.txt)
    pub tasks: PathBuf,
    /// Append-only session log (~/.focusforge/sessions.csv)
    pub sessions: PathBuf,
    /// Streak counters (~/.focusforge/meta)
    pub meta: PathBuf,
    /// Reserved settings file (~/.focusforge/settings)
    pub settings: PathBuf,
    /// Diagnostic log (~/.focusforge/focusforge.log)
    pub log: PathBuf,
}

impl Paths {
    /// Resolve paths under the current user's home directory
    pub fn new() -> Result<Self, StartupError> {
        let home = dirs::home_dir().ok_or(StartupError::NoHomeDir)?;
        Self::under(&home)
    }

    /// Resolve paths under an arbitrary home directory
    pub fn under(home: &Path) -> Result<Self, StartupError> {
        let dir = checked(home.join(DIR_NAME), "focusforge directory")?;

        Ok(Self {
            tasks: checked(dir.join("tasks.txt"), "tasks file")?,
            sessions: checked(dir.join("sessions.csv"), "sessions file")?,
            meta: checked(dir.join("meta"), "meta file")?,
            settings: checked(dir.join("settings"), "settings file")?,
            log: checked(dir.join("focusforge.log"), "log file")?,
            dir,
        })
    }
}

fn checked(path: PathBuf, what: &'static str) -> Result<PathBuf, StartupError> {
    if path.as_os_str().len() >= MAX_PATH_LEN {
        return Err(StartupError::PathTooLong { what, path });
    }
    Ok(path)
}
