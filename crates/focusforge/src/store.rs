//! Flat-file storage
//!
//! Everything lives under ~/.focusforge:
//! - Task list: tasks.txt, rewritten in full on every change
//! - Session log: sessions.csv, append-only
//! - Streak counters: meta
//! - Reserved settings: settings
//!
//! Each file is read and written independently. A failed write leaves the
//! other files untouched; callers log it and carry on.

use anyhow::{Context, Result};
use focusforge_core::{Paths, Settings, StartupError};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::record::SessionLogEntry;
use crate::streak::StreakCounters;
use crate::tasks::Task;

/// Persistence gateway for tasks, session log and streak counters
#[derive(Debug, Clone)]
pub struct FocusStore {
    paths: Paths,
}

impl FocusStore {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Create the directory and any missing files. Existing files are never
    /// truncated. Only a missing directory is fatal.
    pub fn init(&self) -> Result<(), StartupError> {
        fs::create_dir_all(&self.paths.dir).map_err(|source| StartupError::CreateDir {
            path: self.paths.dir.clone(),
            source,
        })?;

        for path in [&self.paths.tasks, &self.paths.sessions, &self.paths.settings] {
            if let Err(e) = touch(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to create file");
            }
        }

        if !self.paths.meta.exists() {
            if let Err(e) = self.write_streak(&StreakCounters::default()) {
                tracing::warn!(error = %e, "failed to create meta file");
            }
        }

        Ok(())
    }

    /// Load the task list. A missing file is an empty list; malformed lines are skipped.
    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        let Some(content) = read_lossy(&self.paths.tasks)? else {
            return Ok(Vec::new());
        };
        Ok(content.lines().filter_map(Task::parse_line).collect())
    }

    /// Rewrite the task list
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut content = String::new();
        for task in tasks {
            content.push_str(&task.to_line());
            content.push('\n');
        }
        write_replace(&self.paths.tasks, &content)
    }

    /// Append one record to the session log
    pub fn append_session(&self, entry: &SessionLogEntry) -> Result<()> {
        let path = &self.paths.sessions;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open session log: {}", path.display()))?;

        writeln!(file, "{}", entry)
            .with_context(|| format!("Failed to write to session log: {}", path.display()))
    }

    /// All parseable session log records, oldest first
    pub fn read_sessions(&self) -> Result<Vec<SessionLogEntry>> {
        let Some(content) = read_lossy(&self.paths.sessions)? else {
            return Ok(Vec::new());
        };

        let mut sessions = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match SessionLogEntry::parse(line) {
                Ok(entry) => sessions.push(entry),
                Err(e) => {
                    tracing::debug!(line = line_num + 1, error = %e, "skipping session log line");
                }
            }
        }
        Ok(sessions)
    }

    /// Persisted streak counters; a missing file reads as zeros
    pub fn read_streak(&self) -> Result<StreakCounters> {
        Ok(read_lossy(&self.paths.meta)?
            .map(|content| StreakCounters::parse(&content))
            .unwrap_or_default())
    }

    pub fn write_streak(&self, counters: &StreakCounters) -> Result<()> {
        write_replace(&self.paths.meta, &counters.to_meta())
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load(&self.paths.settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.save(&self.paths.settings)
    }
}

fn touch(path: &Path) -> std::io::Result<()> {
    fs::OpenOptions::new().create(true).append(true).open(path).map(drop)
}

fn read_lossy(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Write to a sibling temp file, then rename over the target
fn write_replace(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))
}
