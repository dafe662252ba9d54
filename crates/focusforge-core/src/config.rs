//! Settings file management
//!
//! The settings file is reserved for future options. It is read at startup
//! (every line ignored) and rewritten empty at shutdown.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// User settings. No options exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {}

impl Settings {
    /// Load settings from file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open settings: {}", path.display()))?;

        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("Failed to read settings: {}", path.display()))?;
            tracing::debug!(line = %line, "ignoring settings line");
        }

        Ok(Self::default())
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, "")
            .with_context(|| format!("Failed to write settings: {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace settings: {}", path.display()))
    }
}
