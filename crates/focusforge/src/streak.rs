//! Day streaks and session counts
//!
//! A streak is the number of consecutive calendar days with at least one
//! completed focus session. The counters are persisted and move at most once
//! per local day, on the first completion of that day:
//! - a session logged yesterday extends the streak by one
//! - otherwise the streak restarts at one
//!
//! "Today" is the local date when the session is recorded, not the date
//! stamped on the entry.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};

use crate::clock::Clock;
use crate::record::SessionLogEntry;
use crate::store::FocusStore;

const MAX_KEY: &str = "streak_max=";
const CURRENT_KEY: &str = "streak_current=";

/// Persisted streak counters (the meta file)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakCounters {
    pub max_streak: u32,
    pub current_streak: u32,
}

impl StreakCounters {
    /// Parse meta file content. Keys may come in any order; unknown lines and
    /// unparseable values are ignored.
    pub fn parse(content: &str) -> Self {
        let mut counters = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix(MAX_KEY) {
                if let Ok(v) = value.trim().parse() {
                    counters.max_streak = v;
                }
            } else if let Some(value) = line.strip_prefix(CURRENT_KEY) {
                if let Ok(v) = value.trim().parse() {
                    counters.current_streak = v;
                }
            }
        }
        counters
    }

    pub fn to_meta(&self) -> String {
        format!(
            "{}{}\n{}{}\n",
            MAX_KEY, self.max_streak, CURRENT_KEY, self.current_streak
        )
    }

    /// Counters after a completion on `today`, given the log as it stood
    /// before that completion. None when today was already counted.
    pub fn advance(&self, prior: &[SessionLogEntry], today: NaiveDate) -> Option<Self> {
        if prior.iter().any(|e| e.date == today) {
            return None;
        }

        let yesterday = today.pred_opt();
        let continues = prior.iter().any(|e| Some(e.date) == yesterday);

        let mut next = *self;
        next.current_streak = if continues {
            next.current_streak.saturating_add(1)
        } else {
            1
        };
        // Max follows current on every change, so a fresh start records 1
        next.max_streak = next.max_streak.max(next.current_streak);
        Some(next)
    }
}

/// Number of entries dated `day`
pub fn count_on(entries: &[SessionLogEntry], day: NaiveDate) -> u32 {
    entries.iter().filter(|e| e.date == day).count() as u32
}

/// Streak queries and session recording over the store
pub struct StreakEngine<'a> {
    store: &'a FocusStore,
    clock: &'a dyn Clock,
}

impl<'a> StreakEngine<'a> {
    pub fn new(store: &'a FocusStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Append one log entry, then update the counters if this is the first
    /// completion today. Returns the counters now on disk.
    pub fn record_completed_focus_session(
        &self,
        start: DateTime<Local>,
        duration_secs: i64,
        label: &str,
    ) -> Result<StreakCounters> {
        let today = self.today();
        let prior = self
            .store
            .read_sessions()
            .context("Failed to read session log before recording");

        let entry = SessionLogEntry::new(start, duration_secs, label);
        self.store.append_session(&entry)?;
        tracing::info!(duration = duration_secs, label = %label, "focus session logged");

        let counters = self.store.read_streak()?;
        let prior = match prior {
            Ok(prior) => prior,
            Err(e) => {
                tracing::warn!(error = %e, "streak left unchanged");
                return Ok(counters);
            }
        };
        match counters.advance(&prior, today) {
            Some(next) => {
                self.store.write_streak(&next)?;
                tracing::info!(
                    current = next.current_streak,
                    max = next.max_streak,
                    "streak updated"
                );
                Ok(next)
            }
            None => Ok(counters),
        }
    }

    pub fn current_streak(&self) -> Result<u32> {
        Ok(self.store.read_streak()?.current_streak)
    }

    pub fn today_session_count(&self) -> Result<u32> {
        Ok(count_on(&self.store.read_sessions()?, self.today()))
    }

    /// Today's entries in log order
    pub fn today_sessions(&self) -> Result<Vec<SessionLogEntry>> {
        let today = self.today();
        Ok(self
            .store
            .read_sessions()?
            .into_iter()
            .filter(|e| e.date == today)
            .collect())
    }
}
