//! Focus/break session state machine
//!
//! Owns the session state, the countdown and the session start time. Every
//! accepted transition returns a [`Transition`] describing the notice to show
//! and, when a focus interval ended, the [`CompletedFocus`] to log. The
//! machine itself performs no I/O.

use chrono::{DateTime, Local};
use std::fmt;

use crate::{BREAK_DURATION, FOCUS_DURATION};

/// Notice display time for user-driven transitions
pub const NOTICE_SECS: i64 = 2;
/// Notice display time for timer expiry
pub const EXPIRY_NOTICE_SECS: i64 = 3;

/// Current session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    Focus,
    Break,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Inactive => "inactive",
            SessionState::Focus => "focus",
            SessionState::Break => "break",
        }
    }

    /// Opening bracket of the timer readout, e.g. "[FOCUS 24:59]"
    pub fn symbol(&self) -> &'static str {
        match self {
            SessionState::Inactive => "[READY",
            SessionState::Focus => "[FOCUS",
            SessionState::Break => "[BREAK",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A focus interval that ended by stop, skip or expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedFocus {
    pub start: DateTime<Local>,
    pub duration_secs: i64,
}

/// An accepted state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
    pub message: &'static str,
    pub notice_secs: i64,
    pub completed: Option<CompletedFocus>,
}

/// Why a requested transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyActive,
    NoActiveSession,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::AlreadyActive => "Session already active",
            Rejection::NoActiveSession => "No active session",
        }
    }
}

/// The countdown and its state
#[derive(Debug, Clone)]
pub struct SessionTimer {
    state: SessionState,
    remaining: i64,
    started_at: Option<DateTime<Local>>,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: SessionState::Inactive,
            remaining: FOCUS_DURATION,
            started_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seconds left; may be zero or below until the expiry is applied
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Start of the running session; None while inactive
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn start_focus(&mut self, now: DateTime<Local>) -> Result<Transition, Rejection> {
        if self.state != SessionState::Inactive {
            return Err(Rejection::AlreadyActive);
        }
        Ok(self.enter(SessionState::Focus, now, "Focus session started", NOTICE_SECS, None))
    }

    pub fn start_break(&mut self, now: DateTime<Local>) -> Result<Transition, Rejection> {
        if self.state != SessionState::Inactive {
            return Err(Rejection::AlreadyActive);
        }
        Ok(self.enter(SessionState::Break, now, "Break session started", NOTICE_SECS, None))
    }

    /// End the running session. Only a focus session is reported as completed.
    pub fn stop(&mut self, now: DateTime<Local>) -> Result<Transition, Rejection> {
        if self.state == SessionState::Inactive {
            return Err(Rejection::NoActiveSession);
        }
        let completed = self.completed_focus(now);
        Ok(self.enter(SessionState::Inactive, now, "Session stopped", NOTICE_SECS, completed))
    }

    /// Jump to the next phase: Focus -> Break (logged), Break -> Inactive.
    pub fn skip(&mut self, now: DateTime<Local>) -> Result<Transition, Rejection> {
        match self.state {
            SessionState::Inactive => Err(Rejection::NoActiveSession),
            SessionState::Focus => {
                let completed = self.completed_focus(now);
                Ok(self.enter(
                    SessionState::Break,
                    now,
                    "Focus session completed. Break started.",
                    NOTICE_SECS,
                    completed,
                ))
            }
            SessionState::Break => Ok(self.enter(
                SessionState::Inactive,
                now,
                "Break completed. Ready for next focus session.",
                NOTICE_SECS,
                None,
            )),
        }
    }

    /// Apply expiry if the countdown has run out. Returns None when nothing fired.
    pub fn expire(&mut self, now: DateTime<Local>) -> Option<Transition> {
        if self.remaining > 0 {
            return None;
        }
        match self.state {
            SessionState::Inactive => None,
            SessionState::Focus => {
                let completed = self.completed_focus(now);
                Some(self.enter(
                    SessionState::Break,
                    now,
                    "Focus session completed! Break started.",
                    EXPIRY_NOTICE_SECS,
                    completed,
                ))
            }
            SessionState::Break => Some(self.enter(
                SessionState::Inactive,
                now,
                "Break completed! Ready for next focus session.",
                EXPIRY_NOTICE_SECS,
                None,
            )),
        }
    }

    /// One poll timeout elapsed. Decrements only while a session runs.
    pub fn tick(&mut self) -> bool {
        if self.state == SessionState::Inactive {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn completed_focus(&self, now: DateTime<Local>) -> Option<CompletedFocus> {
        if self.state != SessionState::Focus {
            return None;
        }
        let start = self.started_at?;
        Some(CompletedFocus {
            start,
            duration_secs: (now - start).num_seconds().max(0),
        })
    }

    fn enter(
        &mut self,
        to: SessionState,
        now: DateTime<Local>,
        message: &'static str,
        notice_secs: i64,
        completed: Option<CompletedFocus>,
    ) -> Transition {
        let from = self.state;
        self.state = to;
        match to {
            SessionState::Inactive => {
                self.remaining = FOCUS_DURATION;
                self.started_at = None;
            }
            SessionState::Focus => {
                self.remaining = FOCUS_DURATION;
                self.started_at = Some(now);
            }
            SessionState::Break => {
                self.remaining = BREAK_DURATION;
                self.started_at = Some(now);
            }
        }
        tracing::info!(from = %from, to = %to, "session transition");
        Transition {
            from,
            to,
            message,
            notice_secs,
            completed,
        }
    }
}
