//! Application state and logic
//!
//! `App` owns every piece of mutable state (timer, tasks, input buffer,
//! overlays) and applies actions to it. It never touches the terminal, so
//! the whole thing can be driven from tests.

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use focusforge_core::Settings;
use ratatui::layout::Rect;

use crate::clock::Clock;
use crate::input::{Action, Command, InputRouter};
use crate::layout::UiGeometry;
use crate::notification::NotificationOverlay;
use crate::record::SessionLogEntry;
use crate::session::{CompletedFocus, Rejection, SessionTimer, Transition, NOTICE_SECS};
use crate::store::FocusStore;
use crate::streak::StreakEngine;
use crate::tasks::{validate_text, TaskError, TaskList};
use crate::DEFAULT_FOCUS_LABEL;

/// Why the main loop should stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Signal(i32),
}

impl Exit {
    pub fn code(&self) -> i32 {
        match self {
            Exit::Quit => 0,
            Exit::Signal(sig) => *sig,
        }
    }

    /// Process exit code once the loop has stopped. An exit requested by the
    /// app wins over a signal that arrived meanwhile.
    pub fn resolve(requested: Option<Exit>, signal: Option<i32>) -> i32 {
        requested
            .or(signal.map(Exit::Signal))
            .map_or(0, |exit| exit.code())
    }
}

/// Application state
pub struct App {
    pub store: FocusStore,
    clock: Box<dyn Clock>,
    pub settings: Settings,

    pub timer: SessionTimer,
    pub tasks: TaskList,
    pub focus_label: String,
    pub input: InputRouter,

    pub show_help: bool,
    pub notification: NotificationOverlay,
    /// Today's log entries while the session log view is open
    pub session_view: Option<Vec<SessionLogEntry>>,
    pub geometry: UiGeometry,

    pub streak: u32,
    pub today_sessions: u32,
    stats_date: NaiveDate,

    pub exit: Option<Exit>,
}

impl App {
    /// Load persisted state. Read failures are logged and leave defaults.
    pub fn new(store: FocusStore, clock: Box<dyn Clock>) -> Self {
        let tasks = match store.load_tasks() {
            Ok(tasks) => TaskList::from_tasks(tasks),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load tasks");
                TaskList::new()
            }
        };
        let settings = store.load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings");
            Settings::default()
        });
        let stats_date = clock.now().date_naive();

        let mut app = Self {
            store,
            clock,
            settings,
            timer: SessionTimer::new(),
            tasks,
            focus_label: DEFAULT_FOCUS_LABEL.to_string(),
            input: InputRouter::new(),
            show_help: true,
            notification: NotificationOverlay::new(),
            session_view: None,
            geometry: UiGeometry::default(),
            streak: 0,
            today_sessions: 0,
            stats_date,
            exit: None,
        };
        app.refresh_stats();
        app
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn notify(&mut self, message: impl Into<String>, duration_secs: i64) {
        let now = self.now();
        self.notification.show(message, duration_secs, now);
    }

    /// Recompute region geometry for a new terminal size
    pub fn resize(&mut self, area: Rect) {
        self.geometry = UiGeometry::compute(area, self.show_help);
        tracing::debug!(cols = area.width, rows = area.height, "layout recomputed");
    }

    /// Drop the notification if it has expired; call once per render pass
    pub fn prune_notification(&mut self) {
        let now = self.now();
        self.notification.prune(now);
    }

    // -- timer -------------------------------------------------------------

    /// One poll timeout elapsed
    pub fn tick(&mut self) {
        self.timer.tick();
        let today = self.now().date_naive();
        if today != self.stats_date {
            self.stats_date = today;
            self.refresh_stats();
        }
    }

    /// Fire the expiry transition if the countdown ran out
    pub fn check_expiry(&mut self) {
        let now = self.now();
        if let Some(transition) = self.timer.expire(now) {
            self.apply_transition(transition);
        }
    }

    pub fn start_focus(&mut self) {
        let now = self.now();
        let result = self.timer.start_focus(now);
        self.apply(result);
    }

    pub fn start_break(&mut self) {
        let now = self.now();
        let result = self.timer.start_break(now);
        self.apply(result);
    }

    pub fn stop(&mut self) {
        let now = self.now();
        let result = self.timer.stop(now);
        self.apply(result);
    }

    pub fn skip(&mut self) {
        let now = self.now();
        let result = self.timer.skip(now);
        self.apply(result);
    }

    fn apply(&mut self, result: Result<Transition, Rejection>) {
        match result {
            Ok(transition) => self.apply_transition(transition),
            Err(rejection) => self.notify(rejection.message(), NOTICE_SECS),
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        self.notify(transition.message, transition.notice_secs);
        if let Some(completed) = transition.completed {
            self.log_completed(completed);
        }
    }

    fn log_completed(&mut self, completed: CompletedFocus) {
        let result = StreakEngine::new(&self.store, self.clock.as_ref()).record_completed_focus_session(
            completed.start,
            completed.duration_secs,
            &self.focus_label,
        );
        match result {
            Ok(counters) => {
                self.streak = counters.current_streak;
                self.refresh_stats();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to log focus session");
                self.notify("Error writing to sessions file", NOTICE_SECS);
            }
        }
    }

    /// Re-read streak and today's count from disk
    pub fn refresh_stats(&mut self) {
        let engine = StreakEngine::new(&self.store, self.clock.as_ref());
        match engine.current_streak() {
            Ok(streak) => self.streak = streak,
            Err(e) => tracing::warn!(error = %e, "failed to read streak counters"),
        }
        match engine.today_session_count() {
            Ok(count) => self.today_sessions = count,
            Err(e) => tracing::warn!(error = %e, "failed to read session log"),
        }
    }

    // -- input -------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.session_view.is_some() {
            if key.kind != KeyEventKind::Press {
                return;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.dispatch(Action::Interrupt);
            } else {
                self.session_view = None;
            }
            return;
        }

        if let Some(action) = self.input.handle_key(key) {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::StartFocus => self.start_focus(),
            Action::StartBreak => self.start_break(),
            Action::Stop => self.stop(),
            Action::Skip => self.skip(),
            Action::CompleteSelected => {
                if !self.tasks.is_empty() {
                    let result = self.tasks.complete_selected();
                    self.after_task_edit(result, "Task marked as done");
                }
            }
            Action::UnmarkSelected => {
                if !self.tasks.is_empty() {
                    let result = self.tasks.unmark(self.tasks.selected());
                    self.after_task_edit(result, "Task unmarked");
                }
            }
            Action::RemoveSelected => {
                if !self.tasks.is_empty() {
                    let result = self.tasks.remove(self.tasks.selected()).map(drop);
                    self.after_task_edit(result, "Task removed");
                }
            }
            Action::SelectUp => {
                self.tasks.select_up();
            }
            Action::SelectDown => {
                self.tasks.select_down();
            }
            Action::FocusSelected => {
                if let Some(task) = self.tasks.selected_task() {
                    self.focus_label = task.text.clone();
                    self.notify("Focus task updated", NOTICE_SECS);
                }
            }
            Action::ToggleHelp => self.toggle_help(),
            Action::ShowSessions => self.open_session_view(),
            Action::Quit => self.exit = Some(Exit::Quit),
            Action::Interrupt => self.exit = Some(Exit::Signal(libc::SIGINT)),
            Action::EnterCommand | Action::CancelCommand | Action::Edited => {}
            Action::Submit(command) => self.execute(command),
        }
    }

    /// Run a submitted command line
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Empty => self.notify("Empty input", NOTICE_SECS),
            Command::StartFocus => self.start_focus(),
            Command::StartBreak => self.start_break(),
            Command::Stop => self.stop(),
            Command::Skip => self.skip(),
            Command::Quit => self.exit = Some(Exit::Quit),
            Command::Help => self.toggle_help(),
            Command::AddTask(text) => {
                let result = self.tasks.add(&text);
                self.after_task_edit(result, "Task added");
            }
            Command::SetFocus(label) => match validate_text(&label) {
                Ok(()) => {
                    self.focus_label = label;
                    self.notify("Focus task updated", NOTICE_SECS);
                }
                Err(e) => self.notify(e.to_string(), NOTICE_SECS),
            },
            Command::MarkDone(arg) => {
                let result = self.tasks.parse_number(&arg).and_then(|i| self.tasks.mark_done(i));
                self.after_task_edit(result, "Task marked as done");
            }
            Command::Unmark(arg) => {
                let result = self.tasks.parse_number(&arg).and_then(|i| self.tasks.unmark(i));
                self.after_task_edit(result, "Task unmarked");
            }
            Command::Remove(arg) => {
                let result = self
                    .tasks
                    .parse_number(&arg)
                    .and_then(|i| self.tasks.remove(i))
                    .map(drop);
                self.after_task_edit(result, "Task removed");
            }
        }
    }

    fn after_task_edit(&mut self, result: Result<(), TaskError>, success: &str) {
        match result {
            Ok(()) => {
                if self.persist_tasks() {
                    self.notify(success, NOTICE_SECS);
                }
            }
            Err(e) => self.notify(e.to_string(), NOTICE_SECS),
        }
    }

    fn persist_tasks(&mut self) -> bool {
        match self.store.save_tasks(self.tasks.tasks()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to save tasks");
                self.notify("Error saving tasks", NOTICE_SECS);
                false
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        let area = self.geometry.area;
        self.resize(area);
    }

    fn open_session_view(&mut self) {
        let area = self.geometry.sessions;
        if area.height <= 4 || area.width <= 4 {
            self.notify("Terminal too small for session display", NOTICE_SECS);
            return;
        }
        let engine = StreakEngine::new(&self.store, self.clock.as_ref());
        match engine.today_sessions() {
            Ok(entries) => self.session_view = Some(entries),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session log");
                self.notify("Error reading sessions file", NOTICE_SECS);
            }
        }
    }

    /// Persist tasks and settings before exit. Failures are logged only.
    pub fn shutdown(&self) {
        if let Err(e) = self.store.save_tasks(self.tasks.tasks()) {
            tracing::error!(error = %e, "failed to save tasks on exit");
        }
        if let Err(e) = self.store.save_settings(&self.settings) {
            tracing::error!(error = %e, "failed to save settings on exit");
        }
    }
}
