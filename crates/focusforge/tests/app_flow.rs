//! End-to-end flows through `App` with a manual clock and a temp home

use chrono::{Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use focusforge::app::App;
use focusforge::clock::ManualClock;
use focusforge::input::InputMode;
use focusforge::store::FocusStore;
use focusforge::{SessionState, BREAK_DURATION, FOCUS_DURATION};
use focusforge_core::Paths;
use ratatui::layout::Rect;
use std::fs;
use tempfile::TempDir;

struct Harness {
    app: App,
    clock: ManualClock,
    home: TempDir,
}

impl Harness {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 4, 14, 9, 30, 0).unwrap());
        let app = Self::open(&home, &clock);
        Self { app, clock, home }
    }

    fn open(home: &TempDir, clock: &ManualClock) -> App {
        let store = FocusStore::new(Paths::under(home.path()).unwrap());
        store.init().unwrap();
        let mut app = App::new(store, Box::new(clock.clone()));
        app.resize(Rect::new(0, 0, 100, 30));
        app
    }

    /// Simulate `secs` one-second loop iterations
    fn run_secs(&mut self, secs: i64) {
        for _ in 0..secs {
            self.clock.advance_secs(1);
            self.app.tick();
            self.app.check_expiry();
            self.app.prune_notification();
        }
    }

    fn key(&mut self, code: KeyCode) {
        self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn submit(&mut self, line: &str) {
        self.key(KeyCode::Enter);
        assert_eq!(self.app.input.mode(), InputMode::Command);
        for c in line.chars() {
            self.key(KeyCode::Char(c));
        }
        self.key(KeyCode::Enter);
    }

    fn notice(&self) -> Option<&str> {
        self.app.notification.current().map(|n| n.message.as_str())
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.home.path().join(".focusforge").join(name)).unwrap_or_default()
    }
}

#[test]
fn test_focus_runs_into_break_and_logs() {
    let mut h = Harness::new();
    h.submit("t Deep work");
    h.key(KeyCode::Char('a'));
    assert_eq!(h.app.timer.state(), SessionState::Focus);

    h.run_secs(FOCUS_DURATION);

    assert_eq!(h.app.timer.state(), SessionState::Break);
    assert_eq!(h.app.timer.remaining(), BREAK_DURATION);
    assert_eq!(h.notice(), Some("Focus session completed! Break started."));
    assert_eq!(h.read("sessions.csv"), "2026-04-14,09:30,1500,\"Deep work\"\n");
    assert_eq!(h.app.streak, 1);
    assert_eq!(h.app.today_sessions, 1);
    assert_eq!(h.read("meta"), "streak_max=1\nstreak_current=1\n");

    h.run_secs(BREAK_DURATION);
    assert_eq!(h.app.timer.state(), SessionState::Inactive);
    assert_eq!(h.app.store.read_sessions().unwrap().len(), 1);
}

#[test]
fn test_expiry_notice_lasts_three_seconds() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('f'));
    h.run_secs(BREAK_DURATION);
    assert_eq!(h.notice(), Some("Break completed! Ready for next focus session."));
    h.run_secs(2);
    assert!(h.notice().is_some());
    h.run_secs(1);
    assert!(h.notice().is_none());
}

#[test]
fn test_break_never_logs() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('f'));
    h.run_secs(30);
    h.key(KeyCode::Char('s'));
    h.key(KeyCode::Char('f'));
    h.key(KeyCode::Char('d'));
    h.key(KeyCode::Char('f'));
    h.run_secs(BREAK_DURATION);
    assert_eq!(h.read("sessions.csv"), "");
    assert_eq!(h.app.streak, 0);
}

#[test]
fn test_command_line_task_management() {
    let mut h = Harness::new();
    h.submit("a Write report");
    assert_eq!(h.notice(), Some("Task added"));
    assert_eq!(h.read("tasks.txt"), "[ ] Write report\n");

    h.submit("d 2");
    assert_eq!(h.notice(), Some("Invalid task number"));
    assert_eq!(h.read("tasks.txt"), "[ ] Write report\n");

    h.submit("Plan [next] sprint");
    h.submit("d 1");
    assert_eq!(h.read("tasks.txt"), "[X] Write report\n[ ] Plan [next] sprint\n");

    h.submit("u 1");
    h.submit("r 2");
    assert_eq!(h.notice(), Some("Task removed"));
    assert_eq!(h.read("tasks.txt"), "[ ] Write report\n");

    h.submit("   ");
    assert_eq!(h.notice(), Some("Empty input"));
}

#[test]
fn test_escape_discards_buffer() {
    let mut h = Harness::new();
    h.key(KeyCode::Enter);
    for c in "a lost".chars() {
        h.key(KeyCode::Char(c));
    }
    h.key(KeyCode::Esc);
    assert_eq!(h.app.input.mode(), InputMode::Normal);
    assert!(h.app.tasks.is_empty());
    assert_eq!(h.app.timer.state(), SessionState::Inactive);
}

#[test]
fn test_streak_across_days() {
    let mut h = Harness::new();

    h.key(KeyCode::Char('a'));
    h.run_secs(60);
    h.key(KeyCode::Char('s'));
    assert_eq!(h.app.streak, 1);

    // Second session the same day leaves the counters alone
    h.key(KeyCode::Char('a'));
    h.run_secs(60);
    h.key(KeyCode::Char('s'));
    assert_eq!(h.app.streak, 1);
    assert_eq!(h.app.today_sessions, 2);

    h.clock.advance_secs(24 * 3600);
    h.app.tick();
    assert_eq!(h.app.today_sessions, 0);

    h.key(KeyCode::Char('a'));
    h.run_secs(60);
    h.key(KeyCode::Char('d'));
    assert_eq!(h.app.streak, 2);
    assert_eq!(h.read("meta"), "streak_max=2\nstreak_current=2\n");

    h.key(KeyCode::Char('s'));
    h.clock.advance_secs(2 * 24 * 3600);
    h.key(KeyCode::Char('a'));
    h.run_secs(60);
    h.key(KeyCode::Char('s'));
    assert_eq!(h.app.streak, 1);
    assert_eq!(h.read("meta"), "streak_max=2\nstreak_current=1\n");
}

#[test]
fn test_state_survives_restart() {
    let mut h = Harness::new();
    h.submit("a Carry over");
    h.key(KeyCode::Char('a'));
    h.run_secs(120);
    h.key(KeyCode::Char('s'));
    h.app.shutdown();

    let reopened = Harness::open(&h.home, &h.clock);
    assert_eq!(reopened.tasks.len(), 1);
    assert_eq!(reopened.tasks.tasks()[0].text, "Carry over");
    assert_eq!(reopened.streak, 1);
    assert_eq!(reopened.today_sessions, 1);
    assert_eq!(reopened.timer.state(), SessionState::Inactive);
}

#[test]
fn test_corrupt_files_do_not_block_startup() {
    let h = Harness::new();
    let dir = h.home.path().join(".focusforge");
    fs::write(dir.join("sessions.csv"), "garbage\n2026-04-14,09:00,1500,\"ok\"\n,,,\n").unwrap();
    fs::write(dir.join("meta"), "streak_current=abc\nstreak_max=4\n").unwrap();
    fs::write(dir.join("tasks.txt"), "no prefix\n[X] kept\n").unwrap();

    let app = Harness::open(&h.home, &h.clock);
    assert_eq!(app.today_sessions, 1);
    assert_eq!(app.streak, 0);
    assert_eq!(app.tasks.len(), 1);
    assert!(app.tasks.tasks()[0].done);
}
