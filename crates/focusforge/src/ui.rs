//! UI rendering

use focusforge_core::format;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::input::InputMode;
use crate::notification::notification_area;
use crate::record::SessionLogEntry;
use crate::session::SessionState;
use crate::{DEFAULT_FOCUS_LABEL, VERSION};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let screen = f.area();
    let g = &app.geometry;

    draw_timer(f, app, g.timer.intersection(screen));
    draw_tasks(f, app, g.tasks.intersection(screen));
    if let Some(help) = g.help {
        draw_help(f, help.intersection(screen));
    }
    draw_input(f, app, g.input.intersection(screen));

    if let Some(entries) = &app.session_view {
        draw_session_log(f, app, entries, g.sessions.intersection(screen));
    }

    if let Some(notification) = app.notification.current() {
        let area = notification_area(screen, &notification.message);
        draw_notification(f, &notification.message, area);
    }
}

fn state_color(state: SessionState) -> Color {
    match state {
        SessionState::Focus => Color::Red,
        SessionState::Break => Color::Green,
        SessionState::Inactive => Color::Yellow,
    }
}

fn draw_timer(f: &mut Frame, app: &App, area: Rect) {
    let state = app.timer.state();
    let readout = format!("{} {}]", state.symbol(), format::timer(app.timer.remaining()));
    let label_width = area.width.saturating_sub(9) as usize;

    let lines = vec![
        Line::from(Span::styled(
            readout,
            Style::default().fg(state_color(state)).bold(),
        ))
        .centered(),
        Line::from(vec![
            Span::styled("Focus: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format::truncate(&app.focus_label, label_width)),
        ])
        .centered(),
        Line::from(Span::styled(
            format!(
                "Streak: {} | Today: {}",
                format::count(app.streak, "day"),
                format::count(app.today_sessions, "session")
            ),
            Style::default().fg(Color::Cyan),
        ))
        .centered(),
    ];

    let block = Block::default()
        .title(format!(" FocusForge v{} ", VERSION))
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(state_color(state)));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let capacity = app.geometry.task_capacity();
    let text_width = area.width.saturating_sub(2) as usize;

    let items: Vec<Line> = if app.tasks.is_empty() {
        vec![Line::from(Span::styled(
            " No tasks. Press Enter to add one.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.tasks
            .tasks()
            .iter()
            .enumerate()
            .take(capacity)
            .map(|(i, task)| {
                let selected = i == app.tasks.selected();
                let marker = if selected { ">" } else { " " };
                let check = if task.done { "X" } else { " " };
                let prefix = format!("{} {:>2}. [{}] ", marker, i + 1, check);
                let room = text_width.saturating_sub(prefix.len());

                let mut style = if task.done {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                if selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }

                Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(format::truncate(&task.text, room), style),
                ])
            })
            .collect()
    };

    let done = app.tasks.tasks().iter().filter(|t| t.done).count();
    let title = format!(" Tasks ({} done, {} total) ", done, app.tasks.len());

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Blue).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    f.render_widget(Paragraph::new(items).block(block), area);
}

fn key_line(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<10}", key), Style::default().fg(Color::Cyan)),
        Span::raw(what),
    ])
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        key_line("a", "Start focus"),
        key_line("f", "Start break"),
        key_line("s", "Stop session"),
        key_line("d", "Skip to next phase"),
        key_line("w / Up", "Select previous"),
        key_line("x / Down", "Select next"),
        key_line("j", "Mark done"),
        key_line("k", "Unmark"),
        key_line("l", "Remove task"),
        key_line("Space", "Focus on selected"),
        key_line("Enter", "Command line"),
        key_line("v", "Today's sessions"),
        key_line("? / h", "Toggle help"),
        key_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Commands: a <task>, t <label>,",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            " d|u|r <n> done/undo/remove,",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            " f b s d q as in normal mode",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(Color::Yellow).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Paragraph::new(help_text).block(block), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.input.mode() {
        InputMode::Command => {
            let room = area.width.saturating_sub(13) as usize;
            let buffer = app.input.buffer();
            // Keep the tail (where the cursor is) visible
            let skip = buffer.chars().count().saturating_sub(room);
            let visible: String = buffer.chars().skip(skip).collect();
            Line::from(vec![
                Span::styled("Add task: ", Style::default().fg(Color::Cyan).bold()),
                Span::raw(visible),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        }
        InputMode::Normal => Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" command  "),
            Span::styled("Space", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" focus task  "),
            Span::styled("?", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" help  "),
            Span::styled("q", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" quit"),
        ])
        .style(Style::default().fg(Color::DarkGray)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn session_line(entry: &SessionLogEntry) -> Line<'static> {
    let label = if entry.label.is_empty() {
        DEFAULT_FOCUS_LABEL
    } else {
        entry.label.as_str()
    };
    Line::from(vec![
        Span::styled(
            format!(
                " - {}–{}",
                entry.start_time.format("%H:%M"),
                entry.end_time().format("%H:%M")
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(" → {}", label)),
    ])
}

fn draw_session_log(f: &mut Frame, app: &App, entries: &[SessionLogEntry], area: Rect) {
    f.render_widget(Clear, area);

    let rows = area.height.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from(Span::styled(
            " (No sessions today)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        entries.iter().take(rows).map(session_line).collect()
    };
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "Press any key to continue...",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    );

    let title = format!(" SESSION LOG ({}) ", app.now().format("%Y-%m-%d"));
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Magenta).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_notification(f: &mut Frame, message: &str, area: Rect) {
    f.render_widget(Clear, area);

    let text = format::clip(message, area.width.saturating_sub(4) as usize);
    let popup = Paragraph::new(Line::from(Span::raw(text)).centered()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::input::Command;
    use crate::store::FocusStore;
    use chrono::{Local, TimeZone};
    use focusforge_core::Paths;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn test_app(cols: u16, rows: u16) -> (App, TempDir) {
        let home = TempDir::new().unwrap();
        let store = FocusStore::new(Paths::under(home.path()).unwrap());
        store.init().unwrap();
        let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap());
        let mut app = App::new(store, Box::new(clock));
        app.resize(Rect::new(0, 0, cols, rows));
        (app, home)
    }

    fn render(app: &App, cols: u16, rows: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(cols as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_chrome() {
        let (app, _home) = test_app(100, 30);
        let screen = render(&app, 100, 30);
        assert!(screen.contains(&format!("FocusForge v{}", VERSION)));
        assert!(screen.contains("[READY 25:00]"));
        assert!(screen.contains("Focus: ???"));
        assert!(screen.contains("Streak: 0 day(s) | Today: 0 session(s)"));
        assert!(screen.contains("No tasks."));
        assert!(screen.contains(" Help "));
    }

    #[test]
    fn test_renders_tasks_and_focus_readout() {
        let (mut app, _home) = test_app(100, 30);
        app.execute(Command::AddTask("Write report".into()));
        app.execute(Command::AddTask("Review PR".into()));
        app.execute(Command::MarkDone("2".into()));
        app.start_focus();

        let screen = render(&app, 100, 30);
        assert!(screen.contains(">  1. [ ] Write report"));
        assert!(screen.contains("   2. [X] Review PR"));
        assert!(screen.contains("[FOCUS 25:00]"));
        assert!(screen.contains("Focus session started"));
    }

    #[test]
    fn test_command_mode_input_line() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        let (mut app, _home) = test_app(100, 30);
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        for c in "add x".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        let screen = render(&app, 100, 30);
        assert!(screen.contains("Add task: add x_"));
    }

    #[test]
    fn test_session_log_overlay() {
        let (mut app, _home) = test_app(100, 30);
        app.dispatch(crate::input::Action::ShowSessions);
        let screen = render(&app, 100, 30);
        assert!(screen.contains("SESSION LOG (2026-03-02)"));
        assert!(screen.contains("(No sessions today)"));
    }

    #[test]
    fn test_session_log_with_huge_duration() {
        let (mut app, _home) = test_app(100, 30);
        std::fs::write(
            &app.store.paths().sessions,
            "2026-03-02,09:30,9223372036854775807,\"marathon\"\n",
        )
        .unwrap();
        app.dispatch(crate::input::Action::ShowSessions);
        let screen = render(&app, 100, 30);
        assert!(screen.contains("- 09:30–01:00 → marathon"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        for (cols, rows) in [(1, 1), (20, 4), (79, 9)] {
            let (mut app, _home) = test_app(cols, rows);
            app.notify("Task added", 2);
            render(&app, cols, rows);
        }
    }

    #[test]
    fn test_stale_geometry_is_clipped() {
        let (app, _home) = test_app(120, 40);
        render(&app, 80, 10);
    }
}
