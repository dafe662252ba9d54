//! Keyboard input routing
//!
//! Normal mode maps single keys to actions. Command mode collects a line
//! (printable ASCII only, bounded length) that Enter submits to
//! [`parse_command`] and Escape throws away.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::MAX_INPUT_LEN;

/// Which way keystrokes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Command,
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    StartFocus,
    StartBreak,
    Stop,
    Skip,
    Quit,
    Help,
    AddTask(String),
    SetFocus(String),
    MarkDone(String),
    Unmark(String),
    Remove(String),
}

/// What the application should do in response to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartFocus,
    StartBreak,
    Stop,
    Skip,
    CompleteSelected,
    UnmarkSelected,
    RemoveSelected,
    SelectUp,
    SelectDown,
    FocusSelected,
    ToggleHelp,
    ShowSessions,
    Quit,
    /// Ctrl-C; raw mode swallows the real SIGINT
    Interrupt,
    EnterCommand,
    CancelCommand,
    /// The command buffer changed
    Edited,
    Submit(Command),
}

/// Input mode plus the command-line buffer
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    mode: InputMode,
    buffer: String,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Route one key event. Releases and repeats are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Some(Action::Interrupt);
        }
        // Shift is fine (it is how capitals arrive); other chords are not ours
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }

        match self.mode {
            InputMode::Normal => self.normal_key(key.code),
            InputMode::Command => self.command_key(key.code),
        }
    }

    fn normal_key(&mut self, code: KeyCode) -> Option<Action> {
        let action = match code {
            KeyCode::Enter => {
                self.mode = InputMode::Command;
                self.buffer.clear();
                Action::EnterCommand
            }
            KeyCode::Up => Action::SelectUp,
            KeyCode::Down => Action::SelectDown,
            KeyCode::Char(' ') => Action::FocusSelected,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'a' => Action::StartFocus,
                'f' => Action::StartBreak,
                's' => Action::Stop,
                'd' => Action::Skip,
                'j' => Action::CompleteSelected,
                'k' => Action::UnmarkSelected,
                'l' => Action::RemoveSelected,
                'w' => Action::SelectUp,
                'x' => Action::SelectDown,
                'v' => Action::ShowSessions,
                '?' | 'h' => Action::ToggleHelp,
                'q' => Action::Quit,
                _ => return None,
            },
            _ => return None,
        };
        Some(action)
    }

    fn command_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.buffer);
                self.mode = InputMode::Normal;
                Some(Action::Submit(parse_command(&line)))
            }
            KeyCode::Esc => {
                self.buffer.clear();
                self.mode = InputMode::Normal;
                Some(Action::CancelCommand)
            }
            KeyCode::Backspace => self.buffer.pop().map(|_| Action::Edited),
            KeyCode::Char(c) if (' '..='~').contains(&c) => {
                if self.buffer.len() >= MAX_INPUT_LEN {
                    return None;
                }
                self.buffer.push(c);
                Some(Action::Edited)
            }
            _ => None,
        }
    }
}

/// Parse a submitted command line.
///
/// Single letters `f b s d q h ?` are session/app commands; `a t d u r`
/// followed by a space take the rest of the line as argument. Anything else
/// non-empty adds a task.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\n', '\r']).trim();

    match line {
        "" => return Command::Empty,
        "f" => return Command::StartFocus,
        "b" => return Command::StartBreak,
        "s" => return Command::Stop,
        "d" => return Command::Skip,
        "q" => return Command::Quit,
        "h" | "?" => return Command::Help,
        _ => {}
    }

    let bytes = line.as_bytes();
    if bytes.len() >= 2 && (bytes[1] == b' ' || bytes[1] == b'\t') {
        let arg = line[2..].trim().to_string();
        match bytes[0] {
            b'a' => return Command::AddTask(arg),
            b't' => return Command::SetFocus(arg),
            b'd' => return Command::MarkDone(arg),
            b'u' => return Command::Unmark(arg),
            b'r' => return Command::Remove(arg),
            _ => {}
        }
    }

    Command::AddTask(line.to_string())
}
