//! Task list
//!
//! An ordered list of tasks with a selection cursor. Identity is positional:
//! removing a task shifts every later task down by one. All selection
//! clamping lives in [`TaskList::clamp_selection`].

use focusforge_core::format;
use thiserror::Error;

use crate::{MAX_TASKS, MAX_TASK_LEN};

const PENDING_PREFIX: &str = "[ ] ";
const DONE_PREFIX: &str = "[X] ";

/// User-facing task errors, shown as notices
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Maximum number of tasks reached")]
    ListFull,

    #[error("Invalid task number")]
    InvalidNumber,

    #[error("Task text is empty")]
    EmptyText,

    #[error("Task text too long (max {} characters)", MAX_TASK_LEN)]
    TooLong,
}

/// A single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    pub done: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }

    /// Serialize as a task-file line (without newline)
    pub fn to_line(&self) -> String {
        let prefix = if self.done { DONE_PREFIX } else { PENDING_PREFIX };
        format!("{}{}", prefix, self.text)
    }

    /// Parse a task-file line. Lines without a `[ ] ` or `[X] ` prefix are not tasks.
    /// Over-long text is cut to the length cap.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        let (done, text) = if let Some(text) = line.strip_prefix(DONE_PREFIX) {
            (true, text)
        } else if let Some(text) = line.strip_prefix(PENDING_PREFIX) {
            (false, text)
        } else {
            return None;
        };

        Some(Self {
            text: format::clip(text, MAX_TASK_LEN).to_string(),
            done,
        })
    }
}

/// Check text for a new task or a focus label
pub fn validate_text(text: &str) -> Result<(), TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    if text.chars().count() > MAX_TASK_LEN {
        return Err(TaskError::TooLong);
    }
    Ok(())
}

/// Ordered tasks plus the selected index
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    selected: usize,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap loaded tasks; anything past the maximum is dropped
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.truncate(MAX_TASKS);
        Self { tasks, selected: 0 }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn add(&mut self, text: &str) -> Result<(), TaskError> {
        validate_text(text)?;
        if self.tasks.len() >= MAX_TASKS {
            return Err(TaskError::ListFull);
        }
        self.tasks.push(Task::new(text));
        Ok(())
    }

    pub fn mark_done(&mut self, index: usize) -> Result<(), TaskError> {
        self.set_done(index, true)
    }

    pub fn unmark(&mut self, index: usize) -> Result<(), TaskError> {
        self.set_done(index, false)
    }

    /// Remove a task; later tasks shift down and the selection is clamped
    pub fn remove(&mut self, index: usize) -> Result<Task, TaskError> {
        if index >= self.tasks.len() {
            return Err(TaskError::InvalidNumber);
        }
        let task = self.tasks.remove(index);
        self.clamp_selection();
        Ok(task)
    }

    /// Mark the selected task done and move the cursor to the next one
    pub fn complete_selected(&mut self) -> Result<(), TaskError> {
        self.mark_done(self.selected)?;
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
        Ok(())
    }

    pub fn select_up(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        true
    }

    pub fn select_down(&mut self) -> bool {
        if self.selected + 1 >= self.tasks.len() {
            return false;
        }
        self.selected += 1;
        true
    }

    /// Convert a 1-based task number typed by the user into an index
    pub fn parse_number(&self, arg: &str) -> Result<usize, TaskError> {
        let number: usize = arg.trim().parse().map_err(|_| TaskError::InvalidNumber)?;
        if number == 0 || number > MAX_TASKS || number > self.tasks.len() {
            return Err(TaskError::InvalidNumber);
        }
        Ok(number - 1)
    }

    fn set_done(&mut self, index: usize, done: bool) -> Result<(), TaskError> {
        let task = self.tasks.get_mut(index).ok_or(TaskError::InvalidNumber)?;
        task.done = done;
        Ok(())
    }

    fn clamp_selection(&mut self) {
        let last = self.tasks.len().saturating_sub(1);
        if self.selected > last {
            self.selected = last;
        }
    }
}
