//! focusforge - Pomodoro timer, task list and streak tracker for the terminal
//!
//! "Work 25 minutes, rest 5, keep the chain going."
//!
//! The binary runs a single-threaded loop around these pieces:
//! - `session`: the Inactive/Focus/Break state machine and its countdown
//! - `streak`: session logging and the day-streak counters
//! - `tasks`: the ordered task list and selection
//! - `input`: keymap, command-line buffer and command grammar
//! - `layout`, `notification`, `ui`: geometry and ratatui rendering
//! - `store`: the flat files under ~/.focusforge

pub mod app;
pub mod clock;
pub mod input;
pub mod layout;
pub mod notification;
pub mod record;
pub mod session;
pub mod signals;
pub mod store;
pub mod streak;
pub mod tasks;
pub mod terminal;
pub mod ticker;
pub mod ui;

pub use app::App;
pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{SessionState, SessionTimer};
pub use store::FocusStore;
pub use tasks::{Task, TaskList};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Focus interval in seconds
pub const FOCUS_DURATION: i64 = 1500;
/// Break interval in seconds
pub const BREAK_DURATION: i64 = 300;
/// Maximum number of tasks held in the list
pub const MAX_TASKS: usize = 100;
/// Maximum task text / focus label length in characters
pub const MAX_TASK_LEN: usize = 255;
/// Maximum command-line buffer length in characters
pub const MAX_INPUT_LEN: usize = 511;
/// Label used when no focus task has been chosen
pub const DEFAULT_FOCUS_LABEL: &str = "???";
