//! Screen geometry
//!
//! Every region is derived from the terminal size alone (plus whether the
//! help panel is showing) using fixed offsets. Below the minimum size the
//! rectangles shrink or collapse to zero instead of failing.
//!
//! ```text
//!            +---- timer ----+
//!            +---------------+
//!  +---- tasks ----------+ +-- help --+
//!  |                     | |          |
//!  +---------------------+ +----------+
//!  +---- input -----------------------+
//! ```

use focusforge_core::StartupError;
use ratatui::layout::Rect;

pub const MIN_COLS: u16 = 80;
pub const MIN_ROWS: u16 = 10;

pub const MARGIN: u16 = 2;
pub const TIMER_WIDTH: u16 = 44;
pub const TIMER_HEIGHT: u16 = 5;
pub const INPUT_HEIGHT: u16 = 3;
pub const HELP_WIDTH: u16 = 35;
/// Rows of the task region taken by its border
pub const TASK_CHROME: u16 = 2;

/// Rectangles for the fixed regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiGeometry {
    pub area: Rect,
    pub timer: Rect,
    pub tasks: Rect,
    pub help: Option<Rect>,
    pub input: Rect,
    /// Full-screen overlay used by the session log view
    pub sessions: Rect,
}

impl UiGeometry {
    pub fn compute(area: Rect, show_help: bool) -> Self {
        let cols = area.width;
        let rows = area.height;

        let timer_width = TIMER_WIDTH.min(cols);
        let timer = Rect::new(
            area.x + (cols - timer_width) / 2,
            area.y,
            timer_width,
            TIMER_HEIGHT,
        );

        let band_y = area.y + TIMER_HEIGHT;
        let band_height = rows.saturating_sub(TIMER_HEIGHT + INPUT_HEIGHT);
        let inner_width = cols.saturating_sub(2 * MARGIN);

        let help = show_help.then(|| {
            Rect::new(
                area.x + cols.saturating_sub(HELP_WIDTH + MARGIN),
                band_y,
                HELP_WIDTH.min(inner_width),
                band_height,
            )
        });

        let tasks_width = if help.is_some() {
            inner_width.saturating_sub(HELP_WIDTH + 1)
        } else {
            inner_width
        };
        let tasks = Rect::new(area.x + MARGIN, band_y, tasks_width, band_height);

        let input = Rect::new(
            area.x + MARGIN,
            area.y + rows.saturating_sub(INPUT_HEIGHT),
            inner_width,
            INPUT_HEIGHT,
        );

        let sessions = Rect::new(
            area.x + MARGIN,
            area.y + MARGIN,
            inner_width,
            rows.saturating_sub(2 * MARGIN),
        );

        Self {
            area,
            timer: timer.intersection(area),
            tasks: tasks.intersection(area),
            help: help.map(|r| r.intersection(area)),
            input: input.intersection(area),
            sessions: sessions.intersection(area),
        }
    }

    /// How many task rows fit; extra tasks are not shown
    pub fn task_capacity(&self) -> usize {
        self.tasks.height.saturating_sub(TASK_CHROME) as usize
    }
}

/// Startup check against the minimum terminal size
pub fn check_min_size(cols: u16, rows: u16) -> Result<(), StartupError> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(StartupError::TerminalTooSmall {
            cols,
            rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(outer: Rect, inner: Rect) -> bool {
        inner.area() == 0
            || (inner.x >= outer.x
                && inner.y >= outer.y
                && inner.right() <= outer.right()
                && inner.bottom() <= outer.bottom())
    }

    #[test]
    fn test_standard_layout() {
        let g = UiGeometry::compute(Rect::new(0, 0, 100, 30), true);
        assert_eq!(g.timer, Rect::new(28, 0, 44, 5));
        assert_eq!(g.input, Rect::new(2, 27, 96, 3));
        assert_eq!(g.help, Some(Rect::new(63, 5, 35, 22)));
        assert_eq!(g.tasks, Rect::new(2, 5, 60, 22));
        assert_eq!(g.task_capacity(), 20);
    }

    #[test]
    fn test_hidden_help_widens_tasks() {
        let g = UiGeometry::compute(Rect::new(0, 0, 100, 30), false);
        assert!(g.help.is_none());
        assert_eq!(g.tasks.width, 96);
    }

    #[test]
    fn test_resize_recomputes_from_size_only() {
        let small = UiGeometry::compute(Rect::new(0, 0, 80, 24), true);
        let large = UiGeometry::compute(Rect::new(0, 0, 160, 50), true);
        assert_ne!(small, large);
        assert_eq!(UiGeometry::compute(Rect::new(0, 0, 80, 24), true), small);
        assert_eq!(large.input.y, 47);
    }

    #[test]
    fn test_tiny_terminal_clips_without_panicking() {
        for (cols, rows) in [(0, 0), (1, 1), (10, 3), (40, 6), (79, 9), (MIN_COLS, MIN_ROWS)] {
            let area = Rect::new(0, 0, cols, rows);
            for show_help in [true, false] {
                let g = UiGeometry::compute(area, show_help);
                assert!(inside(area, g.timer));
                assert!(inside(area, g.tasks));
                assert!(inside(area, g.input));
                assert!(inside(area, g.sessions));
                if let Some(help) = g.help {
                    assert!(inside(area, help));
                }
            }
        }
    }

    #[test]
    fn test_min_size() {
        assert!(check_min_size(80, 10).is_ok());
        assert!(check_min_size(200, 60).is_ok());
        assert!(matches!(
            check_min_size(79, 24),
            Err(StartupError::TerminalTooSmall { .. })
        ));
        assert!(check_min_size(120, 9).is_err());
    }
}
