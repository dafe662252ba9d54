//! Transient notification overlay
//!
//! At most one message box is live. A new `show` replaces the current one;
//! the box is dropped on the first render pass at or after its expiry.

use chrono::{DateTime, Duration, Local};
use ratatui::layout::Rect;

pub const NOTIFICATION_HEIGHT: u16 = 3;
pub const NOTIFICATION_MIN_WIDTH: u16 = 10;
/// Border plus one space each side
const PADDING: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationOverlay {
    current: Option<Notification>,
}

impl NotificationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, duration_secs: i64, now: DateTime<Local>) {
        self.current = Some(Notification {
            message: message.into(),
            expires_at: now + Duration::seconds(duration_secs),
        });
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Tear down an expired box. Returns true if one was removed.
    pub fn prune(&mut self, now: DateTime<Local>) -> bool {
        match &self.current {
            Some(n) if now >= n.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

/// Centered box just above the bottom row, sized to the message
pub fn notification_area(area: Rect, message: &str) -> Rect {
    let len = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    let width = len
        .saturating_add(PADDING)
        .max(NOTIFICATION_MIN_WIDTH)
        .min(area.width.saturating_sub(PADDING));
    let height = NOTIFICATION_HEIGHT.min(area.height);
    let y = area.height.saturating_sub(NOTIFICATION_HEIGHT + 1);
    let x = area.width.saturating_sub(width) / 2;

    Rect::new(area.x + x, area.y + y, width, height).intersection(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_previous() {
        let now = Local::now();
        let mut overlay = NotificationOverlay::new();
        overlay.show("first", 3, now);
        overlay.show("second", 2, now);

        let current = overlay.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.expires_at, now + Duration::seconds(2));
    }

    #[test]
    fn test_prune_at_expiry() {
        let now = Local::now();
        let mut overlay = NotificationOverlay::new();
        overlay.show("Task added", 2, now);

        assert!(!overlay.prune(now + Duration::seconds(1)));
        assert!(overlay.current().is_some());
        assert!(overlay.prune(now + Duration::seconds(2)));
        assert!(overlay.current().is_none());
        assert!(!overlay.prune(now + Duration::seconds(3)));
    }

    #[test]
    fn test_area_sizing() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(notification_area(area, "Task added"), Rect::new(33, 20, 14, 3));
        assert_eq!(notification_area(area, "ok").width, NOTIFICATION_MIN_WIDTH);
        assert_eq!(notification_area(area, &"m".repeat(200)).width, 76);
    }

    #[test]
    fn test_area_on_tiny_terminal() {
        let area = Rect::new(0, 0, 5, 2);
        let rect = notification_area(area, "Session stopped");
        assert!(rect.right() <= 5 && rect.bottom() <= 2);
    }
}
