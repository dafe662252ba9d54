//! Formatting utilities

/// Format a countdown as MM:SS. Minutes wrap at 100; negative input shows 00:00.
pub fn timer(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    format!("{:02}:{:02}", (total / 60) % 100, total % 60)
}

/// Pluralize a count the way the status line does: "1 day(s)"
pub fn count(n: u32, unit: &str) -> String {
    format!("{} {}(s)", n, unit)
}

/// Truncate a string to max_len characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Cut a string to at most max_chars characters without an ellipsis
pub fn clip(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        assert_eq!(timer(1500), "25:00");
        assert_eq!(timer(299), "04:59");
        assert_eq!(timer(0), "00:00");
        assert_eq!(timer(-3), "00:00");
        assert_eq!(timer(100 * 60 + 7), "00:07");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer label", 8), "a lon...");
        assert_eq!(truncate("abcdef", 2), "..");
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("abc", 10), "abc");
    }
}
