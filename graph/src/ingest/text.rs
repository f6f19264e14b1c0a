//! Display-string derivation: truncation and date formatting.
//!
//! All truncation is grapheme-aware so multi-byte names and messages never
//! split mid-character.

use chrono::{DateTime, Utc};
use unicode_segmentation::UnicodeSegmentation;

pub const MESSAGE_MAX_LEN: usize = 50;
pub const AUTHOR_NAME_MAX_LEN: usize = 15;
pub const DESCRIPTION_MAX_LEN: usize = 80;

fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

fn take_graphemes(s: &str, n: usize) -> String {
    s.graphemes(true).take(n).collect()
}

/// Truncate a subject line to `max_len`, replacing the tail with an
/// ellipsis.
pub fn truncate_subject(message: &str, max_len: usize) -> String {
    if grapheme_count(message) <= max_len {
        return message.to_string();
    }
    format!("{}...", take_graphemes(message, max_len.saturating_sub(3)))
}

/// Shorten an author name to "F. Last" when it exceeds
/// [`AUTHOR_NAME_MAX_LEN`].
pub fn short_author_name(name: &str) -> String {
    if grapheme_count(name) <= AUTHOR_NAME_MAX_LEN {
        return name.to_string();
    }
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() > 1 {
        let initial = take_graphemes(parts[0], 1);
        return format!("{}. {}", initial, parts[parts.len() - 1]);
    }
    format!("{}...", take_graphemes(name, 12))
}

/// First line of the body, ellipsized.
///
/// Ellipsis appears when the line is cut or when the body has further
/// lines; a trailing colon is replaced by the ellipsis outright.
pub fn truncate_description(description: &str, max_len: usize) -> String {
    if description.is_empty() {
        return String::new();
    }

    let mut first_line = description.lines().next().unwrap_or("").trim().to_string();
    let has_more_lines = description.contains('\n');
    let needs_ellipsis = has_more_lines || grapheme_count(&first_line) > max_len;

    if grapheme_count(&first_line) > max_len {
        first_line = take_graphemes(&first_line, max_len.saturating_sub(3));
    }

    if needs_ellipsis {
        if let Some(stripped) = first_line.strip_suffix(':') {
            first_line = format!("{stripped}...");
        } else {
            first_line.push_str("...");
        }
    }
    first_line
}

/// Human-readable distance between `date` and `now`.
pub fn relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(date);
    let days = diff.num_days();
    if days > 7 {
        return format!("{} weeks ago", days / 7);
    }
    if days > 1 {
        return format!("{days} days ago");
    }
    if days == 1 {
        return "1 day ago".to_string();
    }
    let hours = diff.num_hours();
    if hours > 1 {
        return format!("{hours} hours ago");
    }
    if hours == 1 {
        return "1 hour ago".to_string();
    }
    let minutes = diff.num_minutes();
    if minutes > 1 {
        return format!("{minutes} minutes ago");
    }
    "just now".to_string()
}

/// Full display date, `DD.MM.YYYY @ HH:MM`.
pub fn full_date(date: DateTime<Utc>) -> String {
    date.format("%d.%m.%Y @ %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn subject_within_limit_is_untouched() {
        assert_eq!(truncate_subject("short subject", MESSAGE_MAX_LEN), "short subject");
    }

    #[test]
    fn long_subject_is_ellipsized_at_the_limit() {
        let long = "a".repeat(60);
        let truncated = truncate_subject(&long, MESSAGE_MAX_LEN);
        assert_eq!(truncated.chars().count(), MESSAGE_MAX_LEN);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn author_name_reduces_to_initial_and_surname() {
        assert_eq!(short_author_name("Jan Novak"), "Jan Novak");
        assert_eq!(
            short_author_name("Maximilian Featherstonehaugh"),
            "M. Featherstonehaugh"
        );
        let mononym = "Supercalifragilistic";
        assert_eq!(short_author_name(mononym), "Supercalifra...");
    }

    #[test]
    fn description_keeps_short_single_line() {
        assert_eq!(truncate_description("one line", DESCRIPTION_MAX_LEN), "one line");
    }

    #[test]
    fn description_with_more_lines_always_gets_ellipsis() {
        assert_eq!(
            truncate_description("first line\nsecond line", DESCRIPTION_MAX_LEN),
            "first line..."
        );
    }

    #[test]
    fn description_trailing_colon_is_replaced() {
        assert_eq!(
            truncate_description("changes include:\n- a", DESCRIPTION_MAX_LEN),
            "changes include..."
        );
    }

    #[test]
    fn long_description_line_is_cut() {
        let long = "x".repeat(100);
        let truncated = truncate_description(&long, DESCRIPTION_MAX_LEN);
        assert_eq!(truncated.chars().count(), DESCRIPTION_MAX_LEN);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn relative_dates_cover_each_bucket() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let at = |d, h, m| now - chrono::Duration::days(d) - chrono::Duration::hours(h) - chrono::Duration::minutes(m);

        assert_eq!(relative_date(at(21, 0, 0), now), "3 weeks ago");
        assert_eq!(relative_date(at(3, 0, 0), now), "3 days ago");
        assert_eq!(relative_date(at(1, 0, 0), now), "1 day ago");
        assert_eq!(relative_date(at(0, 5, 0), now), "5 hours ago");
        assert_eq!(relative_date(at(0, 0, 10), now), "10 minutes ago");
        assert_eq!(relative_date(at(0, 0, 0), now), "just now");
    }

    #[test]
    fn full_date_format() {
        let date = Utc.with_ymd_and_hms(2024, 6, 15, 9, 5, 0).unwrap();
        assert_eq!(full_date(date), "15.06.2024 @ 09:05");
    }
}
