//! CLI output formatting.
//!
//! Every display has a pure `format_*` function (returns a `String` or
//! `Vec<String>`, no I/O) and a thin `print_*` wrapper that writes to the
//! terminal. Format functions carry the tests; print functions stay trivial.
//!
//! ## Schedule display
//!
//! ```text
//! Schedule for /r/anime (3 posts)
//!     001 episode_01  2018-01-06 17:00 UTC  submitted
//!     002 episode_02  2018-01-13 17:00 UTC  scheduled
//!     003 episode_03  2018-01-20 17:00 UTC  scheduled
//! ```
//!
//! The countdown is the one stateful display: it rewrites a single line in
//! place with a carriage return until the scheduled time arrives.

use crate::error::Error;
use crate::post::Post;
use crate::schedule::Schedule;
use std::io::Write;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format the schedule overview: header plus one line per post.
pub fn format_schedule(schedule: &Schedule) -> Vec<String> {
    let mut lines = Vec::with_capacity(schedule.posts.len() + 1);
    lines.push(format!(
        "Schedule for /r/{} ({} posts)",
        schedule.subreddit,
        schedule.posts.len()
    ));

    for (i, post) in schedule.posts.iter().enumerate() {
        let status = if post.is_submitted() {
            "submitted"
        } else {
            "scheduled"
        };
        lines.push(format!(
            "    {} {}  {} UTC  {}",
            format_index(i + 1),
            post.name,
            post.submit_at.format("%Y-%m-%d %H:%M"),
            status
        ));
    }

    lines
}

pub fn print_schedule(schedule: &Schedule) {
    for line in format_schedule(schedule) {
        println!("{}", line);
    }
}

/// Format the time remaining as `HH:MM:SS` (hours keep counting past 24).
pub fn format_countdown(remaining: chrono::Duration) -> String {
    let total_seconds = remaining.num_seconds().max(0);
    format!(
        "Next post in {:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60
    )
}

/// Rewrite the countdown line in place.
pub fn print_countdown(remaining: chrono::Duration) {
    print!("\r{}", format_countdown(remaining));
    let _ = std::io::stdout().flush();
}

/// Terminate the in-place countdown line before regular output resumes.
pub fn clear_countdown() {
    println!();
}

pub fn print_logged_in(username: &str) {
    println!("Logged in as: {}", username);
}

pub fn print_next_post(post: &Post) {
    println!("Next up: {}", post);
}

pub fn print_submitting(post: &Post) {
    println!("Submitting: {}", post);
}

pub fn print_submitted(name: &str, submission_id: &str) {
    println!("Submitted '{}' as /{}", name, submission_id);
}

pub fn print_sibling_update(name: &str) {
    println!("Updating navigation links of '{}'", name);
}

pub fn print_update_failed(name: &str, error: &Error) {
    eprintln!("Failed to update '{}': {}", name, error);
}

pub fn print_all_done() {
    println!("All posts in the schedule have been submitted.");
}

pub fn print_no_image_warning() {
    eprintln!("Warning: No image found in the post.");
    eprintln!("The post will be submitted without a thumbnail.");
}

/// Format a fatal error: the message, then the remediation hint when the
/// error carries one.
pub fn format_error(error: &Error) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];
    if let Some(hint) = error.hint() {
        lines.push(format!("Hint: {}", hint));
    }
    lines
}

pub fn print_error(error: &Error) {
    for line in format_error(error) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_schedule;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn schedule_overview_lists_posts_with_status() {
        let mut schedule = sample_schedule(2);
        schedule.posts[0].submission_id = Some("cute_id".into());

        let lines = format_schedule(&schedule);
        assert_eq!(lines[0], "Schedule for /r/anime (2 posts)");
        assert_eq!(lines[1], "    001 e01  2018-01-06 17:00 UTC  submitted");
        assert_eq!(lines[2], "    002 e02  2018-01-13 17:00 UTC  scheduled");
    }

    #[test]
    fn countdown_keeps_counting_hours_past_a_day() {
        let remaining = chrono::Duration::seconds(26 * 3600 + 5 * 60 + 9);
        assert_eq!(format_countdown(remaining), "Next post in 26:05:09");
    }

    #[test]
    fn countdown_clamps_negative_remainder_to_zero() {
        let remaining = chrono::Duration::seconds(-30);
        assert_eq!(format_countdown(remaining), "Next post in 00:00:00");
    }

    #[test]
    fn error_display_includes_hint_when_present() {
        let error = Error::InvalidSchedule {
            message: "Incomplete schedule data.".into(),
            hint: Some("Make sure all the fields are filled in.".into()),
        };
        assert_eq!(
            format_error(&error),
            vec![
                "Error: Incomplete schedule data.",
                "Hint: Make sure all the fields are filled in.",
            ]
        );

        let error = Error::Remote("service down".into());
        assert_eq!(format_error(&error), vec!["Error: service down"]);
    }
}
