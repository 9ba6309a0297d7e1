//! Shared helper functions for CLI commands

use console::style;

use crate::core::{ApiError, Notification};

/// Width of the name column in item tables
pub const NAME_COLUMN_WIDTH: usize = 40;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Build the error reported to the user. `message` is already
/// human-readable; the retry hint is attached only when retrying could help.
pub fn failure(message: impl Into<String>, retryable: bool) -> miette::Report {
    let message = message.into();
    if retryable {
        miette::miette!(
            help = "the server may be temporarily unavailable; run the command again to retry",
            "{}",
            message
        )
    } else {
        miette::miette!("{}", message)
    }
}

/// [`failure`] for a classified API error
pub fn api_failure(message: impl Into<String>, err: &ApiError) -> miette::Report {
    failure(message, err.is_retryable())
}

/// Print a success notification, or turn an error notification into a
/// command failure
pub fn report_notification(notification: Notification) -> miette::Result<()> {
    if notification.is_success() {
        println!("{} {}", style("✓").green(), notification.message);
        Ok(())
    } else {
        Err(miette::miette!("{}", notification.message))
    }
}
