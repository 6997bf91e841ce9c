//! Session-facing messages.

use crate::proxy::{Notice, Tone};

const POSSIBLE_ISSUES: &str =
    "The server may be having issues. Contact an admin if you continue to be unable to join.";

/// Gate message for a connection that triggers a launch.
pub fn launching(possible_issues: bool) -> Notice {
    with_issues(
        Notice::new(Tone::Warning, "Starting the server for you, please wait..."),
        possible_issues,
    )
}

/// Gate message while a launch is already in progress.
pub fn starting(possible_issues: bool) -> Notice {
    with_issues(
        Notice::new(Tone::Warning, "The server is starting! Please wait..."),
        possible_issues,
    )
}

/// Gate message while crashed, also broadcast to waiting sessions on crash.
pub fn crashed() -> Notice {
    Notice::new(
        Tone::Error,
        "It looks like the server crashed! Please wait, it will come back online in a moment.",
    )
}

/// Gate message while locked out.
pub fn lockout() -> Notice {
    Notice::new(
        Tone::Error,
        "The server is having issues! Please contact an admin for assistance.",
    )
}

/// Broadcast to waiting sessions when the backend reports healthy.
pub fn ready() -> Notice {
    Notice::new(Tone::Success, "Server is ready! Redirecting you...")
}

/// Broadcast to waiting sessions when startup times out.
pub fn startup_timed_out() -> Notice {
    Notice::new(
        Tone::Error,
        "The server did not come online within the expected timeframe! Please contact an admin to resolve this issue.",
    )
}

/// Broadcast to waiting sessions when a relaunch follows the crash cooldown.
pub fn restarting() -> Notice {
    Notice::new(Tone::Warning, "The server is starting, please wait...")
}

fn with_issues(notice: Notice, possible_issues: bool) -> Notice {
    if possible_issues {
        notice.with_line(Tone::Error, POSSIBLE_ISSUES)
    } else {
        notice
    }
}
