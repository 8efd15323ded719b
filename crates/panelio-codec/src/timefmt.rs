// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deletion-deadline timestamps.
//!
//! Deadlines are stored as formatted local timestamps in `deletion_time`
//! info rows. The format is part of the persisted state already attached to
//! live documents and must not change.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Stored timestamp format. Byte-stable.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M:%S";

/// Format the deadline `delay` from now.
pub fn deadline_after(delay: Duration) -> String {
    let delta = TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero());
    (Local::now() + delta).format(TIMESTAMP_FORMAT).to_string()
}

/// Seconds from now until a stored deadline; negative when overdue,
/// `None` when the stored value does not parse.
pub fn seconds_until(deadline: &str) -> Option<i64> {
    let then = NaiveDateTime::parse_from_str(deadline, TIMESTAMP_FORMAT).ok()?;
    let now = Local::now().naive_local();
    Some((then - now).num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_round_trips_within_a_second() {
        let deadline = deadline_after(Duration::from_secs(3600));
        let remaining = seconds_until(&deadline).expect("should parse");
        assert!((3598..=3600).contains(&remaining), "remaining {remaining}");
    }

    #[test]
    fn past_deadline_is_negative() {
        let deadline = deadline_after(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1100));
        let remaining = seconds_until(&deadline).expect("should parse");
        assert!(remaining < 0 || remaining == 0, "remaining {remaining}");
    }

    #[test]
    fn malformed_deadline_is_none() {
        assert_eq!(seconds_until("not a timestamp"), None);
        assert_eq!(seconds_until(""), None);
    }
}
