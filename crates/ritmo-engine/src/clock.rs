// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-time arithmetic for the scheduler and the orchestrator.
//!
//! Every user lives in their own IANA timezone, so "today" and "08:00"
//! are always computed per user from a shared UTC epoch.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

pub const MINUTES_PER_DAY: i32 = 1440;

/// Wall-clock parts of one instant in one timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalParts {
    pub hour: u32,
    pub minute: u32,
    /// Local calendar day, YYYY-MM-DD.
    pub ymd: String,
    pub epoch: i64,
}

/// Parse an IANA timezone name, falling back to `fallback` and then UTC.
pub fn parse_tz(name: &str, fallback: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(tz = name, fallback, "unparsable timezone, using fallback");
        fallback.parse::<Tz>().unwrap_or(chrono_tz::UTC)
    })
}

/// Local wall-clock parts for `epoch` in the given timezone.
pub fn local_parts(epoch: i64, tz: Tz) -> LocalParts {
    let utc = DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or_default();
    let local = utc.with_timezone(&tz);
    LocalParts {
        hour: local.hour(),
        minute: local.minute(),
        ymd: format!(
            "{:04}-{:02}-{:02}",
            local.year(),
            local.month(),
            local.day()
        ),
        epoch,
    }
}

/// Local calendar day (YYYY-MM-DD) for `epoch` in the given timezone.
pub fn local_date(epoch: i64, tz: Tz) -> String {
    local_parts(epoch, tz).ymd
}

/// Whether (hour, minute) falls inside the symmetric window of
/// `window_minutes` around the target time, wrapping across midnight.
pub fn within_window(
    hour: u32,
    minute: u32,
    target_hour: u8,
    target_minute: u8,
    window_minutes: u32,
) -> bool {
    let cur = (hour * 60 + minute) as i32;
    let tgt = i32::from(target_hour) * 60 + i32::from(target_minute);
    let diff = (cur - tgt).abs();
    diff.min(MINUTES_PER_DAY - diff) <= window_minutes as i32
}
