//! Centralized text formatting for task status and reset countdowns.
//!
//! Every string the todo list and timer bars show goes through this module
//! so the two displays agree on layout.

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Format a countdown until the next reset as `D.HH:MM:SS`.
///
/// With `hide_seconds` the trailing seconds field is dropped (`D.HH:MM`).
/// Days are never zero-padded so multi-week spans stay readable.
///
/// # Examples
/// ```
/// use dutykeeper_types::formatting::format_timespan;
/// assert_eq!(format_timespan(0, false), "0.00:00:00");
/// assert_eq!(format_timespan(3_725, false), "0.01:02:05");
/// assert_eq!(format_timespan(3_725, true), "0.01:02");
/// assert_eq!(format_timespan(2 * 86_400 + 5 * 3_600, true), "2.05:00");
/// ```
pub fn format_timespan(total_secs: u64, hide_seconds: bool) -> String {
    let days = total_secs / SECS_PER_DAY;
    let hours = (total_secs % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_secs % SECS_PER_MINUTE;

    if hide_seconds {
        format!("{}.{:02}:{:02}", days, hours, minutes)
    } else {
        format!("{}.{:02}:{:02}:{:02}", days, hours, minutes, seconds)
    }
}

/// Format a "N things remaining" status line.
///
/// # Examples
/// ```
/// use dutykeeper_types::formatting::format_remaining;
/// assert_eq!(format_remaining(3, "Hunts Remaining"), "3 Hunts Remaining");
/// assert_eq!(format_remaining(0, "Allowances Remaining"), "0 Allowances Remaining");
/// ```
pub fn format_remaining(count: i64, label: &str) -> String {
    format!("{} {}", count, label)
}

/// Format a progress fraction (0.0 - 1.0) as a whole percentage.
///
/// Values outside the range are clamped.
///
/// # Examples
/// ```
/// use dutykeeper_types::formatting::format_progress;
/// assert_eq!(format_progress(0.5), "50%");
/// assert_eq!(format_progress(1.7), "100%");
/// assert_eq!(format_progress(-0.2), "0%");
/// ```
pub fn format_progress(fraction: f32) -> String {
    format!("{:.0}%", fraction.clamp(0.0, 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timespan_of_a_full_week() {
        assert_eq!(format_timespan(7 * SECS_PER_DAY, false), "7.00:00:00");
    }

    #[test]
    fn timespan_drops_partial_seconds_only_when_hidden() {
        assert_eq!(format_timespan(59, false), "0.00:00:59");
        assert_eq!(format_timespan(59, true), "0.00:00");
    }
}
