//! Human-readable labels for elapsed time.
//!
//! Labels use the coarsest unit that keeps the value below the next unit's
//! threshold: seconds below one minute, minutes below one hour, hours below
//! one day, and days beyond that. Each unit is rounded to the nearest whole
//! value from the raw milliseconds, so `89_999 ms` is "1 minute" and
//! `90_000 ms` is "2 minutes".

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;
const HOURS_PER_DAY: u64 = 24;

/// Format an elapsed duration in milliseconds as a short label.
///
/// Total over every `u64`; `0` yields `"0 seconds"`.
pub fn label(elapsed_ms: u64) -> String {
    let seconds = round_div(elapsed_ms, MILLIS_PER_SECOND);
    if seconds < SECONDS_PER_MINUTE {
        return plural(seconds, "second");
    }

    let minutes = round_div(elapsed_ms, MILLIS_PER_MINUTE);
    if minutes < MINUTES_PER_HOUR {
        return plural(minutes, "minute");
    }

    let hours = round_div(elapsed_ms, MILLIS_PER_HOUR);
    if hours < HOURS_PER_DAY {
        return plural(hours, "hour");
    }

    plural(round_div(elapsed_ms, MILLIS_PER_DAY), "day")
}

/// Label for a `chrono::Duration`; negative durations (clock skew) read as zero.
pub fn label_chrono(elapsed: chrono::Duration) -> String {
    label(u64::try_from(elapsed.num_milliseconds()).unwrap_or(0))
}

fn round_div(value: u64, unit: u64) -> u64 {
    value / unit + u64::from(value % unit >= unit.div_ceil(2))
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
