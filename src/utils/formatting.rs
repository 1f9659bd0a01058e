//! Formatting utilities used for CLI and terminal outputs.

use chrono::Duration;

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 {
        // a negative amount is never shown as positive
        "-"
    } else {
        ""
    };

    if short {
        // e.g. +02:25 or -01:10
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // e.g. +02h 25m or -01h 10m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// `07h 50m` style rendering of a duration, truncated to whole minutes.
pub fn hm(d: Duration) -> String {
    mins2readable(d.num_minutes(), false, false)
}
