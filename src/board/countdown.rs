use crate::board::*;

use chrono::{Duration, Local, NaiveDateTime};
use std::io::Write;

pub const NO_MORE_TIME: &str = "NO MORE TIME!";

/// The time left until the deadline, or `None` once it has passed.
pub fn time_left(now: NaiveDateTime, deadline: NaiveDateTime) -> Option<Duration> {
    let left = deadline - now;
    if left > Duration::zero() {
        Some(left)
    } else {
        None
    }
}

/// `02 DAYS, 03H:04M:05S`
pub fn format_time_left(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!(
        "{:02} DAYS, {:02}H:{:02}M:{:02}S",
        days, hours, minutes, seconds
    )
}

pub fn countdown_line(now: NaiveDateTime, deadline: NaiveDateTime) -> String {
    match time_left(now, deadline) {
        Some(left) => format_time_left(left.num_seconds()),
        None => NO_MORE_TIME.to_string(),
    }
}

/// Shows the time left once per second until the deadline.
pub fn run_countdown(deadline: NaiveDateTime) -> BoardResult<()> {
    info!("Counting down to {}", deadline);
    let mut out = std::io::stdout();
    loop {
        let now = Local::now().naive_local();
        let line = countdown_line(now, deadline);
        write!(out, "\rTRADING TIME LEFT: {:<30}", line)
            .and_then(|_| out.flush())
            .context(WritingSnafu { path: "stdout" })?;
        if time_left(now, deadline).is_none() {
            writeln!(out).context(WritingSnafu { path: "stdout" })?;
            return Ok(());
        }
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}
