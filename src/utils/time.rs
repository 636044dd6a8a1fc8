use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Wall-clock milliseconds, used to make room names and object keys unique.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Human readable age of `then` relative to `now` ("5 minutes ago").
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);

    let (amount, unit) = if seconds < 60 {
        return "Just now".to_string();
    } else if seconds < 3_600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3_600, "hour")
    } else if seconds < 604_800 {
        (seconds / 86_400, "day")
    } else {
        (seconds / 604_800, "week")
    };

    let plural = if amount == 1 { "" } else { "s" };
    format!("{} {}{} ago", amount, unit, plural)
}
