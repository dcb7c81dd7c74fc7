use time::{
    Duration, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

lazy_static! {
    // Has to be read before any other threads are spawned, otherwise `time` refuses to answer.
    pub static ref LOCAL_OFFSET: UtcOffset =
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
}

const DUE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[inline]
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Fractional hours between `now` and `due`. Negative once `due` has passed.
#[inline]
pub fn hours_until(due: OffsetDateTime, now: OffsetDateTime) -> f64 {
    (due - now).as_seconds_f64() / 3600.0
}

/// Formats a remaining duration as `2d 3h 15m`, dropping the days when there are none.
pub fn format_remaining(remaining: Duration) -> String {
    if remaining.is_negative() {
        return String::from("overdue");
    }
    let days = remaining.whole_days();
    let hours = remaining.whole_hours() % 24;
    let minutes = remaining.whole_minutes() % 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// The coarse "is due in ..." phrase used in notifications.
pub fn format_due_in(hours_remaining: f64) -> String {
    if hours_remaining >= 1.0 {
        format!("{} hours", hours_remaining.trunc() as i64)
    } else {
        format!("{} minutes", (hours_remaining * 60.0).trunc() as i64)
    }
}

/// Renders a timestamp in the local offset, e.g. `2024-10-03 23:59`.
pub fn format_local(dt: OffsetDateTime) -> String {
    dt.to_offset(*LOCAL_OFFSET)
        .format(DUE_FORMAT)
        .unwrap_or_else(|_| dt.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn remaining_with_days() {
        let remaining = Duration::days(2) + Duration::hours(3) + Duration::minutes(15);
        assert_eq!(format_remaining(remaining), "2d 3h 15m");
    }

    #[test]
    fn remaining_without_days() {
        let remaining = Duration::hours(5) + Duration::minutes(59) + Duration::seconds(59);
        assert_eq!(format_remaining(remaining), "5h 59m");
    }

    #[test]
    fn remaining_overdue() {
        assert_eq!(format_remaining(Duration::minutes(-1)), "overdue");
    }

    #[test]
    fn due_in_hours_and_minutes() {
        assert_eq!(format_due_in(10.9), "10 hours");
        assert_eq!(format_due_in(1.0), "1 hours");
        assert_eq!(format_due_in(0.75), "45 minutes");
    }

    #[test]
    fn hours_until_is_signed() {
        let now = datetime!(2024-10-01 12:00 UTC);
        assert_eq!(hours_until(datetime!(2024-10-01 22:00 UTC), now), 10.0);
        assert_eq!(hours_until(datetime!(2024-10-01 11:30 UTC), now), -0.5);
    }
}
