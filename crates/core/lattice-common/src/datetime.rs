//! Date/time formatting helpers and an injectable clock.
//!
//! Formatting is locale-free and deliberately small: a sortable date style,
//! a file-name-safe style, and a display style that hides the time part
//! when it carries no information. The [`Clock`] mirrors the rest of the
//! ecosystem: production code reads the real time, tests may pin it.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// How the time-of-day part of a formatted date is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormatOption {
    /// Date only.
    ExcludeTime,
    /// Date plus `HH:MM`, but only when the time-of-day is non-zero.
    #[default]
    IncludeTimeIfNonZero,
    /// Date plus `HH:MM`.
    ExcludeSeconds,
    /// Date plus `HH:MM:SS`.
    IncludeTime,
    /// Date plus `HH:MM:SS.mmm`.
    IncludeMilliseconds,
}

/// How a duration is rendered by [`format_duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFormatOption {
    /// Two most significant units, stopping above seconds.
    ExcludeSeconds,
    /// Two most significant units including seconds.
    ExcludeMilliseconds,
    /// Two most significant units down to milliseconds.
    IncludeMilliseconds,
    /// `H:MM:SS` clock style.
    ClockStyle,
}

/// Formats a naive datetime according to `option`.
#[must_use]
pub fn format_datetime(dt: NaiveDateTime, option: TimeFormatOption) -> String {
    let date_only = dt.format("%Y-%m-%d").to_string();
    let has_time_part = dt.hour() + dt.minute() + dt.second() > 0;

    match option {
        TimeFormatOption::ExcludeTime => date_only,
        TimeFormatOption::IncludeTimeIfNonZero if !has_time_part => date_only,
        TimeFormatOption::IncludeTimeIfNonZero | TimeFormatOption::ExcludeSeconds => {
            format!("{date_only} {}", dt.format("%H:%M"))
        }
        TimeFormatOption::IncludeTime => format!("{date_only} {}", dt.format("%H:%M:%S")),
        TimeFormatOption::IncludeMilliseconds => {
            format!("{date_only} {}", dt.format("%H:%M:%S%.3f"))
        }
    }
}

/// Formats an optional datetime; `None` renders as an empty string.
#[must_use]
pub fn format_datetime_opt(dt: Option<NaiveDateTime>, option: TimeFormatOption) -> String {
    dt.map_or_else(String::new, |dt| format_datetime(dt, option))
}

/// `YYYY-MM-DD HH:MM:SS`, sorting lexicographically by time.
#[must_use]
pub fn format_sortable(dt: NaiveDateTime, include_time: bool) -> String {
    if include_time {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Like [`format_sortable`] but safe for file names (`_` and `-`).
#[must_use]
pub fn format_file_sortable(dt: NaiveDateTime, include_time: bool) -> String {
    if include_time {
        dt.format("%Y-%m-%d_%H-%M-%S").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Drops the sub-second part of a datetime.
#[must_use]
pub fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Drops the sub-millisecond part of a datetime.
#[must_use]
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.timestamp_subsec_millis();
    dt.with_nanosecond(millis * 1_000_000).unwrap_or(dt)
}

/// Renders a duration as its two most significant units
/// (`2d:4h`, `4h:31m`, `31m:12s`, `12s:250ms`).
///
/// Zero durations render as an empty string except in clock style.
#[must_use]
pub fn format_duration(duration: Duration, option: DurationFormatOption) -> String {
    if option == DurationFormatOption::ClockStyle {
        let total_secs = duration.num_seconds();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        return format!("{hours}:{minutes:02}:{seconds:02}");
    }

    let days = duration.num_days();
    let hours = (duration.num_hours() % 24).abs();
    let minutes = (duration.num_minutes() % 60).abs();
    let seconds = (duration.num_seconds() % 60).abs();
    let millis = (duration.num_milliseconds() % 1000).abs();

    if days > 0 {
        if hours > 0 {
            format!("{days}d:{hours}h")
        } else {
            format!("{days}d")
        }
    } else if duration.num_hours() > 0 {
        if minutes > 0 {
            format!("{}h:{minutes}m", duration.num_hours())
        } else {
            format!("{}h", duration.num_hours())
        }
    } else if duration.num_minutes() > 0 {
        if seconds > 0 && option != DurationFormatOption::ExcludeSeconds {
            format!("{}m:{seconds}s", duration.num_minutes())
        } else {
            format!("{}m", duration.num_minutes())
        }
    } else if duration.num_seconds() > 0 {
        if millis > 0 && option == DurationFormatOption::IncludeMilliseconds {
            format!("{}s:{millis}ms", duration.num_seconds())
        } else {
            format!("{}s", duration.num_seconds())
        }
    } else if option == DurationFormatOption::IncludeMilliseconds {
        format!("{}ms", duration.num_milliseconds())
    } else {
        String::new()
    }
}

/// Precision applied by [`Clock::now_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NowPrecision {
    /// Whole seconds.
    Seconds,
    /// Whole milliseconds.
    Millis,
    /// Full precision.
    Nanos,
}

type NowSource = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

static NOW_SOURCE: Lazy<RwLock<Option<NowSource>>> = Lazy::new(|| RwLock::new(None));

/// Process-wide time source with an injectable factory for tests.
pub struct Clock;

impl Clock {
    /// Current time, truncated to milliseconds.
    #[must_use]
    pub fn now() -> DateTime<Utc> {
        Self::now_with(NowPrecision::Millis)
    }

    /// Current time at the requested precision.
    #[must_use]
    pub fn now_with(precision: NowPrecision) -> DateTime<Utc> {
        let raw = NOW_SOURCE.read().as_ref().map_or_else(Utc::now, |f| f());
        match precision {
            NowPrecision::Seconds => truncate_to_seconds(raw),
            NowPrecision::Millis => truncate_to_millis(raw),
            NowPrecision::Nanos => raw,
        }
    }

    /// Replaces the time source. Used by tests to pin the clock.
    pub fn set_source<F>(source: F)
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        *NOW_SOURCE.write() = Some(Box::new(source));
    }

    /// Restores the real time source.
    pub fn reset() {
        *NOW_SOURCE.write() = None;
    }
}

/// Elapsed time from `start` to now, optionally at whole-second precision.
#[must_use]
pub fn time_until_now(start: DateTime<Utc>, truncate_millis: bool) -> Duration {
    if truncate_millis {
        Clock::now_with(NowPrecision::Seconds) - truncate_to_seconds(start)
    } else {
        Clock::now() - start
    }
}

/// Remaining time from now to `target`, optionally at whole-second precision.
#[must_use]
pub fn time_from_now(target: DateTime<Utc>, truncate_millis: bool) -> Duration {
    if truncate_millis {
        truncate_to_seconds(target) - Clock::now_with(NowPrecision::Seconds)
    } else {
        target - Clock::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn sample(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_format_datetime_options() {
        let dt = sample(14, 30, 15);
        assert_eq!(format_datetime(dt, TimeFormatOption::ExcludeTime), "2024-03-07");
        assert_eq!(
            format_datetime(dt, TimeFormatOption::ExcludeSeconds),
            "2024-03-07 14:30"
        );
        assert_eq!(
            format_datetime(dt, TimeFormatOption::IncludeTime),
            "2024-03-07 14:30:15"
        );
        assert_eq!(
            format_datetime(dt, TimeFormatOption::IncludeMilliseconds),
            "2024-03-07 14:30:15.000"
        );
    }

    #[test]
    fn test_midnight_collapses_to_date_only() {
        let midnight = sample(0, 0, 0);
        assert_eq!(
            format_datetime(midnight, TimeFormatOption::IncludeTimeIfNonZero),
            "2024-03-07"
        );
        assert_eq!(
            format_datetime(sample(0, 0, 1), TimeFormatOption::IncludeTimeIfNonZero),
            "2024-03-07 00:00"
        );
    }

    #[test]
    fn test_format_datetime_opt() {
        assert_eq!(format_datetime_opt(None, TimeFormatOption::IncludeTime), "");
        assert_eq!(
            format_datetime_opt(Some(sample(1, 2, 3)), TimeFormatOption::IncludeTime),
            "2024-03-07 01:02:03"
        );
    }

    #[test]
    fn test_sortable_formats() {
        let dt = sample(9, 5, 1);
        assert_eq!(format_sortable(dt, true), "2024-03-07 09:05:01");
        assert_eq!(format_sortable(dt, false), "2024-03-07");
        assert_eq!(format_file_sortable(dt, true), "2024-03-07_09-05-01");
    }

    #[test]
    fn test_format_duration_two_units() {
        let opt = DurationFormatOption::IncludeMilliseconds;
        assert_eq!(format_duration(Duration::days(2) + Duration::hours(4), opt), "2d:4h");
        assert_eq!(format_duration(Duration::hours(4) + Duration::minutes(31), opt), "4h:31m");
        assert_eq!(format_duration(Duration::minutes(31) + Duration::seconds(12), opt), "31m:12s");
        assert_eq!(
            format_duration(Duration::seconds(12) + Duration::milliseconds(250), opt),
            "12s:250ms"
        );
        assert_eq!(format_duration(Duration::milliseconds(42), opt), "42ms");
    }

    #[test]
    fn test_format_duration_unit_cutoffs() {
        assert_eq!(
            format_duration(
                Duration::minutes(3) + Duration::seconds(20),
                DurationFormatOption::ExcludeSeconds
            ),
            "3m"
        );
        assert_eq!(
            format_duration(Duration::milliseconds(900), DurationFormatOption::ExcludeMilliseconds),
            ""
        );
        assert_eq!(
            format_duration(
                Duration::hours(1) + Duration::minutes(8) + Duration::seconds(1),
                DurationFormatOption::ClockStyle
            ),
            "1:08:01"
        );
    }

    #[test]
    fn test_truncate_precision() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap()
            + Duration::milliseconds(123)
            + Duration::nanoseconds(456);
        assert_eq!(truncate_to_seconds(dt).timestamp_subsec_nanos(), 0);
        assert_eq!(truncate_to_millis(dt).timestamp_subsec_millis(), 123);
        assert_eq!(truncate_to_millis(dt).timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_pinned_clock() {
        let pinned = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        Clock::set_source(move || pinned);

        assert_eq!(Clock::now(), pinned);
        let later = pinned + Duration::seconds(90);
        assert_eq!(time_from_now(later, true), Duration::seconds(90));
        assert_eq!(time_until_now(pinned - Duration::minutes(2), true), Duration::minutes(2));

        Clock::reset();
    }
}
