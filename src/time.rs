//! Relative and absolute time text for commit timestamps.
//!
//! The locale layer never does date arithmetic itself: it substitutes text
//! produced here into bundle templates. [`TimeFormatter`] is the seam, keyed by
//! a bundle's `relative_time_locale_tag`, so a host can plug in a full
//! localization library. [`BasicTimeFormatter`] covers the stock bundles.
//!
//! All timestamps are Unix milliseconds, matching the commit history JSON.

use chrono::DateTime;

/// Produces the text substituted into `{{daysAgo}}` and `{{date}}`.
pub trait TimeFormatter {
    /// Human-readable distance from `timestamp_ms` to `now_ms` ("3 days ago").
    fn relative(&self, locale_tag: &str, timestamp_ms: i64, now_ms: i64) -> String;

    /// Calendar date of `timestamp_ms`.
    fn absolute(&self, locale_tag: &str, timestamp_ms: i64) -> String;
}

/// Russian, Simplified Chinese and English wording, UTC `YYYY-MM-DD` dates.
///
/// `ru` selects Russian, `zhCN` Chinese; every other tag gets English.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTimeFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Bucket an elapsed duration. `None` means under a minute.
fn bucket(elapsed_ms: i64) -> Option<(i64, Unit)> {
    let elapsed_ms = elapsed_ms.max(0);
    if elapsed_ms < MINUTE_MS {
        return None;
    }
    let bucketed = if elapsed_ms < HOUR_MS {
        (elapsed_ms / MINUTE_MS, Unit::Minute)
    } else if elapsed_ms < DAY_MS {
        (elapsed_ms / HOUR_MS, Unit::Hour)
    } else if elapsed_ms < 30 * DAY_MS {
        (elapsed_ms / DAY_MS, Unit::Day)
    } else if elapsed_ms < 365 * DAY_MS {
        (elapsed_ms / (30 * DAY_MS), Unit::Month)
    } else {
        (elapsed_ms / (365 * DAY_MS), Unit::Year)
    };
    Some(bucketed)
}

fn english(elapsed_ms: i64) -> String {
    let Some((n, unit)) = bucket(elapsed_ms) else {
        return "just now".to_string();
    };
    let word = match unit {
        Unit::Minute => "minute",
        Unit::Hour => "hour",
        Unit::Day => "day",
        Unit::Month => "month",
        Unit::Year => "year",
    };
    if n == 1 {
        format!("1 {word} ago")
    } else {
        format!("{n} {word}s ago")
    }
}

/// Russian noun form for `n`: `one` (1, 21), `few` (2-4, 22-24), `many` (rest).
fn russian_plural<'a>(n: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let (rem10, rem100) = (n % 10, n % 100);
    if rem10 == 1 && rem100 != 11 {
        one
    } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
        few
    } else {
        many
    }
}

fn russian(elapsed_ms: i64) -> String {
    let Some((n, unit)) = bucket(elapsed_ms) else {
        return "только что".to_string();
    };
    let word = match unit {
        Unit::Minute => russian_plural(n, "минуту", "минуты", "минут"),
        Unit::Hour => russian_plural(n, "час", "часа", "часов"),
        Unit::Day => russian_plural(n, "день", "дня", "дней"),
        Unit::Month => russian_plural(n, "месяц", "месяца", "месяцев"),
        Unit::Year => russian_plural(n, "год", "года", "лет"),
    };
    format!("{n} {word} назад")
}

fn chinese(elapsed_ms: i64) -> String {
    let Some((n, unit)) = bucket(elapsed_ms) else {
        return "刚刚".to_string();
    };
    let word = match unit {
        Unit::Minute => "分钟",
        Unit::Hour => "小时",
        Unit::Day => "天",
        Unit::Month => "个月",
        Unit::Year => "年",
    };
    format!("{n}{word}前")
}

impl TimeFormatter for BasicTimeFormatter {
    fn relative(&self, locale_tag: &str, timestamp_ms: i64, now_ms: i64) -> String {
        let elapsed = now_ms.saturating_sub(timestamp_ms);
        match locale_tag {
            "ru" => russian(elapsed),
            "zhCN" => chinese(elapsed),
            _ => english(elapsed),
        }
    }

    fn absolute(&self, _locale_tag: &str, timestamp_ms: i64) -> String {
        DateTime::from_timestamp_millis(timestamp_ms)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Current time as Unix milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
