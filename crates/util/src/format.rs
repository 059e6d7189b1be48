//! Display formatting for dates and sizes in the interface language.

use std::fmt::Display;

use chrono::{DateTime, Datelike, TimeZone};
use lms_types::Language;

/// How much of a timestamp to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// `1/15/2024` (en) or `15/1/2024` (vi).
    #[default]
    Short,
    /// Weekday, day, month name and year.
    Long,
    Time,
    DateTime,
}

const VI_WEEKDAYS: [&str; 7] = ["Thứ Hai", "Thứ Ba", "Thứ Tư", "Thứ Năm", "Thứ Sáu", "Thứ Bảy", "Chủ Nhật"];

/// Formats `at` in its own time zone the way the interface language writes
/// dates. Callers pick the zone (`Local` in the shell, `Utc` in tests).
pub fn format_date<Tz>(at: &DateTime<Tz>, style: DateStyle, language: Language) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match (language, style) {
        (Language::En, DateStyle::Short) => at.format("%-m/%-d/%Y").to_string(),
        (Language::En, DateStyle::Long) => at.format("%A, %B %-d, %Y").to_string(),
        (Language::En, DateStyle::Time) => at.format("%-I:%M:%S %p").to_string(),
        (Language::En, DateStyle::DateTime) => at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        (Language::Vi, DateStyle::Short) => at.format("%-d/%-m/%Y").to_string(),
        (Language::Vi, DateStyle::Long) => {
            let weekday = VI_WEEKDAYS[at.weekday().num_days_from_monday() as usize];
            format!("{weekday}, {} tháng {}, {}", at.day(), at.month(), at.year())
        }
        (Language::Vi, DateStyle::Time) => at.format("%H:%M:%S").to_string(),
        (Language::Vi, DateStyle::DateTime) => at.format("%H:%M:%S %-d/%-m/%Y").to_string(),
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable byte count with up to two decimals: `1.5 KB`, `0 Bytes`.
/// Anything past gigabytes stays in GB.
pub fn format_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(text: &str) -> DateTime<Utc> {
        text.parse().unwrap()
    }

    #[test]
    fn english_dates() {
        let when = at("2024-01-15T15:04:05Z");
        assert_eq!(format_date(&when, DateStyle::Short, Language::En), "1/15/2024");
        assert_eq!(format_date(&when, DateStyle::Long, Language::En), "Monday, January 15, 2024");
        assert_eq!(format_date(&when, DateStyle::Time, Language::En), "3:04:05 PM");
        assert_eq!(format_date(&when, DateStyle::DateTime, Language::En), "1/15/2024, 3:04:05 PM");
    }

    #[test]
    fn vietnamese_dates_put_the_day_first() {
        let when = at("2024-01-14T09:30:00Z");
        assert_eq!(format_date(&when, DateStyle::Short, Language::Vi), "14/1/2024");
        assert_eq!(format_date(&when, DateStyle::Long, Language::Vi), "Chủ Nhật, 14 tháng 1, 2024");
        assert_eq!(format_date(&when, DateStyle::Time, Language::Vi), "09:30:00");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 1024 * 1024 / 4), "5.25 MB");
        assert_eq!(format_file_size(3 * 1024u64.pow(4)), "3072 GB");
    }
}
