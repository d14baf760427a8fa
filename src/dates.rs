//! Date parsing for query arguments, blob file names and listing metadata

use crate::models::CalendarDate;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Days per month used when a file name carries only a year and month.
/// February is always 28 here, so `202402` resolves to 2024-02-28.
const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{1,2}\b").expect("valid regex"));
static MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\b").expect("valid regex")
});
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{4}\b").expect("valid regex"));

/// A 6 or 8 digit ASCII token delimited by `/`, `-`, `_` or the ends of the string.
static URL_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/_-])([0-9]{6}(?:[0-9]{2})?)(?:[/_-]|$)").expect("valid regex")
});

/// Parse a date in any of the known encodings.
///
/// Forms are tried in order: `YYYY-MM-DD` query argument, `YYYYMMDD`/`YYYYMM`
/// file name, then long-form text such as `Tue, 12 Jan 2023 10:00:00 GMT`.
/// Returns [`CalendarDate::Unset`] when nothing matches.
pub fn parse_date(text: &str) -> CalendarDate {
    if text.is_empty() {
        return CalendarDate::Unset;
    }

    let parsers: [fn(&str) -> Option<NaiveDate>; 3] = [
        parse_cli_arg_date,
        parse_file_name_date,
        parse_long_form_date,
    ];

    if let Some(date) = parsers.iter().find_map(|parse| parse(text)) {
        return CalendarDate::Date(date);
    }

    warn!("Failed to parse date: {}", text);
    CalendarDate::Unset
}

/// `YYYY-MM-DD`, separators are positional and not checked.
pub fn parse_cli_arg_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 10 {
        return None;
    }

    let year = digits(text.get(0..4)?)?;
    let month = digits(text.get(5..7)?)?;
    let day = digits(text.get(8..10)?)?;

    CalendarDate::from_ymd(year as i32, month, day).date()
}

/// `YYYYMMDD` or `YYYYMM`. A missing day becomes the last day of the month.
pub fn parse_file_name_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 6 && text.len() != 8 {
        return None;
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = digits(&text[0..4])?;
    let month = digits(&text[4..6])?;
    let day = if text.len() == 8 {
        digits(&text[6..8])?
    } else {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        *MONTH_DAYS.get(index)?
    };

    CalendarDate::from_ymd(year as i32, month, day).date()
}

/// Day, month abbreviation and year picked out of free text, e.g. `12 Jan 2023`.
pub fn parse_long_form_date(text: &str) -> Option<NaiveDate> {
    let day = digits(DAY_PATTERN.find(text)?.as_str())?;
    let month_name = MONTH_PATTERN.find(text)?.as_str();
    let month = MONTH_ABBREVIATIONS
        .iter()
        .position(|abbreviation| *abbreviation == month_name)? as u32
        + 1;
    let year = digits(YEAR_PATTERN.find(text)?.as_str())?;

    CalendarDate::from_ymd(year as i32, month, day).date()
}

/// Find the date embedded in a blob URL, e.g.
/// `Datasets/Environment/HydrologicalModellingDataset/2_Flows_20231231`.
///
/// A URL without a date token is normal and yields `Unset` silently.
pub fn extract_date_from_url(url: &str) -> CalendarDate {
    URL_DATE_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|token| parse_file_name_date(token.as_str()))
        .into()
}

fn digits(slot: &str) -> Option<u32> {
    if slot.is_empty() || !slot.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    slot.parse().ok()
}
