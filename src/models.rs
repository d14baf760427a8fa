use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// A calendar date that may also be unset or invalid.
///
/// Variant order gives the ordering: `Unset` sorts before every real date and
/// `Invalid` after every real date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "Option<NaiveDate>")]
pub enum CalendarDate {
    #[default]
    Unset,
    Date(NaiveDate),
    Invalid,
}

impl CalendarDate {
    /// Build a date from its components, yielding `Invalid` for a triple that is
    /// not a real calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => CalendarDate::Date(date),
            None => CalendarDate::Invalid,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarDate::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, CalendarDate::Date(_))
    }
}

impl From<Option<NaiveDate>> for CalendarDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(CalendarDate::Date).unwrap_or_default()
    }
}

impl From<CalendarDate> for Option<NaiveDate> {
    fn from(date: CalendarDate) -> Self {
        date.date()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarDate::Unset => write!(f, "-"),
            CalendarDate::Date(date) => {
                write!(f, "{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
            }
            CalendarDate::Invalid => write!(f, "invalid"),
        }
    }
}

/// One file entry discovered in the blob container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobRecord {
    pub url: String,
    pub last_modified: CalendarDate,
    /// Date found in the URL path itself, e.g. `.../20231231_Bids.csv`
    pub embedded_date: CalendarDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeQuery {
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
}

impl DateRangeQuery {
    pub fn is_unbounded(&self) -> bool {
        !self.start_date.is_set() && !self.end_date.is_set()
    }
}

/// A user query split into the listing prefix and its date bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub prefix: String,
    pub range: DateRangeQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Binary,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" | "csv" => Some(FileKind::Text),
            "pdf" | "zip" | "gdx" => Some(FileKind::Binary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileKind::Text => "text",
            FileKind::Binary => "binary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of a download batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub succeeded: usize,
    pub failed: Vec<FailedDownload>,
}
