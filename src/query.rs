//! Interpreting user queries and filtering blobs by their embedded date.
//!
//! A query looks like `Datasets/Wholesale/Bids -sd 2023-01-01 -ed 2023-12-31`:
//! a path prefix followed by optional start (`-sd`) and end (`-ed`) dates in
//! either order. Malformed date arguments are ignored rather than rejected.

use crate::dates::parse_date;
use crate::models::{BlobRecord, CalendarDate, DateRangeQuery, SearchQuery};
use tracing::warn;

pub const START_DATE_FLAG: &str = "-sd";
pub const END_DATE_FLAG: &str = "-ed";

/// Accepted lengths of a flag value, in characters.
const DATE_ARGUMENT_LENGTHS: [usize; 2] = [10, 11];

pub fn interpret(raw_query: &str) -> SearchQuery {
    let prefix = raw_query
        .split_whitespace()
        .next()
        .filter(|token| !token.starts_with('-'))
        .unwrap_or_default()
        .to_string();

    let lowered = raw_query.to_ascii_lowercase();
    let range = DateRangeQuery {
        start_date: date_argument(&lowered, START_DATE_FLAG),
        end_date: date_argument(&lowered, END_DATE_FLAG),
    };

    if let (Some(start), Some(end)) = (range.start_date.date(), range.end_date.date()) {
        if start >= end {
            warn!(
                "Start date {} is not before end date {}, no files will match",
                start, end
            );
        }
    }

    SearchQuery { prefix, range }
}

/// Value following `flag` as a date, or `Unset` when the flag is missing or
/// its value is malformed.
fn date_argument(query: &str, flag: &str) -> CalendarDate {
    match flag_value(query, flag) {
        Some(value) => parse_date(value),
        None => CalendarDate::Unset,
    }
}

/// Text after `<flag><space>` up to the next space, when the flag stands as
/// its own token and the value has an accepted length.
fn flag_value<'a>(query: &'a str, flag: &str) -> Option<&'a str> {
    let (position, _) = query.match_indices(flag).find(|(position, _)| {
        let starts_token = query[..*position]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        starts_token && query[position + flag.len()..].starts_with(' ')
    })?;

    let rest = &query[position + flag.len() + 1..];
    let value = rest.split(' ').next().unwrap_or_default();

    DATE_ARGUMENT_LENGTHS
        .contains(&value.chars().count())
        .then_some(value)
}

/// Keep the records whose embedded date lies strictly inside the range.
///
/// An unbounded range returns the records untouched. Once either bound is
/// set, records without an embedded date are dropped.
pub fn filter_by_range(records: Vec<BlobRecord>, range: &DateRangeQuery) -> Vec<BlobRecord> {
    if range.is_unbounded() {
        return records;
    }

    let start = range.start_date.date();
    let end = range.end_date.date();

    records
        .into_iter()
        .filter(|record| {
            let Some(date) = record.embedded_date.date() else {
                return false;
            };
            start.map_or(true, |start| date > start) && end.map_or(true, |end| date < end)
        })
        .collect()
}
