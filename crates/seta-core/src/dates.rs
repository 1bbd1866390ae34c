//! Calendar helpers: annotated dates from the history summary and
//! parsing of selected dates.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{DateError, HistoryError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Form produced by the date picker.
pub const PICKER_DATE_FORMAT: &str = "%m/%d/%Y";

/// First day with recorded data.
pub fn default_earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 11, 14).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatedDates {
    /// Days whose optional-job signature changed from the previous record.
    pub dates: BTreeSet<NaiveDate>,
    /// Most recent day in the history, flagged or not.
    pub latest: Option<NaiveDate>,
}

impl AnnotatedDates {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Walk the history in timestamp order and flag each day whose signature
/// differs from the record before it. The first record has nothing to
/// differ from and is never flagged.
pub fn compute_annotated_dates<S: PartialEq>(
    history: &BTreeMap<String, S>,
) -> Result<AnnotatedDates, HistoryError> {
    let mut records = history
        .iter()
        .map(|(stamp, signature)| parse_timestamp(stamp).map(|at| (at, signature)))
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by_key(|(at, _)| *at);

    let mut annotated = AnnotatedDates::default();
    let mut previous: Option<&S> = None;
    for (at, signature) in records {
        if previous.is_some_and(|prev| prev != signature) {
            annotated.dates.insert(at.date());
        }
        previous = Some(signature);
        annotated.latest = Some(at.date());
    }
    Ok(annotated)
}

fn parse_timestamp(stamp: &str) -> Result<NaiveDateTime, HistoryError> {
    let trimmed = stamp.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| HistoryError::Timestamp(stamp.to_string()))
}

/// Parse a selected date given as `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_selected_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, PICKER_DATE_FORMAT))
        .map_err(|_| DateError::Format(input.to_string()))
}

/// Reject days before `earliest`.
pub fn check_selectable(date: NaiveDate, earliest: NaiveDate) -> Result<NaiveDate, DateError> {
    if date < earliest {
        return Err(DateError::TooEarly {
            date: date.format(DATE_FORMAT).to_string(),
            earliest: earliest.format(DATE_FORMAT).to_string(),
        });
    }
    Ok(date)
}
