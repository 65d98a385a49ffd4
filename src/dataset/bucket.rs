//! Calendar bucketing of engagement records.
//!
//! Weeks here are month-relative: days 1-7 are week 1, 8-14 week 2 and so
//! on, regardless of the weekday the month starts on. They are not ISO weeks.

use super::record::{RawDate, RawRecord, Record};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Spreadsheet serial dates count days from this epoch (the 1900 leap year bug included).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Serial of 9999-12-31, the last date spreadsheets can represent.
const MAX_SERIAL: f64 = 2_958_465.0;

/// Grouping keys derived from a record's date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateBucket {
    pub year: i32,
    pub month_number: u32,
    pub month_name: &'static str,
    pub week_of_month: u32,
    pub week_label: String,
}

impl DateBucket {
    pub fn from_date(date: NaiveDate) -> DateBucket {
        let month_name = MONTH_NAMES[date.month0() as usize];
        let week_of_month = week_of_month(date.day());
        DateBucket {
            year: date.year(),
            month_number: date.month(),
            month_name,
            week_of_month,
            week_label: week_label(week_of_month, month_name),
        }
    }

    /// Globally unique key of the week, `week_label` alone repeats every year.
    pub fn week_key(&self) -> (i32, u32, u32) {
        (self.year, self.month_number, self.week_of_month)
    }
}

pub fn week_of_month(day_of_month: u32) -> u32 {
    day_of_month.saturating_sub(1) / 7 + 1
}

pub fn week_label(week_of_month: u32, month_name: &str) -> String {
    format!("S{}-{}", week_of_month, month_name)
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (date_part, time_part) = match text.find(|c: char| c == 'T' || c == ' ') {
        Some(idx) => (&text[..idx], Some(text[idx + 1..].trim())),
        None => (text, None),
    };

    if let Some(time_part) = time_part {
        let valid_time = TIME_FORMATS
            .iter()
            .any(|fmt| NaiveTime::parse_from_str(time_part, fmt).is_ok());
        if !valid_time {
            return None;
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parses any supported raw date representation, `None` when it is not a valid date.
pub fn parse_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Date(date) => Some(*date),
        RawDate::DateTime(date_time) => Some(date_time.date()),
        RawDate::Serial(serial) => serial_to_date(*serial),
        RawDate::Text(text) => parse_date_text(text),
    }
}

#[derive(Debug)]
pub struct BucketOutcome {
    pub records: Vec<Record>,
    pub dropped: usize,
}

/// Parses and buckets raw records, silently dropping rows with an invalid date.
pub fn bucket(raw_records: Vec<RawRecord>) -> BucketOutcome {
    let mut dropped = 0;
    let mut records = Vec::with_capacity(raw_records.len());

    for raw in raw_records {
        match parse_date(&raw.date) {
            Some(date) => records.push(Record::from_raw(raw, date)),
            None => {
                debug!("Dropping row {}: unparseable date {:?}", raw.row, raw.date);
                dropped += 1;
            }
        }
    }

    BucketOutcome { records, dropped }
}
