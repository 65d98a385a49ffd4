use super::bucket::DateBucket;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A date cell as it comes out of the source, before parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum RawDate {
    Text(String),
    /// Spreadsheet serial date, days since 1899-12-30.
    Serial(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    /// Zero-based data row index in the source, header excluded.
    pub row: usize,
    pub date: RawDate,
    pub id: Option<String>,
    pub network: String,
    pub topic: String,
    pub action: String,
    pub link: String,
    pub vote_count: u64,
}

/// One engagement event with its calendar bucket.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub network: String,
    pub topic: String,
    pub action: String,
    pub link: String,
    pub vote_count: u64,
    #[serde(flatten)]
    pub bucket: DateBucket,
}

impl Record {
    pub fn from_raw(raw: RawRecord, date: NaiveDate) -> Record {
        Record {
            id: raw.id,
            date,
            network: raw.network,
            topic: raw.topic,
            action: raw.action,
            link: raw.link,
            vote_count: raw.vote_count,
            bucket: DateBucket::from_date(date),
        }
    }
}

impl From<&Record> for RawRecord {
    fn from(record: &Record) -> Self {
        RawRecord {
            row: 0,
            date: RawDate::Date(record.date),
            id: record.id.clone(),
            network: record.network.clone(),
            topic: record.topic.clone(),
            action: record.action.clone(),
            link: record.link.clone(),
            vote_count: record.vote_count,
        }
    }
}
