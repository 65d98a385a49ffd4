mod bucket;
mod load;
mod record;
mod schema;
mod workbook;

use bucket::bucket;
pub use bucket::DateBucket;
pub use load::{load_dataset, LoadError, LoadStats, SourceFormat};
pub use record::{RawDate, RawRecord, Record};
pub use schema::{ColumnSchema, SchemaPreset, DEFAULT_SHEET_NAME};

use std::collections::BTreeSet;

/// The bucketed records of one session, immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: ColumnSchema,
    records: Vec<Record>,
    stats: LoadStats,
}

impl Dataset {
    pub fn new(schema: ColumnSchema, records: Vec<Record>, stats: LoadStats) -> Dataset {
        Dataset {
            schema,
            records,
            stats,
        }
    }

    /// Buckets in-memory raw records, as if they were read from a source.
    pub fn from_raw_records(schema: ColumnSchema, raw_records: Vec<RawRecord>) -> Dataset {
        let total_rows = raw_records.len();
        let outcome = bucket(raw_records);
        let stats = LoadStats {
            total_rows,
            dropped_invalid_dates: outcome.dropped,
            ..Default::default()
        };
        Dataset::new(schema, outcome.records, stats)
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn distinct_networks(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.network.as_str()).collect()
    }

    pub fn distinct_topics(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.topic.as_str()).collect()
    }

    pub fn distinct_years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.bucket.year).collect()
    }
}
