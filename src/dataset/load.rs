//! Dataset loading from a CSV export or a spreadsheet workbook.

use super::bucket::bucket;
use super::record::{RawDate, RawRecord};
use super::workbook::load_workbook_records;
use super::{ColumnSchema, Dataset};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that make the dataset unusable, the session cannot start without it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data source {0} not found")]
    SourceNotFound(PathBuf),

    #[error("Could not read data source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Could not open workbook {path}: {source}")]
    WorkbookUnreadable {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Sheet '{sheet}' was not found in workbook {path}")]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("Column '{0}' with the record dates was not found in the data source")]
    MissingDateColumn(String),

    #[error("Required column '{0}' was not found in the data source")]
    MissingColumn(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Data rows read from the source, header excluded.
    pub total_rows: usize,
    pub dropped_invalid_dates: usize,
    /// Rows the csv reader could not decode at all.
    pub malformed_rows: usize,
    /// Vote cells that were not a non-negative integer, counted as zero votes.
    pub invalid_vote_cells: usize,
}

impl LoadStats {
    pub fn kept_rows(&self) -> usize {
        self.total_rows - self.dropped_invalid_dates - self.malformed_rows
    }
}

/// Format of a data source, picked from its file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> SourceFormat {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => SourceFormat::Workbook,
            _ => SourceFormat::Csv,
        }
    }
}

pub(super) struct ColumnIndices {
    date: usize,
    id: usize,
    action: usize,
    network: usize,
    topic: usize,
    link: Option<usize>,
    vote_count: usize,
}

impl ColumnIndices {
    pub(super) fn resolve(headers: &[String], schema: &ColumnSchema) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_owned()));

        let date = find(&schema.date).ok_or_else(|| LoadError::MissingDateColumn(schema.date.clone()))?;

        Ok(ColumnIndices {
            date,
            id: require(&schema.id)?,
            action: require(&schema.action)?,
            network: require(&schema.network)?,
            topic: require(&schema.topic)?,
            link: find(&schema.link),
            vote_count: require(&schema.vote_count)?,
        })
    }

    pub(super) fn date(&self) -> usize {
        self.date
    }

    pub(super) fn vote_count(&self) -> usize {
        self.vote_count
    }
}

pub(super) enum VoteCell {
    Value(u64),
    Invalid,
}

pub(super) fn parse_vote_count(cell: &str) -> VoteCell {
    let cell = cell.trim();
    if cell.is_empty() {
        return VoteCell::Value(0);
    }
    if let Ok(value) = cell.parse::<u64>() {
        return VoteCell::Value(value);
    }
    // Spreadsheet exports often write integers as floats.
    match cell.parse::<f64>() {
        Ok(value) => vote_count_from_number(value),
        Err(_) => VoteCell::Invalid,
    }
}

pub(super) fn vote_count_from_number(value: f64) -> VoteCell {
    if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        VoteCell::Value(value as u64)
    } else {
        VoteCell::Invalid
    }
}

/// Builds the raw record of one source row. `text` returns the trimmed text
/// of a column, empty when the cell is missing.
pub(super) fn assemble_record(
    row: usize,
    columns: &ColumnIndices,
    date: RawDate,
    vote_cell: VoteCell,
    text: impl Fn(usize) -> String,
    stats: &mut LoadStats,
) -> RawRecord {
    let vote_count = match vote_cell {
        VoteCell::Value(value) => value,
        VoteCell::Invalid => {
            stats.invalid_vote_cells += 1;
            0
        }
    };
    let id = Some(text(columns.id)).filter(|id| !id.is_empty());

    RawRecord {
        row,
        date,
        id,
        network: text(columns.network),
        topic: text(columns.topic),
        action: text(columns.action),
        link: columns.link.map(&text).unwrap_or_default(),
        vote_count,
    }
}

fn cell(record: &csv::StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

/// Reads raw rows from any CSV reader, validating the header against `schema`.
pub fn read_raw_records<R: Read>(
    reader: R,
    schema: &ColumnSchema,
    source_path: &Path,
) -> Result<(Vec<RawRecord>, LoadStats), LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| LoadError::SourceUnreadable {
            path: source_path.to_owned(),
            source,
        })?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    let columns = ColumnIndices::resolve(&headers, schema)?;

    let mut stats = LoadStats::default();
    let mut raw_records = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        stats.total_rows += 1;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping malformed row {}: {}", row, err);
                stats.malformed_rows += 1;
                continue;
            }
        };

        let date = RawDate::Text(cell(&record, columns.date).to_owned());
        let vote_cell = parse_vote_count(cell(&record, columns.vote_count));
        raw_records.push(assemble_record(
            row,
            &columns,
            date,
            vote_cell,
            |idx| cell(&record, idx).to_owned(),
            &mut stats,
        ));
    }

    Ok((raw_records, stats))
}

/// Builds a dataset from an already opened CSV source.
pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    schema: ColumnSchema,
    source_path: &Path,
) -> Result<Dataset, LoadError> {
    let (raw_records, stats) = read_raw_records(reader, &schema, source_path)?;
    Ok(build_dataset(raw_records, stats, schema, source_path))
}

fn build_dataset(
    raw_records: Vec<RawRecord>,
    mut stats: LoadStats,
    schema: ColumnSchema,
    source_path: &Path,
) -> Dataset {
    let outcome = bucket(raw_records);
    stats.dropped_invalid_dates = outcome.dropped;

    let problems = stats.dropped_invalid_dates + stats.malformed_rows + stats.invalid_vote_cells;
    if problems > 0 {
        warn!("Found {} problems in {}:", problems, source_path.display());
        if stats.dropped_invalid_dates > 0 {
            warn!("- {} rows dropped for an unparseable date", stats.dropped_invalid_dates);
        }
        if stats.malformed_rows > 0 {
            warn!("- {} malformed rows skipped", stats.malformed_rows);
        }
        if stats.invalid_vote_cells > 0 {
            warn!("- {} vote cells were not valid counts", stats.invalid_vote_cells);
        }
    }

    let dataset = Dataset::new(schema, outcome.records, stats);
    if dataset.is_empty() {
        warn!("Dataset at {} has no usable records.", source_path.display());
    } else {
        info!(
            "Dataset has:\n{} records\n{} networks\n{} topics\n{} years",
            dataset.len(),
            dataset.distinct_networks().len(),
            dataset.distinct_topics().len(),
            dataset.distinct_years().len()
        );
    }
    dataset
}

/// Loads and buckets the dataset at `path`, failing only on fatal source problems.
///
/// Workbooks (`.xlsx`, `.xls`, `.ods`, ...) are read from the sheet named in
/// `schema`, anything else is read as CSV.
pub fn load_dataset<P: AsRef<Path>>(path: P, schema: ColumnSchema) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    info!("Loading dataset from {}...", path.display());

    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.to_owned()));
    }

    match SourceFormat::from_path(path) {
        SourceFormat::Workbook => {
            let (raw_records, stats) = load_workbook_records(path, &schema)?;
            Ok(build_dataset(raw_records, stats, schema, path))
        }
        SourceFormat::Csv => {
            let file = File::open(path).map_err(|err| LoadError::SourceUnreadable {
                path: path.to_owned(),
                source: csv::Error::from(err),
            })?;
            load_dataset_from_reader(file, schema, path)
        }
    }
}
