//! Reading the engagement table out of a spreadsheet workbook.

use super::load::{
    assemble_record, parse_vote_count, vote_count_from_number, ColumnIndices, LoadError,
    LoadStats, VoteCell,
};
use super::record::{RawDate, RawRecord};
use super::ColumnSchema;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

/// Date cells keep their native type, text is left for the date parser.
fn date_cell(cell: Option<&Data>) -> RawDate {
    match cell {
        Some(Data::DateTime(date_time)) if date_time.is_datetime() => match date_time.as_datetime() {
            Some(date_time) => RawDate::DateTime(date_time),
            None => RawDate::Serial(date_time.as_f64()),
        },
        Some(Data::Float(serial)) => RawDate::Serial(*serial),
        Some(Data::Int(serial)) => RawDate::Serial(*serial as f64),
        Some(Data::String(text)) | Some(Data::DateTimeIso(text)) => RawDate::Text(text.clone()),
        Some(other) => RawDate::Text(other.to_string()),
        None => RawDate::Text(String::new()),
    }
}

fn vote_cell(cell: Option<&Data>) -> VoteCell {
    match cell {
        None | Some(Data::Empty) => VoteCell::Value(0),
        Some(Data::Int(value)) => match u64::try_from(*value) {
            Ok(value) => VoteCell::Value(value),
            Err(_) => VoteCell::Invalid,
        },
        Some(Data::Float(value)) => vote_count_from_number(*value),
        Some(Data::String(text)) => parse_vote_count(text),
        Some(_) => VoteCell::Invalid,
    }
}

/// Cell text as it would appear in a CSV export, integral floats without the `.0`.
fn text_cell(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(text)) => text.trim().to_owned(),
        Some(Data::Float(value)) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Some(other) => other.to_string().trim().to_owned(),
        None => String::new(),
    }
}

/// Reads raw rows from a worksheet range whose first row is the header.
pub fn read_range_records(
    range: &Range<Data>,
    schema: &ColumnSchema,
) -> Result<(Vec<RawRecord>, LoadStats), LoadError> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| text_cell(Some(c))).collect(),
        None => Vec::new(),
    };
    let columns = ColumnIndices::resolve(&headers, schema)?;

    let mut stats = LoadStats::default();
    let mut raw_records = Vec::new();

    for (row, cells) in rows.enumerate() {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        stats.total_rows += 1;
        let date = date_cell(cells.get(columns.date()));
        let votes = vote_cell(cells.get(columns.vote_count()));
        raw_records.push(assemble_record(
            row,
            &columns,
            date,
            votes,
            |idx| text_cell(cells.get(idx)),
            &mut stats,
        ));
    }

    Ok((raw_records, stats))
}

/// Opens the workbook at `path` and reads the sheet named by `schema.sheet_name`.
pub fn load_workbook_records(
    path: &Path,
    schema: &ColumnSchema,
) -> Result<(Vec<RawRecord>, LoadStats), LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::WorkbookUnreadable {
        path: path.to_owned(),
        source,
    })?;

    let sheet_names = workbook.sheet_names();
    debug!("Workbook {} has sheets {:?}", path.display(), sheet_names);
    if !sheet_names.iter().any(|name| *name == schema.sheet_name) {
        return Err(LoadError::SheetNotFound {
            sheet: schema.sheet_name.clone(),
            path: path.to_owned(),
        });
    }

    let range = workbook
        .worksheet_range(&schema.sheet_name)
        .map_err(|source| LoadError::WorkbookUnreadable {
            path: path.to_owned(),
            source,
        })?;
    read_range_records(&range, schema)
}
