//! Parsing uploaded file bytes into a DataFrame

use crate::error::{Result, SvrlabError};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use polars::prelude::*;
use std::io::Cursor;

/// Tabular file format, detected from the filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

/// Detect the file format from the extension
pub fn detect_format(filename: &str) -> Result<FileFormat> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".csv") {
        Ok(FileFormat::Csv)
    } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        Ok(FileFormat::Excel)
    } else if let Some((_, ext)) = lower.rsplit_once('.') {
        Err(SvrlabError::UnsupportedFormat(ext.to_string()))
    } else {
        Err(SvrlabError::UnsupportedFormat(filename.to_string()))
    }
}

/// Parse uploaded bytes into a DataFrame based on the filename extension.
///
/// Fails with `UnsupportedFormat` for unknown extensions, `EmptyDataset` for
/// empty input or a table without any rows or columns, and `ParseError` for
/// malformed content. Never returns a partial table.
pub fn read_table(bytes: &[u8], filename: &str) -> Result<DataFrame> {
    let format = detect_format(filename)?;

    if bytes.is_empty() {
        return Err(SvrlabError::EmptyDataset);
    }

    let df = match format {
        FileFormat::Csv => read_csv(bytes)?,
        FileFormat::Excel => read_excel(bytes)?,
    };

    if df.height() == 0 || df.width() == 0 {
        return Err(SvrlabError::EmptyDataset);
    }

    Ok(df)
}

fn read_csv(bytes: &[u8]) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(1000))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| SvrlabError::ParseError(e.to_string()))
}

fn read_excel(bytes: &[u8]) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SvrlabError::ParseError(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SvrlabError::EmptyDataset)?
        .map_err(|e| SvrlabError::ParseError(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(SvrlabError::EmptyDataset)?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("column_{}", i),
            other => data_to_string(other),
        })
        .collect();

    let body: Vec<&[Data]> = rows.collect();
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            build_column(name, &cells)
        })
        .collect();

    DataFrame::new(columns).map_err(|e| SvrlabError::ParseError(e.to_string()))
}

/// Build a typed column from spreadsheet cells. Integer, float and boolean
/// columns keep their type; mixed content falls back to strings. Empty cells
/// become nulls in every case.
fn build_column(name: &str, cells: &[&Data]) -> Column {
    let all_int = cells.iter().all(|c| matches!(c, Data::Int(_) | Data::Empty));
    if all_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values).into();
    }

    let all_numeric = cells
        .iter()
        .all(|c| matches!(c, Data::Int(_) | Data::Float(_) | Data::Empty));
    if all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values).into();
    }

    let all_bool = cells.iter().all(|c| matches!(c, Data::Bool(_) | Data::Empty));
    if all_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values).into();
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|c| match c {
            Data::Empty => None,
            other => Some(data_to_string(other)),
        })
        .collect();
    Series::new(name.into(), values).into()
}

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
