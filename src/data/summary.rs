//! Schema summary of a parsed dataset

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of rows included in the preview
pub const PREVIEW_ROWS: usize = 5;

/// Read-only summary of an uploaded dataset: shape, schema and a bounded
/// preview. Derived once per request and returned verbatim to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub filename: String,
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub dtypes: BTreeMap<String, String>,
    pub missing_values: BTreeMap<String, usize>,
    pub preview: Vec<BTreeMap<String, serde_json::Value>>,
}

impl DatasetSummary {
    /// Build a summary from a parsed DataFrame
    pub fn describe(df: &DataFrame, filename: &str) -> Self {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut dtypes = BTreeMap::new();
        let mut missing_values = BTreeMap::new();
        for col in df.get_columns() {
            let name = col.name().to_string();
            dtypes.insert(name.clone(), dtype_label(col.dtype()).to_string());
            missing_values.insert(name, missing_count(col));
        }

        let head = df.head(Some(PREVIEW_ROWS));
        let preview = (0..head.height())
            .map(|row| {
                head.get_columns()
                    .iter()
                    .map(|col| {
                        let value = col
                            .get(row)
                            .map(any_value_to_json)
                            .unwrap_or(serde_json::Value::Null);
                        (col.name().to_string(), value)
                    })
                    .collect()
            })
            .collect();

        Self {
            filename: filename.to_string(),
            shape: (df.height(), df.width()),
            columns,
            dtypes,
            missing_values,
            preview,
        }
    }
}

/// Language-neutral dtype label for a column
pub fn dtype_label(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "integer",
        DataType::Float32 | DataType::Float64 => "float",
        DataType::String => "string",
        DataType::Boolean => "boolean",
        _ => "other",
    }
}

/// Count of missing entries in a column: nulls, plus NaN for float columns
/// (spreadsheet and CSV sources surface missing cells differently).
pub fn missing_count(col: &Column) -> usize {
    let nulls = col.null_count();
    let nans = col
        .as_materialized_series()
        .f64()
        .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
        .unwrap_or(0);
    nulls + nans
}

fn any_value_to_json(value: AnyValue) -> serde_json::Value {
    match value {
        AnyValue::Null => serde_json::Value::Null,
        AnyValue::Boolean(v) => serde_json::json!(v),
        AnyValue::Int8(v) => serde_json::json!(v),
        AnyValue::Int16(v) => serde_json::json!(v),
        AnyValue::Int32(v) => serde_json::json!(v),
        AnyValue::Int64(v) => serde_json::json!(v),
        AnyValue::UInt8(v) => serde_json::json!(v),
        AnyValue::UInt16(v) => serde_json::json!(v),
        AnyValue::UInt32(v) => serde_json::json!(v),
        AnyValue::UInt64(v) => serde_json::json!(v),
        AnyValue::Float32(v) => serde_json::json!(v),
        AnyValue::Float64(v) => serde_json::json!(v),
        AnyValue::String(v) => serde_json::json!(v),
        AnyValue::StringOwned(v) => serde_json::json!(v.as_str()),
        other => serde_json::json!(format!("{}", other)),
    }
}
