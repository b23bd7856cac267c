use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, Dataset, Record};

/// Columns every car prices source must provide after header normalization.
/// Downstream filtering and cleaning assume their presence.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "car model",
    "car make",
    "torque (lb-ft)",
    "engine size (l)",
    "price (in usd)",
];

/// Row cap for a dashboard session.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a car prices dataset from a file, reading at most `max_rows` rows.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat scalar columns (strings, ints, floats, bools)
/// * `.json`    – records orientation: `[{ "Car Make": "...", ... }, ...]`
/// * `.csv`     – header row with column names
///
/// Every format goes through the same header normalization: column names are
/// lowercased once at load time, and the required columns are checked after
/// normalization (`SchemaMismatch` lists any that are absent).
pub fn load_file(path: &Path, max_rows: usize) -> Result<Dataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, max_rows),
        "json" => load_json(path, max_rows),
        "csv" => load_csv(path, max_rows),
        other => Err(anyhow::anyhow!("unsupported file extension: .{other}")),
    };

    let dataset = parsed.map_err(|source| DataError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    check_schema(&dataset)?;
    Ok(dataset)
}

/// The one renaming transform applied to every source header: downstream code
/// only ever references lowercase column names.
fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
}

fn check_schema(dataset: &Dataset) -> Result<(), DataError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !dataset.has_column(col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::SchemaMismatch { missing })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one car per row.
fn load_csv(path: &Path, max_rows: usize) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().take(max_rows).enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let record: Record = columns
            .iter()
            .cloned()
            .zip(row.iter().map(guess_cell_type))
            .collect();
        records.push(record);
    }

    Ok(Dataset { records, columns })
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "Car Make": "Audi",
///     "Car Model": "R8",
///     "Torque (lb-ft)": 413,
///     "Engine Size (L)": 5.2,
///     "Price (in USD)": 158600
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path, max_rows: usize) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len().min(max_rows));

    for (i, row) in rows.iter().take(max_rows).enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            let col = normalize_header(key);
            if !columns.contains(&col) {
                columns.push(col.clone());
            }
            fields.insert(col, json_to_cell(val));
        }
        records.push(Record { fields });
    }

    Ok(Dataset { records, columns })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns. Works with files written by
/// both Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path, max_rows: usize) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::new();

    'batches: for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema
                .fields()
                .iter()
                .map(|f| normalize_header(f.name()))
                .collect();
        }

        for row in 0..batch.num_rows() {
            if records.len() >= max_rows {
                break 'batches;
            }
            let record: Record = columns
                .iter()
                .cloned()
                .zip((0..batch.num_columns()).map(|c| extract_cell(batch.column(c), row)))
                .collect();
            records.push(record);
        }
    }

    if columns.is_empty() {
        bail!("parquet file has no columns");
    }

    Ok(Dataset { records, columns })
}

/// Extract a single scalar cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}
