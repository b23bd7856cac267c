use super::model::{CellValue, Dataset};

/// Columns coerced to numeric during cleaning. Every record retained by
/// [`clean`] has a numeric value in both.
pub const NUMERIC_COLUMNS: [&str; 2] = ["torque (lb-ft)", "engine size (l)"];

/// Coerce the numeric columns cell by cell and drop records where either ends
/// up missing. Record order is preserved and the input is left untouched.
/// Cleaning an already-clean dataset is a no-op.
pub fn clean(dataset: &Dataset) -> Dataset {
    let records: Vec<_> = dataset
        .records
        .iter()
        .filter_map(|rec| {
            let mut rec = rec.clone();
            for col in NUMERIC_COLUMNS {
                let coerced = rec
                    .get(col)
                    .map(coerce_numeric)
                    .unwrap_or(CellValue::Null);
                if coerced.is_null() {
                    return None;
                }
                rec.fields.insert(col.to_string(), coerced);
            }
            Some(rec)
        })
        .collect();

    let dropped = dataset.len() - records.len();
    if dropped > 0 {
        log::debug!("cleaning dropped {dropped} of {} records", dataset.len());
    }

    dataset.with_records(records)
}

/// Parse-or-missing coercion for a single cell. Numbers pass through,
/// numeric text parses, everything else becomes `Null`. A parse that yields
/// NaN counts as missing.
fn coerce_numeric(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Float(v) if v.is_nan() => CellValue::Null,
        CellValue::Float(v) => CellValue::Float(*v),
        CellValue::Integer(i) => CellValue::Integer(*i),
        CellValue::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => CellValue::Float(v),
            _ => CellValue::Null,
        },
        _ => CellValue::Null,
    }
}
