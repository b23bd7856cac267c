use std::collections::BTreeSet;

use super::error::DataError;
use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Range / equality filters
// ---------------------------------------------------------------------------

/// Records whose value in `column` lies within `[low, high]` inclusive.
/// Order preserved; an empty result is valid. Cells that are missing or
/// non-numeric never match.
pub fn filter_by_range(
    dataset: &Dataset,
    column: &str,
    low: f64,
    high: f64,
) -> Result<Dataset, DataError> {
    if !dataset.has_column(column) {
        return Err(DataError::UnknownColumn(column.to_string()));
    }
    if low > high {
        return Err(DataError::InvalidRange { low, high });
    }

    let records = dataset
        .records
        .iter()
        .filter(|rec| {
            rec.numeric(column)
                .is_some_and(|v| low <= v && v <= high)
        })
        .cloned()
        .collect();

    Ok(dataset.with_records(records))
}

/// Records whose value in `column` equals `value` exactly. String comparison
/// is case-sensitive.
pub fn filter_by_equality(
    dataset: &Dataset,
    column: &str,
    value: &CellValue,
) -> Result<Dataset, DataError> {
    if !dataset.has_column(column) {
        return Err(DataError::UnknownColumn(column.to_string()));
    }

    let records = dataset
        .records
        .iter()
        .filter(|rec| rec.get(column) == Some(value))
        .cloned()
        .collect();

    Ok(dataset.with_records(records))
}

/// Unique values of `column` in first-seen order, used to populate selection
/// widgets.
pub fn distinct_values(dataset: &Dataset, column: &str) -> Result<Vec<CellValue>, DataError> {
    if !dataset.has_column(column) {
        return Err(DataError::UnknownColumn(column.to_string()));
    }

    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    for rec in &dataset.records {
        if let Some(val) = rec.get(column) {
            if seen.insert(val.clone()) {
                values.push(val.clone());
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn car(make: &str, model: &str, torque: f64, engine: f64) -> Record {
        [
            ("car make".to_string(), CellValue::String(make.into())),
            ("car model".to_string(), CellValue::String(model.into())),
            ("torque (lb-ft)".to_string(), CellValue::Float(torque)),
            ("engine size (l)".to_string(), CellValue::Float(engine)),
        ]
        .into_iter()
        .collect()
    }

    fn dataset() -> Dataset {
        Dataset {
            columns: vec![
                "car make".into(),
                "car model".into(),
                "torque (lb-ft)".into(),
                "engine size (l)".into(),
            ],
            records: vec![
                car("Audi", "A4", 100.0, 2.0),
                car("BMW", "M4", 250.0, 3.0),
                car("Audi", "R8", 400.0, 5.2),
            ],
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = dataset();
        let view = filter_by_range(&ds, "torque (lb-ft)", 150.0, 400.0).unwrap();
        let torques: Vec<_> = view
            .records
            .iter()
            .map(|r| r.numeric("torque (lb-ft)").unwrap())
            .collect();
        assert_eq!(torques, vec![250.0, 400.0]);
    }

    #[test]
    fn full_range_returns_the_dataset_unchanged() {
        let ds = dataset();
        let view = filter_by_range(&ds, "torque (lb-ft)", 100.0, 400.0).unwrap();
        assert_eq!(view, ds);
    }

    #[test]
    fn adjacent_ranges_partition_without_overlap() {
        let ds = dataset();
        let below = filter_by_range(&ds, "torque (lb-ft)", f64::NEG_INFINITY, 149.0).unwrap();
        let within = filter_by_range(&ds, "torque (lb-ft)", 150.0, 400.0).unwrap();
        let above = filter_by_range(&ds, "torque (lb-ft)", 401.0, f64::INFINITY).unwrap();
        assert_eq!(below.len() + within.len() + above.len(), ds.len());
        assert_eq!(below.len(), 1);
        assert_eq!(above.len(), 0);
    }

    #[test]
    fn empty_range_result_is_not_an_error() {
        let ds = dataset();
        let view = filter_by_range(&ds, "engine size (l)", 6.0, 9.0).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn inverted_bounds_are_invalid() {
        let ds = dataset();
        let err = filter_by_range(&ds, "torque (lb-ft)", 500.0, 100.0).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidRange { low, high } if low == 500.0 && high == 100.0
        ));
    }

    #[test]
    fn range_on_unknown_column_fails() {
        let ds = dataset();
        let err = filter_by_range(&ds, "horsepower", 0.0, 1.0).unwrap_err();
        assert!(matches!(err, DataError::UnknownColumn(col) if col == "horsepower"));
    }

    #[test]
    fn equality_is_exact_and_case_sensitive() {
        let ds = dataset();
        let audi = CellValue::String("Audi".into());
        let view = filter_by_equality(&ds, "car make", &audi).unwrap();
        assert_eq!(view.len(), 2);

        let lower = CellValue::String("audi".into());
        let none = filter_by_equality(&ds, "car make", &lower).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let ds = dataset();
        let makes = distinct_values(&ds, "car make").unwrap();
        assert_eq!(
            makes,
            vec![
                CellValue::String("Audi".into()),
                CellValue::String("BMW".into()),
            ]
        );
    }

    #[test]
    fn distinct_on_unknown_column_fails() {
        let ds = dataset();
        assert!(matches!(
            distinct_values(&ds, "horsepower"),
            Err(DataError::UnknownColumn(_))
        ));
    }

    #[test]
    fn filtering_by_each_distinct_make_partitions_the_dataset() {
        let ds = dataset();
        let makes = distinct_values(&ds, "car make").unwrap();
        let total: usize = makes
            .iter()
            .map(|make| filter_by_equality(&ds, "car make", make).unwrap().len())
            .sum();
        assert_eq!(total, ds.len());
    }
}
