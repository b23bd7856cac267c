use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, Serializer};

use super::error::DataError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common tabular dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Missing value: empty cell in the source, or failed numeric coercion.
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Serialize as the bare JSON scalar so a record becomes a plain JSON object
/// a chart front end can consume directly.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_unit(),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for range filtering and extents.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether the value is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single record (one car entry). Keys are lowercase column names.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub fields: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Numeric view of a cell; `None` when the cell is missing or non-numeric.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.fields.get(column).and_then(CellValue::as_f64)
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable after loading; filters return new
/// derived `Dataset`s and never touch the base.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Dataset {
    /// All records (rows), in source order.
    pub records: Vec<Record>,
    /// Column names in source header order, already lowercased.
    pub columns: Vec<String>,
}

impl Dataset {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Build a derived dataset with the same schema and the given records.
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            records,
            columns: self.columns.clone(),
        }
    }

    /// Min/max over the numeric cells of `column`, used to seed slider
    /// endpoints. `Ok(None)` when the column holds no numeric value at all.
    pub fn numeric_extent(&self, column: &str) -> Result<Option<(f64, f64)>, DataError> {
        if !self.has_column(column) {
            return Err(DataError::UnknownColumn(column.to_string()));
        }
        let mut extent: Option<(f64, f64)> = None;
        for rec in &self.records {
            if let Some(v) = rec.numeric(column) {
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        Ok(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn as_f64_covers_numeric_variants_only() {
        assert_eq!(CellValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(CellValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(CellValue::String("1.5".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn numeric_extent_spans_min_and_max() {
        let ds = Dataset {
            columns: vec!["torque (lb-ft)".into()],
            records: vec![
                record(&[("torque (lb-ft)", CellValue::Float(250.0))]),
                record(&[("torque (lb-ft)", CellValue::Float(100.0))]),
                record(&[("torque (lb-ft)", CellValue::Integer(400))]),
            ],
        };
        assert_eq!(
            ds.numeric_extent("torque (lb-ft)").unwrap(),
            Some((100.0, 400.0))
        );
    }

    #[test]
    fn numeric_extent_is_none_without_numeric_cells() {
        let ds = Dataset {
            columns: vec!["car make".into()],
            records: vec![record(&[("car make", CellValue::String("Audi".into()))])],
        };
        assert_eq!(ds.numeric_extent("car make").unwrap(), None);
    }

    #[test]
    fn numeric_extent_rejects_unknown_column() {
        let ds = Dataset {
            columns: vec!["car make".into()],
            records: Vec::new(),
        };
        assert!(matches!(
            ds.numeric_extent("horsepower"),
            Err(DataError::UnknownColumn(col)) if col == "horsepower"
        ));
    }

    #[test]
    fn records_serialize_as_plain_json_objects() {
        let rec = record(&[
            ("car make", CellValue::String("Audi".into())),
            ("price (in usd)", CellValue::Float(42000.0)),
        ]);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["car make"], "Audi");
        assert_eq!(json["price (in usd)"], 42000.0);
    }
}
