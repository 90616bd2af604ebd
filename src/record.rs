use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::schema::{FEATURE_COLUMNS, FEATURE_COUNT};

/// Model input for one observation: one value per schema column, in schema
/// order.
///
/// Only the encoder builds these, so a record always has the full column set.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalFeatureRecord {
    values: [f64; FEATURE_COUNT],
}

impl CanonicalFeatureRecord {
    pub(crate) fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        crate::schema::column_index(column).map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    /// Little-endian bytes of every value, in column order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.values
            .iter()
            .flat_map(|value| value.to_le_bytes())
            .collect()
    }
}

/// Row-major matrix with one row per record, as smartcore estimators take it.
pub fn to_matrix(records: &[CanonicalFeatureRecord]) -> DenseMatrix<f64> {
    let xs: Vec<f64> = records
        .iter()
        .flat_map(|record| record.values.iter().copied())
        .collect();
    DenseMatrix::new(records.len(), FEATURE_COUNT, xs, false)
}

impl Serialize for CanonicalFeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::linalg::basic::arrays::Array;

    fn ramp() -> CanonicalFeatureRecord {
        let mut values = [0.0; FEATURE_COUNT];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f64;
        }
        CanonicalFeatureRecord::from_values(values)
    }

    #[test]
    fn lookup_by_column_name() {
        let record = ramp();
        assert_eq!(record.get("Gender"), Some(0.0));
        assert_eq!(record.get("Weight"), Some(9.0));
        assert_eq!(record.get("transporte_Walking"), Some(19.0));
        assert_eq!(record.get("Obesity"), None);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let json = serde_json::to_string(&ramp()).unwrap();
        assert!(json.starts_with(r#"{"Gender":0.0,"family_history":1.0,"#));
        assert!(json.ends_with(r#""transporte_Walking":19.0}"#));
    }

    #[test]
    fn matrix_is_row_major() {
        let a = ramp();
        let b = CanonicalFeatureRecord::from_values([1.5; FEATURE_COUNT]);
        let m = to_matrix(&[a, b]);
        assert_eq!(*m.get((0, 9)), 9.0);
        assert_eq!(*m.get((1, 9)), 1.5);
    }

    #[test]
    fn bytes_cover_every_column() {
        assert_eq!(ramp().to_bytes().len(), FEATURE_COUNT * 8);
    }
}
