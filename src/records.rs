use polars::prelude::{DataType, Field, Schema};

/// Column holding the class label in the dataset.
pub static TARGET: &str = "Obesity";

/// Survey columns whose answers sit on a 0–3 or 1–3 scale, plus age; the
/// dataset stores them with synthetic decimals.
pub static ROUNDED_COLUMNS: [&str; 6] = ["Age", "FCVC", "NCP", "CH2O", "FAF", "TUE"];

/// One row of the historical observations file.
pub struct ObesityRecord {}

impl ObesityRecord {
    pub fn raw_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("Gender", DataType::Utf8),
            Field::new("Age", DataType::Float64),
            Field::new("Height", DataType::Float64),
            Field::new("Weight", DataType::Float64),
            Field::new("family_history", DataType::Utf8),
            Field::new("FAVC", DataType::Utf8),
            Field::new("FCVC", DataType::Float64),
            Field::new("NCP", DataType::Float64),
            Field::new("CAEC", DataType::Utf8),
            Field::new("SMOKE", DataType::Utf8),
            Field::new("CH2O", DataType::Float64),
            Field::new("SCC", DataType::Utf8),
            Field::new("FAF", DataType::Float64),
            Field::new("TUE", DataType::Float64),
            Field::new("CALC", DataType::Utf8),
            Field::new("MTRANS", DataType::Utf8),
            Field::new(TARGET, DataType::Utf8),
        ])
    }
}
