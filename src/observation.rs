use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::ObservationError;

/// One form submission, as the user filled it in.
///
/// Categorical and yes/no fields hold the label picked on the form (pt-BR,
/// dataset spelling or snake-case identifier); the encoder resolves them
/// through the code tables in [`crate::schema`]. Yes/no fields also accept
/// a boolean, stored as the dataset's `yes` / `no` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub gender: String,
    pub age: u32,
    /// Meters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    #[serde(deserialize_with = "yes_no_label")]
    pub family_history_overweight: String,
    #[serde(deserialize_with = "yes_no_label")]
    pub high_caloric_food_frequent: String,
    pub vegetable_frequency: f64,
    pub meals_per_day: f64,
    pub eats_between_meals: String,
    pub water_intake: f64,
    #[serde(deserialize_with = "yes_no_label")]
    pub monitors_calories: String,
    pub physical_activity_frequency: f64,
    pub screen_time: f64,
    pub alcohol_consumption: String,
    #[serde(deserialize_with = "yes_no_label")]
    pub smokes: String,
    pub transport_mode: String,
}

/// Accepts a yes/no field as either a label or a boolean.
fn yes_no_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct YesNo;

    impl<'de> Visitor<'de> for YesNo {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a yes/no label or a boolean")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(if v { "yes" } else { "no" }.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }
    }

    deserializer.deserialize_any(YesNo)
}

impl RawObservation {
    /// Checks the numeric fields against the ranges the form enforces.
    ///
    /// The encoder assumes this has passed; it does not re-check ranges.
    pub fn validate(&self) -> Result<(), ObservationError> {
        check("age", self.age as f64, 1.0, 100.0)?;
        check("height", self.height, 1.0, 2.5)?;
        check("weight", self.weight, 30.0, 300.0)?;
        check("vegetable_frequency", self.vegetable_frequency, 1.0, 3.0)?;
        check("meals_per_day", self.meals_per_day, 1.0, 4.0)?;
        check("water_intake", self.water_intake, 1.0, 3.0)?;
        check(
            "physical_activity_frequency",
            self.physical_activity_frequency,
            0.0,
            3.0,
        )?;
        check("screen_time", self.screen_time, 0.0, 3.0)?;
        Ok(())
    }
}

fn check(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ObservationError> {
    // NaN fails both comparisons, so test for containment rather than exclusion
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ObservationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Default for RawObservation {
    /// The form's initial state.
    fn default() -> Self {
        Self {
            gender: "Masculino".to_string(),
            age: 25,
            height: 1.70,
            weight: 70.0,
            family_history_overweight: "Sim".to_string(),
            high_caloric_food_frequent: "Sim".to_string(),
            vegetable_frequency: 2.0,
            meals_per_day: 3.0,
            eats_between_meals: "Não".to_string(),
            water_intake: 2.0,
            monitors_calories: "Sim".to_string(),
            physical_activity_frequency: 1.0,
            screen_time: 1.0,
            alcohol_consumption: "Não consome".to_string(),
            smokes: "Sim".to_string(),
            transport_mode: "Transporte público".to_string(),
        }
    }
}
