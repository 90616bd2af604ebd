//! RawObservation -> CanonicalFeatureRecord.
//!
//! Pure and deterministic. A label missing from its code table is an error;
//! nothing falls back to a default code, since a wrong code produces a wrong
//! prediction with no other signal.

use log::trace;

use crate::error::UnmappableCategoryError;
use crate::observation::RawObservation;
use crate::record::CanonicalFeatureRecord;
use crate::schema::{self, Vocabulary, FEATURE_COUNT};

pub fn encode(observation: &RawObservation) -> Result<CanonicalFeatureRecord, UnmappableCategoryError> {
    let mut values = [0.0; FEATURE_COUNT];

    // binary
    values[schema::GENDER] = code(&schema::GENDER_CODES, "gender", &observation.gender)?;
    values[schema::FAMILY_HISTORY] = code(
        &schema::YES_NO_CODES,
        "family_history_overweight",
        &observation.family_history_overweight,
    )?;
    values[schema::FAVC] = code(
        &schema::YES_NO_CODES,
        "high_caloric_food_frequent",
        &observation.high_caloric_food_frequent,
    )?;
    values[schema::SMOKE] = code(&schema::YES_NO_CODES, "smokes", &observation.smokes)?;
    values[schema::SCC] = code(
        &schema::YES_NO_CODES,
        "monitors_calories",
        &observation.monitors_calories,
    )?;

    // ordinal
    values[schema::CAEC] = code(
        &schema::EATS_BETWEEN_MEALS_CODES,
        "eats_between_meals",
        &observation.eats_between_meals,
    )?;
    values[schema::CALC] = code(
        &schema::ALCOHOL_CODES,
        "alcohol_consumption",
        &observation.alcohol_consumption,
    )?;

    // numeric, unchanged
    values[schema::AGE] = observation.age as f64;
    values[schema::HEIGHT] = observation.height;
    values[schema::WEIGHT] = observation.weight;
    values[schema::FCVC] = observation.vegetable_frequency;
    values[schema::NCP] = observation.meals_per_day;
    values[schema::CH2O] = observation.water_intake;
    values[schema::FAF] = observation.physical_activity_frequency;
    values[schema::TUE] = observation.screen_time;

    // one-hot transport; the other four dummies stay 0
    let offset = code(
        &schema::TRANSPORT_CODES,
        "transport_mode",
        &observation.transport_mode,
    )? as usize;
    values[schema::TRANSPORT_START + offset] = 1.0;

    let record = CanonicalFeatureRecord::from_values(values);
    trace!("encoded {:?}", record);
    Ok(record)
}

fn code(vocabulary: &Vocabulary, field: &'static str, label: &str) -> Result<f64, UnmappableCategoryError> {
    vocabulary
        .code(label)
        .map(f64::from)
        .ok_or_else(|| UnmappableCategoryError {
            field,
            value: label.to_string(),
        })
}

impl TryFrom<RawObservation> for CanonicalFeatureRecord {
    type Error = UnmappableCategoryError;

    fn try_from(observation: RawObservation) -> Result<Self, Self::Error> {
        encode(&observation)
    }
}
