use std::io::Read;

use log::{debug, info};
use serde::Serialize;

use crate::encoder::encode;
use crate::error::PredictionError;
use crate::level::ObesityLevel;
use crate::observation::RawObservation;
use crate::predictor::{ModelStore, Predictor};
use crate::record::CanonicalFeatureRecord;

pub const DISCLAIMER: &str = "Este resultado é apenas um apoio à decisão e não substitui \
     a avaliação de um profissional de saúde.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub level: ObesityLevel,
    pub record: CanonicalFeatureRecord,
}

/// One submission as JSON.
pub fn parse_submission<R: Read>(reader: R) -> Result<RawObservation, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// A CSV of submissions, one per row, headed by the field names.
pub fn read_batch<R: Read>(reader: R) -> Result<Vec<RawObservation>, csv::Error> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

fn prepare(observation: RawObservation) -> Result<CanonicalFeatureRecord, PredictionError> {
    observation.validate()?;
    Ok(CanonicalFeatureRecord::try_from(observation)?)
}

fn prepare_all(
    observations: &[RawObservation],
) -> Result<Vec<CanonicalFeatureRecord>, PredictionError> {
    let mut records = Vec::with_capacity(observations.len());
    for observation in observations {
        observation.validate()?;
        records.push(encode(observation)?);
    }
    Ok(records)
}

/// Handles one form submission: validate, encode, predict.
pub fn predict_observation(
    predictor: &Predictor,
    observation: RawObservation,
) -> Result<Prediction, PredictionError> {
    let record = prepare(observation)?;
    let level = predictor.predict(&record)?;
    info!("predicted {}", level);
    Ok(Prediction { level, record })
}

/// Like [`predict_observation`], but the model is only loaded once the
/// submission has been validated and encoded.
pub fn predict_with_store(
    store: &ModelStore,
    observation: RawObservation,
) -> Result<Prediction, PredictionError> {
    let record = prepare(observation)?;
    debug!("loading model from {:?}", store.path());
    let level = store.get()?.predict(&record)?;
    info!("predicted {}", level);
    Ok(Prediction { level, record })
}

/// Batch form of [`predict_observation`]; the first bad row aborts the batch.
pub fn predict_observations(
    predictor: &Predictor,
    observations: &[RawObservation],
) -> Result<Vec<Prediction>, PredictionError> {
    let records = prepare_all(observations)?;
    predict_records(predictor, records)
}

/// Batch form of [`predict_with_store`].
pub fn predict_batch_with_store(
    store: &ModelStore,
    observations: &[RawObservation],
) -> Result<Vec<Prediction>, PredictionError> {
    let records = prepare_all(observations)?;
    debug!("loading model from {:?}", store.path());
    predict_records(&*store.get()?, records)
}

fn predict_records(
    predictor: &Predictor,
    records: Vec<CanonicalFeatureRecord>,
) -> Result<Vec<Prediction>, PredictionError> {
    let levels = predictor.predict_batch(&records)?;
    info!("predicted {} observations", levels.len());
    Ok(levels
        .into_iter()
        .zip(records)
        .map(|(level, record)| Prediction { level, record })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = "\
gender,age,height,weight,family_history_overweight,high_caloric_food_frequent,vegetable_frequency,meals_per_day,eats_between_meals,water_intake,monitors_calories,physical_activity_frequency,screen_time,alcohol_consumption,smokes,transport_mode
Feminino,31,1.62,58.5,Não,true,3,3,Às vezes,2.5,Não,2,0.5,Não consome,Não,Transporte público
Male,45,1.80,102.0,yes,Sim,2,4,Frequently,1.0,false,0,2,Sometimes,no,Automobile
";

    #[test]
    fn reads_a_pt_br_batch() {
        let batch = read_batch(BATCH.as_bytes()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].gender, "Feminino");
        assert_eq!(batch[0].high_caloric_food_frequent, "yes");
        assert_eq!(batch[0].eats_between_meals, "Às vezes");
        assert_eq!(batch[0].transport_mode, "Transporte público");
        assert_eq!(batch[1].monitors_calories, "no");
        assert_eq!(batch[1].weight, 102.0);

        let records = prepare_all(&batch).unwrap();
        assert_eq!(records[0].get("FAVC"), Some(1.0));
        assert_eq!(records[0].get("CALC"), Some(0.0));
        assert_eq!(records[0].get("transporte_Public_Transportation"), Some(1.0));
        assert_eq!(records[1].get("Gender"), Some(0.0));
        assert_eq!(records[1].get("SCC"), Some(0.0));
    }

    #[test]
    fn batch_with_missing_column_is_an_error() {
        let csv = "gender,age\nMale,30\n";
        assert!(read_batch(csv.as_bytes()).is_err());
    }

    #[test]
    fn parses_a_json_submission() {
        let json = serde_json::to_string(&RawObservation::default()).unwrap();
        let obs = parse_submission(json.as_bytes()).unwrap();
        assert_eq!(obs, RawObservation::default());

        assert!(parse_submission(&b"{\"gender\": \"Male\"}"[..]).is_err());
    }
}
