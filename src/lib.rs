//! Obesity level prediction from lifestyle and clinical survey answers.
//!
//! A form submission ([`RawObservation`]) is encoded into the exact feature
//! vector the trained classifier expects ([`CanonicalFeatureRecord`]) and
//! handed to a [`Predictor`], which answers with one of seven
//! [`ObesityLevel`]s. The [`analysis`] module summarises the static dataset
//! the model was trained on.

pub mod analysis;
pub mod config;
pub mod encoder;
pub mod error;
pub mod level;
pub mod observation;
pub mod predictor;
pub mod record;
pub mod records;
pub mod schema;
pub mod submission;

pub use encoder::encode;
pub use error::{
    ModelInvocationError, ModelLoadError, ObservationError, PredictionError,
    UnmappableCategoryError,
};
pub use level::ObesityLevel;
pub use observation::RawObservation;
pub use predictor::{ModelArtifact, ModelStore, Predictor};
pub use record::CanonicalFeatureRecord;
pub use submission::{predict_observation, predict_with_store, Prediction};
