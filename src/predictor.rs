//! Prediction invoker: wraps the trained classifier behind `predict`.
//!
//! The model artifact is a JSON file holding the schema it was trained
//! against, its class vocabulary and a serialized smartcore estimator.
//! Loading refuses an artifact whose columns differ from
//! [`FEATURE_COLUMNS`]; at prediction time the record is checked for
//! non-finite values before the estimator sees it.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::DecisionTreeClassifier;

use crate::error::{ModelInvocationError, ModelLoadError};
use crate::level::ObesityLevel;
use crate::record::{to_matrix, CanonicalFeatureRecord};
use crate::schema::{FEATURE_COLUMNS, SCHEMA_VERSION};

pub type TreeModel = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;
pub type ForestModel = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Anything that maps a feature matrix to one class index per row.
pub trait Classifier: Send + Sync {
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<u32>, ModelInvocationError>;

    fn kind(&self) -> &str;
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum Estimator {
    DecisionTree(TreeModel),
    RandomForest(ForestModel),
}

impl Classifier for Estimator {
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<u32>, ModelInvocationError> {
        let out = match self {
            Estimator::DecisionTree(model) => model.predict(x),
            Estimator::RandomForest(model) => model.predict(x),
        };
        out.map_err(|e| ModelInvocationError::Estimator(e.to_string()))
    }

    fn kind(&self) -> &str {
        match self {
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest(_) => "random_forest",
        }
    }
}

/// On-disk form of a trained model.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub feature_columns: Vec<String>,
    /// Estimator output `i` means `classes[i]`.
    pub classes: Vec<ObesityLevel>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Wraps an estimator trained on the current schema with class indices
    /// following [`ObesityLevel::ALL`].
    pub fn new(estimator: Estimator) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            classes: ObesityLevel::ALL.to_vec(),
            estimator,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub struct Predictor {
    classes: Vec<ObesityLevel>,
    classifier: Box<dyn Classifier>,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor")
            .field("kind", &self.classifier.kind())
            .field("classes", &self.classes)
            .finish()
    }
}

impl Predictor {
    pub fn new(classifier: Box<dyn Classifier>, classes: Vec<ObesityLevel>) -> Self {
        Self {
            classes,
            classifier,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Predictor, ModelLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ModelLoadError::Malformed {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        let predictor = Predictor::from_artifact(artifact)?;
        info!("loaded {} model from {:?}", predictor.kind(), path);
        Ok(predictor)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Predictor, ModelLoadError> {
        if artifact.schema_version != SCHEMA_VERSION {
            return Err(ModelLoadError::SchemaVersion {
                expected: SCHEMA_VERSION,
                found: artifact.schema_version,
            });
        }
        if artifact.feature_columns != FEATURE_COLUMNS {
            return Err(ModelLoadError::Columns {
                found: artifact.feature_columns,
            });
        }
        if artifact.classes.is_empty() {
            return Err(ModelLoadError::NoClasses);
        }
        Ok(Predictor::new(Box::new(artifact.estimator), artifact.classes))
    }

    pub fn kind(&self) -> &str {
        self.classifier.kind()
    }

    pub fn classes(&self) -> &[ObesityLevel] {
        &self.classes
    }

    pub fn predict(&self, record: &CanonicalFeatureRecord) -> Result<ObesityLevel, ModelInvocationError> {
        self.predict_batch(std::slice::from_ref(record))?
            .pop()
            .ok_or(ModelInvocationError::LabelCount {
                expected: 1,
                got: 0,
            })
    }

    /// One label per record, in input order.
    pub fn predict_batch(
        &self,
        records: &[CanonicalFeatureRecord],
    ) -> Result<Vec<ObesityLevel>, ModelInvocationError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        for record in records {
            if let Some((column, value)) = record.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ModelInvocationError::NonFinite { column, value });
            }
        }

        let x = to_matrix(records);
        let labels = self.classifier.predict(&x)?;
        if labels.len() != records.len() {
            return Err(ModelInvocationError::LabelCount {
                expected: records.len(),
                got: labels.len(),
            });
        }
        debug!("{} model returned {:?}", self.kind(), labels);

        labels
            .into_iter()
            .map(|label| {
                self.classes
                    .get(label as usize)
                    .copied()
                    .ok_or(ModelInvocationError::UnknownClass(label))
            })
            .collect()
    }
}

/// Loads the model on first use and hands out the same instance afterwards.
#[derive(Debug)]
pub struct ModelStore {
    path: PathBuf,
    predictor: OnceCell<Arc<Predictor>>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            predictor: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.get().is_some()
    }

    /// A failed load leaves the store empty, so the next call retries.
    pub fn get(&self) -> Result<Arc<Predictor>, ModelLoadError> {
        self.predictor
            .get_or_try_init(|| Predictor::load(&self.path).map(Arc::new))
            .map(Arc::clone)
    }
}
