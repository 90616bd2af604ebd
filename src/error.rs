use std::path::PathBuf;

use thiserror::Error;

/// A categorical label with no entry in its code table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no code for {field} value {value:?}")]
pub struct UnmappableCategoryError {
    pub field: &'static str,
    pub value: String,
}

/// A class label outside the obesity level vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown obesity level {0:?}")]
pub struct UnknownLevel(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("could not read model artifact {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact {path:?}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact built for schema version {found}, expected {expected}")]
    SchemaVersion { expected: u32, found: u32 },
    #[error("artifact columns {found:?} do not match the feature schema")]
    Columns { found: Vec<String> },
    #[error("artifact declares no classes")]
    NoClasses,
}

/// The model rejected or failed on a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelInvocationError {
    #[error("feature {column} is not finite ({value})")]
    NonFinite { column: &'static str, value: f64 },
    #[error("model failed: {0}")]
    Estimator(String),
    #[error("model returned class {0}, which the artifact does not declare")]
    UnknownClass(u32),
    #[error("model returned {got} labels for {expected} records")]
    LabelCount { expected: usize, got: usize },
}

/// Everything that can stop one submission from producing a prediction.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("no prediction could be produced: {0}")]
    Observation(#[from] ObservationError),
    #[error("no prediction could be produced: {0}")]
    Encoding(#[from] UnmappableCategoryError),
    #[error("no prediction could be produced: {0}")]
    Model(#[from] ModelLoadError),
    #[error("no prediction could be produced: {0}")]
    Invocation(#[from] ModelInvocationError),
}

/// `err` followed by each of its sources, joined with `": "`.
///
/// A source whose message already ends the text so far is skipped, so
/// wrappers that repeat their cause are not printed twice.
pub fn render_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !out.ends_with(&message) {
            out.push_str(": ");
            out.push_str(&message);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_every_cause_once() {
        let err = PredictionError::from(ModelLoadError::Io {
            path: PathBuf::from("/srv/model.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
        assert_eq!(
            render_chain(&err),
            r#"no prediction could be produced: could not read model artifact "/srv/model.json": file not found"#
        );
    }

    #[test]
    fn chain_of_a_leaf_error_is_its_message() {
        let err = PredictionError::from(ObservationError::OutOfRange {
            field: "weight",
            value: 500.0,
            min: 30.0,
            max: 300.0,
        });
        assert_eq!(
            render_chain(&err),
            "no prediction could be produced: weight = 500 is outside 30..=300"
        );
    }
}
