use std::path::PathBuf;

static DEFAULT_MODEL_PATH: &str = "model.json";
static DEFAULT_DATASET_PATH: &str = "Data/Obesity.csv";

pub static MODEL_PATH_VAR: &str = "OBESITY_MODEL_PATH";
pub static DATASET_PATH_VAR: &str = "OBESITY_DATASET_PATH";

/// Where the model artifact and the static dataset live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for the path variables.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();
        if let Some(path) = lookup(MODEL_PATH_VAR).filter(|v| !v.is_empty()) {
            settings.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(DATASET_PATH_VAR).filter(|v| !v.is_empty()) {
            settings.dataset_path = PathBuf::from(path);
        }
        settings
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, model_path: Option<PathBuf>, dataset_path: Option<PathBuf>) -> Self {
        if let Some(path) = model_path {
            self.model_path = path;
        }
        if let Some(path) = dataset_path {
            self.dataset_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model_path, PathBuf::from("model.json"));
    }

    #[test]
    fn environment_then_flags() {
        let env: HashMap<&str, &str> = [
            (MODEL_PATH_VAR, "/srv/models/xgb.json"),
            (DATASET_PATH_VAR, ""),
        ]
        .into_iter()
        .collect();
        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.model_path, PathBuf::from("/srv/models/xgb.json"));
        assert_eq!(settings.dataset_path, PathBuf::from("Data/Obesity.csv"));

        let settings = settings.with_overrides(None, Some(PathBuf::from("obesity.csv")));
        assert_eq!(settings.model_path, PathBuf::from("/srv/models/xgb.json"));
        assert_eq!(settings.dataset_path, PathBuf::from("obesity.csv"));
    }
}
