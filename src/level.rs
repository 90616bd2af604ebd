use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownLevel;

/// The classifier's output vocabulary, lightest to heaviest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObesityLevel {
    #[serde(rename = "Insufficient_Weight")]
    InsufficientWeight,
    #[serde(rename = "Normal_Weight")]
    NormalWeight,
    #[serde(rename = "Overweight_Level_I")]
    OverweightLevelI,
    #[serde(rename = "Overweight_Level_II")]
    OverweightLevelII,
    #[serde(rename = "Obesity_Type_I")]
    ObesityTypeI,
    #[serde(rename = "Obesity_Type_II")]
    ObesityTypeII,
    #[serde(rename = "Obesity_Type_III")]
    ObesityTypeIII,
}

impl ObesityLevel {
    pub const ALL: [ObesityLevel; 7] = [
        ObesityLevel::InsufficientWeight,
        ObesityLevel::NormalWeight,
        ObesityLevel::OverweightLevelI,
        ObesityLevel::OverweightLevelII,
        ObesityLevel::ObesityTypeI,
        ObesityLevel::ObesityTypeII,
        ObesityLevel::ObesityTypeIII,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Label as it appears in the dataset's `Obesity` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ObesityLevel::InsufficientWeight => "Insufficient_Weight",
            ObesityLevel::NormalWeight => "Normal_Weight",
            ObesityLevel::OverweightLevelI => "Overweight_Level_I",
            ObesityLevel::OverweightLevelII => "Overweight_Level_II",
            ObesityLevel::ObesityTypeI => "Obesity_Type_I",
            ObesityLevel::ObesityTypeII => "Obesity_Type_II",
            ObesityLevel::ObesityTypeIII => "Obesity_Type_III",
        }
    }

    /// Display label for the pt-BR interface.
    pub fn label_pt(self) -> &'static str {
        match self {
            ObesityLevel::InsufficientWeight => "Abaixo do peso",
            ObesityLevel::NormalWeight => "Peso normal",
            ObesityLevel::OverweightLevelI => "Sobrepeso I",
            ObesityLevel::OverweightLevelII => "Sobrepeso II",
            ObesityLevel::ObesityTypeI => "Obesidade I",
            ObesityLevel::ObesityTypeII => "Obesidade II",
            ObesityLevel::ObesityTypeIII => "Obesidade III",
        }
    }

    pub fn is_obese(self) -> bool {
        self >= ObesityLevel::ObesityTypeI
    }
}

impl fmt::Display for ObesityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObesityLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_follows_severity() {
        for (i, level) in ObesityLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn parses_dataset_labels() {
        assert_eq!("Overweight_Level_II".parse(), Ok(ObesityLevel::OverweightLevelII));
        assert_eq!(
            "Obesity_Type_IV".parse::<ObesityLevel>(),
            Err(UnknownLevel("Obesity_Type_IV".to_string()))
        );
        assert_eq!(
            UnknownLevel("x".into()).to_string(),
            r#"unknown obesity level "x""#
        );
    }

    #[test]
    fn serde_uses_dataset_labels() {
        let json = serde_json::to_string(&ObesityLevel::ObesityTypeIII).unwrap();
        assert_eq!(json, r#""Obesity_Type_III""#);
    }

    #[test]
    fn obese_levels() {
        let obese: Vec<_> = ObesityLevel::ALL.iter().filter(|l| l.is_obese()).collect();
        assert_eq!(obese.len(), 3);
        assert_eq!(ObesityLevel::ObesityTypeI.label_pt(), "Obesidade I");
    }
}
