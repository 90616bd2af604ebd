//! Feature schema the classifier was trained against.
//!
//! Column order and every category code live here and nowhere else. The
//! encoder, the predictor's artifact check and the test fixtures all read
//! from these tables, so a change to the trained schema is a change to this
//! file and a bump of [`SCHEMA_VERSION`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Bumped whenever a column, its position or a code changes.
pub const SCHEMA_VERSION: u32 = 1;

pub const FEATURE_COUNT: usize = 20;

/// Model input columns, in the order the model consumes them.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    // binary
    "Gender",
    "family_history",
    "FAVC",
    "SMOKE",
    "SCC",
    // ordinal
    "CAEC",
    "CALC",
    // numeric
    "Age",
    "Height",
    "Weight",
    "FCVC",
    "NCP",
    "CH2O",
    "FAF",
    "TUE",
    // transport dummies
    "transporte_Automobile",
    "transporte_Bike",
    "transporte_Motorbike",
    "transporte_Public_Transportation",
    "transporte_Walking",
];

pub const GENDER: usize = 0;
pub const FAMILY_HISTORY: usize = 1;
pub const FAVC: usize = 2;
pub const SMOKE: usize = 3;
pub const SCC: usize = 4;
pub const CAEC: usize = 5;
pub const CALC: usize = 6;
pub const AGE: usize = 7;
pub const HEIGHT: usize = 8;
pub const WEIGHT: usize = 9;
pub const FCVC: usize = 10;
pub const NCP: usize = 11;
pub const CH2O: usize = 12;
pub const FAF: usize = 13;
pub const TUE: usize = 14;
/// First of the five one-hot transport columns.
pub const TRANSPORT_START: usize = 15;
pub const TRANSPORT_COUNT: usize = 5;

/// A categorical input and the labels it accepts.
///
/// Each entry is `(label, code)`. Every category is listed under its pt-BR
/// form label, its dataset label and its snake-case identifier, all sharing
/// one code.
#[derive(Debug)]
pub struct Vocabulary {
    pub name: &'static str,
    pub entries: &'static [(&'static str, u8)],
}

impl Vocabulary {
    pub fn code(&self, label: &str) -> Option<u8> {
        LOOKUP
            .get(self.name)
            .and_then(|codes| codes.get(label.trim()))
            .copied()
    }

    /// Labels in the dataset's own spelling, one per code.
    pub fn canonical_labels(&self) -> Vec<&'static str> {
        let mut out: Vec<(u8, &'static str)> = Vec::new();
        for (label, code) in self.entries {
            if !out.iter().any(|(c, _)| c == code) {
                out.push((*code, *label));
            }
        }
        out.sort_by_key(|(code, _)| *code);
        out.into_iter().map(|(_, label)| label).collect()
    }
}

// Male = 0 / Female = 1.
pub static GENDER_CODES: Vocabulary = Vocabulary {
    name: "gender",
    entries: &[
        ("Male", 0),
        ("Masculino", 0),
        ("male", 0),
        ("Female", 1),
        ("Feminino", 1),
        ("female", 1),
    ],
};

pub static YES_NO_CODES: Vocabulary = Vocabulary {
    name: "yes_no",
    entries: &[
        ("no", 0),
        ("Não", 0),
        ("false", 0),
        ("yes", 1),
        ("Sim", 1),
        ("true", 1),
    ],
};

pub static EATS_BETWEEN_MEALS_CODES: Vocabulary = Vocabulary {
    name: "eats_between_meals",
    entries: &[
        ("no", 0),
        ("Não", 0),
        ("never", 0),
        ("Sometimes", 1),
        ("Às vezes", 1),
        ("sometimes", 1),
        ("Frequently", 2),
        ("Frequentemente", 2),
        ("frequently", 2),
        ("Always", 3),
        ("Sempre", 3),
        ("always", 3),
    ],
};

pub static ALCOHOL_CODES: Vocabulary = Vocabulary {
    name: "alcohol_consumption",
    entries: &[
        ("no", 0),
        ("Não consome", 0),
        ("never", 0),
        ("Sometimes", 1),
        ("Às vezes", 1),
        ("sometimes", 1),
        ("Frequently", 2),
        ("Frequentemente", 2),
        ("frequently", 2),
        ("Always", 3),
        ("Sempre", 3),
        ("always", 3),
    ],
};

/// Code is the offset from [`TRANSPORT_START`].
pub static TRANSPORT_CODES: Vocabulary = Vocabulary {
    name: "transport_mode",
    entries: &[
        ("Automobile", 0),
        ("Automóvel", 0),
        ("automobile", 0),
        ("Bike", 1),
        ("Bicicleta", 1),
        ("bicycle", 1),
        ("Motorbike", 2),
        ("Motocicleta", 2),
        ("motorbike", 2),
        ("Public_Transportation", 3),
        ("Transporte público", 3),
        ("public_transport", 3),
        ("Walking", 4),
        ("Caminhada", 4),
        ("walking", 4),
    ],
};

pub static VOCABULARIES: [&Vocabulary; 5] = [
    &GENDER_CODES,
    &YES_NO_CODES,
    &EATS_BETWEEN_MEALS_CODES,
    &ALCOHOL_CODES,
    &TRANSPORT_CODES,
];

static LOOKUP: Lazy<HashMap<&'static str, HashMap<&'static str, u8>>> = Lazy::new(|| {
    VOCABULARIES
        .iter()
        .map(|vocabulary| {
            let codes: HashMap<&'static str, u8> = vocabulary.entries.iter().copied().collect();
            (vocabulary.name, codes)
        })
        .collect()
});

pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|column| *column == name)
}
