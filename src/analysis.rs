//! Exploratory tables over the historical observations file.
//!
//! Everything here reads the static dataset only; nothing feeds back into
//! the encoder or the model.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use polars::frame::DataFrame;
use polars::prelude::*;

use crate::level::ObesityLevel;
use crate::records::{ObesityRecord, ROUNDED_COLUMNS, TARGET};
use crate::schema::{self, Vocabulary};

/// Upper edges of the age bands; band `i` is `(AGE_EDGES[i], AGE_EDGES[i + 1]]`.
const AGE_EDGES: [f64; 12] = [
    10.0, 14.0, 19.0, 24.0, 29.0, 34.0, 39.0, 44.0, 49.0, 54.0, 59.0, 100.0,
];
const AGE_BANDS: [&str; 11] = [
    "10–14", "15–19", "20–24", "25–29", "30–34", "35–39", "40–44", "45–49", "50–54", "55–59",
    "60+",
];

pub fn read_dataset<P: AsRef<Path>>(path: P) -> PolarsResult<DataFrame> {
    let file = File::open(path)?;

    CsvReader::new(file)
        .has_header(true)
        .with_dtypes(Option::from(Arc::new(ObesityRecord::raw_schema())))
        .finish()
}

pub fn write_csv<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> PolarsResult<()> {
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file).finish(df)?;

    Ok(())
}

/// Rounds the survey scales and age to whole numbers.
pub fn round_ordinal_columns(df: DataFrame) -> PolarsResult<DataFrame> {
    let rounded: Vec<Expr> = ROUNDED_COLUMNS
        .iter()
        .map(|name| col(name).round(0))
        .collect();
    df.lazy().with_columns(rounded).collect()
}

/// Rows per obesity level, in level order. Levels absent from the data count 0.
pub fn class_distribution(df: &DataFrame) -> PolarsResult<Vec<(ObesityLevel, u32)>> {
    let counts = df
        .clone()
        .lazy()
        .groupby([col(TARGET)])
        .agg([count().alias("count")])
        .collect()?;

    let mut out: Vec<(ObesityLevel, u32)> = ObesityLevel::ALL.iter().map(|l| (*l, 0)).collect();
    let labels = counts.column(TARGET)?.utf8()?;
    let totals = counts.column("count")?.cast(&DataType::UInt32)?;
    for (label, total) in labels.into_iter().zip(totals.u32()?.into_iter()) {
        let (Some(label), Some(total)) = (label, total) else {
            continue;
        };
        match label.parse::<ObesityLevel>() {
            Ok(level) => out[level.index()].1 = total,
            Err(e) => warn!("skipping {} rows: {}", total, e),
        }
    }
    Ok(out)
}

/// Two-way table of counts (or shares, after [`CrossTab::normalize_rows`]).
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub row_column: String,
    pub column: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl CrossTab {
    pub fn cell(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.row_labels.iter().position(|l| l == row)?;
        let j = self.column_labels.iter().position(|l| l == column)?;
        Some(self.cells[i][j])
    }

    /// Each row divided by its total. All-zero rows stay zero.
    pub fn normalize_rows(mut self) -> Self {
        for row in self.cells.iter_mut() {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                row.iter_mut().for_each(|v| *v /= total);
            }
        }
        self
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut series = vec![Series::new(&self.row_column, self.row_labels.clone())];
        for (j, label) in self.column_labels.iter().enumerate() {
            let values: Vec<f64> = self.cells.iter().map(|row| row[j]).collect();
            series.push(Series::new(label, values));
        }
        DataFrame::new(series)
    }

    /// Replaces survey scale values (`FCVC`, `CH2O`, `FAF`, `TUE`) with the
    /// pt-BR labels shown on the dashboard. Other labels are left as is.
    pub fn localized(mut self) -> Self {
        relabel(&self.row_column, &mut self.row_labels);
        relabel(&self.column, &mut self.column_labels);
        self
    }
}

fn relabel(column: &str, labels: &mut [String]) {
    for label in labels.iter_mut() {
        if let Some(display) = scale_label(column, label) {
            *label = display.to_string();
        }
    }
}

/// Display label for one value of a rounded survey scale.
fn scale_label(column: &str, value: &str) -> Option<&'static str> {
    let value = value.trim().parse::<f64>().ok()?.round() as i64;
    let label = match (column, value) {
        ("FCVC", 1) => "Raramente",
        ("FCVC", 2) => "Às vezes",
        ("FCVC", 3) => "Sempre",
        ("CH2O", 1) => "Menos de 1L",
        ("CH2O", 2) => "1 a 2L",
        ("CH2O", 3) => "Mais de 2L",
        ("FAF", 0) => "Nenhuma",
        ("FAF", 1) => "1–2x/sem",
        ("FAF", 2) => "3–4x/sem",
        ("FAF", 3) => "≥5x/sem",
        ("TUE", 0) => "0–2h",
        ("TUE", 1) => "3–5h",
        ("TUE", 2) => ">5h",
        _ => return None,
    };
    Some(label)
}

impl fmt::Display for CrossTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self
            .row_labels
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(self.row_column.chars().count()))
            .max()
            .unwrap_or(0);
        write!(f, "{:<first$}", self.row_column)?;
        for label in &self.column_labels {
            write!(f, " {:>12}", label)?;
        }
        writeln!(f)?;
        for (label, row) in self.row_labels.iter().zip(&self.cells) {
            write!(f, "{:<first$}", label)?;
            for value in row {
                if value.fract() == 0.0 {
                    write!(f, " {:>12}", value)?;
                } else {
                    write!(f, " {:>12.3}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Counts of every (`rows`, `columns`) value pair.
///
/// Numeric columns are compared by their text form, so round them first.
pub fn crosstab(df: &DataFrame, rows: &str, columns: &str) -> PolarsResult<CrossTab> {
    let grouped = df
        .clone()
        .lazy()
        .select([
            col(rows).cast(DataType::Utf8).alias("row"),
            col(columns).cast(DataType::Utf8).alias("column"),
        ])
        .groupby([col("row"), col("column")])
        .agg([count().alias("count")])
        .collect()?;

    let row_values = grouped.column("row")?.utf8()?;
    let column_values = grouped.column("column")?.utf8()?;
    let totals = grouped.column("count")?.cast(&DataType::Float64)?;

    let mut pairs: BTreeMap<(String, String), f64> = BTreeMap::new();
    for ((row, column), total) in row_values
        .into_iter()
        .zip(column_values.into_iter())
        .zip(totals.f64()?.into_iter())
    {
        if let (Some(row), Some(column), Some(total)) = (row, column, total) {
            pairs.insert((row.to_string(), column.to_string()), total);
        }
    }

    let row_labels = order_labels(rows, pairs.keys().map(|(r, _)| r.as_str()));
    let column_labels = order_labels(columns, pairs.keys().map(|(_, c)| c.as_str()));
    let cells = row_labels
        .iter()
        .map(|r| {
            column_labels
                .iter()
                .map(|c| pairs.get(&(r.clone(), c.clone())).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();
    debug!("crosstab {} x {}: {} pairs", rows, columns, pairs.len());

    Ok(CrossTab {
        row_column: rows.to_string(),
        column: columns.to_string(),
        row_labels,
        column_labels,
        cells,
    })
}

/// Within each obesity level, the share of each value of `column`.
pub fn share_by_level(df: &DataFrame, column: &str) -> PolarsResult<CrossTab> {
    Ok(crosstab(df, TARGET, column)?.normalize_rows())
}

/// Within each gender, the share of each value of `column`.
pub fn share_by_gender(df: &DataFrame, column: &str) -> PolarsResult<CrossTab> {
    Ok(crosstab(df, "Gender", column)?.normalize_rows())
}

/// Counts of each value of `column`, split by gender.
pub fn counts_by_gender(df: &DataFrame, column: &str) -> PolarsResult<CrossTab> {
    crosstab(df, column, "Gender")
}

/// Obese rows (types I–III) by age band and gender.
pub fn age_pyramid(df: &DataFrame) -> PolarsResult<CrossTab> {
    let ages = df.column("Age")?.cast(&DataType::Float64)?;
    let genders = df.column("Gender")?.utf8()?;
    let levels = df.column(TARGET)?.utf8()?;

    let column_labels = schema::GENDER_CODES.canonical_labels();
    let mut cells = vec![vec![0.0; column_labels.len()]; AGE_BANDS.len()];
    for ((age, gender), level) in ages
        .f64()?
        .into_iter()
        .zip(genders.into_iter())
        .zip(levels.into_iter())
    {
        let (Some(age), Some(gender), Some(level)) = (age, gender, level) else {
            continue;
        };
        if !level.parse::<ObesityLevel>().map_or(false, |l| l.is_obese()) {
            continue;
        }
        let (Some(band), Some(j)) = (age_band(age), column_labels.iter().position(|g| *g == gender))
        else {
            continue;
        };
        cells[band][j] += 1.0;
    }

    Ok(CrossTab {
        row_column: "age_band".to_string(),
        column: "Gender".to_string(),
        row_labels: AGE_BANDS.iter().map(|b| b.to_string()).collect(),
        column_labels: column_labels.iter().map(|g| g.to_string()).collect(),
        cells,
    })
}

fn age_band(age: f64) -> Option<usize> {
    AGE_EDGES
        .windows(2)
        .position(|edge| age > edge[0] && age <= edge[1])
}

fn vocabulary_for(column: &str) -> Option<&'static Vocabulary> {
    match column {
        "Gender" => Some(&schema::GENDER_CODES),
        "family_history" | "FAVC" | "SMOKE" | "SCC" => Some(&schema::YES_NO_CODES),
        "CAEC" => Some(&schema::EATS_BETWEEN_MEALS_CODES),
        "CALC" => Some(&schema::ALCOHOL_CODES),
        "MTRANS" => Some(&schema::TRANSPORT_CODES),
        _ => None,
    }
}

/// Known categories in code order, then anything else sorted.
fn order_labels<'a>(column: &str, seen: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut rest: Vec<&str> = seen.collect();
    rest.sort();
    rest.dedup();

    let known: Vec<&str> = if column == TARGET {
        ObesityLevel::ALL.iter().map(|l| l.as_str()).collect()
    } else if let Some(vocabulary) = vocabulary_for(column) {
        vocabulary.canonical_labels()
    } else {
        Vec::new()
    };

    let mut out: Vec<String> = known
        .iter()
        .filter(|k| rest.contains(k))
        .map(|k| k.to_string())
        .collect();
    out.extend(
        rest.into_iter()
            .filter(|r| !known.contains(r))
            .map(|r| r.to_string()),
    );
    out
}

/// The tables the exploratory page shows.
#[derive(Debug, Clone)]
pub struct Report {
    pub class_distribution: Vec<(ObesityLevel, u32)>,
    pub tables: Vec<(String, CrossTab)>,
}

impl Report {
    pub fn build(df: DataFrame) -> PolarsResult<Report> {
        let df = round_ordinal_columns(df)?;
        let tables: Vec<(&str, CrossTab)> = vec![
            ("obese_by_age_and_gender", age_pyramid(&df)?),
            ("high_caloric_food_by_gender", counts_by_gender(&df, "FAVC")?),
            ("vegetables_by_gender", counts_by_gender(&df, "FCVC")?),
            ("meals_by_gender", counts_by_gender(&df, "NCP")?),
            ("alcohol_by_gender", counts_by_gender(&df, "CALC")?),
            ("screen_time_by_gender", counts_by_gender(&df, "TUE")?),
            ("high_caloric_food_by_level", share_by_level(&df, "FAVC")?),
            ("water_by_level", share_by_level(&df, "CH2O")?),
            ("activity_by_gender", share_by_gender(&df, "FAF")?),
            ("activity_by_level", share_by_level(&df, "FAF")?),
        ];
        Ok(Report {
            class_distribution: class_distribution(&df)?,
            tables: tables
                .into_iter()
                .map(|(name, table)| (name.to_string(), table.localized()))
                .collect(),
        })
    }

    /// Writes one CSV per table into `dir`.
    pub fn export(&self, dir: &Path) -> PolarsResult<()> {
        std::fs::create_dir_all(dir)?;
        for (name, table) in &self.tables {
            let mut df = table.to_dataframe()?;
            write_csv(dir.join(format!("{name}.csv")), &mut df)?;
        }
        let mut distribution = DataFrame::new(vec![
            Series::new(
                TARGET,
                self.class_distribution
                    .iter()
                    .map(|(l, _)| l.as_str())
                    .collect::<Vec<_>>(),
            ),
            Series::new(
                "count",
                self.class_distribution
                    .iter()
                    .map(|(_, n)| *n)
                    .collect::<Vec<_>>(),
            ),
        ])?;
        write_csv(dir.join("class_distribution.csv"), &mut distribution)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# class_distribution")?;
        for (level, count) in &self.class_distribution {
            writeln!(f, "{:<20} {:>6}  {}", level.as_str(), count, level.label_pt())?;
        }
        for (name, table) in &self.tables {
            writeln!(f)?;
            writeln!(f, "# {name}")?;
            write!(f, "{table}")?;
        }
        Ok(())
    }
}
