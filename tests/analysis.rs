use obesity_predictor::analysis::{
    age_pyramid, class_distribution, counts_by_gender, read_dataset, round_ordinal_columns,
    share_by_level, Report,
};
use obesity_predictor::ObesityLevel;
use polars::frame::DataFrame;
use polars::prelude::TakeRandom;

const DATASET: &str = "\
Gender,Age,Height,Weight,family_history,FAVC,FCVC,NCP,CAEC,SMOKE,CH2O,SCC,FAF,TUE,CALC,MTRANS,Obesity
Female,21.0,1.62,64.0,yes,no,2.0,3.0,Sometimes,no,2.0,no,0.0,1.0,no,Public_Transportation,Normal_Weight
Male,23.4,1.80,77.0,yes,no,2.0,3.0,Sometimes,no,2.0,no,2.0,0.6,Frequently,Public_Transportation,Normal_Weight
Male,27.0,1.80,87.0,no,no,3.0,3.0,Sometimes,no,2.0,no,2.0,0.0,Frequently,Walking,Overweight_Level_I
Male,22.0,1.78,89.8,no,no,2.0,1.0,Sometimes,no,2.0,no,0.0,0.0,Sometimes,Public_Transportation,Overweight_Level_II
Female,45.2,1.60,95.0,yes,yes,2.6,3.0,Sometimes,no,1.4,no,0.4,0.0,Sometimes,Automobile,Obesity_Type_I
Male,31.0,1.75,120.0,yes,yes,2.0,3.0,Sometimes,no,2.1,no,1.0,1.0,no,Automobile,Obesity_Type_II
Female,26.0,1.65,130.0,yes,yes,3.0,3.0,Sometimes,no,2.7,no,0.0,0.9,Sometimes,Public_Transportation,Obesity_Type_III
Female,61.0,1.55,110.0,yes,yes,3.0,3.0,Sometimes,no,1.0,no,0.0,0.0,Sometimes,Automobile,Obesity_Type_III
";

fn dataset() -> (tempfile::TempDir, DataFrame) {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("Obesity.csv");
    std::fs::write(&path, DATASET).expect("write");
    let df = read_dataset(&path).expect("read");
    (tmp, df)
}

#[test]
fn reads_every_row_and_column() {
    let (_tmp, df) = dataset();
    assert_eq!(df.shape(), (8, 17));
}

#[test]
fn missing_dataset_is_an_error() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    assert!(read_dataset(tmp.path().join("nope.csv")).is_err());
}

#[test]
fn rounds_survey_scales() {
    let (_tmp, df) = dataset();
    let df = round_ordinal_columns(df).unwrap();
    let age = df.column("Age").unwrap().f64().unwrap();
    assert_eq!(age.get(1), Some(23.0));
    let fcvc = df.column("FCVC").unwrap().f64().unwrap();
    assert_eq!(fcvc.get(4), Some(3.0));
    // untouched
    let weight = df.column("Weight").unwrap().f64().unwrap();
    assert_eq!(weight.get(3), Some(89.8));
}

#[test]
fn counts_rows_per_level_in_level_order() {
    let (_tmp, df) = dataset();
    let distribution = class_distribution(&df).unwrap();
    assert_eq!(
        distribution,
        vec![
            (ObesityLevel::InsufficientWeight, 0),
            (ObesityLevel::NormalWeight, 2),
            (ObesityLevel::OverweightLevelI, 1),
            (ObesityLevel::OverweightLevelII, 1),
            (ObesityLevel::ObesityTypeI, 1),
            (ObesityLevel::ObesityTypeII, 1),
            (ObesityLevel::ObesityTypeIII, 2),
        ]
    );
}

#[test]
fn high_caloric_food_share_per_level() {
    let (_tmp, df) = dataset();
    let table = share_by_level(&df, "FAVC").unwrap();
    assert_eq!(
        table.row_labels,
        vec![
            "Normal_Weight",
            "Overweight_Level_I",
            "Overweight_Level_II",
            "Obesity_Type_I",
            "Obesity_Type_II",
            "Obesity_Type_III",
        ]
    );
    assert_eq!(table.column_labels, vec!["no", "yes"]);
    assert_eq!(table.cell("Normal_Weight", "no"), Some(1.0));
    assert_eq!(table.cell("Obesity_Type_III", "yes"), Some(1.0));
    assert_eq!(table.cell("Obesity_Type_III", "no"), Some(0.0));
}

#[test]
fn shares_sum_to_one_per_level() {
    let (_tmp, df) = dataset();
    let df = round_ordinal_columns(df).unwrap();
    let table = share_by_level(&df, "CH2O").unwrap();
    assert_eq!(table.column_labels.len(), 3);
    for row in &table.cells {
        let total: f64 = row.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}

#[test]
fn alcohol_counts_by_gender() {
    let (_tmp, df) = dataset();
    let table = counts_by_gender(&df, "CALC").unwrap();
    assert_eq!(table.row_labels, vec!["no", "Sometimes", "Frequently"]);
    assert_eq!(table.column_labels, vec!["Male", "Female"]);
    assert_eq!(table.cell("no", "Male"), Some(1.0));
    assert_eq!(table.cell("no", "Female"), Some(1.0));
    assert_eq!(table.cell("Sometimes", "Female"), Some(3.0));
    assert_eq!(table.cell("Frequently", "Male"), Some(2.0));
}

#[test]
fn pyramid_counts_only_obese_rows() {
    let (_tmp, df) = dataset();
    let table = age_pyramid(&df).unwrap();
    assert_eq!(table.row_labels.len(), 11);
    let total: f64 = table.cells.iter().flatten().sum();
    assert_eq!(total, 4.0);
    assert_eq!(table.cell("45–49", "Female"), Some(1.0));
    assert_eq!(table.cell("30–34", "Male"), Some(1.0));
    assert_eq!(table.cell("25–29", "Female"), Some(1.0));
    assert_eq!(table.cell("60+", "Female"), Some(1.0));
    assert_eq!(table.cell("20–24", "Male"), Some(0.0));
}

#[test]
fn report_renders_and_exports() {
    let (tmp, df) = dataset();
    let report = Report::build(df).unwrap();
    let text = report.to_string();
    assert!(text.contains("# class_distribution"));
    assert!(text.contains("Obesidade III"));
    assert!(text.contains("# water_by_level"));
    assert!(text.contains("Menos de 1L"));
    assert!(text.contains("Nenhuma"));
    assert!(text.contains("0–2h"));

    let out = tmp.path().join("tables");
    report.export(&out).unwrap();
    assert!(out.join("class_distribution.csv").exists());
    assert!(out.join("activity_by_level.csv").exists());
    let exported = std::fs::read_to_string(out.join("alcohol_by_gender.csv")).unwrap();
    assert!(exported.starts_with("CALC,Male,Female"));
    let water = std::fs::read_to_string(out.join("water_by_level.csv")).unwrap();
    assert!(water.starts_with("Obesity,Menos de 1L,1 a 2L,Mais de 2L"));
}
