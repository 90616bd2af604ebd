use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};
use polars::prelude::PolarsError;
use thiserror::Error;

use obesity_predictor::analysis::{read_dataset, Report};
use obesity_predictor::config::Settings;
use obesity_predictor::error::render_chain;
use obesity_predictor::submission::{
    parse_submission, predict_batch_with_store, read_batch, DISCLAIMER,
};
use obesity_predictor::{
    encode, predict_with_store, ModelStore, PredictionError, RawObservation,
    UnmappableCategoryError,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let env = Env::new().filter("OBESITY_LOG");
    Builder::new()
        .filter(Some("obesity_predictor"), log_level)
        .parse_env(env)
        .init();

    debug!("Arguments {:#?}", cli);

    let start_time = Instant::now();
    let result = run(cli);
    debug!("finished in {:?}", start_time.elapsed());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("error: {}", render_chain(&e));
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Obesity level prediction and dataset exploration", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[arg(short, long, global = true, help = "Model artifact (overrides OBESITY_MODEL_PATH)")]
    model: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Dataset CSV (overrides OBESITY_DATASET_PATH)")]
    dataset: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, global = true, help = "Verbose level")]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predicts the obesity level for one form submission
    Predict {
        #[arg(help = "Submission JSON file, or - for stdin")]
        input: PathBuf,
        #[arg(long, help = "Print the prediction and its features as JSON")]
        json: bool,
    },
    /// Predicts every row of a CSV of submissions
    PredictBatch {
        #[arg(help = "CSV with one submission per row")]
        input: PathBuf,
    },
    /// Prints the feature record a submission encodes to
    Encode {
        #[arg(help = "Submission JSON file, or - for stdin")]
        input: PathBuf,
    },
    /// Summarises the historical dataset
    Explore {
        #[arg(short, long, help = "Also write each table as CSV into this directory")]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("could not read {path:?}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid submission in {path:?}")]
    Submission {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid batch file {path:?}")]
    Batch {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Encoding(#[from] UnmappableCategoryError),
    #[error(transparent)]
    Analysis(#[from] PolarsError),
    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::from_env().with_overrides(cli.model, cli.dataset);

    match cli.command {
        Command::Predict { input, json } => {
            let observation = read_submission(&input)?;
            let store = ModelStore::new(&settings.model_path);
            let prediction = predict_with_store(&store, observation)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                println!(
                    "Nível de obesidade previsto: {} ({})",
                    prediction.level,
                    prediction.level.label_pt()
                );
                println!("{DISCLAIMER}");
            }
        }
        Command::PredictBatch { input } => {
            let observations = read_batch_file(&input)?;
            info!("read {} submissions from {:?}", observations.len(), input);
            let store = ModelStore::new(&settings.model_path);
            for (row, prediction) in predict_batch_with_store(&store, &observations)?
                .iter()
                .enumerate()
            {
                println!("{}\t{}", row + 1, prediction.level);
            }
        }
        Command::Encode { input } => {
            let observation = read_submission(&input)?;
            let record = encode(&observation)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Explore { output_dir } => {
            info!("reading dataset {:?}", settings.dataset_path);
            let report = Report::build(read_dataset(&settings.dataset_path)?)?;
            print!("{report}");
            if let Some(dir) = output_dir {
                report.export(&dir)?;
                info!("tables written to {:?}", dir);
            }
        }
    }

    Ok(())
}

fn read_submission(path: &Path) -> Result<RawObservation, CliError> {
    let parsed = if path == Path::new("-") {
        parse_submission(io::stdin().lock())
    } else {
        let file = File::open(path).map_err(|source| CliError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        parse_submission(io::BufReader::new(file))
    };
    parsed.map_err(|source| CliError::Submission {
        path: path.to_path_buf(),
        source,
    })
}

fn read_batch_file(path: &Path) -> Result<Vec<RawObservation>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    read_batch(file).map_err(|source| CliError::Batch {
        path: path.to_path_buf(),
        source,
    })
}
