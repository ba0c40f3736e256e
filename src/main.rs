use clap::Parser;
use flightdelay::{form, logging, PipelineConfig, PipelineContext};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// Path to a TOML file with pipeline settings
    #[clap(long)]
    config: Option<PathBuf>,
    /// Path to the labeled flight dataset (CSV)
    #[clap(long)]
    dataset: Option<PathBuf>,
    /// Share of rows held out for evaluation
    #[clap(long)]
    test_fraction: Option<f64>,
    /// Seed for the train/test split
    #[clap(long)]
    seed: Option<u64>,
    /// Predict a single flight given as DepTime,ArrTime,Airline,Distance,WeatherConditions,PreviousFlightDelay
    #[clap(long)]
    predict: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(why) = logging::init() {
        eprintln!("Could not initialize logging: {}", why);
    }
    match run(args) {
        Ok(code) => code,
        Err(why) => {
            error!("{}", why);
            ExitCode::FAILURE
        }
    }
}

/// Startup failures are returned as errors. A rejected `--predict` request is
/// reported to the user and exits with status 2.
fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset = dataset;
    }
    if let Some(test_fraction) = args.test_fraction {
        config.test_fraction = test_fraction;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let context = PipelineContext::build(&config)?;

    match args.predict {
        Some(line) => {
            if !form::predict_line(&context, &line, io::stdout())? {
                return Ok(ExitCode::from(2));
            }
        }
        None => {
            let stdin = io::stdin();
            form::run(&context, stdin.lock(), io::stdout())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
