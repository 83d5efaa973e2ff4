use clap::Parser;
use sales_forecast::{DataLoader, ForecastPipeline, PipelineConfig, TrainingControl};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Forecast monthly sales per product from a CSV export",
    after_help = "EXAMPLES:
    # Forecast the default six months
    sales-forecast sales.csv

    # Reproducible run with a longer horizon
    sales-forecast sales.csv --horizon 12 --seed 7 --pretty"
)]
struct Args {
    /// CSV file with created, short_desc and total_sold columns
    input: PathBuf,

    /// Number of future months to forecast (default: 6)
    #[arg(long)]
    horizon: Option<usize>,

    /// Number of training epochs (default: 100)
    #[arg(long)]
    epochs: Option<usize>,

    /// Learning rate for the optimizer (default: 0.001)
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Seed for reproducible training
    #[arg(long)]
    seed: Option<u64>,

    /// Abort training after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        if let Some(horizon) = self.horizon {
            config = config.with_horizon(horizon);
        }
        if let Some(epochs) = self.epochs {
            config = config.with_epochs(epochs);
        }
        if let Some(lr) = self.learning_rate {
            config = config.with_learning_rate(lr);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_training_timeout(Duration::from_secs(secs));
        }
        config
    }
}

async fn run(args: Args) -> sales_forecast::Result<String> {
    let rows = DataLoader::from_csv(&args.input)?;
    let pipeline = ForecastPipeline::new(args.config())?;
    info!(
        rows = rows.len(),
        horizon = pipeline.config().horizon,
        epochs = pipeline.config().epochs,
        "running pipeline"
    );
    let output = pipeline.run_async(&rows, &TrainingControl::new()).await?;

    info!(
        products = output.catalog.len(),
        rmse = output.report.fit.rmse,
        "forecast ready"
    );

    if args.pretty {
        output.bundle.to_json_pretty()
    } else {
        output.bundle.to_json()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(
        name = sales_forecast::NAME,
        version = sales_forecast::VERSION,
        input = %args.input.display(),
        "starting"
    );
    match run(args).await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_user_facing() => {
            error!("Forecast failed: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Internal error while forecasting, please report it: {}", e);
            ExitCode::FAILURE
        }
    }
}
