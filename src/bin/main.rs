//! clf-api command line interface
//!
//! `train` fits the classifier on the bundled iris dataset and writes the
//! model artifact, `serve` loads the artifact and answers HTTP requests,
//! `info` prints an artifact summary.

use clap::{Args, Parser, Subcommand};
use clf_api::config::ServerConfig;
use clf_api::core::{ClfError, OptimizerConfig, Result};
use clf_api::data::{IrisDataset, N_FEATURES};
use clf_api::multiclass::OneVsOneSVM;
use clf_api::persistence::SerializableModel;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "clf-api")]
#[command(about = "Linear SVM iris classifier with an HTTP prediction API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on the bundled iris dataset and write the model artifact
    Train(TrainArgs),
    /// Load the model artifact and serve predictions over HTTP
    Serve(ServeArgs),
    /// Display model artifact information
    Info(InfoArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Output model file (defaults to the configured model path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Convergence tolerance
    #[arg(short, long, default_value = "0.001")]
    epsilon: f64,

    /// Maximum solver iterations
    #[arg(short, long, default_value = "10000")]
    max_iterations: usize,
}

#[derive(Args)]
struct ServeArgs {
    /// Model artifact to load (overrides CLF_API_MODEL_PATH)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Interface to bind (overrides CLF_API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides CLF_API_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args)]
struct InfoArgs {
    /// Model artifact file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Serve(args) => serve_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    let output = match args.output {
        Some(path) => path,
        None => ServerConfig::from_env()?.model_path,
    };

    let config = OptimizerConfig {
        c: args.c,
        epsilon: args.epsilon,
        max_iterations: args.max_iterations,
        ..OptimizerConfig::default()
    };

    info!("Loading bundled iris dataset");
    let dataset = IrisDataset::load()?;
    info!(
        "Loaded {} samples with {} features",
        dataset.len(),
        N_FEATURES
    );

    info!(
        "Training: C={}, epsilon={}, max_iter={}",
        config.c, config.epsilon, config.max_iterations
    );
    let classifier = OneVsOneSVM::train(dataset.samples(), &config)?;

    let accuracy = classifier.evaluate(dataset.samples());
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(ClfError::IoError)?;
        }
    }

    let artifact = SerializableModel::from_classifier(&classifier, &config, N_FEATURES);
    artifact.save_to_file(&output)?;
    info!("Model saved to: {output:?}");

    Ok(())
}

fn serve_command(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ClfError::IoError)?;

    runtime.block_on(clf_api::server::serve(&config))
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let artifact = SerializableModel::load_from_file(&args.model)?;
    artifact.print_summary();
    Ok(())
}
