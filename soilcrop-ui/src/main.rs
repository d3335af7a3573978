//! soilcrop-ui - Crop recommendation form service
//!
//! Serves the recommendation form over HTTP, or runs a single vocabulary
//! load or prediction from the command line.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use soilcrop_common::config::{ConfigOverrides, ServiceConfig};
use soilcrop_common::{FormField, FormFieldState, HttpScorer, PredictionRequestBuilder, VocabularyLoader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soilcrop_ui::{build_router, spawn_vocabulary_load, AppState};

/// Command-line arguments for soilcrop-ui
#[derive(Parser, Debug)]
#[command(name = "soilcrop-ui")]
#[command(about = "Crop recommendation form backed by a remote scoring service")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(short, long, global = true, env = "SOILCROP_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset the soil-type options are read from
    #[arg(long, global = true, env = "SOILCROP_DATASET_URL")]
    dataset_url: Option<String>,

    /// Scoring service base URL
    #[arg(long, global = true, env = "SOILCROP_SCORER_URL")]
    scorer_url: Option<String>,

    /// Host to bind
    #[arg(long, global = true, env = "SOILCROP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, global = true, env = "SOILCROP_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Load the soil-type vocabulary and print one label per line
    SoilTypes,
    /// Submit one set of measurements and print the outcome
    Predict(PredictArgs),
}

/// Raw field values; left as strings so coercion behaves as in the form
#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long)]
    soil_type: Option<String>,
    #[arg(long)]
    soil_depth: Option<String>,
    #[arg(long)]
    ph: Option<String>,
    #[arg(long)]
    bulk_density: Option<String>,
    #[arg(long)]
    ec: Option<String>,
    #[arg(long)]
    organic_carbon: Option<String>,
    #[arg(long)]
    moisture_retention: Option<String>,
    #[arg(long)]
    water_capacity: Option<String>,
    #[arg(long)]
    infiltration_rate: Option<String>,
    #[arg(long)]
    clay: Option<String>,
}

impl PredictArgs {
    fn into_form(self) -> FormFieldState {
        let mut form = FormFieldState::new();
        let values = [
            (FormField::SoilType, self.soil_type),
            (FormField::SoilDepth, self.soil_depth),
            (FormField::Ph, self.ph),
            (FormField::BulkDensity, self.bulk_density),
            (FormField::ElectricalConductivity, self.ec),
            (FormField::OrganicCarbon, self.organic_carbon),
            (FormField::MoistureRetention, self.moisture_retention),
            (FormField::WaterCapacity, self.water_capacity),
            (FormField::InfiltrationRate, self.infiltration_rate),
            (FormField::ClayPercentage, self.clay),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                form.set(field, value);
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ServiceConfig::resolve(ConfigOverrides {
        config_path: cli.config,
        dataset_url: cli.dataset_url,
        scorer_url: cli.scorer_url,
        host: cli.host,
        port: cli.port,
    })
    .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting soilcrop-ui v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("SOILCROP_BUILD")
    );
    config.source.log();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await.map(|_| ExitCode::SUCCESS),
        Command::SoilTypes => print_soil_types(&config).await,
        Command::Predict(args) => predict_once(&config, args).await,
    }
}

async fn serve(config: ServiceConfig) -> Result<()> {
    info!("Dataset: {}", config.dataset_url);
    info!("Scoring endpoint: {}", config.predict_url());

    let scorer = HttpScorer::new(config.predict_url(), config.request_timeout)
        .context("Failed to create scoring client")?;
    let loader = VocabularyLoader::new(config.dataset_url.clone(), config.request_timeout)
        .context("Failed to create dataset client")?;

    let state = AppState::new(Arc::new(scorer));
    spawn_vocabulary_load(state.clone(), loader);

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("soilcrop-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn print_soil_types(config: &ServiceConfig) -> Result<ExitCode> {
    let loader = VocabularyLoader::new(config.dataset_url.clone(), config.request_timeout)
        .context("Failed to create dataset client")?;

    let vocabulary = loader.load().await;
    for label in vocabulary.iter() {
        println!("{}", label);
    }

    Ok(if vocabulary.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn predict_once(config: &ServiceConfig, args: PredictArgs) -> Result<ExitCode> {
    let loader = VocabularyLoader::new(config.dataset_url.clone(), config.request_timeout)
        .context("Failed to create dataset client")?;
    let builder = PredictionRequestBuilder::http(config.predict_url(), config.request_timeout)
        .context("Failed to create scoring client")?;

    let mut form = args.into_form();
    let vocabulary = loader.load().await;
    form.constrain_soil_type(&vocabulary);

    let outcome = builder.submit(&form).await;
    if outcome.is_success() {
        println!("{}", outcome.message());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", outcome.message());
        Ok(ExitCode::FAILURE)
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
