use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use engagement_dashboard::config::{AppConfig, CliConfig, FileConfig};
use engagement_dashboard::dataset::{load_dataset, SchemaPreset};
use engagement_dashboard::server::{metrics, run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the engagement export, a CSV file or a workbook (.xlsx, .xls, .ods).
    /// Can also be specified in config file.
    #[clap(value_parser = parse_path)]
    pub data_path: Option<PathBuf>,

    /// Path to a TOML config file. Values in it override command line flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of dashboard responses in the cache in seconds.
    #[clap(long, default_value_t = 60)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Column layout of the source file.
    #[clap(long, default_value = "pt-br")]
    pub schema: SchemaPreset,

    /// Worksheet to read when the data source is a workbook.
    #[clap(long)]
    pub sheet_name: Option<String>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            data_path: args.data_path.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            frontend_dir_path: args.frontend_dir_path.clone(),
            schema_preset: args.schema,
            sheet_name: args.sheet_name.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  data_path: {:?}", app_config.data_path);
    info!("  port: {}", app_config.port);
    info!("  date column: {:?}", app_config.schema.date);
    info!("  sheet: {:?}", app_config.schema.sheet_name);

    let dataset = match load_dataset(&app_config.data_path, app_config.schema.clone()) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!("Could not load dataset: {}", err);
            return Err(err.into());
        }
    };

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_dataset_metrics(dataset.stats());

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);
    run_server(
        dataset,
        app_config.data_path,
        app_config.logging_level,
        app_config.port,
        app_config.metrics_port,
        app_config.content_cache_age_sec,
        app_config.frontend_dir_path,
    )
    .await
}
