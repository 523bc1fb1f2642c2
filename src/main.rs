//! Gardiyan - Main entry point.
//!
//! Loads configuration, builds the S3 client and starts the Actix-web server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gardiyan_lib::api;
use gardiyan_lib::config::{Config, ConfigError};
use gardiyan_lib::middleware::RequestLogger;
use gardiyan_lib::services::{ObjectStore, S3Storage};

#[derive(Parser)]
#[command(name = "gardiyan", version)]
#[command(about = "Serve objects from an S3-compatible bucket over HTTP", long_about = None)]
struct Cli {
    /// Log level, overridden by RUST_LOG when set
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Validate configuration and exit (used by container health checks)
    #[arg(long)]
    health_check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Info,
    Debug,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Print what is wrong with the environment and how a complete `.env` looks.
fn report_config_error(err: &ConfigError) {
    match err {
        ConfigError::MissingEnvVars(vars) => {
            error!("🚨 CRITICAL: Missing required environment variables!");
            error!("🔧 The following environment variables must be set:");
            for name in vars {
                error!("   ❌ {}", name);
            }
        }
        ConfigError::InvalidValue(_) => error!("🚨 CRITICAL: {}", err),
    }
    error!("");
    error!("💡 Complete .env file example:");
    error!("   ACCESS_KEY_ID=your-access-key");
    error!("   SECRET_ACCESS_KEY=your-secret-key");
    error!("   S3_BUCKET_NAME=your-bucket-name");
    error!("   S3_ENDPOINT=your-s3-endpoint     # Optional, defaults to AWS S3");
    error!("   REGION=your-region               # Optional, defaults to us-east-1");
    error!("   S3_FORCE_PATH_STYLE=false");
    error!("   S3_DISABLE_SSL=false             # Optional, defaults to false");
    error!("   PORT=8080                        # Optional, defaults to 8080");
    error!("");
    error!("🚫 Gardiyan cannot start without complete configuration!");
}

fn log_startup_summary(config: &Config) {
    let storage = &config.storage;

    info!("🔒 Gardiyan is starting shift - Guard post: {}", config.bind_address());
    info!("📋 Prison facility: {}", storage.bucket);
    info!("🏢 Storage facility format: {}", storage.object_url("{prisoner}"));
    if storage.force_path_style {
        info!("Path-style addressing is enabled; logged URLs still use the virtual-host form");
    }
    info!("📝 Visiting example:");
    info!("  👤 Visitor request: http://localhost:{}/images/logo.png", config.port);
    info!("  🔓 Released from: {}", storage.object_url("images/logo.png"));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    if cli.health_check {
        std::process::exit(if Config::from_env().is_ok() { 0 } else { 1 });
    }

    init_tracing(cli.log_level);

    if !dotenv_loaded {
        warn!(".env file not found, environment variables will be read from system");
    }
    debug!("Log level set to: {}", cli.log_level.as_filter());

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            report_config_error(&e);
            std::process::exit(1);
        }
    };
    info!("✅ All required environment variables validated successfully");

    let storage: Arc<dyn ObjectStore> = Arc::new(S3Storage::new(&config.storage));
    log_startup_summary(&config);

    let storage = web::Data::from(storage);
    let settings = web::Data::new(config.storage.clone());
    let bind_address = config.bind_address();

    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, config.workers
    );

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(storage.clone())
            .app_data(settings.clone())
            .configure(api::configure_health_routes)
            .configure(api::configure_proxy_routes)
    })
    .workers(config.workers)
    .bind(&bind_address)?
    .run()
    .await
}
