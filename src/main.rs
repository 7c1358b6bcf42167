use clap::Parser;
use color_eyre::eyre::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use workboard_daemon::app::{report_server_error, Args};
use workboard_daemon::config::{load_config, DaemonConfig};
use workboard_daemon::cors::{build_cors_layer, normalize_origins, DEFAULT_CORS_ORIGINS};
use workboard_daemon::http_logging::HttpLoggingLayer;
use workboard_daemon::logging::{
    self, default_data_dir, init_logging, parse_rotation, LogConfig, LOG_FILENAME,
};
use workboard_daemon::server::{router, AppState};
use workboard_daemon::store::SqliteStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| default_data_dir().join("logs"));
    let log_file = log_dir.join(LOG_FILENAME);
    logging::set_log_file_path(log_file.to_string_lossy().to_string());

    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(&log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    // Config file is optional; a broken one is reported but not fatal.
    let file_config = load_config(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {e}");
        DaemonConfig::default()
    });

    let db_path = args.db.clone().unwrap_or_else(|| file_config.db_path());
    let store = SqliteStore::open(&db_path)?;
    info!(path = %db_path.display(), "Opened board store");

    let cors_origins = if args.cors_origins.is_empty() {
        if file_config.server.cors_origins.is_empty() {
            normalize_origins([DEFAULT_CORS_ORIGINS])
        } else {
            normalize_origins(&file_config.server.cors_origins)
        }
    } else {
        normalize_origins(&args.cors_origins)
    };
    info!("CORS origins: {}", cors_origins.join(", "));

    let app = router(AppState::new(Arc::new(store)))
        .layer(HttpLoggingLayer)
        .layer(build_cors_layer(cors_origins));

    let addr: SocketAddr = args.addr.parse()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            report_server_error(addr, &log_file, &e);
            return Err(e.into());
        }
    };

    info!(
        "Starting workboard daemon on {} (logs: {})",
        addr,
        logging::get_log_file_path()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Workboard daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Received shutdown signal, stopping server...");
}
