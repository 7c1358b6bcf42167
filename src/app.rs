use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Workboard Daemon - HTTP service for workspaces, boards, groups and items
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "WORKBOARD_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Path of the SQLite database (default: ~/.workboard/workboard.db)
    #[arg(long, env = "WORKBOARD_DB")]
    pub db: Option<PathBuf>,

    /// Path of the config file (default: ~/.workboard/config.toml)
    #[arg(long, env = "WORKBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    /// Example: --cors-origins=http://localhost:5173,http://127.0.0.1:5173
    #[arg(long, env = "WORKBOARD_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "WORKBOARD_LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "WORKBOARD_LOG_ROTATION", default_value = "daily")]
    pub log_rotation: String,

    /// Custom log directory (default: ~/.workboard/logs)
    #[arg(long, env = "WORKBOARD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

pub fn report_server_error(addr: std::net::SocketAddr, log_file: &std::path::Path, e: &std::io::Error) {
    if e.kind() == std::io::ErrorKind::AddrInUse {
        eprintln!();
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of workboard-daemon may already be running.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  1. Kill the existing process:   pkill workboard-daemon");
        eprintln!("  2. Use a different port:        workboard-daemon --addr 127.0.0.1:8081");
        eprintln!("  3. Check what's using the port: lsof -i :{}", addr.port());
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return;
    }
    eprintln!();
    eprintln!("Error: Failed to start server: {e}");
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}
