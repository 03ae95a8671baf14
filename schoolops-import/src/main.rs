//! schoolops-import - Bulk entity import service
//!
//! Serves `POST /api/import/:entity` for the school-operations dashboard.
//! Each request imports a whole batch of users or classes, or nothing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use schoolops_common::config::{self, TomlConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolops_import::db::SqliteStore;
use schoolops_import::{build_router, AppState};

const DEFAULT_PORT: u16 = 5790;

/// Command-line arguments for schoolops-import
#[derive(Parser, Debug)]
#[command(name = "schoolops-import")]
#[command(about = "Bulk entity import service for the school-operations dashboard")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "SCHOOLOPS_IMPORT_PORT")]
    port: Option<u16>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "schoolops_import={level},schoolops_common={level},tower_http=info",
                    level = toml_config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting schoolops-import v{}",
        env!("CARGO_PKG_VERSION")
    );

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&root_folder, &toml_config);
    info!("Root folder: {}", root_folder.display());
    info!("Database: {}", db_path.display());

    let pool = schoolops_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database connection established");

    let state = AppState::new(Arc::new(SqliteStore::new(pool)));
    let app = build_router(state);

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
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
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
            info!("Received terminate signal, shutting down");
        },
    }
}
