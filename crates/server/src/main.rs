use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use torrentino_core::{
    load_config, validate_config, DownloadEngine, DownloadOrchestrator, ItemRepository,
    JackettSearcher, LibrqbitEngine, Searcher, SearcherBackend, SqliteStateStore,
    TorrentClientBackend,
};
use torrentino_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("TORRENTINO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    let store = SqliteStateStore::new(&config.database.path)
        .context("Failed to open state store")?;
    let repository = ItemRepository::new(Arc::new(store));
    info!("State store initialized");

    // Create searcher if configured
    let searcher: Option<Arc<dyn Searcher>> = match &config.searcher {
        Some(searcher_config) => match searcher_config.backend {
            SearcherBackend::Jackett => match &searcher_config.jackett {
                Some(jackett_config) => {
                    info!("Initializing Jackett searcher at {}", jackett_config.url);
                    let searcher = JackettSearcher::new(jackett_config.clone())
                        .context("Failed to create Jackett searcher")?;
                    Some(Arc::new(searcher))
                }
                None => {
                    error!("Jackett backend selected but no jackett config provided");
                    None
                }
            },
        },
        None => {
            info!("No searcher configured");
            None
        }
    };

    // Create download engine if configured
    let engine: Option<Arc<dyn DownloadEngine>> = match &config.torrent_client {
        Some(tc_config) => match tc_config.backend {
            TorrentClientBackend::Librqbit => match &tc_config.librqbit {
                Some(librqbit_config) => {
                    info!(
                        "Initializing embedded librqbit engine (download path: {})",
                        librqbit_config.download_path
                    );
                    match LibrqbitEngine::new(librqbit_config).await {
                        Ok(engine) => Some(Arc::new(engine)),
                        Err(e) => {
                            error!("Failed to initialize librqbit engine: {}", e);
                            None
                        }
                    }
                }
                None => {
                    error!("librqbit backend selected but no librqbit config provided");
                    None
                }
            },
        },
        None => {
            info!("No download engine configured");
            None
        }
    };

    let orchestrator = engine.map(|engine| {
        Arc::new(DownloadOrchestrator::new(
            config.orchestrator.clone(),
            repository.clone(),
            engine,
        ))
    });

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(repository, searcher, orchestrator));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Running jobs are abandoned on shutdown; stored statuses remain.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
