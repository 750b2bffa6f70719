//! User info search server.
//!
//! Serves the user info HTTP API over Elasticsearch, or over the in-process
//! memory backend for local development.

use clap::Parser;
use tracing::info;
use userinfo_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};

/// Starts the Axum HTTP server and runs until a shutdown signal arrives.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        "Starting user info server"
    );

    match backend_mode {
        StorageBackendMode::Elasticsearch => {
            start_elasticsearch(config).await?;
        }
        StorageBackendMode::Memory => {
            start_memory(config).await?;
        }
    }

    Ok(())
}

/// Starts the server with the Elasticsearch backend.
///
/// Creates the index and alias when they are missing before accepting
/// requests.
#[cfg(feature = "elasticsearch")]
async fn start_elasticsearch(config: ServerConfig) -> anyhow::Result<()> {
    use userinfo_persistence::backends::elasticsearch::ElasticsearchBackend;
    use userinfo_persistence::core::UserInfoStorage;

    let es_config = config.elasticsearch_config();

    info!(
        nodes = ?es_config.nodes,
        index = %es_config.index,
        alias = %es_config.alias,
        "Initializing Elasticsearch backend"
    );

    let backend = ElasticsearchBackend::new(es_config)?;
    backend.initialize().await?;

    info!("Elasticsearch index ready");

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn start_elasticsearch(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The elasticsearch backend requires the 'elasticsearch' feature. \
         Build with: cargo build -p userinfo-server --features elasticsearch"
    )
}

/// Starts the server with the in-process memory backend.
#[cfg(feature = "memory")]
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    use userinfo_persistence::backends::memory::MemoryBackend;

    info!("Using in-memory storage; records are lost on shutdown");

    let backend =
        MemoryBackend::new().with_max_result_window(u64::from(config.max_result_window));
    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when memory feature is not enabled.
#[cfg(not(feature = "memory"))]
async fn start_memory(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The memory backend requires the 'memory' feature. \
         Build with: cargo build -p userinfo-server --features memory"
    )
}
