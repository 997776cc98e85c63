use std::net::SocketAddr;

use tech_events_api::{
    config::{AppConfig, load_env_files},
    db::PoolManager,
    logging,
    migration::run_migrations,
    routes::{API_PREFIX, build_app},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_files();
    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config)?;

    tracing::info!(
        env = config.node_env.as_str(),
        log_level = config.log_level.as_str(),
        "starting tech-events-api"
    );

    let db = PoolManager::initialize(&config.database)?;
    db.verify().await?;
    run_migrations(&db).await?;

    let addr = SocketAddr::from((config.host, config.port));
    let state = AppState::new(config, db);
    let app = build_app(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}{}", addr, API_PREFIX);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    state.db.shutdown().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received, draining connections");
}
