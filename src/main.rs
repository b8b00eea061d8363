// ==========================================
// Depot Management - HTTP server entry point
// ==========================================
// 1. configuration from DEPOT_* environment variables
// 2. Depots schema convergence (master or tenants)
// 3. driver registration + axum router
// ==========================================

use anyhow::Context;
use depot_management::config::{DepotAppConfig, LogFormat};
use depot_management::schema::DepotsTableBuilder;
use depot_management::{api, logging, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DepotAppConfig::from_env().context("invalid configuration")?;

    match config.log_format {
        LogFormat::Text => logging::init(),
        LogFormat::Json => logging::init_json(),
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", depot_management::APP_NAME, depot_management::VERSION);
    tracing::info!("database: {}", config.db_path);
    tracing::info!("repository mode: {}", config.repository_mode);
    tracing::info!("==================================================");

    if let Some(target) = config.provision {
        let db_path = config.db_path.clone();
        let summary = tokio::task::spawn_blocking(move || DepotsTableBuilder::run(&db_path, target))
            .await
            .context("schema provisioning task failed")?;

        // Provisioning problems are logged; the server still starts
        match summary {
            Ok(summary) if summary.is_success() => {
                tracing::info!(provision = %target, databases = summary.attempted(), "schema provisioning done")
            }
            Ok(summary) => tracing::warn!(
                provision = %target,
                failed = summary.failed.len(),
                attempted = summary.attempted(),
                "schema provisioning finished with failures"
            ),
            Err(e) => tracing::error!(error = %e, "schema provisioning failed"),
        }
    }

    let state = AppState::from_config(&config);
    let router = api::router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;
    tracing::info!(bind = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .context("server error")?;

    Ok(())
}
