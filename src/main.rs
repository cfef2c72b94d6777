//! Bookshelf server: loads settings from env, connects the configured store, serves the book routes.

use bookshelf_api::{
    app, ensure_database_exists, AppState, BookStore, MemoryBookStore, PgBookStore, Settings, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let default_level = if settings.development {
        "bookshelf_api=debug,tower_http=debug"
    } else {
        "bookshelf_api=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let store: Arc<dyn BookStore> = match settings.store {
        StoreKind::Memory => {
            tracing::info!("using in-memory book store");
            Arc::new(MemoryBookStore::new(settings.policy.unique_titles))
        }
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            let store = PgBookStore::bootstrap(pool, &settings.schema, settings.policy.unique_titles).await?;
            tracing::info!(schema = %settings.schema, "connected to postgres");
            Arc::new(store)
        }
    };

    let state = AppState::new(store, settings.policy.clone(), settings.auth_gate);
    let router = app(state, settings.body_limit_bytes, settings.development);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!(
        auth_gate = ?settings.auth_gate,
        unique_titles = settings.policy.unique_titles,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
