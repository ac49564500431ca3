//! Service entry point: tracing setup, configuration, database pool and
//! migrations, then the axum server.

use sqlx::PgPool;
use std::sync::Arc;
use userbase::{create_router, AppConfig, AppContext, PgUserStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userbase=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate().expect("invalid configuration");

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let store = PgUserStore::new(pool);
    store.migrate().await.expect("Failed to run migrations");

    let ctx = Arc::new(AppContext::new(Arc::new(store), &config));
    let app = create_router(ctx);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.expect("server error");
}
