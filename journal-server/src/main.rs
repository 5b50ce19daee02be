use journal_core::store::InMemoryStore;
use journal_core::JournalEngine;
use journal_server::config::Config;
use journal_server::state::AppState;
use journal_server::routes;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env_and_args();

    let store = Arc::new(InMemoryStore::new());
    let engine = Arc::new(JournalEngine::new(store));
    let state = AppState::new(engine);

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    tracing::info!(listen = %config.listen, "journal editorial backend listening");

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
