//! HTTP chat server for the recommendation assistant.
//!
//! Startup is fail-fast: a missing API key or an unreadable catalog
//! stops the process before it binds a socket.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use aqua_agent_agent::AgentEngine;
use aqua_agent_catalog::CatalogStore;
use aqua_agent_config::{PromptTemplates, Settings};
use aqua_agent_llm::GroqClient;
use aqua_agent_retrieval::HttpRetriever;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,aqua_agent_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("configuration error")?;

    let catalog = CatalogStore::load_csv(&settings.catalog.path)
        .with_context(|| format!("failed to load catalog from {}", settings.catalog.path))?;
    tracing::info!(products = catalog.len(), "catalog ready");

    let llm = Arc::new(GroqClient::new(&settings.llm).context("language model client")?);
    let retriever =
        Arc::new(HttpRetriever::new(&settings.retrieval).context("retriever client")?);

    let engine = AgentEngine::new(
        Arc::new(catalog),
        llm,
        retriever,
        &settings.retrieval,
        PromptTemplates::default(),
        settings.conversation.clone(),
    );

    let state = AppState::new(engine, settings.conversation.clone());
    let app = routes::router(state);

    let addr: std::net::SocketAddr = settings
        .server
        .bind_addr
        .parse()
        .context("invalid bind address")?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
