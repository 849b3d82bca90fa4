use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use shared::protocol::RANDOM_WORD_ROUTE;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod word_source;

use app_state::AppState;
use config::{load_settings, report_issues, Settings};
use word_source::{RandomSource, StdRandom, WordSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, issues) = load_settings();
    let (filter, filter_error) = match EnvFilter::try_new(&settings.log_filter) {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new("info"), Some(error)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(error) = filter_error {
        warn!(filter = %settings.log_filter, %error, "invalid log filter; using 'info'");
    }
    report_issues(&issues);

    let state = build_state(&settings);
    let app = build_router(Arc::new(state));

    let (listener, addr) = bind_listener(&settings.server_bind).await?;
    info!(%addr, route = RANDOM_WORD_ROUTE, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Binds `bind` and returns the address actually bound, which differs from
/// the requested one when the port is 0.
async fn bind_listener(bind: &str) -> anyhow::Result<(TcpListener, SocketAddr)> {
    let requested: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{bind}'"))?;
    let listener = TcpListener::bind(requested)
        .await
        .with_context(|| format!("failed to bind {requested}"))?;
    let addr = listener
        .local_addr()
        .context("listener has no local address")?;
    Ok((listener, addr))
}

fn build_state(settings: &Settings) -> AppState {
    let random: Arc<dyn RandomSource> = match settings.random_seed {
        Some(seed) => {
            info!(seed, "using seeded word randomness");
            Arc::new(StdRandom::seeded(seed))
        }
        None => Arc::new(StdRandom::from_entropy()),
    };
    let words = WordSource::new(random, settings.word_source_policy());
    let policy = words.policy();
    info!(
        min_delay_ms = policy.min_delay.as_millis() as u64,
        delay_spread_ms = policy.delay_spread_ms,
        failure_rate = policy.failure_rate,
        "word source configured"
    );

    AppState { words }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(api::healthz))
        .route(RANDOM_WORD_ROUTE, get(api::random_word))
        .with_state(state)
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
