//! Scholarmatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use scholarmatch::config::Config;
use scholarmatch::embedding::HttpEmbedder;
use scholarmatch::gateway::{HandlerState, create_router_with_state};
use scholarmatch::rerank::LlmReranker;
use scholarmatch::store::ScholarshipStore;
use scholarmatch::telemetry::TelemetrySink;
use scholarmatch::workflow::{MatchWorkflow, RerankCache, WorkflowOptions};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗ ██████╗██╗  ██╗ ██████╗ ██╗      █████╗ ██████╗ ███╗   ███╗ █████╗ ████████╗ ██████╗██╗  ██╗
██╔════╝██╔════╝██║  ██║██╔═══██╗██║     ██╔══██╗██╔══██╗████╗ ████║██╔══██╗╚══██╔══╝██╔════╝██║  ██║
███████╗██║     ███████║██║   ██║██║     ███████║██████╔╝██╔████╔██║███████║   ██║   ██║     ███████║
╚════██║██║     ██╔══██║██║   ██║██║     ██╔══██║██╔══██╗██║╚██╔╝██║██╔══██║   ██║   ██║     ██╔══██║
███████║╚██████╗██║  ██║╚██████╔╝███████╗██║  ██║██║  ██║██║ ╚═╝ ██║██║  ██║   ██║   ╚██████╗██║  ██║
╚══════╝ ╚═════╝╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝╚═╝  ╚═╝   ╚═╝    ╚═════╝╚═╝  ╚═╝

        EMBED. RETRIEVE. RERANK.
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        collection = %config.collection,
        "Scholarmatch starting"
    );

    let embedder = HttpEmbedder::new(
        &config.embedder_url,
        config.embedder_model.clone(),
        config.embedder_api_key.clone(),
        config.embed_timeout,
    )?;

    let store = ScholarshipStore::connect(
        &config.qdrant_url,
        config.collection.clone(),
        config.retrieve_timeout,
    )?;

    if let Err(e) = store.health_check().await {
        tracing::warn!("Qdrant health check failed: {}. Continuing anyway.", e);
    }

    let reranker = LlmReranker::new(config.rerank_model.clone(), config.rerank_timeout);

    let telemetry = Arc::new(TelemetrySink::with_capacity(config.telemetry_capacity));
    let rerank_cache = Arc::new(RerankCache::with_capacity(config.rerank_cache_capacity));

    let workflow = Arc::new(MatchWorkflow::new(
        embedder,
        store,
        reranker,
        rerank_cache,
        telemetry,
        WorkflowOptions {
            rerank_cache_ttl: config.rerank_cache_ttl,
        },
    ));

    let state = HandlerState::new(workflow);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Scholarmatch shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SCHOLARMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
