//! CiteLedger API Gateway
//!
//! Hosts a single citation ledger behind HTTP.
//! Handles:
//! - Caller identity and block height for every mutating call
//! - Serialization of mutations against the shared ledger
//! - Request routing
//! - Observability (logging, metrics)

mod clock;
mod handlers;
mod middleware;

use anyhow::Context;
use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use citeledger_common::{
    config::AppConfig,
    metrics::{self, LEDGER_LATENCY_BUCKETS},
};
use citeledger_ledger::{CitationLedger, SharedLedger};
use clock::HeightClock;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::future::{Future, IntoFuture};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ledger: SharedLedger,
    pub clock: Arc<HeightClock>,
}

impl AppState {
    /// Build the ledger from configuration, binding the bootstrap authority if set
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let mut ledger = CitationLedger::with_config(config.ledger.ledger_config()?)
            .context("Invalid starting ledger policy")?;

        if let Some(authority) = config.ledger.bootstrap_principal() {
            ledger
                .set_authority_contract(authority)
                .context("Failed to bind bootstrap authority")?;
        }

        Ok(Self {
            config: Arc::new(config),
            ledger: SharedLedger::new(ledger),
            clock: Arc::new(HeightClock::default()),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&config);

    info!(
        service = %config.observability.service_name,
        "Starting CiteLedger API Gateway v{}",
        citeledger_common::VERSION
    );

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], config.observability.metrics_port))
            .add_global_label("service", config.observability.service_name.clone())
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                LEDGER_LATENCY_BUCKETS,
            )?
            .install()
            .context("Failed to install Prometheus exporter")?;
        metrics::register_metrics();
        info!(port = config.observability.metrics_port, "Metrics exporter listening");
    }

    let state = AppState::from_config(config)?;
    let config = state.config.clone();

    // Build the router
    let app = create_router(state);

    // Start the server
    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    serve_until(listener, app, shutdown_signal(), config.shutdown_timeout()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Serve until `signal` resolves, then give in-flight requests `grace` to finish
async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, fired_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = fired_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return Ok(result?),
        Ok(()) = fired_rx => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            warn!(
                grace_secs = grace.as_secs_f64(),
                "In-flight requests did not drain, forcing shutdown"
            );
            Ok(())
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let timeout = TimeoutLayer::new(state.config.request_timeout());

    // API routes
    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Authority and policy
        .route("/authority", post(handlers::authority::set_authority))
        .route("/config", get(handlers::policy::get_config))
        .route("/config/max-citations", put(handlers::policy::set_max_citations))
        .route("/config/reward-base", put(handlers::policy::set_reward_base))

        // Citations
        .route("/citations", post(handlers::citations::add_citation))
        .route("/citations/total", get(handlers::citations::total_citations))
        .route(
            "/citations/{id}",
            get(handlers::citations::get_citation).delete(handlers::citations::remove_citation),
        )

        // Per-paper aggregates
        .route("/papers/{id}/citation-count", get(handlers::papers::citation_count))
        .route("/papers/{id}/reward", get(handlers::papers::citation_reward))
        .route_layer(from_fn(middleware::request_metrics::track_requests));

    // Compose the app
    Router::new()
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
