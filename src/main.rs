use anyhow::Context;
use axum::Router;
use axum::extract::State;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tracing::info;

use crate::persistence::ExternalConnectivity;

mod api;
mod app_env;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routing_utils;

/// State shared by all request handlers
pub struct SharedData {
    pub ext_cxn: ExternalConnectivity,
}

type AppState = State<Arc<SharedData>>;

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    // Span/metric export only turns on when a collector endpoint is configured
    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)),
        _ => None,
    };
    logging::setup_logging_and_tracing(logging::init_env_filter(), otel_exporters);

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("the {} environment variable must be set", app_env::DB_URL))?;
    let db_pool = persistence::connect_sqlx(&db_url)
        .await
        .context("connecting to the database")?;
    persistence::ensure_schema(&db_pool).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: ExternalConnectivity::new(db_pool),
    });

    let router = Router::new()
        .merge(api::swagger_main::build_documentation())
        .nest("/todos", api::todo::todo_routes())
        .with_state(shared_data);
    let router = logging::attach_tracing_http(router);

    let port = match env::var(app_env::SERVER_PORT) {
        Ok(raw_port) => raw_port
            .parse()
            .with_context(|| format!("{} is not a valid port number", raw_port))?,
        Err(_) => DEFAULT_PORT,
    };
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;

    info!("Starting server on port {port}.");
    axum::serve(listener, router).await.context("serving HTTP")?;

    Ok(())
}
