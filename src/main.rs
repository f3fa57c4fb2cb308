//! Reference deployment binary.
//!
//! Wires the original topology: a staging counter with raw counts on its own
//! ingress port, and a prod/public counter pair (raw + redacted) fed through
//! a multiplexer from a second ingress port, all published over HTTP.

use pulsegram::{
    bind_ingress, spawn_ingress, Config, Credentials, IngressMetrics, Multiplexer, PointSink,
    PublishState, RedactingPolicy, SystemClock, UncensoredPolicy, WindowedCounter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run().await {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = Config::load(&config_path)?;
    info!(path = %config_path, "configuration loaded");

    let clock = Arc::new(SystemClock::new());

    let staging = Arc::new(WindowedCounter::new(
        config.staging_window(),
        Box::new(UncensoredPolicy::new()),
        clock.clone(),
    )?);

    let prod = Arc::new(WindowedCounter::new(
        config.prod_window(),
        Box::new(UncensoredPolicy::new()),
        clock.clone(),
    )?);

    let public = Arc::new(WindowedCounter::new(
        config.prod_window(),
        Box::new(RedactingPolicy::new(config.allowed_endpoints.clone())),
        clock,
    )?);

    // Each ingress path gets its own socket and metrics; a socket failure on
    // one path must not take down the other or the summary server.
    let staging_socket = bind_ingress(config.staging_ingress_port).await?;
    spawn_ingress(
        staging_socket,
        staging.clone() as Arc<dyn PointSink>,
        IngressMetrics::new(),
    );

    let prod_socket = bind_ingress(config.prod_ingress_port).await?;
    let prod_fanout = Arc::new(Multiplexer::new(vec![
        prod.clone() as Arc<dyn PointSink>,
        public.clone() as Arc<dyn PointSink>,
    ]));
    spawn_ingress(prod_socket, prod_fanout, IngressMetrics::new());

    let state = Arc::new(PublishState {
        staging,
        prod,
        public,
        credentials: Credentials {
            username: config.username.clone(),
            password: config.password.clone(),
        },
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    pulsegram::infrastructure::http::serve(listener, state).await?;

    Ok(())
}
