use anyhow::Result;
use axum::Router;
use clap::Parser;
use recommender_server::{build_app, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recommender-server")]
#[command(about = "HTTP API for job-description to assessment recommendations", long_about = None)]
struct Args {
    /// Assessment catalog (JSON array)
    #[arg(long, default_value = "./data/assessments.json")]
    catalog: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Upper bound on results per request
    #[arg(long, default_value_t = 10)]
    max_k: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    // Catalog errors abort here, before anything is served.
    let state = AppState::load(&args.catalog, args.max_k)?;
    let app: Router = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
