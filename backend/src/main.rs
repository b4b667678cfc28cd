use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use backend::{AppState, create_router, gazetteer::Gazetteer};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_GAZETTEER_PATH: &str = "backend/data/gazetteer.json";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Local location service: autosuggest and distance matrix"
)]
struct Args {
    /// JSON array of places, each `{ "city": ..., "lat": ..., "lng": ... }`
    #[arg(long, env = "GAZETTEER_JSON", default_value = SAMPLE_GAZETTEER_PATH)]
    gazetteer: PathBuf,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3002")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let gazetteer = Gazetteer::from_file(&args.gazetteer)?;
    tracing::info!(
        "loaded {} places from {}",
        gazetteer.len(),
        args.gazetteer.display()
    );

    let state = AppState {
        gazetteer: Arc::new(gazetteer),
    };
    let app = create_router(state);

    tracing::info!("starting location service on http://{}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
