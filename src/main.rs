use std::sync::Arc;

use anyhow::Result;
use macscope::http::ApiServer;
use macscope::query;
use macscope::store::BoltGraph;
use macscope::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");

    match command {
        "check" => {
            // Probe the graph store connection and report what it holds
            run_check().await?;
        }
        "serve" | _ => {
            // HTTP query gateway mode
            run_server().await?;
        }
    }

    Ok(())
}

/// Connect to the configured graph store.
async fn connect_store(config: &Config) -> Result<BoltGraph> {
    let password = config.graph_password()?;
    let store = BoltGraph::connect(&config.graph.uri, &config.graph.user, &password).await?;
    Ok(store)
}

/// Run the HTTP query gateway
async fn run_server() -> Result<()> {
    log::info!("Starting Macscope v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Graph store: {}", config.graph.uri);

    let store = connect_store(&config).await?;

    let server = ApiServer::new(Arc::new(store), &config);
    server.run(config.http.port).await?;

    Ok(())
}

/// Verify the graph store is reachable and holds survey data
async fn run_check() -> Result<()> {
    log::info!("Starting Macscope v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Graph store: {}", config.graph.uri);

    let store = connect_store(&config).await?;

    let macs = query::known_macs(&store).await?;
    log::info!(
        "Graph store reachable; {} devices with recorded sightings",
        macs.len()
    );

    Ok(())
}
