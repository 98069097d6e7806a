//! Calculator server - HTTP arithmetic service backing the calculator.

mod config;
mod error;
mod handler;

use config::ServerConfig;
use error::ServerResult;
use handler::Server;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ServerResult<()> {
    if std::env::args().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        println!("Usage: calc-server\n\n{}", config::USAGE);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting calculator server on {}", config.bind_addr);

    Server::new(config).run().await
}
