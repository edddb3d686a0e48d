/// Studio site backend
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server with:
/// - Project listing/creation at /api/projects
/// - Media uploads at /api/upload
/// - Health check at /healthz

use studio_site::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (.env file, then STUDIO_* variables)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
