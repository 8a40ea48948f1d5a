use expert_directory::{HttpServer, Roster, ServerConfig};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Optional YAML file; environment variables override it
const CONFIG_ENV: &str = "DIRECTORY_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Expert Directory v{}", expert_directory::version());

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => ServerConfig::from_yaml_file(path)?,
        Err(_) => ServerConfig::default(),
    }
    .with_env_overrides()?;

    let roster = match &config.roster_csv {
        Some(path) if path.exists() => Roster::from_csv_path(path)?,
        Some(path) => {
            info!(path = %path.display(), "roster file not found, starting empty");
            Roster::new()
        }
        None => Roster::new(),
    };

    let server = HttpServer::new(Arc::new(RwLock::new(roster)), config);
    server.start().await
}
