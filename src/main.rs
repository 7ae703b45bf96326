use std::env;
use std::sync::Arc;

use site_payroll::api::{AppState, create_router};
use site_payroll::clock::SystemClock;
use site_payroll::config::ConfigLoader;
use site_payroll::store::InMemoryStore;
use tracing_subscriber::EnvFilter;

const CONFIG_DIR_VAR: &str = "PAYROLL_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = "./config";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("info,site_payroll=debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_dir = env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let loader = ConfigLoader::load(&config_dir)?;
    let (config, seed) = loader.into_parts();

    tracing::info!(
        config_dir = %config_dir,
        workers = seed.workers.len(),
        sites = seed.sites.len(),
        default_cut_weekday = config.payroll.default_cut_weekday.index(),
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryStore::from_seed(seed));
    let state = AppState::new(store, Arc::new(SystemClock), config.payroll.clone());
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %config.server.bind_address, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
