use bankable_core::{
    api::{start_server, ApiState},
    goals::GoalService,
    market::MarketDataClient,
    storage::{FileStore, InMemoryStore, KeyValueStore},
    widgets::WidgetService,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Bankable Core - API Server");
    info!("Port: {}", api_port);

    // DATA_DIR enables file-backed persistence; otherwise everything
    // lives in memory for the lifetime of the process.
    let store: Arc<dyn KeyValueStore> = match std::env::var("DATA_DIR") {
        Ok(dir) => {
            info!(dir = %dir, "Using file-backed storage");
            Arc::new(FileStore::new(dir))
        }
        Err(_) => {
            info!("Using in-memory storage (set DATA_DIR to persist)");
            Arc::new(InMemoryStore::new())
        }
    };

    let goals = Arc::new(GoalService::load(store.clone()).await?);
    let widgets = Arc::new(WidgetService::load(store).await?);

    let market = match MarketDataClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "Market data disabled");
            None
        }
    };

    let state = ApiState::new(goals, widgets, market);

    info!("Services initialized");
    info!("Starting API server...");

    start_server(state, api_port).await?;

    Ok(())
}
