use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use supportserver::config::AppConfig;
use supportserver::llm::{ChatProvider, GroqClient};
use supportserver::server;
use supportserver::shared::state::AppState;
use supportserver::shared::utils::{create_conn, run_pending_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    let pool = create_conn(&config.database_url)?;
    run_pending_migrations(&pool)?;
    info!("Database schema is up to date");

    let llm_provider: Arc<dyn ChatProvider> = Arc::new(GroqClient::new(&config.llm));
    let state = Arc::new(AppState {
        conn: pool,
        config,
        llm_provider,
    });

    server::run(state).await
}
