use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::ChatProvider;
use crate::shared::utils::DbPool;

pub struct AppState {
    pub conn: DbPool,
    pub config: Arc<AppConfig>,
    pub llm_provider: Arc<dyn ChatProvider>,
}
