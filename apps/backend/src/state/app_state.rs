use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::realtime::RoomHub;
use crate::services::GameFlowService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Present when rooms are persisted in a database.
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub rooms: Arc<GameFlowService>,
    pub hub: Arc<RoomHub>,
}

impl AppState {
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
