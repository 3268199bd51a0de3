use std::sync::Arc;
use std::time::Duration;

use crate::adapters::rooms_mem::MemoryRoomStore;
use crate::adapters::rooms_sea::SeaRoomStore;
use crate::error::AppError;
use crate::infra::db::connect_and_migrate;
use crate::realtime::RoomHub;
use crate::repos::rooms::RoomStore;
use crate::services::GameFlowService;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
#[derive(Default)]
pub struct StateBuilder {
    security_config: SecurityConfig,
    database_url: Option<String>,
    night_timeout: Option<Duration>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist rooms in this database. Without one, rooms live in memory.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        self.database_url = url;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_night_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.night_timeout = timeout;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let (db, store): (_, Arc<dyn RoomStore>) = match self.database_url {
            Some(url) => {
                // single entrypoint: connect + migrate
                let conn = connect_and_migrate(&url).await?;
                (Some(conn.clone()), Arc::new(SeaRoomStore::new(conn)))
            }
            None => (None, Arc::new(MemoryRoomStore::new())),
        };

        let hub = Arc::new(RoomHub::new());
        let mut rooms = GameFlowService::new(store, hub.clone());
        if let Some(timeout) = self.night_timeout {
            rooms = rooms.with_night_timeout(timeout);
        }

        Ok(AppState {
            db,
            security: self.security_config,
            rooms: Arc::new(rooms),
            hub,
        })
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
