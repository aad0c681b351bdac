use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Settings;

/// Shared by every handler: the connection pool and immutable settings.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Settings) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
        }
    }
}
