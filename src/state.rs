use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Shared state handed to every handler through Axum's `State` extractor.
///
/// Cloning is cheap: the connection is a pooled handle and the config is a
/// small owned struct.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}
