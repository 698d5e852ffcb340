use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Open a pooled database connection.
///
/// Pool sizing assumes a single API instance in front of Postgres; SQLx
/// statement logging is off because the request trace layer already logs
/// one span per request.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the URL is invalid.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    Ok(Database::connect(opts).await?)
}
