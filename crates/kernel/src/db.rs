//! Database connection pool management.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::config::Config;

/// How many startup probe attempts before giving up (2s apart, 5 minutes).
const PROBE_MAX_TRIES: u32 = 150;

/// Delay between startup probe attempts.
const PROBE_WAIT: Duration = Duration::from_secs(2);

/// Create a PostgreSQL connection pool.
///
/// Connections are established lazily so the startup probe controls when
/// (and how long) we wait for the database to come up.
pub fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    Ok(pool)
}

/// Check if the database connection is healthy.
pub async fn check_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Block startup until the database answers `SELECT 1`.
///
/// Probes every 2 seconds for up to 5 minutes; deployment-time retries live
/// here, never in request-serving code.
pub async fn wait_until_available(pool: &PgPool) -> Result<()> {
    info!("checking if database is available");

    for attempt in 1..=PROBE_MAX_TRIES {
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => {
                info!("database is available");
                return Ok(());
            }
            Err(e) => {
                warn!(attempt, error = %e, "database not yet available");
                tokio::time::sleep(PROBE_WAIT).await;
            }
        }
    }

    bail!("database did not become available after {PROBE_MAX_TRIES} attempts")
}

/// Create the schema if it does not exist yet.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shop_category (
            id UUID PRIMARY KEY,
            name VARCHAR(32) NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create shop_category table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shop_product (
            id UUID PRIMARY KEY,
            name VARCHAR(32) NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create shop_product table")?;

    Ok(())
}
