use anyhow::{Context, Result};
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::time::Duration;

/// Connection parameters for the MySQL store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DbConfig {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

pub async fn connect(config: &DbConfig) -> Result<MySqlPool> {
    if config.database.trim().is_empty() {
        return Err(anyhow::anyhow!("DB_NAME must not be empty"));
    }

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options())
        .await
        .with_context(|| {
            format!(
                "Failed to connect to MySQL at {}:{}/{}",
                config.host, config.port, config.database
            )
        })?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to MySQL"
    );

    Ok(pool)
}

pub(crate) const CREATE_BOTUSERS: &str = r#"
    CREATE TABLE IF NOT EXISTS botusers (
        user_id BIGINT PRIMARY KEY,
        username VARCHAR(255),
        refcount INT DEFAULT 0,
        balance INT DEFAULT 0,
        name VARCHAR(255),
        invitedby BIGINT,
        bonus_awarded BOOLEAN NOT NULL DEFAULT FALSE
    )
"#;

/// Creates `botusers` if absent and upgrades tables created before the
/// `bonus_awarded` column existed.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    sqlx::query(CREATE_BOTUSERS)
        .execute(pool)
        .await
        .context("Failed to create botusers table")?;

    let has_bonus_column = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_NAME = 'botusers'
          AND COLUMN_NAME = 'bonus_awarded'
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to inspect botusers columns")?
        > 0;

    if !has_bonus_column {
        tracing::warn!("botusers is missing bonus_awarded, adding it");
        sqlx::query(
            "ALTER TABLE botusers ADD COLUMN bonus_awarded BOOLEAN NOT NULL DEFAULT FALSE",
        )
        .execute(pool)
        .await
        .context("Failed to add bonus_awarded column")?;
    }

    Ok(())
}
