use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, mysql::MySqlRow};

use crate::db;
use crate::models::user::{BotUser, DEFAULT_NAME, NewUser, UserStats};
use crate::repositories::UserStore;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> BotUser {
        BotUser {
            user_id: row.try_get::<i64, _>("user_id").unwrap_or_default(),
            username: row.try_get::<Option<String>, _>("username").ok().flatten(),
            name: row
                .try_get::<Option<String>, _>("name")
                .ok()
                .flatten()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            refcount: row
                .try_get::<Option<i32>, _>("refcount")
                .ok()
                .flatten()
                .map(i64::from)
                .unwrap_or_default(),
            balance: row
                .try_get::<Option<i32>, _>("balance")
                .ok()
                .flatten()
                .map(i64::from)
                .unwrap_or_default(),
            invitedby: row.try_get::<Option<i64>, _>("invitedby").ok().flatten(),
            bonus_awarded: row.try_get::<bool, _>("bonus_awarded").unwrap_or(false),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn ensure_initialized(&self) -> Result<()> {
        db::ensure_schema(&self.pool).await
    }

    async fn get(&self, user_id: i64) -> Result<Option<BotUser>> {
        let row = sqlx::query(
            "SELECT user_id, username, name, refcount, balance, invitedby, bonus_awarded \
             FROM botusers WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch bot user")?;
        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    async fn create_user(&self, user: &NewUser) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO botusers (user_id, username, name, invitedby)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.user_id)
        .bind(user.username.as_deref())
        .bind(&user.name)
        .bind(user.invitedby)
        .execute(&self.pool)
        .await
        .context("Failed to insert bot user")?;
        Ok(result.rows_affected() == 1)
    }

    async fn credit_referrer(
        &self,
        user_id: i64,
        ref_delta: i64,
        balance_delta: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE botusers
            SET refcount = COALESCE(refcount, 0) + ?, balance = COALESCE(balance, 0) + ?
            WHERE user_id = ?
            "#,
        )
        .bind(ref_delta)
        .bind(balance_delta)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to credit referrer")?;
        Ok(result.rows_affected() > 0)
    }

    async fn credit_balance(&self, user_id: i64, delta: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE botusers SET balance = COALESCE(balance, 0) + ? WHERE user_id = ?")
                .bind(delta)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .context("Failed to credit balance")?;
        Ok(result.rows_affected() > 0)
    }

    async fn award_bonus_once(&self, user_id: i64, delta: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE botusers
            SET balance = COALESCE(balance, 0) + ?, bonus_awarded = TRUE
            WHERE user_id = ? AND bonus_awarded = FALSE
            "#,
        )
        .bind(delta)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to award subscription bonus")?;
        Ok(result.rows_affected() > 0)
    }

    async fn balance_and_refcount(&self, user_id: i64) -> Result<(i64, i64)> {
        let row = sqlx::query("SELECT balance, refcount FROM botusers WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read balance")?;

        match row {
            Some(r) => Ok((counter(&r, "balance")?, counter(&r, "refcount")?)),
            None => Ok((0, 0)),
        }
    }

    async fn stats(&self) -> Result<UserStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS users,
                CAST(COALESCE(SUM(invitedby IS NOT NULL), 0) AS SIGNED) AS referred,
                CAST(COALESCE(SUM(balance), 0) AS SIGNED) AS total_balance
            FROM botusers
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to aggregate user stats")?;

        Ok(UserStats {
            users: row.try_get("users").context("Failed to decode users")?,
            referred: row.try_get("referred").context("Failed to decode referred")?,
            total_balance: row
                .try_get("total_balance")
                .context("Failed to decode total_balance")?,
        })
    }
}

/// A nullable `INT` counter column; NULL reads as zero, a decode failure is an error.
fn counter(row: &MySqlRow, column: &str) -> Result<i64> {
    let value = row
        .try_get::<Option<i32>, _>(column)
        .with_context(|| format!("Failed to decode {column}"))?;
    Ok(value.map(i64::from).unwrap_or_default())
}
