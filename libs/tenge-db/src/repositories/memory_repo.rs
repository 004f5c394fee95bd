use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::models::user::{BotUser, NewUser, UserStats};
use crate::repositories::UserStore;

/// In-process store with the same semantics as [`UserRepository`](super::user_repo::UserRepository).
///
/// Used by tests and by `--memory-store` runs without a MySQL server.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: Mutex<BTreeMap<i64, BotUser>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = BotUser>) -> Self {
        Self {
            rows: Mutex::new(users.into_iter().map(|u| (u.user_id, u)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ensure_initialized(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<BotUser>> {
        Ok(self.rows.lock().await.get(&user_id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&user.user_id) {
            return Ok(false);
        }
        rows.insert(user.user_id, BotUser::from(user.clone()));
        Ok(true)
    }

    async fn credit_referrer(
        &self,
        user_id: i64,
        ref_delta: i64,
        balance_delta: i64,
    ) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.get_mut(&user_id) else {
            return Ok(false);
        };
        row.refcount += ref_delta;
        row.balance += balance_delta;
        Ok(true)
    }

    async fn credit_balance(&self, user_id: i64, delta: i64) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.get_mut(&user_id) else {
            return Ok(false);
        };
        row.balance += delta;
        Ok(true)
    }

    async fn award_bonus_once(&self, user_id: i64, delta: i64) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&user_id) {
            Some(row) if !row.bonus_awarded => {
                row.balance += delta;
                row.bonus_awarded = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn balance_and_refcount(&self, user_id: i64) -> Result<(i64, i64)> {
        Ok(self
            .rows
            .lock()
            .await
            .get(&user_id)
            .map(|u| (u.balance, u.refcount))
            .unwrap_or((0, 0)))
    }

    async fn stats(&self) -> Result<UserStats> {
        let rows = self.rows.lock().await;
        Ok(UserStats {
            users: rows.len() as i64,
            referred: rows.values().filter(|u| u.invitedby.is_some()).count() as i64,
            total_balance: rows.values().map(|u| u.balance).sum(),
        })
    }
}
