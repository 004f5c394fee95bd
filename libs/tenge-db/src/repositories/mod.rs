use anyhow::Result;
use async_trait::async_trait;

use crate::models::user::{BotUser, NewUser, UserStats};

pub mod memory_repo;
pub mod user_repo;

/// Point-access storage for bot users.
///
/// Every mutating call is a single atomic statement, so callers never need an
/// in-process lock to keep the counters consistent.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn ensure_initialized(&self) -> Result<()>;

    async fn get(&self, user_id: i64) -> Result<Option<BotUser>>;

    /// Inserts the row unless one already exists. Returns `true` only for a
    /// genuine first insert.
    async fn create_user(&self, user: &NewUser) -> Result<bool>;

    /// Adds to `refcount` and `balance`. Returns `false` if the row is absent.
    async fn credit_referrer(&self, user_id: i64, ref_delta: i64, balance_delta: i64)
        -> Result<bool>;

    /// Adds to `balance`. Returns `false` if the row is absent.
    async fn credit_balance(&self, user_id: i64, delta: i64) -> Result<bool>;

    /// Adds to `balance` and sets `bonus_awarded`, only if it was not set yet.
    async fn award_bonus_once(&self, user_id: i64, delta: i64) -> Result<bool>;

    /// `(balance, refcount)`, zeros when the row is absent.
    async fn balance_and_refcount(&self, user_id: i64) -> Result<(i64, i64)>;

    async fn stats(&self) -> Result<UserStats>;
}
