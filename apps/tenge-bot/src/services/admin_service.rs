use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tenge_db::{UserStats, UserStore};

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn UserStore>,
    sudo_users: Arc<HashSet<i64>>,
}

impl AdminService {
    pub fn new(store: Arc<dyn UserStore>, sudo_users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            store,
            sudo_users: Arc::new(sudo_users.into_iter().collect()),
        }
    }

    pub fn is_admin(&self, tg_id: i64) -> bool {
        self.sudo_users.contains(&tg_id)
    }

    pub async fn stats(&self) -> Result<UserStats> {
        self.store.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenge_db::MemoryUserStore;

    #[tokio::test]
    async fn only_sudo_users_are_admins() {
        let admin = AdminService::new(Arc::new(MemoryUserStore::new()), [7943250659]);
        assert!(admin.is_admin(7943250659));
        assert!(!admin.is_admin(111));
        assert_eq!(admin.stats().await.unwrap(), UserStats::default());
    }
}
