use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bot::utils::channel_check::{MemberStatus, MembershipSource};
use crate::errors::{BotError, BotResult};

/// Membership answers fixed up front; anything not scripted reads as `Left`.
#[derive(Default)]
pub struct ScriptedMembership {
    statuses: HashMap<(i64, u64), MemberStatus>,
    failing: HashSet<i64>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedMembership {
    pub fn with(mut self, channel: i64, user: u64, status: MemberStatus) -> Self {
        self.statuses.insert((channel, user), status);
        self
    }

    pub fn failing(mut self, channel: i64) -> Self {
        self.failing.insert(channel);
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl MembershipSource for ScriptedMembership {
    async fn member_status(&self, channel_id: i64, user_id: u64) -> BotResult<MemberStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&channel_id) {
            return Err(BotError::Membership {
                channel: channel_id,
                reason: "Bad Request: chat not found".to_string(),
            });
        }
        Ok(self
            .statuses
            .get(&(channel_id, user_id))
            .copied()
            .unwrap_or(MemberStatus::Left))
    }
}
