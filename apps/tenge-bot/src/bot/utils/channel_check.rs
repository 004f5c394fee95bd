use async_trait::async_trait;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, UserId};

use crate::errors::{BotError, BotResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn is_subscribed(self) -> bool {
        matches!(
            self,
            MemberStatus::Creator | MemberStatus::Administrator | MemberStatus::Member
        )
    }
}

impl From<&ChatMemberKind> for MemberStatus {
    fn from(kind: &ChatMemberKind) -> Self {
        if kind.is_owner() {
            MemberStatus::Creator
        } else if kind.is_administrator() {
            MemberStatus::Administrator
        } else if kind.is_member() {
            MemberStatus::Member
        } else if kind.is_restricted() {
            MemberStatus::Restricted
        } else if kind.is_banned() {
            MemberStatus::Banned
        } else {
            MemberStatus::Left
        }
    }
}

/// Where membership statuses come from.
#[async_trait]
pub trait MembershipSource: Send + Sync {
    async fn member_status(&self, channel_id: i64, user_id: u64) -> BotResult<MemberStatus>;
}

/// `getChatMember` against the Bot API.
#[derive(Clone)]
pub struct TelegramMembership {
    bot: Bot,
}

impl TelegramMembership {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipSource for TelegramMembership {
    async fn member_status(&self, channel_id: i64, user_id: u64) -> BotResult<MemberStatus> {
        match self
            .bot
            .get_chat_member(ChatId(channel_id), UserId(user_id))
            .await
        {
            Ok(member) => Ok(MemberStatus::from(&member.kind)),
            Err(e) => {
                tracing::warn!(
                    "Failed to check channel membership for user {} in {}: {}",
                    user_id,
                    channel_id,
                    e
                );
                Err(BotError::Membership {
                    channel: channel_id,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Checks that a user is present in every required channel.
#[derive(Clone)]
pub struct SubscriptionChecker {
    source: Arc<dyn MembershipSource>,
    channels: Vec<i64>,
}

impl SubscriptionChecker {
    pub fn new(source: Arc<dyn MembershipSource>, channels: Vec<i64>) -> Self {
        Self { source, channels }
    }

    /// Re-queries Telegram on every call. The first failed lookup aborts the
    /// whole check.
    pub async fn is_subscribed(&self, user_id: u64) -> BotResult<bool> {
        for &channel in &self.channels {
            let status = self.source.member_status(channel, user_id).await?;
            if !status.is_subscribed() {
                tracing::debug!(
                    "User {} is NOT a member of channel {} (status: {:?})",
                    user_id,
                    channel,
                    status
                );
                return Ok(false);
            }
        }
        tracing::info!("User {} is a member of all required channels", user_id);
        Ok(true)
    }
}
