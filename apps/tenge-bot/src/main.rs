use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use teloxide::prelude::*;
use tenge_db::{MemoryUserStore, UserRepository, UserStore};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod bot;
mod config;
mod errors;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use crate::bot::utils::channel_check::{SubscriptionChecker, TelegramMembership};
use crate::config::Config;
use crate::services::admin_service::AdminService;
use crate::services::referral_service::ReferralService;
use crate::services::subscription_service::SubscriptionService;
use crate::state::{AppState, BotSettings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    info!("Starting Tenge Bot...");

    if config.channel_ids.len() != config.channel_links.len() {
        warn!(
            "{} required channels but {} invite links configured",
            config.channel_ids.len(),
            config.channel_links.len()
        );
    }

    let store: Arc<dyn UserStore> = if config.memory_store {
        warn!("Using the in-memory user store, nothing survives a restart");
        Arc::new(MemoryUserStore::new())
    } else {
        let pool = tenge_db::connect(&config.db.to_db_config()).await?;
        Arc::new(UserRepository::new(pool))
    };
    if let Err(e) = store.ensure_initialized().await {
        error!("Error initializing the database: {:#}", e);
        return Err(e);
    }
    info!("Database initialized.");

    let bot = Bot::new(&config.bot_token);
    let resolved_username = bot::identity_check(&bot).await?;
    let bot_username = config.bot_username.clone().unwrap_or(resolved_username);

    let checker = SubscriptionChecker::new(
        Arc::new(TelegramMembership::new(bot.clone())),
        config.channel_ids.clone(),
    );

    let state = AppState {
        settings: Arc::new(BotSettings {
            bot_username,
            channel_links: config.channel_links.clone(),
        }),
        referrals: ReferralService::new(store.clone(), i64::from(config.referral_reward)),
        subscriptions: SubscriptionService::new(
            store.clone(),
            checker,
            i64::from(config.subscription_bonus),
            config.bonus_policy,
            config.membership_error_policy,
        ),
        admin: AdminService::new(store, config.sudo_user_ids()),
    };

    info!(
        bonus_policy = ?config.bonus_policy,
        membership_error_policy = ?config.membership_error_policy,
        "Bot is running..."
    );
    bot::run_bot(bot, state).await;
    Ok(())
}
