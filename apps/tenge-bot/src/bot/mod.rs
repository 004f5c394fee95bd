use anyhow::{Context, Result};
use teloxide::dispatching::DefaultKey;
use teloxide::{dptree, error_handlers::LoggingErrorHandler, prelude::*, types::Update};
use tracing::{error, info};

use crate::errors::BotError;
use crate::state::AppState;

pub mod handlers;
pub mod intent;
pub mod keyboards;
pub mod texts;
pub mod utils;

/// Verifies the token with `getMe` and returns the bot's username.
pub async fn identity_check(bot: &Bot) -> Result<String> {
    info!("Bot identity check...");
    let me = bot
        .get_me()
        .await
        .context("Bot failed to connect to Telegram")?;
    let username = me
        .username
        .clone()
        .context("Bot account has no username")?;
    info!("Bot connected as: @{}", username);
    Ok(username)
}

pub async fn run_bot(bot: Bot, state: AppState) {
    info!("Starting bot dispatcher...");

    let _prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| {
        error!("CRITICAL BOT PANIC: {:?}", info);
    }));

    build_dispatcher(bot, state).dispatch().await;

    info!("Bot dispatcher exited");
}

/// Message and callback branches over the shared state, stopped by Ctrl-C.
pub fn build_dispatcher(bot: Bot, state: AppState) -> Dispatcher<Bot, BotError, DefaultKey> {
    let message_handler = Update::filter_message().endpoint(handlers::command::message_handler);
    let callback_handler =
        Update::filter_callback_query().endpoint(handlers::callback::callback_handler);

    Dispatcher::builder(
        bot,
        dptree::entry()
            .branch(message_handler)
            .branch(callback_handler),
    )
    .dependencies(dptree::deps![state])
    .default_handler(|upd: std::sync::Arc<Update>| async move {
        info!("Unhandled update: {:?}", upd.kind);
    })
    .error_handler(LoggingErrorHandler::with_custom_text(
        "An error has occurred in the dispatcher",
    ))
    .enable_ctrlc_handler()
    .build()
}
