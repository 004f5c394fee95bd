use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, ParseMode};
use tracing::{debug, error, info};

use crate::bot::intent::CallbackAction;
use crate::bot::{keyboards, texts};
use crate::errors::BotResult;
use crate::services::subscription_service::VerifyOutcome;
use crate::state::AppState;

pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: AppState) -> BotResult<()> {
    info!("Received callback: {:?}", q.data);
    let callback_id = q.id.clone();
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    let result = match q.data.as_deref().and_then(CallbackAction::decode) {
        Some(CallbackAction::VerifySubscription) => {
            verify_subscription(&bot, chat_id, q.from.id.0, &state).await
        }
        None => {
            debug!("Unknown callback data {:?}", q.data);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Error in check_subscription: {}", e);
        let _ = bot
            .send_message(chat_id, texts::GENERIC_FAILURE)
            .await
            .map_err(|e| error!("Failed to report callback failure: {}", e));
    }

    bot.answer_callback_query(callback_id).await?;
    Ok(())
}

async fn verify_subscription(
    bot: &Bot,
    chat_id: ChatId,
    user_id: u64,
    state: &AppState,
) -> BotResult<()> {
    match state.subscriptions.verify(user_id).await? {
        VerifyOutcome::Confirmed { .. } => {
            bot.send_message(chat_id, texts::MAIN_MENU)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_menu())
                .await?;
        }
        VerifyOutcome::NotSubscribed => {
            bot.send_message(chat_id, texts::PLEASE_SUBSCRIBE).await?;
        }
        VerifyOutcome::CheckFailed => {
            bot.send_message(chat_id, texts::GENERIC_FAILURE).await?;
        }
    }
    Ok(())
}
