use teloxide::prelude::*;
use teloxide::types::User;
use tenge_db::NewUser;
use tracing::{debug, error, info, warn};

use crate::bot::intent::Intent;
use crate::bot::{keyboards, texts};
use crate::errors::BotResult;
use crate::services::referral_service::referral_link;
use crate::state::AppState;

pub async fn message_handler(bot: Bot, msg: Message, state: AppState) -> BotResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(intent) = Intent::decode(text, &state.settings.bot_username) else {
        debug!("Ignoring message in chat {}: {:?}", msg.chat.id, text);
        return Ok(());
    };
    let Some(from) = msg.from.as_ref() else {
        debug!("Ignoring {:?} without a sender", intent);
        return Ok(());
    };
    info!("Received {:?} from user {}", intent, from.id);

    if let Err(e) = handle_intent(&bot, &msg, from, &state, intent).await {
        error!("Error in {:?} handler: {}", intent, e);
        bot.send_message(msg.chat.id, texts::GENERIC_FAILURE).await?;
    }
    Ok(())
}

async fn handle_intent(
    bot: &Bot,
    msg: &Message,
    from: &User,
    state: &AppState,
    intent: Intent,
) -> BotResult<()> {
    let chat_id = msg.chat.id;
    match intent {
        Intent::Start { referrer } => {
            let user = NewUser::new(
                from.id.0 as i64,
                from.username.clone(),
                Some(from.first_name.clone()),
            );
            let name = user.name.clone();
            state.referrals.register(user, referrer).await?;

            bot.send_message(chat_id, texts::greeting(&name))
                .reply_markup(keyboards::subscription_keyboard(
                    &state.settings.channel_links,
                ))
                .await?;
        }
        Intent::Cabinet => {
            let cabinet = state.referrals.cabinet(from.id.0 as i64).await?;
            bot.send_message(chat_id, texts::cabinet(&cabinet)).await?;
        }
        Intent::EarnMoney => {
            let link = referral_link(&state.settings.bot_username, from.id.0);
            bot.send_message(chat_id, texts::earn_money(&link, state.referrals.reward()))
                .await?;
        }
        Intent::Information => {
            bot.send_message(chat_id, texts::information(state.referrals.reward()))
                .await?;
        }
        Intent::Stats => {
            if !state.admin.is_admin(from.id.0 as i64) {
                warn!("User {} requested /stats without sudo rights", from.id);
                return Ok(());
            }
            let stats = state.admin.stats().await?;
            bot.send_message(chat_id, texts::stats(&stats)).await?;
        }
    }
    Ok(())
}
