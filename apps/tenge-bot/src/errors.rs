use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("storage error: {0:#}")]
    Store(#[from] anyhow::Error),

    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("membership lookup failed for channel {channel}: {reason}")]
    Membership { channel: i64, reason: String },
}

pub type BotResult<T> = Result<T, BotError>;
