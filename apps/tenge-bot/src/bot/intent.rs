//! Inbound text and callback data decoded into typed intents.
//!
//! Menu labels live here and nowhere else; keyboards render them and the
//! decoder matches them, so a relabel can not break routing.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Командалар:")]
pub enum Command {
    #[command(description = "ботты бастау")]
    Start(String),
    #[command(description = "статистика (тек әкімшілер үшін)")]
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Cabinet,
    EarnMoney,
    Information,
}

impl MenuButton {
    pub const ALL: [MenuButton; 3] = [
        MenuButton::Cabinet,
        MenuButton::EarnMoney,
        MenuButton::Information,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuButton::Cabinet => "Жеке Кабинет 🙋‍♂️",
            MenuButton::EarnMoney => "Ақша Табу 💵",
            MenuButton::Information => "Ақпарат 📚",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|b| b.label() == text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start { referrer: Option<i64> },
    Cabinet,
    EarnMoney,
    Information,
    Stats,
}

impl From<MenuButton> for Intent {
    fn from(button: MenuButton) -> Self {
        match button {
            MenuButton::Cabinet => Intent::Cabinet,
            MenuButton::EarnMoney => Intent::EarnMoney,
            MenuButton::Information => Intent::Information,
        }
    }
}

impl Intent {
    pub fn decode(text: &str, bot_username: &str) -> Option<Self> {
        let text = text.trim();
        if text.starts_with('/') {
            return match Command::parse(text, bot_username).ok()? {
                Command::Start(arg) => Some(Intent::Start {
                    referrer: parse_referrer(&arg),
                }),
                Command::Stats => Some(Intent::Stats),
            };
        }
        MenuButton::from_label(text).map(Intent::from)
    }
}

/// The `/start` payload. Anything that is not a plain integer means "no referrer".
pub fn parse_referrer(arg: &str) -> Option<i64> {
    arg.split_whitespace().next()?.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    VerifySubscription,
}

impl CallbackAction {
    pub fn token(self) -> &'static str {
        match self {
            CallbackAction::VerifySubscription => "check_subscription",
        }
    }

    pub fn decode(data: &str) -> Option<Self> {
        match data {
            "check_subscription" => Some(CallbackAction::VerifySubscription),
            _ => None,
        }
    }
}
