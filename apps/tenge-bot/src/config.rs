use clap::{Args, Parser, ValueEnum};
use tenge_db::DbConfig;
use url::Url;

/// What to show when Telegram can not tell us a user's membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MembershipErrorPolicy {
    /// Generic "try again" reply, distinct from "not subscribed".
    #[default]
    RetryPrompt,
    /// Treat the user as not subscribed.
    FailClosed,
}

/// How often the subscription bonus may be paid to the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BonusPolicy {
    #[default]
    Once,
    EveryCheck,
}

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    #[arg(long, env = "DB_NAME", default_value = "tenge")]
    pub db_name: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,
}

impl DbArgs {
    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.db_max_connections,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Telegram referral bot", long_about = None)]
pub struct Config {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    #[command(flatten)]
    pub db: DbArgs,

    /// Comma-separated operator ids, non-numeric entries are skipped
    #[arg(long, env = "SUDO_USERS", default_value = "7943250659")]
    pub sudo_users: String,

    /// Channels a user must join before the bonus is paid
    #[arg(
        long,
        env = "REQUIRED_CHANNEL_IDS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_values_t = [-1002494327985_i64, -1002184512508_i64]
    )]
    pub channel_ids: Vec<i64>,

    /// Invite links shown on /start, in the same order as the channel ids
    #[arg(
        long,
        env = "REQUIRED_CHANNEL_LINKS",
        value_delimiter = ',',
        default_values = ["https://t.me/+wtei_zPm4803N2Iy", "https://t.me/+f_i1-UN7HdplNGEy"]
    )]
    pub channel_links: Vec<Url>,

    /// Username used in referral links, resolved with getMe when unset
    #[arg(long, env = "BOT_USERNAME")]
    pub bot_username: Option<String>,

    /// Keep users in process memory instead of MySQL, for local runs
    #[arg(long, env = "MEMORY_STORE", default_value_t = false)]
    pub memory_store: bool,

    /// Credited to the referrer, never negative so balances only grow
    #[arg(long, env = "REFERRAL_REWARD", default_value_t = 38)]
    pub referral_reward: u32,

    #[arg(long, env = "SUBSCRIPTION_BONUS", default_value_t = 10)]
    pub subscription_bonus: u32,

    #[arg(long, env = "BONUS_POLICY", value_enum, default_value_t = BonusPolicy::Once)]
    pub bonus_policy: BonusPolicy,

    #[arg(
        long,
        env = "MEMBERSHIP_ERROR_POLICY",
        value_enum,
        default_value_t = MembershipErrorPolicy::RetryPrompt
    )]
    pub membership_error_policy: MembershipErrorPolicy,
}

impl Config {
    pub fn sudo_user_ids(&self) -> Vec<i64> {
        parse_id_list(&self.sudo_users)
    }
}

pub fn parse_id_list(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|s| s.parse().ok())
        .collect()
}
