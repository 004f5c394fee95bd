use std::sync::Arc;
use url::Url;

use crate::services::admin_service::AdminService;
use crate::services::referral_service::ReferralService;
use crate::services::subscription_service::SubscriptionService;

/// Static presentation settings resolved at startup.
#[derive(Debug)]
pub struct BotSettings {
    pub bot_username: String,
    pub channel_links: Vec<Url>,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<BotSettings>,
    pub referrals: ReferralService,
    pub subscriptions: SubscriptionService,
    pub admin: AdminService,
}
