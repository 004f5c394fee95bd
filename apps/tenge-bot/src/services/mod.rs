pub mod admin_service;
pub mod referral_service;
pub mod subscription_service;
