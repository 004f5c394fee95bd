use std::sync::Arc;
use tenge_db::UserStore;
use tracing::{error, info};

use crate::bot::utils::channel_check::SubscriptionChecker;
use crate::config::{BonusPolicy, MembershipErrorPolicy};
use crate::errors::{BotError, BotResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Confirmed { bonus_paid: bool },
    NotSubscribed,
    /// Telegram could not answer and the policy asks for a retry prompt.
    CheckFailed,
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn UserStore>,
    checker: SubscriptionChecker,
    bonus: i64,
    bonus_policy: BonusPolicy,
    error_policy: MembershipErrorPolicy,
}

impl SubscriptionService {
    pub fn new(
        store: Arc<dyn UserStore>,
        checker: SubscriptionChecker,
        bonus: i64,
        bonus_policy: BonusPolicy,
        error_policy: MembershipErrorPolicy,
    ) -> Self {
        Self {
            store,
            checker,
            bonus,
            bonus_policy,
            error_policy,
        }
    }

    pub async fn verify(&self, user_id: u64) -> BotResult<VerifyOutcome> {
        let subscribed = match self.checker.is_subscribed(user_id).await {
            Ok(subscribed) => subscribed,
            Err(e @ BotError::Membership { .. }) => {
                error!("Subscription check for user {} failed: {}", user_id, e);
                return Ok(match self.error_policy {
                    MembershipErrorPolicy::RetryPrompt => VerifyOutcome::CheckFailed,
                    MembershipErrorPolicy::FailClosed => VerifyOutcome::NotSubscribed,
                });
            }
            Err(e) => return Err(e),
        };

        if !subscribed {
            return Ok(VerifyOutcome::NotSubscribed);
        }

        let id = user_id as i64;
        let bonus_paid = match self.bonus_policy {
            BonusPolicy::Once => self.store.award_bonus_once(id, self.bonus).await?,
            BonusPolicy::EveryCheck => self.store.credit_balance(id, self.bonus).await?,
        };
        if bonus_paid {
            info!("Paid subscription bonus {} to user {}", self.bonus, user_id);
        }

        Ok(VerifyOutcome::Confirmed { bonus_paid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::utils::channel_check::MemberStatus;
    use crate::test_support::ScriptedMembership;
    use std::sync::atomic::Ordering;
    use tenge_db::{BotUser, MemoryUserStore, NewUser};

    const CH1: i64 = -1002494327985;
    const CH2: i64 = -1002184512508;

    fn subscribed_111() -> ScriptedMembership {
        ScriptedMembership::default()
            .with(CH1, 111, MemberStatus::Member)
            .with(CH2, 111, MemberStatus::Member)
    }

    fn service(
        store: Arc<MemoryUserStore>,
        source: ScriptedMembership,
        bonus_policy: BonusPolicy,
        error_policy: MembershipErrorPolicy,
    ) -> SubscriptionService {
        let checker = SubscriptionChecker::new(Arc::new(source), vec![CH1, CH2]);
        SubscriptionService::new(store, checker, 10, bonus_policy, error_policy)
    }

    fn store_with_111() -> Arc<MemoryUserStore> {
        Arc::new(MemoryUserStore::with_users([BotUser::from(NewUser::new(
            111, None, None,
        ))]))
    }

    #[tokio::test]
    async fn confirmed_subscription_pays_bonus() {
        let store = store_with_111();
        let svc = service(
            store.clone(),
            subscribed_111(),
            BonusPolicy::Once,
            MembershipErrorPolicy::RetryPrompt,
        );

        let outcome = svc.verify(111).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Confirmed { bonus_paid: true });
        assert_eq!(store.balance_and_refcount(111).await.unwrap(), (10, 0));
    }

    #[tokio::test]
    async fn repeat_verify_pays_once_by_default() {
        let store = store_with_111();
        let svc = service(
            store.clone(),
            subscribed_111(),
            BonusPolicy::Once,
            MembershipErrorPolicy::RetryPrompt,
        );

        svc.verify(111).await.unwrap();
        let again = svc.verify(111).await.unwrap();
        assert_eq!(again, VerifyOutcome::Confirmed { bonus_paid: false });
        assert_eq!(store.balance_and_refcount(111).await.unwrap(), (10, 0));
    }

    #[tokio::test]
    async fn every_check_policy_pays_each_time() {
        let store = store_with_111();
        let svc = service(
            store.clone(),
            subscribed_111(),
            BonusPolicy::EveryCheck,
            MembershipErrorPolicy::RetryPrompt,
        );

        svc.verify(111).await.unwrap();
        svc.verify(111).await.unwrap();
        assert_eq!(store.balance_and_refcount(111).await.unwrap(), (20, 0));
    }

    #[tokio::test]
    async fn partial_membership_pays_nothing() {
        let store = store_with_111();
        let source = ScriptedMembership::default()
            .with(CH1, 111, MemberStatus::Member)
            .with(CH2, 111, MemberStatus::Restricted);
        let svc = service(
            store.clone(),
            source,
            BonusPolicy::Once,
            MembershipErrorPolicy::RetryPrompt,
        );

        assert_eq!(svc.verify(111).await.unwrap(), VerifyOutcome::NotSubscribed);
        assert_eq!(store.balance_and_refcount(111).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn lookup_failure_follows_policy() {
        let store = store_with_111();
        let retry = service(
            store.clone(),
            subscribed_111().failing(CH1),
            BonusPolicy::Once,
            MembershipErrorPolicy::RetryPrompt,
        );
        assert_eq!(retry.verify(111).await.unwrap(), VerifyOutcome::CheckFailed);

        let closed = service(
            store.clone(),
            subscribed_111().failing(CH2),
            BonusPolicy::Once,
            MembershipErrorPolicy::FailClosed,
        );
        assert_eq!(closed.verify(111).await.unwrap(), VerifyOutcome::NotSubscribed);
        assert_eq!(store.balance_and_refcount(111).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn every_verify_requeries_telegram() {
        let store = store_with_111();
        let source = subscribed_111();
        let calls = source.call_counter();
        let svc = service(
            store,
            source,
            BonusPolicy::Once,
            MembershipErrorPolicy::RetryPrompt,
        );

        svc.verify(111).await.unwrap();
        svc.verify(111).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
