use anyhow::Result;
use std::sync::Arc;
use tenge_db::{NewUser, UserStore};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First contact. Carries the referrer that was actually credited.
    Created { credited_referrer: Option<i64> },
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cabinet {
    pub balance: i64,
    pub refcount: i64,
}

#[derive(Clone)]
pub struct ReferralService {
    store: Arc<dyn UserStore>,
    reward: i64,
}

impl ReferralService {
    pub fn new(store: Arc<dyn UserStore>, reward: i64) -> Self {
        Self { store, reward }
    }

    pub fn reward(&self) -> i64 {
        self.reward
    }

    /// Creates the user on first contact and credits the referrer exactly
    /// once, only when this call performed the insert.
    pub async fn register(&self, user: NewUser, referrer: Option<i64>) -> Result<Registration> {
        let referrer = referrer.filter(|&r| r != user.user_id);
        let user = user.invited_by(referrer);

        if !self.store.create_user(&user).await? {
            debug!("User {} already registered", user.user_id);
            return Ok(Registration::Existing);
        }
        info!(
            "Registered user {} (invited by {:?})",
            user.user_id, user.invitedby
        );

        let Some(referrer_id) = referrer else {
            return Ok(Registration::Created {
                credited_referrer: None,
            });
        };

        if self
            .store
            .credit_referrer(referrer_id, 1, self.reward)
            .await?
        {
            info!(
                "Credited referrer {} with {} for user {}",
                referrer_id, self.reward, user.user_id
            );
            Ok(Registration::Created {
                credited_referrer: Some(referrer_id),
            })
        } else {
            warn!(
                "Referrer {} of user {} is not registered, nothing credited",
                referrer_id, user.user_id
            );
            Ok(Registration::Created {
                credited_referrer: None,
            })
        }
    }

    /// Never creates a row.
    pub async fn cabinet(&self, user_id: i64) -> Result<Cabinet> {
        let (balance, refcount) = self.store.balance_and_refcount(user_id).await?;
        Ok(Cabinet { balance, refcount })
    }
}

pub fn referral_link(bot_username: &str, user_id: u64) -> String {
    format!(
        "t.me/{}?start={}",
        bot_username.trim_start_matches('@'),
        user_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenge_db::{BotUser, MemoryUserStore};

    fn seeded(ids: &[i64]) -> Arc<MemoryUserStore> {
        Arc::new(MemoryUserStore::with_users(ids.iter().map(|&id| {
            BotUser::from(NewUser::new(id, None, Some(format!("user{id}"))))
        })))
    }

    fn newcomer(id: i64) -> NewUser {
        NewUser::new(id, Some("aru".into()), Some("Aru".into()))
    }

    #[tokio::test]
    async fn referred_first_contact_credits_referrer() {
        let store = seeded(&[222]);
        let service = ReferralService::new(store.clone(), 38);

        let outcome = service.register(newcomer(111), Some(222)).await.unwrap();
        assert_eq!(
            outcome,
            Registration::Created {
                credited_referrer: Some(222)
            }
        );

        let referrer = store.get(222).await.unwrap().unwrap();
        assert_eq!((referrer.balance, referrer.refcount), (38, 1));
        let user = store.get(111).await.unwrap().unwrap();
        assert_eq!(user.invitedby, Some(222));
        assert_eq!((user.balance, user.refcount), (0, 0));
    }

    #[tokio::test]
    async fn repeated_start_does_not_credit_twice() {
        let store = seeded(&[222]);
        let service = ReferralService::new(store.clone(), 38);

        service.register(newcomer(111), Some(222)).await.unwrap();
        let again = service.register(newcomer(111), Some(222)).await.unwrap();

        assert_eq!(again, Registration::Existing);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.balance_and_refcount(222).await.unwrap(), (38, 1));
    }

    #[tokio::test]
    async fn existing_user_keeps_original_referrer() {
        let store = seeded(&[222, 444]);
        let service = ReferralService::new(store.clone(), 38);

        service.register(newcomer(111), None).await.unwrap();
        service.register(newcomer(111), Some(444)).await.unwrap();

        assert_eq!(store.get(111).await.unwrap().unwrap().invitedby, None);
        assert_eq!(store.balance_and_refcount(444).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn no_referrer_mutates_nobody() {
        let store = seeded(&[222]);
        let service = ReferralService::new(store.clone(), 38);

        let outcome = service.register(newcomer(111), None).await.unwrap();
        assert_eq!(
            outcome,
            Registration::Created {
                credited_referrer: None
            }
        );
        assert_eq!(store.balance_and_refcount(222).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn self_referral_is_ignored() {
        let store = seeded(&[]);
        let service = ReferralService::new(store.clone(), 38);

        service.register(newcomer(111), Some(111)).await.unwrap();
        let user = store.get(111).await.unwrap().unwrap();
        assert_eq!(user.invitedby, None);
        assert_eq!((user.balance, user.refcount), (0, 0));
    }

    #[tokio::test]
    async fn unknown_referrer_is_recorded_but_not_credited() {
        let store = seeded(&[]);
        let service = ReferralService::new(store.clone(), 38);

        let outcome = service.register(newcomer(111), Some(999)).await.unwrap();
        assert_eq!(
            outcome,
            Registration::Created {
                credited_referrer: None
            }
        );
        assert_eq!(store.get(111).await.unwrap().unwrap().invitedby, Some(999));
        assert!(store.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cabinet_of_stranger_is_zero_and_creates_nothing() {
        let store = seeded(&[]);
        let service = ReferralService::new(store.clone(), 38);

        assert_eq!(service.cabinet(333).await.unwrap(), Cabinet::default());
        assert!(store.is_empty().await);
    }

    #[test]
    fn referral_link_uses_own_id() {
        assert_eq!(
            referral_link("@adal_tenge_bot", 111),
            "t.me/adal_tenge_bot?start=111"
        );
    }
}
