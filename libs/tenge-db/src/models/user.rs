pub const DEFAULT_NAME: &str = "User";

/// One row of `botusers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub name: String,
    pub refcount: i64,
    pub balance: i64,
    pub invitedby: Option<i64>,
    pub bonus_awarded: bool,
}

/// Fields known at first contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub name: String,
    pub invitedby: Option<i64>,
}

impl NewUser {
    pub fn new(user_id: i64, username: Option<String>, name: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        Self {
            user_id,
            username,
            name,
            invitedby: None,
        }
    }

    pub fn invited_by(mut self, referrer: Option<i64>) -> Self {
        self.invitedby = referrer;
        self
    }
}

impl From<NewUser> for BotUser {
    fn from(new: NewUser) -> Self {
        BotUser {
            user_id: new.user_id,
            username: new.username,
            name: new.name,
            refcount: 0,
            balance: 0,
            invitedby: new.invitedby,
            bonus_awarded: false,
        }
    }
}

/// Aggregate numbers shown to operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub users: i64,
    pub referred: i64,
    pub total_balance: i64,
}
