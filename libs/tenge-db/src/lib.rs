pub mod db;
pub mod models;
pub mod repositories;

pub use db::{DbConfig, connect};
pub use models::user::{BotUser, NewUser, UserStats};
pub use repositories::memory_repo::MemoryUserStore;
pub use repositories::user_repo::UserRepository;
pub use repositories::UserStore;
