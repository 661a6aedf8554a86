pub mod error;
pub mod models;
pub mod validation;
pub mod storage;
pub mod notify;
pub mod vote_store;
pub mod points;
pub mod auth;

pub use error::{Error, ErrorCode, Result};
pub use models::*;
pub use validation::*;
pub use storage::{MemoryStorage, Storage, SESSION_KEY, VOTES_KEY};
pub use notify::{Level, Notification, NotificationSink};
pub use vote_store::VoteStore;
pub use points::{compute_scores, rank_dishes, Leaderboard, LeaderboardEntry, PollSummary, Scores, Standing};
pub use auth::{Directory, Session, UserRecord};
