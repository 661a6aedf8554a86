use tracing::{debug, error, info, instrument};

use crate::error::Result;
use crate::models::{DishId, Rank, UserId, VoteMap, VoteTable};
use crate::notify::{Notification, NotificationSink};
use crate::storage::{self, Storage, VOTES_KEY};

/// Owns the global vote table and writes it back to storage after every change.
///
/// Writes are not atomic across memory and storage: when a save fails the
/// in-memory table already holds the new vote, and the caller is told the
/// vote may not have been saved.
pub struct VoteStore<S: Storage> {
    storage: S,
    sink: Box<dyn NotificationSink>,
    table: VoteTable,
}

impl<S: Storage> VoteStore<S> {
    pub fn load(storage: S, sink: Box<dyn NotificationSink>) -> Result<Self> {
        let table = match storage::load_json::<VoteTable>(&storage, VOTES_KEY)? {
            Some(table) => {
                debug!("Loaded votes for {} users", table.len());
                table
            }
            None => {
                info!("No stored votes found, starting with an empty table");
                VoteTable::new()
            }
        };

        Ok(Self { storage, sink, table })
    }

    #[instrument(skip(self))]
    pub fn set_vote(&mut self, user: UserId, dish: DishId, rank: Option<Rank>) -> Result<()> {
        let current = self.vote_map(user);
        self.table.insert(user, current.with_vote(dish, rank));

        match storage::save_json(&mut self.storage, VOTES_KEY, &self.table) {
            Ok(()) => {
                debug!("Votes saved");
                self.sink.notify(Notification::success("Your votes have been saved!"));
                Ok(())
            }
            Err(e) => {
                error!("Failed to save votes: {}", e);
                self.sink.notify(Notification::error("Failed to save votes"));
                Err(e)
            }
        }
    }

    pub fn vote_map(&self, user: UserId) -> VoteMap {
        self.table.get(user).cloned().unwrap_or_default()
    }

    pub fn rank_for_dish(&self, user: UserId, dish: DishId) -> Option<Rank> {
        self.table.get(user).and_then(|map| map.rank_of(dish))
    }

    pub fn table(&self) -> &VoteTable {
        &self.table
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
