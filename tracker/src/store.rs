use serde_json::{Map, Value};
use stance_shared::{PostId, PostTally, UserVote};
use tokio::sync::Mutex;
use tracing::warn;
use crate::storage::{StorageBackend, StorageError};

/// Reserved key holding every post's tally, keyed by post id.
pub const TALLY_TABLE_KEY: &str = "stanceStats";

/// Reads degrade to "no data" so the UI keeps working; writes report failure.
pub struct StanceStore<B> {
    backend: B,
    table_writes: Mutex<()>,
}

impl<B: StorageBackend> StanceStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            table_writes: Mutex::new(()),
        }
    }

    pub async fn get_vote(&self, id: &PostId) -> Option<UserVote> {
        let value = match self.backend.get(&id.storage_key()).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(post_id = %id, "Vote read failed, treating as absent: {}", e);
                return None;
            }
        };
        serde_json::from_value(value)
            .map_err(|e| warn!(post_id = %id, "Ignoring unreadable vote: {}", e))
            .ok()
    }

    pub async fn set_vote(&self, id: &PostId, vote: UserVote) -> Result<(), StorageError> {
        let value = serde_json::to_value(vote)?;
        self.backend.set(&id.storage_key(), value).await
    }

    pub async fn get_tally(&self, id: &PostId) -> PostTally {
        let mut table = match self.backend.get(TALLY_TABLE_KEY).await {
            Ok(Some(Value::Object(table))) => table,
            Ok(Some(_)) => {
                warn!("Tally table is not an object, treating as empty");
                return PostTally::zero();
            }
            Ok(None) => return PostTally::zero(),
            Err(e) => {
                warn!(post_id = %id, "Tally read failed, using zero tally: {}", e);
                return PostTally::zero();
            }
        };

        match table.remove(id.as_str()) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(post_id = %id, "Ignoring unreadable tally: {}", e);
                PostTally::zero()
            }),
            None => PostTally::zero(),
        }
    }

    /// Replaces one post's entry in the shared table. Table writes are
    /// serialized here so concurrent writers for different posts never drop
    /// each other's entries.
    pub async fn set_tally(&self, id: &PostId, tally: PostTally) -> Result<(), StorageError> {
        let _turn = self.table_writes.lock().await;

        let mut table = match self.backend.get(TALLY_TABLE_KEY).await? {
            Some(Value::Object(table)) => table,
            Some(_) => {
                warn!("Replacing malformed tally table");
                Map::new()
            }
            None => Map::new(),
        };
        table.insert(id.as_str().to_string(), serde_json::to_value(tally)?);
        self.backend.set(TALLY_TABLE_KEY, Value::Object(table)).await
    }
}
