use stance_shared::{PostId, PostTally, StanceKind, UserVote};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, instrument, warn};
use crate::error::TrackerError;
use crate::storage::StorageBackend;
use crate::store::StanceStore;

type Slot = Arc<AsyncMutex<()>>;

/// Owns the tally update. Calls for the same post run one at a time; calls
/// for different posts run freely.
pub struct VoteLedger<B> {
    store: StanceStore<B>,
    slots: Mutex<HashMap<PostId, Slot>>,
}

impl<B: StorageBackend> VoteLedger<B> {
    pub fn new(store: StanceStore<B>) -> Self {
        Self {
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub async fn tally(&self, id: &PostId) -> PostTally {
        self.store.get_tally(id).await
    }

    pub async fn vote(&self, id: &PostId) -> Option<UserVote> {
        self.store.get_vote(id).await
    }

    /// Number of posts with a vote in flight or queued.
    pub fn busy_posts(&self) -> usize {
        self.slots().len()
    }

    pub async fn record_vote(&self, id: &PostId, stance: StanceKind) -> Result<PostTally, TrackerError> {
        self.in_turn(id, self.apply(id, stance)).await
    }

    /// Runs `work` while holding `id`'s turn, so it cannot interleave with a
    /// vote for the same post. `work` must not take the same turn again.
    pub async fn in_turn<F: Future>(&self, id: &PostId, work: F) -> F::Output {
        let slot = self.acquire(id);
        let result = {
            let _turn = slot.lock().await;
            work.await
        };
        self.release(id, slot);
        result
    }

    /// The vote update itself. Callers hold the post's turn.
    #[instrument(skip(self, id), fields(post_id = %id))]
    pub(crate) async fn apply(&self, id: &PostId, stance: StanceKind) -> Result<PostTally, TrackerError> {
        let old = self.store.get_vote(id).await.map(|vote| vote.stance);
        let previous = self.store.get_tally(id).await;

        let mut tally = previous;
        tally.apply_vote(old, stance);

        self.store.set_tally(id, tally).await?;
        if let Err(e) = self.store.set_vote(id, UserVote::now(stance)).await {
            warn!("Vote write failed after tally update, restoring tally: {}", e);
            if let Err(restore) = self.store.set_tally(id, previous).await {
                error!("Failed to restore tally: {}", restore);
            }
            return Err(e.into());
        }

        debug!(from = ?old, to = %stance, total = tally.total(), "Recorded stance");
        Ok(tally)
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<PostId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self, id: &PostId) -> Slot {
        self.slots().entry(id.clone()).or_default().clone()
    }

    fn release(&self, id: &PostId, slot: Slot) {
        let mut slots = self.slots();
        // the map entry and `slot` are the only holders once nobody is queued
        if Arc::strong_count(&slot) == 2 {
            slots.remove(id);
        }
    }
}
