use futures::future::join_all;
use stance_shared::{dominant, PostId, PostTally, StanceKind};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};
use crate::adapter::{FeedAdapter, Label};
use crate::error::TrackerError;
use crate::ledger::VoteLedger;
use crate::storage::StorageBackend;
use crate::surface::SelectionSurface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPost<E> {
    pub id: PostId,
    pub element: E,
    pub last_rendered: Option<StanceKind>,
    pub own_vote: Option<StanceKind>,
}

/// Bridges the feed's discovery stream to the ledger and keeps each post's
/// rendering current.
pub struct PostTracker<B, A: FeedAdapter> {
    ledger: VoteLedger<B>,
    adapter: A,
    posts: Mutex<HashMap<PostId, TrackedPost<A::Element>>>,
    surface: SelectionSurface<A::Element>,
}

impl<B: StorageBackend, A: FeedAdapter> PostTracker<B, A> {
    pub fn new(ledger: VoteLedger<B>, adapter: A) -> Self {
        Self {
            ledger,
            adapter,
            posts: Mutex::new(HashMap::new()),
            surface: SelectionSurface::default(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn ledger(&self) -> &VoteLedger<B> {
        &self.ledger
    }

    pub fn tracked(&self, id: &PostId) -> Option<TrackedPost<A::Element>> {
        self.posts().get(id).cloned()
    }

    pub fn tracked_count(&self) -> usize {
        self.posts().len()
    }

    pub async fn tally(&self, id: &PostId) -> PostTally {
        self.ledger.tally(id).await
    }

    pub fn open_surface(&self) -> Option<PostId> {
        self.surface.current()
    }

    /// Registers a newly seen post and renders its initial label. Returns
    /// `false` without touching storage when the post is already tracked on
    /// an element that still shows it.
    pub async fn on_post_discovered(&self, element: A::Element, id: PostId) -> bool {
        {
            let mut posts = self.posts();
            let own_vote = match posts.get(&id) {
                Some(tracked) if self.adapter.is_live(&tracked.element, &id) => return false,
                Some(stale) => {
                    debug!(post_id = %id, "Rebinding post to a new element");
                    stale.own_vote
                }
                None => None,
            };
            posts.insert(id.clone(), TrackedPost {
                id: id.clone(),
                element: element.clone(),
                last_rendered: None,
                own_vote,
            });
        }

        self.adapter.render_affordance(&element, &id);

        // a vote for this post renders after the load, never before it
        self.ledger
            .in_turn(&id, async {
                let tally = self.ledger.tally(&id).await;
                if tally.total() > 0 {
                    self.render(&id, &element, &tally);
                }
            })
            .await;
        true
    }

    /// One change notification's worth of candidate posts. Already tracked
    /// posts cost a map lookup. Returns how many were newly registered.
    pub async fn discover<I>(&self, candidates: I) -> usize
    where
        I: IntoIterator<Item = (A::Element, String)>,
    {
        let found: Vec<_> = candidates
            .into_iter()
            .filter_map(|(element, raw)| match self.adapter.identify(&raw) {
                Some(id) => Some((element, id)),
                None => {
                    debug!(raw = %raw, "Skipping element without a post id");
                    None
                }
            })
            .collect();

        let registered = join_all(found.into_iter().map(|(element, id)| self.on_post_discovered(element, id)))
            .await
            .into_iter()
            .filter(|registered| *registered)
            .count();

        if registered > 0 {
            info!("🔍 Tracking {} new posts ({} total)", registered, self.tracked_count());
        }
        registered
    }

    #[instrument(skip(self, id), fields(post_id = %id))]
    pub async fn on_user_select(&self, id: &PostId, stance: StanceKind) -> Result<PostTally, TrackerError> {
        self.ledger
            .in_turn(id, async {
                let tally = match self.ledger.apply(id, stance).await {
                    Ok(tally) => tally,
                    Err(e) => {
                        warn!("Stance not recorded: {}", e);
                        if let Some(element) = self.live_element(id) {
                            self.adapter.render_failure(&element, id, &e);
                        }
                        return Err(e);
                    }
                };

                let element = {
                    let mut posts = self.posts();
                    posts.get_mut(id).map(|tracked| {
                        tracked.own_vote = Some(stance);
                        tracked.element.clone()
                    })
                };
                self.surface.close(&self.adapter, id);
                if let Some(element) = element {
                    self.render(id, &element, &tally);
                }
                Ok(tally)
            })
            .await
    }

    /// Opens the selection surface for a tracked post, closing any other. The
    /// user's stored vote is picked up here the first time, so discovery stays
    /// at one read per post.
    pub async fn open_selection(&self, id: &PostId) -> Result<PostTally, TrackerError> {
        let element = self
            .live_element(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;

        self.ledger
            .in_turn(id, async {
                let tally = self.ledger.tally(id).await;
                if self.tracked(id).map_or(false, |tracked| tracked.own_vote.is_none()) {
                    if let Some(vote) = self.ledger.vote(id).await {
                        self.restore_own_vote(id, vote.stance);
                        self.render(id, &element, &tally);
                    }
                }

                // the element may have gone while storage was read
                if self.live_element(id).as_ref() != Some(&element) {
                    return Err(TrackerError::NotFound(id.to_string()));
                }
                self.surface.open(&self.adapter, id, element, &tally);
                Ok(tally)
            })
            .await
    }

    pub fn close_selection(&self, id: &PostId) -> bool {
        self.surface.close(&self.adapter, id)
    }

    fn restore_own_vote(&self, id: &PostId, stance: StanceKind) {
        if let Some(tracked) = self.posts().get_mut(id) {
            if tracked.own_vote.is_none() {
                tracked.own_vote = Some(stance);
            }
        }
    }

    fn render(&self, id: &PostId, element: &A::Element, tally: &PostTally) -> bool {
        let mut posts = self.posts();
        let Some(tracked) = posts.get_mut(id) else {
            return false;
        };
        if tracked.element != *element || !self.adapter.is_live(element, id) {
            debug!(post_id = %id, "Discarding render for a stale element");
            return false;
        }

        let label = Label {
            dominant: dominant(tally),
            own_vote: tracked.own_vote,
            tally: *tally,
        };
        tracked.last_rendered = label.dominant;
        self.adapter.render_label(element, id, &label);
        true
    }

    fn live_element(&self, id: &PostId) -> Option<A::Element> {
        self.posts()
            .get(id)
            .map(|tracked| tracked.element.clone())
            .filter(|element| self.adapter.is_live(element, id))
    }

    fn posts(&self) -> MutexGuard<'_, HashMap<PostId, TrackedPost<A::Element>>> {
        self.posts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
