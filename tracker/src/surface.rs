use stance_shared::{PostId, PostTally};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use crate::adapter::FeedAdapter;

#[derive(Debug, Clone)]
struct OpenSurface<E> {
    id: PostId,
    element: E,
}

/// Sole owner of the one open stance selection surface.
#[derive(Debug)]
pub struct SelectionSurface<E> {
    open: Mutex<Option<OpenSurface<E>>>,
}

impl<E> Default for SelectionSurface<E> {
    fn default() -> Self {
        Self { open: Mutex::new(None) }
    }
}

impl<E: Clone + PartialEq> SelectionSurface<E> {
    pub fn current(&self) -> Option<PostId> {
        self.slot().as_ref().map(|open| open.id.clone())
    }

    /// Opens the surface for `id`, closing whichever one was open. Returns the
    /// post that was closed to make room.
    pub fn open<A>(&self, adapter: &A, id: &PostId, element: E, tally: &PostTally) -> Option<PostId>
    where
        A: FeedAdapter<Element = E>,
    {
        let mut slot = self.slot();
        let replaced = slot.take().and_then(|previous| {
            adapter.close_surface(&previous.element, &previous.id);
            (previous.id != *id).then_some(previous.id)
        });
        adapter.open_surface(&element, id, tally);
        debug!(post_id = %id, replaced = ?replaced, "Opened selection surface");
        *slot = Some(OpenSurface { id: id.clone(), element });
        replaced
    }

    /// Closes the surface if it belongs to `id`.
    pub fn close<A>(&self, adapter: &A, id: &PostId) -> bool
    where
        A: FeedAdapter<Element = E>,
    {
        let mut slot = self.slot();
        match slot.take() {
            Some(open) if open.id == *id => {
                adapter.close_surface(&open.element, &open.id);
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }

    pub fn close_any<A>(&self, adapter: &A) -> Option<PostId>
    where
        A: FeedAdapter<Element = E>,
    {
        let open = self.slot().take()?;
        adapter.close_surface(&open.element, &open.id);
        Some(open.id)
    }

    fn slot(&self) -> MutexGuard<'_, Option<OpenSurface<E>>> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
