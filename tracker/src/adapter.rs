use stance_shared::{PostId, PostTally, StanceKind};
use std::fmt::Debug;
use crate::error::TrackerError;

/// What the tracker asks the feed to show next to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub dominant: Option<StanceKind>,
    /// The stance this user picked, which can differ from `dominant`.
    pub own_vote: Option<StanceKind>,
    pub tally: PostTally,
}

/// Discovers post elements in the live document and renders into them.
///
/// Render calls may be made while the tracker holds its bookkeeping lock, so
/// implementations must not call back into the tracker.
pub trait FeedAdapter: Send + Sync {
    type Element: Clone + PartialEq + Debug + Send + Sync;

    /// Derives the stable post id from the raw attribute the feed exposes.
    fn identify(&self, raw: &str) -> Option<PostId>;

    /// Whether `element` is still in the document and still shows post `id`.
    /// Feeds recycle elements, so a live element may have moved on to
    /// another post.
    fn is_live(&self, element: &Self::Element, id: &PostId) -> bool;

    fn render_affordance(&self, element: &Self::Element, id: &PostId);

    fn render_label(&self, element: &Self::Element, id: &PostId, label: &Label);

    fn render_failure(&self, element: &Self::Element, id: &PostId, error: &TrackerError);

    fn open_surface(&self, element: &Self::Element, id: &PostId, tally: &PostTally);

    fn close_surface(&self, element: &Self::Element, id: &PostId);

    /// The post in the current view, with its raw identifier source.
    fn active_post(&self) -> Option<(Self::Element, String)>;
}
