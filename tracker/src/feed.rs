use stance_shared::{
    validate_post_id, ElementHandle, FeedEntry, FeedReport, PostId, PostTally, RenderedPost, StanceKind,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use crate::adapter::{FeedAdapter, Label};
use crate::error::TrackerError;

#[derive(Debug, Clone, Default)]
struct ElementView {
    source: String,
    live: bool,
    id: Option<PostId>,
    label: Option<StanceKind>,
    own_vote: Option<StanceKind>,
    tally: Option<PostTally>,
    surface_open: bool,
    failure: Option<String>,
}

impl ElementView {
    fn rendered(&self, element: ElementHandle) -> Option<RenderedPost> {
        let id = self.id.clone().filter(|_| self.live)?;
        Some(RenderedPost {
            element,
            id,
            label: self.label,
            user_stance: self.own_vote,
            tally: self.tally,
            surface_open: self.surface_open,
            failure: self.failure.clone(),
        })
    }
}

#[derive(Debug, Default)]
struct FeedState {
    elements: BTreeMap<ElementHandle, ElementView>,
    active: Option<ElementHandle>,
}

/// Feed adapter for a remote document: the extension reports what it sees and
/// reads back what should be rendered.
///
/// Reports arrive on `POST /api/feed` from the content script injected into
/// the feed page. That script ships with the browser extension package and is
/// not part of this workspace; the popup UI only reads `GET /api/feed`.
///
/// An element handle whose reported source changes has been recycled by the
/// page for another post. Its view is reset, so the post it showed before is
/// no longer live there.
#[derive(Debug, Default)]
pub struct ReportedFeed {
    state: Mutex<FeedState>,
}

impl ReportedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies removals and the active element, and returns the reported
    /// posts for a discovery pass.
    pub fn apply_report(&self, report: FeedReport) -> Vec<(ElementHandle, String)> {
        let mut state = self.state();

        for element in &report.removed {
            if let Some(view) = state.elements.get_mut(element) {
                view.live = false;
                view.surface_open = false;
            }
        }

        for FeedEntry { element, source } in &report.posts {
            let view = state.elements.entry(*element).or_default();
            if view.source != *source {
                *view = ElementView {
                    source: source.clone(),
                    ..ElementView::default()
                };
            }
            view.live = true;
        }

        if report.active.is_some() {
            state.active = report.active;
        }

        report
            .posts
            .into_iter()
            .map(|entry| (entry.element, entry.source))
            .collect()
    }

    pub fn rendered(&self) -> Vec<RenderedPost> {
        self.state()
            .elements
            .iter()
            .filter_map(|(element, view)| view.rendered(*element))
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_view(&self, element: &ElementHandle, update: impl FnOnce(&mut ElementView)) {
        if let Some(view) = self.state().elements.get_mut(element) {
            update(view);
        }
    }
}

impl FeedAdapter for ReportedFeed {
    type Element = ElementHandle;

    fn identify(&self, raw: &str) -> Option<PostId> {
        validate_post_id(raw).ok()
    }

    fn is_live(&self, element: &ElementHandle, id: &PostId) -> bool {
        self.state()
            .elements
            .get(element)
            .map_or(false, |view| view.live && view.id.as_ref() == Some(id))
    }

    fn render_affordance(&self, element: &ElementHandle, id: &PostId) {
        self.with_view(element, |view| {
            view.id = Some(id.clone());
            view.failure = None;
        });
    }

    fn render_label(&self, element: &ElementHandle, _id: &PostId, label: &Label) {
        self.with_view(element, |view| {
            view.label = label.dominant;
            view.own_vote = label.own_vote;
            view.tally = Some(label.tally);
            view.failure = None;
        });
    }

    fn render_failure(&self, element: &ElementHandle, _id: &PostId, error: &TrackerError) {
        self.with_view(element, |view| view.failure = Some(error.to_string()));
    }

    fn open_surface(&self, element: &ElementHandle, _id: &PostId, tally: &PostTally) {
        self.with_view(element, |view| {
            view.surface_open = true;
            view.tally = Some(*tally);
        });
    }

    fn close_surface(&self, element: &ElementHandle, _id: &PostId) {
        self.with_view(element, |view| view.surface_open = false);
    }

    fn active_post(&self) -> Option<(ElementHandle, String)> {
        let state = self.state();
        let element = state.active?;
        state
            .elements
            .get(&element)
            .filter(|view| view.live)
            .map(|view| (element, view.source.clone()))
    }
}
