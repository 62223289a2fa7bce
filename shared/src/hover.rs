//! Hover-to-open lifecycle of the stance selection surface.
//!
//! The machine only decides; callers own the timers. After every call to
//! [`HoverMachine::handle`] a caller should (re)arm a timer for
//! [`HoverMachine::next_deadline`] and feed [`HoverEvent::Tick`] when it fires.

use time::{Duration, OffsetDateTime};

pub const DEFAULT_OPEN_DELAY_MS: i64 = 300;
pub const DEFAULT_CLOSE_DELAY_MS: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverDelays {
    pub open: Duration,
    pub close: Duration,
}

impl HoverDelays {
    pub fn from_millis(open_ms: i64, close_ms: i64) -> Self {
        Self {
            open: Duration::milliseconds(open_ms.max(0)),
            close: Duration::milliseconds(close_ms.max(0)),
        }
    }
}

impl Default for HoverDelays {
    fn default() -> Self {
        Self::from_millis(DEFAULT_OPEN_DELAY_MS, DEFAULT_CLOSE_DELAY_MS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverState<P> {
    Idle,
    /// Waiting out the open delay for `post`. `replacing` stays open until then.
    PendingOpen {
        post: P,
        at: OffsetDateTime,
        replacing: Option<P>,
    },
    Open {
        post: P,
        closing_at: Option<OffsetDateTime>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverEvent<P> {
    EnterTrigger(P),
    LeaveTrigger(P),
    EnterSurface,
    LeaveSurface,
    Click(P),
    Dismiss,
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand<P> {
    /// Open `post`, closing `replacing` first when present.
    Open { post: P, replacing: Option<P> },
    Close(P),
}

#[derive(Debug, Clone)]
pub struct HoverMachine<P> {
    state: HoverState<P>,
    delays: HoverDelays,
}

impl<P: Clone + PartialEq> Default for HoverMachine<P> {
    fn default() -> Self {
        Self::new(HoverDelays::default())
    }
}

impl<P: Clone + PartialEq> HoverMachine<P> {
    pub fn new(delays: HoverDelays) -> Self {
        Self { state: HoverState::Idle, delays }
    }

    pub fn state(&self) -> &HoverState<P> {
        &self.state
    }

    pub fn open_post(&self) -> Option<&P> {
        match &self.state {
            HoverState::Open { post, .. } => Some(post),
            HoverState::PendingOpen { replacing, .. } => replacing.as_ref(),
            HoverState::Idle => None,
        }
    }

    pub fn next_deadline(&self) -> Option<OffsetDateTime> {
        match &self.state {
            HoverState::PendingOpen { at, .. } => Some(*at),
            HoverState::Open { closing_at, .. } => *closing_at,
            HoverState::Idle => None,
        }
    }

    pub fn handle(&mut self, event: HoverEvent<P>, now: OffsetDateTime) -> Option<SurfaceCommand<P>> {
        let state = std::mem::replace(&mut self.state, HoverState::Idle);
        let (next, command) = self.transition(state, event, now);
        self.state = next;
        command
    }

    fn transition(
        &self,
        state: HoverState<P>,
        event: HoverEvent<P>,
        now: OffsetDateTime,
    ) -> (HoverState<P>, Option<SurfaceCommand<P>>) {
        use HoverEvent as E;
        use HoverState as S;

        match (state, event) {
            (S::Open { post, .. }, E::Dismiss)
            | (S::PendingOpen { replacing: Some(post), .. }, E::Dismiss) => {
                (S::Idle, Some(SurfaceCommand::Close(post)))
            }
            (_, E::Dismiss) => (S::Idle, None),

            (S::Idle, E::EnterTrigger(post)) => (self.pending(post, now, None), None),
            (S::Idle, E::Click(post)) => (S::Open { post: post.clone(), closing_at: None }, Some(SurfaceCommand::Open { post, replacing: None })),
            (S::Idle, _) => (S::Idle, None),

            (S::PendingOpen { post, at, replacing }, E::Tick) => {
                if now >= at {
                    Self::open(post, replacing)
                } else {
                    (S::PendingOpen { post, at, replacing }, None)
                }
            }
            (S::PendingOpen { post, at, replacing }, E::EnterTrigger(entered)) => {
                if entered == post {
                    (S::PendingOpen { post, at, replacing }, None)
                } else if replacing.as_ref() == Some(&entered) {
                    (S::Open { post: entered, closing_at: None }, None)
                } else {
                    (self.pending(entered, now, replacing), None)
                }
            }
            (S::PendingOpen { post, at, replacing }, E::LeaveTrigger(left)) => {
                if left != post {
                    return (S::PendingOpen { post, at, replacing }, None);
                }
                match replacing {
                    Some(open) => (S::Open { post: open, closing_at: Some(now + self.delays.close) }, None),
                    None => (S::Idle, None),
                }
            }
            (S::PendingOpen { replacing, .. }, E::Click(clicked)) => Self::open(clicked, replacing),
            (pending @ S::PendingOpen { .. }, E::EnterSurface | E::LeaveSurface) => (pending, None),

            (S::Open { post, closing_at }, E::Tick) => match closing_at {
                Some(deadline) if now >= deadline => (S::Idle, Some(SurfaceCommand::Close(post))),
                _ => (S::Open { post, closing_at }, None),
            },
            (S::Open { post, .. }, E::EnterTrigger(entered)) => {
                if entered == post {
                    (S::Open { post, closing_at: None }, None)
                } else {
                    (self.pending(entered, now, Some(post)), None)
                }
            }
            (S::Open { post, closing_at }, E::LeaveTrigger(left)) => {
                if left == post {
                    (S::Open { post, closing_at: Some(now + self.delays.close) }, None)
                } else {
                    (S::Open { post, closing_at }, None)
                }
            }
            (S::Open { post, .. }, E::EnterSurface) => (S::Open { post, closing_at: None }, None),
            (S::Open { post, .. }, E::LeaveSurface) => (S::Open { post, closing_at: Some(now + self.delays.close) }, None),
            (S::Open { post, .. }, E::Click(clicked)) => Self::open(clicked, Some(post)),
        }
    }

    fn pending(&self, post: P, now: OffsetDateTime, replacing: Option<P>) -> HoverState<P> {
        HoverState::PendingOpen { post, at: now + self.delays.open, replacing }
    }

    fn open(post: P, replacing: Option<P>) -> (HoverState<P>, Option<SurfaceCommand<P>>) {
        let next = HoverState::Open { post: post.clone(), closing_at: None };
        if replacing.as_ref() == Some(&post) {
            return (next, None);
        }
        (next, Some(SurfaceCommand::Open { post, replacing }))
    }
}
