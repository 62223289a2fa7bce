use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use crate::error::{Error, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StanceKind {
    Left,
    Right,
    Neutral,
    Antiwar,
}

impl StanceKind {
    /// Enumeration order. Tie-breaks in `dominant` follow it.
    pub const ALL: [StanceKind; 4] = [
        StanceKind::Left,
        StanceKind::Right,
        StanceKind::Neutral,
        StanceKind::Antiwar,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StanceKind::Left => "left",
            StanceKind::Right => "right",
            StanceKind::Neutral => "neutral",
            StanceKind::Antiwar => "antiwar",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StanceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StanceKind::ALL
            .into_iter()
            .find(|stance| stance.as_str() == s)
            .ok_or_else(|| Error::with_details(ErrorCode::InvalidStance, "Unknown stance", s))
    }
}

/// Stable identifier of a feed post. The only join key between rendered
/// elements and persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of this post's own vote in the storage area. The prefix keeps
    /// post keys clear of the reserved tally table key.
    pub fn storage_key(&self) -> String {
        format!("post:{}", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVote {
    pub stance: StanceKind,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl UserVote {
    pub fn now(stance: StanceKind) -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self {
            stance,
            timestamp: i64::try_from(millis).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TallyRecord", into = "TallyRecord")]
pub struct PostTally {
    pub(crate) counts: [u32; 4],
    pub(crate) total: u32,
}

impl PostTally {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn counts(&self) -> impl Iterator<Item = (StanceKind, u32)> + '_ {
        StanceKind::ALL.into_iter().map(|stance| (stance, self.count(stance)))
    }
}

/// Flat wire shape of a tally, `{left, right, neutral, antiwar, total}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct TallyRecord {
    left: u32,
    right: u32,
    neutral: u32,
    antiwar: u32,
    total: u32,
}

impl From<TallyRecord> for PostTally {
    fn from(record: TallyRecord) -> Self {
        let counts = [record.left, record.right, record.neutral, record.antiwar];
        let total = counts.iter().fold(0u32, |acc, c| acc.saturating_add(*c));
        Self { counts, total }
    }
}

impl From<PostTally> for TallyRecord {
    fn from(tally: PostTally) -> Self {
        let [left, right, neutral, antiwar] = tally.counts;
        Self { left, right, neutral, antiwar, total: tally.total }
    }
}

/// Opaque handle the extension assigns to a rendered post element.
pub type ElementHandle = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub element: ElementHandle,
    pub source: String,
}

/// One change notification from the extension's document observer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedReport {
    pub posts: Vec<FeedEntry>,
    pub removed: Vec<ElementHandle>,
    pub active: Option<ElementHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPost {
    pub element: ElementHandle,
    pub id: PostId,
    pub label: Option<StanceKind>,
    pub user_stance: Option<StanceKind>,
    pub tally: Option<PostTally>,
    pub surface_open: bool,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub stance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub stance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub id: PostId,
    pub stance: StanceKind,
    pub dominant: Option<StanceKind>,
    pub tally: PostTally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyView {
    pub id: PostId,
    pub dominant: Option<StanceKind>,
    pub tally: PostTally,
}

// Route parameter support for the tracker's HTTP host
#[cfg(feature = "backend")]
mod backend_impl {
    use super::PostId;
    use crate::validation::{validate_post_id, ValidationError};
    use rocket::request::FromParam;

    impl<'a> FromParam<'a> for PostId {
        type Error = ValidationError;

        fn from_param(param: &'a str) -> Result<Self, Self::Error> {
            validate_post_id(param)
        }
    }
}
