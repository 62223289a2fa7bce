use crate::models::{PostTally, StanceKind};

impl PostTally {
    pub fn from_counts(left: u32, right: u32, neutral: u32, antiwar: u32) -> Self {
        let counts = [left, right, neutral, antiwar];
        let total = counts.iter().fold(0u32, |acc, c| acc.saturating_add(*c));
        Self { counts, total }
    }

    pub fn count(&self, stance: StanceKind) -> u32 {
        self.counts[stance.index()]
    }

    pub fn is_consistent(&self) -> bool {
        self.counts.iter().map(|&c| u64::from(c)).sum::<u64>() == u64::from(self.total)
    }

    /// Moves this user's vote from `old` to `new`. The decrement is floored at
    /// zero so an inconsistent stored tally never goes negative.
    pub fn apply_vote(&mut self, old: Option<StanceKind>, new: StanceKind) {
        if let Some(old) = old {
            let slot = &mut self.counts[old.index()];
            *slot = slot.saturating_sub(1);
            self.total = self.total.saturating_sub(1);
        }
        let slot = &mut self.counts[new.index()];
        *slot = slot.saturating_add(1);
        self.total = self.total.saturating_add(1);
    }
}

/// Highest-count stance, ties going to the earliest in `StanceKind::ALL`.
/// `None` for an empty tally.
pub fn dominant(tally: &PostTally) -> Option<StanceKind> {
    if tally.total() == 0 {
        return None;
    }
    StanceKind::ALL
        .into_iter()
        .fold(None, |best: Option<(StanceKind, u32)>, stance| {
            let count = tally.count(stance);
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((stance, count)),
            }
        })
        .filter(|&(_, count)| count > 0)
        .map(|(stance, _)| stance)
}
