use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use nearby_types::models::Announcement;

/// Client-side feed ranking: vip first, then boosted, then regular.
///
/// The backend orders by creation time only; presentation promotes paid
/// tiers. The sort is stable, so the server's newest-first order is kept
/// within each tier group.
pub fn rank(listings: &mut [Announcement]) {
    listings.sort_by_key(|a| a.tier.rank());
}

/// Guards a cached resource against out-of-order fetch completions.
///
/// Each fetch takes a ticket before it starts; only the ticket most
/// recently issued may commit its result. A slow fetch that finishes after
/// a newer one was started is dropped instead of overwriting fresher data.
pub struct SequencedSlot<T> {
    issued: AtomicU64,
    latest: Mutex<(u64, Option<T>)>,
}

impl<T> SequencedSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            latest: Mutex::new((0, None)),
        }
    }

    /// Take a ticket for a fetch that is about to start.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store a completed fetch's result. Returns false (dropping `value`)
    /// if a newer fetch was issued since this ticket was taken.
    pub fn commit(&self, ticket: u64, value: T) -> bool {
        if ticket != self.issued.load(Ordering::SeqCst) {
            return false;
        }
        let mut latest = self.latest.lock().unwrap_or_else(|p| p.into_inner());
        if ticket <= latest.0 {
            return false;
        }
        *latest = (ticket, Some(value));
        true
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.latest
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .1
            .clone()
    }
}

impl<T> Default for SequencedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use nearby_types::models::Tier;

    fn listing(id: i64, tier: Tier, age_minutes: i64) -> Announcement {
        Announcement {
            id,
            title: format!("listing {id}"),
            description: "needs help".to_string(),
            category: "General".to_string(),
            author: "Maria".to_string(),
            author_contact: None,
            date: Utc::now() - Duration::minutes(age_minutes),
            tier,
            status: "published".to_string(),
            views: 0,
            expires_at: None,
        }
    }

    #[test]
    fn rank_promotes_paid_tiers_keeping_recency_within_group() {
        // Server order: newest first, tiers interleaved.
        let mut feed = vec![
            listing(5, Tier::Regular, 1),
            listing(4, Tier::Vip, 2),
            listing(3, Tier::Boosted, 3),
            listing(2, Tier::Regular, 4),
            listing(1, Tier::Vip, 5),
        ];

        rank(&mut feed);

        let ids: Vec<_> = feed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![4, 1, 3, 5, 2]);
    }

    #[test]
    fn stale_commit_is_discarded() {
        let slot = SequencedSlot::new();
        let old = slot.begin();
        let new = slot.begin();

        // The newer fetch lands first.
        assert!(slot.commit(new, "fresh"));
        // The older one completes late and must not overwrite it.
        assert!(!slot.commit(old, "stale"));
        assert_eq!(slot.get(), Some("fresh"));
    }

    #[test]
    fn completed_fetch_loses_to_an_outstanding_newer_one() {
        let slot = SequencedSlot::new();
        let old = slot.begin();
        let _newer_still_in_flight = slot.begin();

        // A newer request exists, even though it has not completed yet.
        assert!(!slot.commit(old, "stale"));
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn sequential_fetches_commit_normally() {
        let slot = SequencedSlot::new();
        let first = slot.begin();
        assert!(slot.commit(first, 1));
        let second = slot.begin();
        assert!(slot.commit(second, 2));
        assert_eq!(slot.get(), Some(2));
    }
}
