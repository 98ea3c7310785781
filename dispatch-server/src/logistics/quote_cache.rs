//! Quote Cache
//!
//! Process-wide map from quote id to a priced route option, supporting
//! at-most-once redemption. Created once per process and handed around
//! behind an `Arc`; quotes are intentionally lost on restart (clients
//! re-quote).
//!
//! Entries expire after a TTL. Expired and already-consumed ids are
//! indistinguishable to the caller: both mean "get a fresh quote".

use parking_lot::Mutex;
use shared::models::RouteOption;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct CachedQuote {
    option: RouteOption,
    stored_at: Instant,
}

pub struct QuoteCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedQuote>>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert an option under its id and return the quote id.
    ///
    /// Piggybacks a sweep of expired entries so an unredeemed burst of
    /// quotes cannot grow the map without bound.
    pub fn put(&self, option: RouteOption) -> String {
        let id = option.id.clone();
        let mut entries = self.entries.lock();
        entries.retain(|_, cached| cached.stored_at.elapsed() < self.ttl);
        entries.insert(
            id.clone(),
            CachedQuote {
                option,
                stored_at: Instant::now(),
            },
        );
        id
    }

    /// One-shot redemption: removes and returns the option, or `None`
    /// when the id is unknown, already consumed, or expired.
    ///
    /// The remove-then-check runs under a single lock hold, so two
    /// concurrent redemptions of the same id cannot both succeed.
    pub fn redeem(&self, id: &str) -> Option<RouteOption> {
        let cached = self.entries.lock().remove(id)?;
        if cached.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(cached.option)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MachineType, PricingStrategy};
    use std::sync::Arc;

    fn option(id: &str) -> RouteOption {
        RouteOption {
            id: id.to_string(),
            pickup_location: "A".into(),
            delivery_location: "B".into(),
            polyline: "abc".into(),
            distance_meters: 1000,
            duration_seconds: 300,
            strategy: PricingStrategy::Fastest,
            machine_type: MachineType::Aerial,
            estimated_cost: 6.2,
        }
    }

    #[test]
    fn redeem_is_one_shot() {
        let cache = QuoteCache::new(Duration::from_secs(600));
        let id = cache.put(option("q-1"));

        assert!(cache.redeem(&id).is_some());
        assert!(cache.redeem(&id).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn unknown_id_fails() {
        let cache = QuoteCache::new(Duration::from_secs(600));
        assert!(cache.redeem("nope").is_none());
    }

    #[test]
    fn expired_entries_are_not_redeemable() {
        let cache = QuoteCache::new(Duration::from_millis(0));
        let id = cache.put(option("q-1"));
        assert!(cache.redeem(&id).is_none());
    }

    #[test]
    fn put_sweeps_expired_entries() {
        let cache = QuoteCache::new(Duration::from_millis(0));
        cache.put(option("q-1"));
        cache.put(option("q-2"));
        // q-1 was already expired when q-2 arrived
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_redemption_succeeds_exactly_once() {
        let cache = Arc::new(QuoteCache::new(Duration::from_secs(600)));
        let id = cache.put(option("q-race"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let id = id.clone();
                std::thread::spawn(move || cache.redeem(&id).is_some())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
    }
}
