// Single-value TTL cache driven by an injected clock
use crate::application::clock::Clock;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

struct Slot<T> {
    value: Option<(DateTime<Utc>, T)>,
    generation: u64,
}

/// Holds one computed value until the TTL passes or it is invalidated.
///
/// A zero TTL disables caching entirely. Writers pass the generation they
/// observed before computing, so a value computed before an invalidation
/// is never stored after it.
pub struct TtlCache<T> {
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            slot: RwLock::new(Slot {
                value: None,
                generation: 0,
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }
        let slot = self.slot.read().await;
        let (stored_at, value) = slot.value.as_ref()?;
        if self.clock.now() - *stored_at < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    pub async fn generation(&self) -> u64 {
        self.slot.read().await.generation
    }

    /// Store `value` unless the cache was invalidated since `generation`
    pub async fn put(&self, generation: u64, value: T) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let mut slot = self.slot.write().await;
        if slot.generation != generation {
            return false;
        }
        slot.value = Some((self.clock.now(), value));
        true
    }

    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.value = None;
        slot.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use chrono::NaiveDate;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::at(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()))
    }

    #[tokio::test]
    async fn test_value_expires_at_ttl() {
        let clock = clock();
        let cache = TtlCache::new(clock.clone(), Duration::from_secs(60));

        assert_eq!(cache.get().await, None::<u32>);
        let generation = cache.generation().await;
        assert!(cache.put(generation, 7u32).await);
        assert_eq!(cache.get().await, Some(7));

        clock.advance(TimeDelta::seconds(59));
        assert_eq!(cache.get().await, Some(7));

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_invalidate_drops_value_and_stale_writes() {
        let cache = TtlCache::new(clock(), Duration::from_secs(60));
        let generation = cache.generation().await;
        cache.put(generation, "old".to_string()).await;

        cache.invalidate().await;
        assert_eq!(cache.get().await, None);

        // computed before the invalidation
        assert!(!cache.put(generation, "stale".to_string()).await);
        assert_eq!(cache.get().await, None);

        let generation = cache.generation().await;
        assert!(cache.put(generation, "fresh".to_string()).await);
        assert_eq!(cache.get().await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = TtlCache::new(clock(), Duration::ZERO);
        assert!(!cache.is_enabled());
        assert!(!cache.put(0, 1u8).await);
        assert_eq!(cache.get().await, None);
    }
}
